// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Candidate ranking shared by the scoring strategies.
//!
//! Each scoring strategy differs only in how it weighs a candidate, so the
//! weights live in [`WeightTable`]s and the ranking lives in [`ScoreBoard`].
//! Candidates keep first-seen order and ties go to the earliest one, which
//! keeps repeated runs over the same page deterministic.

use rust_decimal::Decimal;

/// How repeated sightings of the same price combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Keep the best single score.
    Max,
    /// Add every score.
    Sum,
}

/// Keyword groups and the bonus each group awards at most once.
#[derive(Debug, Clone, Copy)]
pub struct WeightTable {
    groups: &'static [(&'static [&'static str], i32)],
}

impl WeightTable {
    pub const fn new(groups: &'static [(&'static [&'static str], i32)]) -> Self {
        Self { groups }
    }

    /// Sum of the weights of every group with a keyword contained in
    /// `haystack`. The haystack is expected to be lower-cased already.
    pub fn score(&self, haystack: &str) -> i32 {
        self.groups
            .iter()
            .filter(|(keywords, _)| keywords.iter().any(|k| haystack.contains(k)))
            .map(|(_, weight)| weight)
            .sum()
    }

    /// Weight of the first group with a keyword contained in `haystack`.
    pub fn first_match(&self, haystack: &str) -> i32 {
        self.groups
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| haystack.contains(k)))
            .map(|(_, weight)| *weight)
            .unwrap_or(0)
    }

    /// Weight of the first group with a keyword equal to `key`.
    pub fn exact(&self, key: &str) -> i32 {
        self.groups
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| *k == key))
            .map(|(_, weight)| *weight)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct ScoreBoard {
    mode: Aggregation,
    entries: Vec<(Decimal, i32)>,
}

impl ScoreBoard {
    pub fn new(mode: Aggregation) -> Self {
        Self {
            mode,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, price: Decimal, score: i32) {
        match self.entries.iter_mut().find(|(p, _)| *p == price) {
            Some((_, current)) => match self.mode {
                Aggregation::Max => *current = (*current).max(score),
                Aggregation::Sum => *current += score,
            },
            None => self.entries.push((price, score)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn score_of(&self, price: Decimal) -> Option<i32> {
        self.entries
            .iter()
            .find(|(p, _)| *p == price)
            .map(|(_, s)| *s)
    }

    /// Highest-scoring price; the first-seen candidate wins a tie.
    pub fn best(&self) -> Option<Decimal> {
        let mut best: Option<(Decimal, i32)> = None;
        for &(price, score) in &self.entries {
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((price, score));
            }
        }
        best.map(|(price, _)| price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUPS: &[(&[&str], i32)] = &[(&["price", "cost"], 10), (&["sale", "discount"], 8)];
    const TABLE: WeightTable = WeightTable::new(GROUPS);

    #[test]
    fn test_weight_table_awards_each_group_once() {
        assert_eq!(TABLE.score("price price-cost"), 10);
        assert_eq!(TABLE.score("sale-price"), 18);
        assert_eq!(TABLE.score("title"), 0);
        assert_eq!(TABLE.exact("discount"), 8);
        assert_eq!(TABLE.exact("disc"), 0);
        assert_eq!(TABLE.first_match("sale-price"), 10);
    }

    #[test]
    fn test_sum_accumulates() {
        let mut board = ScoreBoard::new(Aggregation::Sum);
        board.record(Decimal::TEN, 5);
        board.record(Decimal::ONE, 8);
        board.record(Decimal::TEN, 5);
        assert_eq!(board.score_of(Decimal::TEN), Some(10));
        assert_eq!(board.best(), Some(Decimal::TEN));
    }

    #[test]
    fn test_max_keeps_best_single_score() {
        let mut board = ScoreBoard::new(Aggregation::Max);
        board.record(Decimal::TEN, 5);
        board.record(Decimal::TEN, 3);
        assert_eq!(board.score_of(Decimal::TEN), Some(5));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let mut board = ScoreBoard::new(Aggregation::Sum);
        board.record(Decimal::ONE, 7);
        board.record(Decimal::TEN, 7);
        assert_eq!(board.best(), Some(Decimal::ONE));
        assert!(ScoreBoard::new(Aggregation::Max).best().is_none());
    }
}
