// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Text proximity ranking over the visible page text.
//!
//! Patterns are ordered from the most telling context ("sepete özel fiyat")
//! to the plainest currency adjacency. A hit on pattern `i` of `n` is worth
//! `n - i`, hits add up per price, and the top total wins.

use crate::config::SiteConfig;
use crate::html::Page;
use crate::scoring::{Aggregation, ScoreBoard};
use crate::types::EngineResult;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

/// A price literal that does not start inside a longer number.
const NUM: &str = r"([0-9]+(?:[.,][0-9]{3})*(?:[.,][0-9]{1,2})?)";

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"(?i)sepete\s+özel\s+fiyat[^0-9]{{0,20}}{NUM}"),
        format!(r"(?i)özel\s+fiyat[^0-9]{{0,20}}{NUM}"),
        format!(r"(?i)indirimli\s+fiyat[^0-9]{{0,20}}{NUM}"),
        format!(r"(?i)(?:special|sale)\s+price[^0-9]{{0,20}}{NUM}"),
        format!(r"(?i)(?:fiyat|price)\s*:?\s*(?:₺|TL|\$|€|£)?\s*{NUM}"),
        format!(r"(?:^|[^0-9.,]){NUM}\s*(?:TL|₺)"),
        format!(r"(?:₺|TL)\s*{NUM}"),
        format!(r"[$€£]\s*{NUM}"),
        format!(r"(?:^|[^0-9.,]){NUM}\s*(?:USD|EUR|GBP|TRY|[$€£])"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

pub fn extract(page: &Page<'_>, config: &SiteConfig) -> EngineResult<Option<Decimal>> {
    let text = page.visible_text();
    let mut board = ScoreBoard::new(Aggregation::Sum);
    let total = PATTERNS.len() as i32;

    for (rank, re) in PATTERNS.iter().enumerate() {
        let weight = total - rank as i32;
        for caps in re.captures_iter(text) {
            let Some(literal) = caps.get(1) else {
                continue;
            };
            if let Some(price) = config.accept(literal.as_str()) {
                board.record(price, weight);
            }
        }
    }

    Ok(board.best())
}
