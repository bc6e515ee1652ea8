// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Locale-aware conversion of raw price text into a decimal.
//!
//! Every strategy funnels its raw text through [`PriceParser::parse`], so the
//! separator rule in [`resolve_separators`] is the single place where
//! `1.234,56` and `1,234.56` are reconciled.

use crate::types::{EngineError, EngineResult};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static CURRENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)TL|TRY|USD|EUR|GBP|[$€£₺₹¥]").expect("valid regex")
});

static CURRENCY_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:[$€£₺₹¥]|(?:TL|TRY|USD|EUR|GBP)\b)").expect("valid regex")
});

static DECIMAL_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9][.,][0-9]{2}(?:[^0-9]|$)").expect("valid regex"));

/// Default patterns, most specific first. A match never starts inside a
/// longer digit run and never stops in front of another digit.
static DEFAULT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // 1.234,56
        r"(?:^|[^0-9.,])([0-9]{1,3}(?:\.[0-9]{3})*,[0-9]{2})(?:[^0-9]|$)",
        // 1,234.56
        r"(?:^|[^0-9.,])([0-9]{1,3}(?:,[0-9]{3})*\.[0-9]{2})(?:[^0-9]|$)",
        // 1234,56
        r"(?:^|[^0-9.,])([0-9]+,[0-9]{2})(?:[^0-9]|$)",
        // 1234.5
        r"(?:^|[^0-9.,])([0-9]+\.[0-9]{1,2})(?:[^0-9]|$)",
        // 1.234 / 1,234,567
        r"(?:^|[^0-9.,])([0-9]{1,3}(?:[.,][0-9]{3})+)(?:[^0-9]|$)",
        r"(?:^|[^0-9])([0-9]+)",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Pattern-driven price parser: site patterns first, then the defaults.
#[derive(Debug, Clone, Default)]
pub struct PriceParser {
    site: Vec<Regex>,
}

impl PriceParser {
    pub fn with_site_patterns(site: Vec<Regex>) -> Self {
        Self { site }
    }

    /// Convert raw text into a decimal, or fail with `NotANumber`.
    pub fn parse(&self, raw: &str) -> EngineResult<Decimal> {
        let cleaned = clean(raw);
        for re in self.site.iter().chain(DEFAULT_PATTERNS.iter()) {
            let Some(literal) = re.captures(&cleaned).and_then(|c| c.get(1)) else {
                continue;
            };
            if let Some(value) = literal_to_decimal(literal.as_str()) {
                return Ok(value);
            }
        }
        Err(EngineError::NotANumber(raw.trim().to_string()))
    }
}

/// Normalize with the default pattern list only.
pub fn normalize_price(raw: &str) -> EngineResult<Decimal> {
    PriceParser::default().parse(raw)
}

/// Whether text carries a number that looks like a price: a currency marker
/// or a two-digit decimal tail next to a digit.
pub fn has_price_shape(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && (CURRENCY_MARKER.is_match(text) || DECIMAL_TAIL.is_match(text))
}

/// Rewrite a numeric literal so that `.` is the only (decimal) separator.
///
/// Both separators present: the last one is decimal. Only `,`: decimal when
/// followed by exactly two digits at the end. Only `.`: grouping when it
/// repeats or is followed by exactly three digits.
pub fn resolve_separators(literal: &str) -> String {
    let literal = literal.trim_end_matches(['.', ',']);
    match (literal.rfind(','), literal.rfind('.')) {
        (Some(comma), Some(dot)) => {
            let idx = comma.max(dot);
            format!("{}.{}", digits_only(&literal[..idx]), &literal[idx + 1..])
        }
        (Some(comma), None) => {
            let frac = &literal[comma + 1..];
            if frac.len() == 2 && frac.bytes().all(|b| b.is_ascii_digit()) {
                format!("{}.{frac}", digits_only(&literal[..comma]))
            } else {
                digits_only(literal)
            }
        }
        (None, Some(dot)) => {
            if literal.matches('.').count() > 1 || literal.len() - dot - 1 == 3 {
                digits_only(literal)
            } else {
                literal.to_string()
            }
        }
        (None, None) => literal.to_string(),
    }
}

fn literal_to_decimal(literal: &str) -> Option<Decimal> {
    let resolved = resolve_separators(literal);
    if resolved.is_empty() {
        return None;
    }
    Decimal::from_str(&resolved).ok()
}

fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn clean(raw: &str) -> String {
    join_digit_groups(&CURRENCY.replace_all(raw, " "))
}

/// Words that may sit directly in front of a space-grouped price.
const PRICE_LABELS: &[&str] = &["fiyat", "fiyatı", "price", "prix", "preis", "total", "toplam"];

/// Remove whitespace used as a thousands separator (`1 299,00`, including
/// NBSP and narrow NBSP); any other whitespace run becomes a single space.
///
/// A short number right after a word other than a price label is a count
/// ("Adet 2 499,00"), so it is never joined to the group that follows.
fn join_digit_groups(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    let mut counted = false;
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_whitespace() {
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            let group = chars[i..].iter().take_while(|c| c.is_ascii_digit()).count();
            if counted || !((1..=3).contains(&run) && group == 3) {
                out.push(' ');
            }
            run = 0;
            continue;
        }
        if chars[i].is_ascii_digit() {
            if run == 0 {
                counted = follows_label_word(&out);
            }
            run += 1;
        } else {
            run = 0;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Whether `prefix` ends in a word (then optional spaces) that is not a
/// price label.
fn follows_label_word(prefix: &str) -> bool {
    let word: String = prefix
        .trim_end()
        .chars()
        .rev()
        .take_while(|c| c.is_alphabetic())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if word.is_empty() {
        return false;
    }
    let word = word.to_lowercase();
    !PRICE_LABELS.iter().any(|label| *label == word)
}
