// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Structural pattern scoring.
//!
//! Runs a fixed list of structural selectors (price-like classes and ids,
//! data attributes, main-content containers, elements right after headings).
//! Every price found under a selector earns that selector's weight, and the
//! price with the highest total wins.

use crate::config::SiteConfig;
use crate::html::{element_text, is_hidden, Page};
use crate::normalize::has_price_shape;
use crate::scoring::{Aggregation, ScoreBoard, WeightTable};
use crate::types::EngineResult;
use rust_decimal::Decimal;
use tracing::debug;

const STRUCTURAL_SELECTORS: &[&str] = &[
    "[class*='price']:not([class*='old']):not([class*='was']):not([class*='original'])",
    "[id*='price']:not([id*='old']):not([id*='was'])",
    "[class*='special']",
    "[class*='discount']",
    "[class*='offer']",
    "[class*='amount']",
    "[class*='cost']",
    "[data-price]",
    "[data-testid*='price']",
    "[data-test-id*='price']",
    "main *",
    "[role='main'] *",
    "#content *",
    ".content *",
    "h1 + *",
    "h2 + *",
    "h1 + * *",
    "h2 + * *",
];

/// First matching group decides a selector's weight.
const SELECTOR_GROUPS: &[(&[&str], i32)] = &[
    (&["special", "discount", "offer"], 15),
    (&["price", "amount", "cost"], 12),
    (&["data-"], 10),
    (&["main", "content"], 8),
    (&["h1", "h2"], 6),
];

const WEIGHTS: WeightTable = WeightTable::new(SELECTOR_GROUPS);

/// Longer text belongs to a container rather than a price element.
const MAX_CANDIDATE_CHARS: usize = 80;

pub fn extract(page: &Page<'_>, config: &SiteConfig) -> EngineResult<Option<Decimal>> {
    let mut board = ScoreBoard::new(Aggregation::Sum);

    for selector in STRUCTURAL_SELECTORS {
        let weight = WEIGHTS.first_match(selector);
        let elements = match page.select(selector) {
            Ok(elements) => elements,
            Err(e) => {
                debug!(url = page.url(), %selector, error = %e, "structural selector rejected");
                continue;
            }
        };
        for el in elements {
            if is_hidden(&el) {
                continue;
            }
            let text = element_text(&el);
            if text.chars().count() > MAX_CANDIDATE_CHARS || !has_price_shape(&text) {
                continue;
            }
            if let Some(price) = config.accept(&text) {
                board.record(price, weight);
            }
        }
    }

    Ok(board.best())
}
