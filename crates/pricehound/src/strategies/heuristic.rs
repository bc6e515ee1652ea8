// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Heuristic scoring over every price-shaped element.
//!
//! A candidate is any element whose own text looks like a price. Its score
//! adds a tag weight, a class/id keyword bonus and a bonus for parent text
//! that announces a special or discounted price. The best score per distinct
//! price is kept and the overall maximum wins.

use crate::config::SiteConfig;
use crate::html::{class_and_id, element_text, is_hidden, own_text, parent_element, Page};
use crate::normalize::has_price_shape;
use crate::scoring::{Aggregation, ScoreBoard, WeightTable};
use crate::types::EngineResult;
use rust_decimal::Decimal;

const TAG_GROUPS: &[(&[&str], i32)] = &[
    (&["h1"], 15),
    (&["h2"], 12),
    (&["h3"], 10),
    (&["strong", "b", "em"], 8),
    (&["span"], 5),
    (&["div"], 3),
];

const CLASS_GROUPS: &[(&[&str], i32)] = &[
    (&["price", "cost", "amount", "value", "fiyat"], 10),
    (&["special", "discount", "sale", "offer", "indirim"], 8),
    (&["current", "main", "primary"], 6),
];

const CONTEXT_GROUPS: &[(&[&str], i32)] = &[
    (&["sepete özel", "özel fiyat", "special price"], 20),
    (&["indirimli", "kampanya", "discounted", "sale price"], 15),
    (&["kazancınız", "tasarruf", "you save"], 10),
];

const TAGS: WeightTable = WeightTable::new(TAG_GROUPS);
const CLASSES: WeightTable = WeightTable::new(CLASS_GROUPS);
const CONTEXT: WeightTable = WeightTable::new(CONTEXT_GROUPS);

pub fn extract(page: &Page<'_>, config: &SiteConfig) -> EngineResult<Option<Decimal>> {
    let mut board = ScoreBoard::new(Aggregation::Max);

    for el in page.select("body *")? {
        if is_hidden(&el) {
            continue;
        }
        let text = own_text(&el);
        if !has_price_shape(&text) {
            continue;
        }
        let Some(price) = config.accept(&text) else {
            continue;
        };
        board.record(price, score(&el));
    }

    Ok(board.best())
}

/// Parents holding more text than this are page sections, not price boxes.
const MAX_CONTEXT_CHARS: usize = 200;

fn score(el: &scraper::ElementRef<'_>) -> i32 {
    TAGS.exact(el.value().name()) + CLASSES.score(&class_and_id(el)) + context_bonus(el)
}

fn context_bonus(el: &scraper::ElementRef<'_>) -> i32 {
    let Some(parent) = parent_element(el) else {
        return 0;
    };
    if matches!(parent.value().name(), "body" | "html") {
        return 0;
    }
    let text = element_text(&parent);
    if text.chars().count() > MAX_CONTEXT_CHARS {
        return 0;
    }
    CONTEXT.score(&text.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractionContext;

    fn run(body: &str) -> Option<Decimal> {
        let html = format!("<html><body>{body}</body></html>");
        let ctx = ExtractionContext::new("https://shop.test/p/1", html);
        let page = Page::parse(&ctx);
        let cfg = SiteConfig::builder().build().unwrap();
        extract(&page, &cfg).unwrap()
    }

    #[test]
    fn test_heading_outranks_plain_div() {
        let body = r#"<div>1.499,00 TL</div><h1>1.299,00 TL</h1>"#;
        assert_eq!(run(body), Some(Decimal::new(129900, 2)));
    }

    #[test]
    fn test_special_price_context_wins() {
        let body = r#"
            <span class="product-price">1.499,00 TL</span>
            <div class="campaign"><p>Sepete Özel Fiyat</p><span>1.249,00 TL</span></div>"#;
        assert_eq!(run(body), Some(Decimal::new(124900, 2)));
    }

    #[test]
    fn test_script_content_is_ignored() {
        let body = r#"<script>window.price = "9.999,00 TL";</script><span>349,00 TL</span>"#;
        assert_eq!(run(body), Some(Decimal::new(34900, 2)));
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let body = r#"<span>200,00 TL</span><span>100,00 TL</span>"#;
        assert_eq!(run(body), Some(Decimal::new(20000, 2)));
    }

    #[test]
    fn test_no_price_shaped_text() {
        assert_eq!(run("<p>Beden 42</p><span>Stokta 3 adet</span>"), None);
    }
}
