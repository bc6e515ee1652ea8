// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Prices sitting next to "special price" phrases.
//!
//! Marketplaces often render the real basket price in an unlabelled element
//! beside a phrase like "Sepete özel". For each phrase, in order, the
//! elements around the phrase are searched in document order: the parent's
//! subtree, the grandparent's subtree, then the following siblings. When no
//! phrase leads anywhere, elements whose own text carries a lira marker are
//! tried.

use crate::config::SiteConfig;
use crate::html::{is_hidden, own_text, parent_element, Page};
use crate::normalize::has_price_shape;
use crate::types::EngineResult;
use rust_decimal::Decimal;
use scraper::ElementRef;
use std::collections::HashSet;

/// Phrase, and whether the phrase element's own text may hold the price.
/// Savings phrases sit next to the saved amount, never the price itself.
const PHRASES: &[(&str, bool)] = &[
    ("sepete özel", true),
    ("özel fiyat", true),
    ("special price", true),
    ("indirimli", true),
    ("sale price", true),
    ("kazancınız", false),
    ("tasarruf", false),
    ("you save", false),
];

pub fn extract(page: &Page<'_>, config: &SiteConfig) -> EngineResult<Option<Decimal>> {
    let elements: Vec<ElementRef<'_>> = page
        .select("body *")?
        .into_iter()
        .filter(|el| !is_hidden(el))
        .collect();

    for &(phrase, self_allowed) in PHRASES {
        for anchor in elements
            .iter()
            .filter(|el| own_text(el).to_lowercase().contains(phrase))
        {
            for candidate in neighbourhood(anchor) {
                if !self_allowed && candidate.id() == anchor.id() {
                    continue;
                }
                if let Some(price) = price_in(&candidate, config) {
                    return Ok(Some(price));
                }
            }
        }
    }

    let lira = elements.iter().find_map(|el| {
        let text = own_text(el);
        (text.contains('₺') || text.contains("TL"))
            .then(|| price_in(el, config))
            .flatten()
    });
    Ok(lira)
}

fn price_in(el: &ElementRef<'_>, config: &SiteConfig) -> Option<Decimal> {
    let text = own_text(el);
    if !has_price_shape(&text) {
        return None;
    }
    config.accept(&text)
}

/// Parent subtree, grandparent subtree, then following siblings, each
/// element once.
fn neighbourhood<'a>(anchor: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut push = |el: ElementRef<'a>| {
        if !is_hidden(&el) && seen.insert(el.id()) {
            out.push(el);
        }
    };

    let parent = parent_element(anchor);
    let grandparent = parent.as_ref().and_then(parent_element);
    for scope in [parent, grandparent].into_iter().flatten() {
        for node in scope.descendants() {
            if let Some(el) = ElementRef::wrap(node) {
                push(el);
            }
        }
    }
    for node in anchor.next_siblings() {
        if let Some(el) = ElementRef::wrap(node) {
            push(el);
        }
    }
    out
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
    fn test_price_beside_basket_phrase() {
        let body = r#"
            <div class="list"><span>1.499,00 TL</span></div>
            <div class="basket"><span>Sepete Özel</span><div><b>1.349,00 TL</b></div></div>"#;
        assert_eq!(run(body), Some(Decimal::new(134900, 2)));
    }

    #[test]
    fn test_phrase_and_price_in_same_element() {
        let body = r#"<p>Özel fiyat 999,00 TL</p>"#;
        assert_eq!(run(body), Some(Decimal::new(99900, 2)));
    }

    #[test]
    fn test_savings_amount_is_not_the_price() {
        let body = r#"<div><span>Kazancınız 150,00 TL</span><span>850,00 TL</span></div>"#;
        assert_eq!(run(body), Some(Decimal::new(85000, 2)));
    }

    #[test]
    fn test_lira_marker_fallback() {
        let body = r#"<p>Renk: Mavi</p><span>₺ 2.150,00</span>"#;
        assert_eq!(run(body), Some(Decimal::new(215000, 2)));
    }

    #[test]
    fn test_nothing_to_find() {
        assert_eq!(run("<p>Sepete özel kampanya</p>"), None);
    }
}
