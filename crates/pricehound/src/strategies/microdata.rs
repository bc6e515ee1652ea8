// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Schema.org microdata (`itemprop` attributes).

use crate::config::SiteConfig;
use crate::html::{element_text, Page};
use crate::types::EngineResult;
use rust_decimal::Decimal;

const ITEMPROP_SELECTORS: &[&str] = &[
    r#"[itemtype*="Offer"] [itemprop="price"]"#,
    r#"[itemprop="price"]"#,
    r#"[itemprop="lowPrice"]"#,
    r#"[itemprop="highPrice"]"#,
    r#"[itemprop="amount"]"#,
    r#"[itemprop="value"]"#,
];

pub fn extract(page: &Page<'_>, config: &SiteConfig) -> EngineResult<Option<Decimal>> {
    for selector in ITEMPROP_SELECTORS {
        for el in page.select(selector)? {
            let content = el
                .value()
                .attr("content")
                .map(str::trim)
                .filter(|c| !c.is_empty());
            let price = match content {
                Some(content) => config.accept(content),
                None => config.accept(&element_text(&el)),
            };
            if price.is_some() {
                return Ok(price);
            }
        }
    }
    Ok(None)
}
