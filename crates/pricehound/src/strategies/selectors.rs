// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! The site's configured selectors: primary list, then fallback list.

use crate::config::SiteConfig;
use crate::html::{element_text, Page};
use crate::types::EngineResult;
use rust_decimal::Decimal;
use tracing::debug;

/// Attributes that carry a machine-readable price on a matched element.
const PRICE_ATTRS: &[&str] = &["data-price", "data-price-value", "data-value", "content"];

pub fn extract(page: &Page<'_>, config: &SiteConfig) -> EngineResult<Option<Decimal>> {
    let selectors = config
        .primary_selectors
        .iter()
        .chain(config.fallback_selectors.iter());

    for selector in selectors {
        let elements = match page.select(selector) {
            Ok(elements) => elements,
            Err(e) => {
                debug!(url = page.url(), %selector, error = %e, "skipping selector");
                continue;
            }
        };
        for el in elements {
            if let Some(price) = config.accept(&element_text(&el)) {
                return Ok(Some(price));
            }
            let from_attr = PRICE_ATTRS
                .iter()
                .filter_map(|attr| el.value().attr(attr))
                .find_map(|value| config.accept(value));
            if from_attr.is_some() {
                return Ok(from_attr);
            }
        }
    }

    Ok(None)
}
