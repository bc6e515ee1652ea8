// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Price meta tags: Open Graph, product namespace and Twitter cards.

use crate::config::SiteConfig;
use crate::html::Page;
use crate::types::EngineResult;
use rust_decimal::Decimal;

const META_PROBES: &[&str] = &[
    r#"meta[property="product:price:amount"]"#,
    r#"meta[property="og:price:amount"]"#,
    r#"meta[property="product:price"]"#,
    r#"meta[property="og:price"]"#,
    r#"meta[name="price"]"#,
    r#"meta[name="product:price"]"#,
    r#"meta[property="price"]"#,
    r#"meta[itemprop="price"]"#,
    r#"meta[property="cost"]"#,
];

pub fn extract(page: &Page<'_>, config: &SiteConfig) -> EngineResult<Option<Decimal>> {
    if !config.meta_tags_enabled {
        return Ok(None);
    }

    for probe in META_PROBES {
        for meta in page.select(probe)? {
            if let Some(price) = meta.value().attr("content").and_then(|c| config.accept(c)) {
                return Ok(Some(price));
            }
        }
    }

    twitter_card(page, config)
}

/// `twitter:dataN` counts only when the matching `twitter:labelN` says price.
fn twitter_card(page: &Page<'_>, config: &SiteConfig) -> EngineResult<Option<Decimal>> {
    for n in 1..=2 {
        let labelled = page
            .select(&format!(r#"meta[name="twitter:label{n}"]"#))?
            .iter()
            .any(|label| card_value(label).is_some_and(|v| v.to_lowercase().contains("price")));
        if !labelled {
            continue;
        }
        for data in page.select(&format!(r#"meta[name="twitter:data{n}"]"#))? {
            if let Some(price) = card_value(&data).and_then(|v| config.accept(v)) {
                return Ok(Some(price));
            }
        }
    }
    Ok(None)
}

fn card_value<'a>(meta: &scraper::ElementRef<'a>) -> Option<&'a str> {
    meta.value()
        .attr("content")
        .or_else(|| meta.value().attr("value"))
}
