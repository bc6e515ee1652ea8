// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! N11: price sits in `.newPrice`, often inside an `ins[content]`.

use super::{has_product_id, SiteProfile, BROWSER_USER_AGENT};
use crate::config::{PriceBounds, SiteConfig};
use crate::strategies::Strategy;
use crate::types::EngineResult;
use std::time::Duration;

pub fn profile() -> EngineResult<SiteProfile> {
    let config = SiteConfig::builder()
        .primary_selectors([
            ".newPrice ins",
            ".newPrice",
            ".priceContainer .newPrice",
            ".urunPriceClass",
            ".currentPrice",
            ".productPrice",
            ".salePrice",
            ".price",
            "[data-price]",
        ])
        .fallback_selectors([
            ".unf-p-summary-price",
            "[class*='fiyat']",
            "[class*='price']:not([class*='old'])",
        ])
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "tr-TR,tr;q=0.9,en;q=0.8")
        .header("Sec-Fetch-Dest", "document")
        .header("Sec-Fetch-Mode", "navigate")
        .header("Sec-Fetch-Site", "none")
        .timeout(Duration::from_secs(15))
        .user_agent(BROWSER_USER_AGENT)
        .requires_rendering(true)
        .wait_after_load(Duration::from_millis(3000))
        .default_currency("TRY")
        .bounds(PriceBounds::site_default())
        .build()?;

    Ok(SiteProfile {
        name: "N11".to_string(),
        domains: vec!["n11.com".to_string()],
        priority: 15,
        config,
        strategies: vec![
            Strategy::ConfiguredSelectors,
            Strategy::StructuredData,
            Strategy::MetaTags,
            Strategy::FreeText,
        ],
        url_validator: is_product_url,
    })
}

fn is_product_url(url: &str) -> bool {
    url.contains("/urun/") || has_product_id(url)
}
