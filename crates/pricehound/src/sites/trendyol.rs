// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Trendyol: client-rendered, prices in `.prc-dsc` and in the inline app state.

use super::{has_product_id, SiteProfile, BROWSER_USER_AGENT};
use crate::config::{PriceBounds, SiteConfig};
use crate::strategies::Strategy;
use crate::types::EngineResult;
use std::time::Duration;

pub fn profile() -> EngineResult<SiteProfile> {
    let config = SiteConfig::builder()
        .primary_selectors([
            ".prc-dsc",
            ".product-price-container .prc-dsc",
            "[data-test-id='price-current-price']",
            ".product-detail-price .prc-dsc",
            ".pr-in-w .prc-dsc",
            ".prc-org",
        ])
        .fallback_selectors([".price", ".product-price", ".current-price", "[data-price]"])
        .patterns([
            r"(?:^|[^0-9.,])([0-9]{1,3}(?:\.[0-9]{3})+,[0-9]{2})(?:[^0-9]|$)",
            r"(?:^|[^0-9.,])([0-9]+,[0-9]{2})(?:[^0-9]|$)",
        ])
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "tr-TR,tr;q=0.9,en;q=0.8")
        .timeout(Duration::from_secs(15))
        .user_agent(BROWSER_USER_AGENT)
        .requires_rendering(true)
        .wait_after_load(Duration::from_millis(3000))
        .default_currency("TRY")
        .bounds(PriceBounds::site_default())
        .build()?;

    Ok(SiteProfile {
        name: "Trendyol".to_string(),
        domains: vec!["trendyol.com".to_string()],
        priority: 10,
        config,
        strategies: vec![
            Strategy::StructuredData,
            Strategy::ConfiguredSelectors,
            Strategy::ScriptVariables,
            Strategy::MetaTags,
        ],
        url_validator: is_product_url,
    })
}

fn is_product_url(url: &str) -> bool {
    url.contains("/p/") || url.contains("/product/") || url.contains("-p-") || has_product_id(url)
}
