// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! The catch-all profile. Claims every domain and is always tried last.

use super::{is_absolute_url, SiteProfile, ANY_DOMAIN};
use crate::config::{PriceBounds, SiteConfig};
use crate::strategies::Strategy;
use crate::types::EngineResult;
use std::time::Duration;

pub const GENERIC_PRIORITY: u32 = 1000;

pub fn profile() -> EngineResult<SiteProfile> {
    let config = SiteConfig::builder()
        .primary_selectors([
            ".price",
            ".product-price",
            ".current-price",
            ".sale-price",
            ".regular-price",
            ".final-price",
            ".price-current",
            ".price-now",
            ".price-value",
            "[data-price]",
            "[data-testid*='price']",
            "[data-test-id*='price']",
            "[class*='price']:not([class*='old']):not([class*='was']):not([class*='original'])",
            "[id*='price']:not([id*='old']):not([id*='was'])",
        ])
        .fallback_selectors([
            "[class*='cost']",
            "[class*='amount']",
            "[id*='cost']",
            "[id*='amount']",
            ".money",
            ".total",
        ])
        .patterns([
            r"(?:^|[^0-9.,])([0-9]{1,3}(?:[.,][0-9]{3})*[.,][0-9]{2})(?:[^0-9]|$)",
            r"(?:^|[^0-9.,])([0-9]+[.,][0-9]{2})(?:[^0-9]|$)",
        ])
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .timeout(Duration::from_secs(10))
        .requires_rendering(false)
        .wait_after_load(Duration::from_millis(2000))
        .default_currency("USD")
        .bounds(PriceBounds::generic())
        .build()?;

    Ok(SiteProfile {
        name: "Generic E-commerce".to_string(),
        domains: vec![ANY_DOMAIN.to_string()],
        priority: GENERIC_PRIORITY,
        config,
        strategies: vec![
            Strategy::StructuredData,
            Strategy::MetaTags,
            Strategy::ConfiguredSelectors,
            Strategy::FreeText,
            Strategy::Microdata,
        ],
        url_validator: is_absolute_url,
    })
}
