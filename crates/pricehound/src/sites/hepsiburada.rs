// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! HepsiBurada: obfuscated, class-less price markup.
//!
//! Class names rotate between deployments, so this profile relies on page
//! structure and wording instead of selectors.

use super::{has_product_id, SiteProfile, BROWSER_USER_AGENT};
use crate::config::{PriceBounds, SiteConfig};
use crate::strategies::Strategy;
use crate::types::EngineResult;
use std::time::Duration;

pub fn profile() -> EngineResult<SiteProfile> {
    let config = SiteConfig::builder()
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "tr-TR,tr;q=0.9,en;q=0.8")
        .timeout(Duration::from_secs(20))
        .user_agent(BROWSER_USER_AGENT)
        .requires_rendering(true)
        .wait_after_load(Duration::from_millis(5000))
        .default_currency("TRY")
        .structured_data(false)
        .meta_tags(false)
        .bounds(PriceBounds::site_default())
        .build()?;

    Ok(SiteProfile {
        name: "HepsiBurada".to_string(),
        domains: vec!["hepsiburada.com".to_string()],
        priority: 10,
        config,
        strategies: vec![
            Strategy::ContextPhrase,
            Strategy::HeuristicScore,
            Strategy::StructuralPattern,
            Strategy::TextProximity,
        ],
        url_validator: is_product_url,
    })
}

fn is_product_url(url: &str) -> bool {
    url.contains("-p-") || url.contains("/product/") || has_product_id(url)
}
