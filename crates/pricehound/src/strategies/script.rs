// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Price variables assigned in inline scripts (`"currentPrice": 129.9`).

use crate::config::SiteConfig;
use crate::html::Page;
use crate::types::EngineResult;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#""price"\s*:\s*"?([0-9]+(?:[.,][0-9]+)*)"#,
        r#""(?:currentPrice|discountedPrice|sellingPrice)"\s*:\s*"?([0-9]+(?:[.,][0-9]+)*)"#,
        r#"\bprice\s*[:=]\s*"?([0-9]+(?:[.,][0-9]+)*)"#,
        r#"\bcurrentPrice\s*[:=]\s*"?([0-9]+(?:[.,][0-9]+)*)"#,
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

pub fn extract(page: &Page<'_>, config: &SiteConfig) -> EngineResult<Option<Decimal>> {
    for script in page.select("script:not([src])")? {
        if script
            .value()
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("application/ld+json"))
        {
            continue;
        }
        let body = script.inner_html();
        for re in PATTERNS.iter() {
            let found = re
                .captures_iter(&body)
                .filter_map(|caps| caps.get(1))
                .find_map(|m| config.accept(m.as_str()));
            if found.is_some() {
                return Ok(found);
            }
        }
    }
    Ok(None)
}
