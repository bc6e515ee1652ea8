// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Last-resort scan of the visible text for any currency-adjacent number.

use crate::config::SiteConfig;
use crate::html::Page;
use crate::types::EngineResult;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

const NUM: &str = r"([0-9]+(?:[.,][0-9]{3})*(?:[.,][0-9]{1,2})?)";

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"\$\s*{NUM}"),
        format!(r"€\s*{NUM}"),
        format!(r"£\s*{NUM}"),
        format!(r"₹\s*{NUM}"),
        format!(r"₺\s*{NUM}"),
        format!(r"(?i)(?:price|cost|fiyat)\s*:?\s*{NUM}"),
        format!(r"(?:^|[^0-9.,]){NUM}\s*(?:TL|TRY|USD|EUR|GBP|₺|\$|€|£)"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

pub fn extract(page: &Page<'_>, config: &SiteConfig) -> EngineResult<Option<Decimal>> {
    let text = page.visible_text();
    let found = PATTERNS.iter().find_map(|re| {
        re.captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| config.accept(m.as_str()))
    });
    Ok(found)
}
