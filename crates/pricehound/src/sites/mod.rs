// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Site profiles: the static table the resolver routes over.
//!
//! Adding a site means adding a module with a `profile()` constructor and
//! listing it in [`builtin_profiles`]. Nothing in the orchestrator changes.

pub mod generic;
pub mod hepsiburada;
pub mod n11;
pub mod trendyol;

use crate::config::SiteConfig;
use crate::strategies::Strategy;
use crate::types::{EngineResult, FetchMethod, ProviderInfo};
use regex::Regex;
use std::sync::LazyLock;

/// Domain claim that matches every domain.
pub const ANY_DOMAIN: &str = "*";

/// Desktop Chrome user agent for sites that serve bots a different page.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                      (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accepts or rejects a URL for a profile.
pub type UrlValidator = fn(&str) -> bool;

/// One provider: who it serves and how it extracts.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub name: String,
    pub domains: Vec<String>,
    /// Lower runs first.
    pub priority: u32,
    pub config: SiteConfig,
    pub strategies: Vec<Strategy>,
    pub url_validator: UrlValidator,
}

impl SiteProfile {
    /// The generic profile claims every domain.
    pub fn is_generic(&self) -> bool {
        self.domains.iter().any(|d| d == ANY_DOMAIN)
    }

    /// Whether this profile claims a normalized domain.
    pub fn claims(&self, domain: &str) -> bool {
        if self.is_generic() {
            return true;
        }
        !domain.is_empty() && self.domains.iter().any(|claim| domain.contains(claim.as_str()))
    }

    /// Whether this profile accepts the URL's shape.
    pub fn accepts_url(&self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() {
            return false;
        }
        if !self.is_generic() {
            let lower = url.to_lowercase();
            if !self.domains.iter().any(|d| lower.contains(d.as_str())) {
                return false;
            }
        }
        (self.url_validator)(url)
    }

    pub fn fetch_method(&self) -> FetchMethod {
        if self.config.uses_renderer() {
            FetchMethod::Rendered
        } else {
            FetchMethod::DirectHttp
        }
    }

    pub fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: self.name.clone(),
            domains: self.domains.clone(),
            priority: self.priority,
            requires_rendering: self.config.requires_rendering,
            default_currency: self.config.default_currency.clone(),
            fetch_method: self.fetch_method(),
        }
    }
}

/// The built-in profile table.
pub fn builtin_profiles() -> EngineResult<Vec<SiteProfile>> {
    Ok(vec![
        trendyol::profile()?,
        hepsiburada::profile()?,
        n11::profile()?,
        generic::profile()?,
    ])
}

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Any digit in the URL counts as a product id. Marketplace slugs carry
/// short numbers ("iphone-15-128-gb") as often as long ids.
pub(crate) fn has_product_id(url: &str) -> bool {
    DIGIT_RUN.is_match(url)
}

/// Absolute URL with a scheme and a host.
pub(crate) fn is_absolute_url(url: &str) -> bool {
    url::Url::parse(url)
        .map(|u| u.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_has_one_generic_last() {
        let profiles = builtin_profiles().unwrap();
        let generics: Vec<_> = profiles.iter().filter(|p| p.is_generic()).collect();
        assert_eq!(generics.len(), 1);
        assert!(profiles.last().unwrap().is_generic());
        assert!(profiles
            .iter()
            .filter(|p| !p.is_generic())
            .all(|p| p.priority < generics[0].priority));
    }

    #[test]
    fn test_claims_by_suffix_or_substring() {
        let p = trendyol::profile().unwrap();
        assert!(p.claims("trendyol.com"));
        assert!(p.claims("m.trendyol.com"));
        assert!(!p.claims("example.com"));
        assert!(!p.claims(""));
        assert!(generic::profile().unwrap().claims(""));
    }

    #[test]
    fn test_every_profile_runs_at_least_one_strategy() {
        for p in builtin_profiles().unwrap() {
            assert!(!p.strategies.is_empty(), "{}", p.name);
        }
    }

    #[test]
    fn test_short_digit_runs_count_as_product_ids() {
        assert!(has_product_id("https://www.hepsiburada.com/apple-iphone-15-128-gb"));
        assert!(has_product_id("https://www.n11.com/arama/urunler-2"));
        assert!(!has_product_id("https://www.trendyol.com/kampanyalar"));
    }

    #[test]
    fn test_absolute_url_check() {
        assert!(is_absolute_url("https://example.com/p/1"));
        assert!(!is_absolute_url("example.com/p/1"));
        assert!(!is_absolute_url("not a url"));
    }
}
