// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Site Resolver: domain + URL to an ordered provider list.

use crate::sites::{builtin_profiles, SiteProfile};
use crate::types::{EngineError, EngineResult};
use std::sync::Arc;

/// Immutable routing table over the registered profiles.
#[derive(Debug, Clone)]
pub struct SiteResolver {
    /// Site-specific profiles in registration order.
    specific: Vec<Arc<SiteProfile>>,
    generic: Arc<SiteProfile>,
}

impl SiteResolver {
    /// Build a resolver. The table must contain exactly one generic profile.
    pub fn new(profiles: Vec<SiteProfile>) -> EngineResult<Self> {
        let (generics, specific): (Vec<_>, Vec<_>) =
            profiles.into_iter().partition(SiteProfile::is_generic);

        let mut generics = generics.into_iter();
        let generic = match (generics.next(), generics.next()) {
            (Some(g), None) => g,
            (None, _) => {
                return Err(EngineError::InvalidConfig(
                    "no generic provider registered".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(EngineError::InvalidConfig(
                    "more than one generic provider registered".to_string(),
                ))
            }
        };

        Ok(Self {
            specific: specific.into_iter().map(Arc::new).collect(),
            generic: Arc::new(generic),
        })
    }

    /// Resolver over the built-in site table.
    pub fn builtin() -> EngineResult<Self> {
        Self::new(builtin_profiles()?)
    }

    /// Providers for `(domain, url)`, best first.
    ///
    /// Specific profiles that claim the domain and accept the URL come first,
    /// ascending by priority with registration order breaking ties. The
    /// generic profile is the only entry when nothing else matches.
    pub fn resolve(&self, domain: &str, url: &str) -> Vec<Arc<SiteProfile>> {
        let domain = normalize_domain(domain);
        let mut matched: Vec<Arc<SiteProfile>> = self
            .specific
            .iter()
            .filter(|p| p.claims(&domain) && p.accepts_url(url))
            .cloned()
            .collect();
        // Vec::sort_by_key is stable.
        matched.sort_by_key(|p| p.priority);

        if matched.is_empty() {
            matched.push(Arc::clone(&self.generic));
        }
        matched
    }

    /// Convenience: extract the domain from `url` and resolve.
    pub fn resolve_url(&self, url: &str) -> Vec<Arc<SiteProfile>> {
        self.resolve(&extract_domain(url), url)
    }

    /// Site-specific profiles that claim the domain, ignoring URL shape,
    /// ascending by priority.
    pub fn claimants(&self, domain: &str) -> Vec<Arc<SiteProfile>> {
        let domain = normalize_domain(domain);
        let mut claiming: Vec<Arc<SiteProfile>> = self
            .specific
            .iter()
            .filter(|p| p.claims(&domain))
            .cloned()
            .collect();
        claiming.sort_by_key(|p| p.priority);
        claiming
    }

    pub fn generic(&self) -> &Arc<SiteProfile> {
        &self.generic
    }

    /// Every profile in registration order, generic last.
    pub fn profiles(&self) -> Vec<Arc<SiteProfile>> {
        self.specific
            .iter()
            .chain(std::iter::once(&self.generic))
            .cloned()
            .collect()
    }
}

/// Lower-case and strip one leading `www.`.
pub fn normalize_domain(domain: &str) -> String {
    let lower = domain.trim().to_lowercase();
    match lower.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// The normalized host of `url`, or an empty string when it does not parse.
pub fn extract_domain(url: &str) -> String {
    url::Url::parse(url.trim())
        .ok()
        .and_then(|u| u.host_str().map(normalize_domain))
        .unwrap_or_default()
}
