// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-site declarative configuration.
//!
//! A [`SiteConfig`] is built once per site profile at startup and shared,
//! read-only, by every request routed to that site. Regex patterns are
//! compiled by the builder so a malformed table entry fails at startup
//! rather than during a fetch.

use crate::normalize::PriceParser;
use crate::types::{EngineError, EngineResult};
use regex::Regex;
use rust_decimal::Decimal;
use std::time::Duration;

/// User agent sent when a site does not configure its own.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; PricehoundBot/1.0)";

/// Inclusive range a candidate price must fall within to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceBounds {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// `[1, 100000]`, used by site-specific profiles.
    pub fn site_default() -> Self {
        Self::new(Decimal::ONE, Decimal::new(100_000, 0))
    }

    /// `[0.01, 1000000]`, used by the generic profile.
    pub fn generic() -> Self {
        Self::new(Decimal::new(1, 2), Decimal::new(1_000_000, 0))
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value > Decimal::ZERO && value >= self.min && value <= self.max
    }
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self::site_default()
    }
}

/// Static configuration for one site profile.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub primary_selectors: Vec<String>,
    pub fallback_selectors: Vec<String>,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    pub user_agent: String,
    pub requires_rendering: bool,
    /// Render even when the site does not need it.
    pub force_render: bool,
    pub wait_after_load: Duration,
    pub default_currency: String,
    pub structured_data_enabled: bool,
    pub meta_tags_enabled: bool,
    pub bounds: PriceBounds,
    parser: PriceParser,
}

impl SiteConfig {
    pub fn builder() -> SiteConfigBuilder {
        SiteConfigBuilder::default()
    }

    /// Whether acquisition must go through the renderer.
    pub fn uses_renderer(&self) -> bool {
        self.requires_rendering || self.force_render
    }

    /// Parse a raw price fragment with this site's patterns first, then the
    /// default pattern list.
    pub fn parse_price(&self, raw: &str) -> EngineResult<Decimal> {
        self.parser.parse(raw)
    }

    /// Parse a raw fragment and keep it only if it lies within the bounds.
    pub fn accept(&self, raw: &str) -> Option<Decimal> {
        self.parse_price(raw)
            .ok()
            .filter(|v| self.bounds.contains(*v))
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfigBuilder::default().finish(PriceParser::default())
    }
}

/// Builder for [`SiteConfig`].
#[derive(Debug, Clone)]
pub struct SiteConfigBuilder {
    primary_selectors: Vec<String>,
    fallback_selectors: Vec<String>,
    patterns: Vec<String>,
    headers: Vec<(String, String)>,
    timeout: Duration,
    user_agent: String,
    requires_rendering: bool,
    force_render: bool,
    wait_after_load: Duration,
    default_currency: String,
    structured_data_enabled: bool,
    meta_tags_enabled: bool,
    bounds: PriceBounds,
}

impl Default for SiteConfigBuilder {
    fn default() -> Self {
        Self {
            primary_selectors: Vec::new(),
            fallback_selectors: Vec::new(),
            patterns: Vec::new(),
            headers: Vec::new(),
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            requires_rendering: false,
            force_render: false,
            wait_after_load: Duration::from_secs(2),
            default_currency: "TRY".to_string(),
            structured_data_enabled: true,
            meta_tags_enabled: true,
            bounds: PriceBounds::site_default(),
        }
    }
}

impl SiteConfigBuilder {
    pub fn primary_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    pub fn fallback_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Regex patterns with exactly one capture group around the numeric literal.
    pub fn patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn requires_rendering(mut self, yes: bool) -> Self {
        self.requires_rendering = yes;
        self
    }

    pub fn force_render(mut self, yes: bool) -> Self {
        self.force_render = yes;
        self
    }

    pub fn wait_after_load(mut self, wait: Duration) -> Self {
        self.wait_after_load = wait;
        self
    }

    pub fn default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    pub fn structured_data(mut self, enabled: bool) -> Self {
        self.structured_data_enabled = enabled;
        self
    }

    pub fn meta_tags(mut self, enabled: bool) -> Self {
        self.meta_tags_enabled = enabled;
        self
    }

    pub fn bounds(mut self, bounds: PriceBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Validate and compile the configuration.
    pub fn build(self) -> EngineResult<SiteConfig> {
        if self.bounds.min > self.bounds.max {
            return Err(EngineError::InvalidConfig(format!(
                "price bounds inverted: {} > {}",
                self.bounds.min, self.bounds.max
            )));
        }
        if self.default_currency.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "default currency must not be empty".into(),
            ));
        }

        let mut compiled = Vec::with_capacity(self.patterns.len());
        for pattern in &self.patterns {
            let re = Regex::new(pattern).map_err(|e| {
                EngineError::InvalidConfig(format!("bad pattern {pattern:?}: {e}"))
            })?;
            if re.captures_len() < 2 {
                return Err(EngineError::InvalidConfig(format!(
                    "pattern {pattern:?} has no capture group"
                )));
            }
            compiled.push(re);
        }

        let parser = PriceParser::with_site_patterns(compiled);
        Ok(self.finish(parser))
    }

    fn finish(self, parser: PriceParser) -> SiteConfig {
        SiteConfig {
            primary_selectors: self.primary_selectors,
            fallback_selectors: self.fallback_selectors,
            headers: self.headers,
            timeout: self.timeout,
            user_agent: self.user_agent,
            requires_rendering: self.requires_rendering,
            force_render: self.force_render,
            wait_after_load: self.wait_after_load,
            default_currency: self.default_currency,
            structured_data_enabled: self.structured_data_enabled,
            meta_tags_enabled: self.meta_tags_enabled,
            bounds: self.bounds,
            parser,
        }
    }
}
