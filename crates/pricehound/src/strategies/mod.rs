// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Price extraction strategies and the chain that runs them.
//!
//! Each strategy is a pure function over a parsed [`Page`] and a
//! [`SiteConfig`]. A provider lists the strategies it wants, in order; the
//! first one to yield an in-bounds price wins. A strategy error is logged
//! and treated as "nothing found", so one broken strategy never stops the
//! rest of the chain.

pub mod context_phrase;
pub mod free_text;
pub mod heuristic;
pub mod meta;
pub mod microdata;
pub mod proximity;
pub mod script;
pub mod selectors;
pub mod structural;
pub mod structured;

use crate::config::SiteConfig;
use crate::html::Page;
use crate::types::{EngineResult, ExtractionContext};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// JSON-LD `Product` / `Offer` blocks.
    StructuredData,
    /// Open Graph, product and Twitter card meta tags.
    MetaTags,
    /// `itemprop="price"` and related microdata.
    Microdata,
    /// The site's primary then fallback selectors.
    ConfiguredSelectors,
    /// Score every price-shaped element by tag, class and context.
    HeuristicScore,
    /// Score matches of fixed structural selectors.
    StructuralPattern,
    /// Rank regex hits over the visible text.
    TextProximity,
    /// Any currency-adjacent number in the visible text.
    FreeText,
    /// Price variables in inline scripts.
    ScriptVariables,
    /// Prices near "special price" phrases.
    ContextPhrase,
}

impl Strategy {
    pub const ALL: [Strategy; 10] = [
        Strategy::StructuredData,
        Strategy::MetaTags,
        Strategy::Microdata,
        Strategy::ConfiguredSelectors,
        Strategy::HeuristicScore,
        Strategy::StructuralPattern,
        Strategy::TextProximity,
        Strategy::FreeText,
        Strategy::ScriptVariables,
        Strategy::ContextPhrase,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::StructuredData => "structured_data",
            Strategy::MetaTags => "meta_tags",
            Strategy::Microdata => "microdata",
            Strategy::ConfiguredSelectors => "configured_selectors",
            Strategy::HeuristicScore => "heuristic_score",
            Strategy::StructuralPattern => "structural_pattern",
            Strategy::TextProximity => "text_proximity",
            Strategy::FreeText => "free_text",
            Strategy::ScriptVariables => "script_variables",
            Strategy::ContextPhrase => "context_phrase",
        }
    }

    /// Run this strategy once against a parsed page.
    pub fn attempt(&self, page: &Page<'_>, config: &SiteConfig) -> EngineResult<Option<Decimal>> {
        match self {
            Strategy::StructuredData => structured::extract(page, config),
            Strategy::MetaTags => meta::extract(page, config),
            Strategy::Microdata => microdata::extract(page, config),
            Strategy::ConfiguredSelectors => selectors::extract(page, config),
            Strategy::HeuristicScore => heuristic::extract(page, config),
            Strategy::StructuralPattern => structural::extract(page, config),
            Strategy::TextProximity => proximity::extract(page, config),
            Strategy::FreeText => free_text::extract(page, config),
            Strategy::ScriptVariables => script::extract(page, config),
            Strategy::ContextPhrase => context_phrase::extract(page, config),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A price accepted by the chain, and the strategy that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
    pub price: Decimal,
    pub strategy: Strategy,
}

/// Run `chain` in order over the context and return the first price that
/// passes the site's sanity bounds.
pub fn run_chain(
    ctx: &ExtractionContext,
    config: &SiteConfig,
    chain: &[Strategy],
    provider: &str,
) -> Option<Extraction> {
    let page = Page::parse(ctx);

    for &strategy in chain {
        match strategy.attempt(&page, config) {
            Ok(Some(price)) if config.bounds.contains(price) => {
                debug!(provider, %strategy, url = %ctx.url, %price, "price extracted");
                return Some(Extraction { price, strategy });
            }
            Ok(Some(price)) => {
                debug!(provider, %strategy, url = %ctx.url, %price, "candidate outside sanity bounds");
            }
            Ok(None) => {
                debug!(provider, %strategy, url = %ctx.url, "no candidate");
            }
            Err(e) => {
                debug!(provider, %strategy, url = %ctx.url, error = %e, "strategy failed");
            }
        }
    }

    None
}
