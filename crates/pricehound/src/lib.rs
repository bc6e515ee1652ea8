// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pricehound: multi-strategy price extraction and fetch orchestration for
//! e-commerce product pages.

pub mod acquire;
pub mod config;
pub mod html;
pub mod normalize;
pub mod orchestrator;
pub mod provider;
pub mod resolver;
pub mod scoring;
pub mod settings;
pub mod sites;
pub mod strategies;
pub mod types;

pub use acquire::{MarkupAcquirer, MarkupSource};
pub use config::{PriceBounds, SiteConfig, SiteConfigBuilder};
pub use normalize::{normalize_price, PriceParser};
pub use orchestrator::FetchOrchestrator;
pub use resolver::SiteResolver;
pub use settings::EngineSettings;
pub use sites::SiteProfile;
pub use strategies::{run_chain, Extraction, Strategy};
pub use types::*;
