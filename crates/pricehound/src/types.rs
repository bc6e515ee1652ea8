// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core data model and error taxonomy for the extraction engine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The only source type this engine understands.
pub const ECOMMERCE_PRODUCT: &str = "ECOMMERCE_PRODUCT";

/// Metric name carried by every sample the engine produces.
pub const PRICE_METRIC: &str = "price";

/// An inbound fetch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub source_type: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl FetchRequest {
    /// Build an `ECOMMERCE_PRODUCT` request for a URL.
    pub fn product(url: impl Into<String>) -> Self {
        let mut params = BTreeMap::new();
        params.insert("url".to_string(), url.into());
        Self {
            source_type: ECOMMERCE_PRODUCT.to_string(),
            params,
        }
    }

    /// Add a parameter, consuming and returning the request.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// The target URL, if present and non-blank.
    pub fn url(&self) -> Option<&str> {
        self.params
            .get("url")
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
    }

    /// The caller's currency override, if any.
    pub fn currency(&self) -> Option<&str> {
        self.params
            .get("currency")
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }
}

/// Everything a strategy may look at. Built once per provider attempt.
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    pub url: String,
    pub html: String,
    pub params: BTreeMap<String, String>,
}

impl ExtractionContext {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params = params;
        self
    }
}

/// Terminal output of a successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    pub metric: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    pub unit: String,
    pub observed_at: DateTime<Utc>,
}

impl MetricSample {
    /// A price sample observed now.
    pub fn price(value: Decimal, unit: impl Into<String>) -> Self {
        Self {
            metric: PRICE_METRIC.to_string(),
            value,
            unit: unit.into(),
            observed_at: Utc::now(),
        }
    }
}

/// How a provider acquires markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchMethod {
    /// Headless browser rendering.
    Rendered,
    /// Plain HTTP GET.
    #[serde(rename = "Direct HTTP")]
    DirectHttp,
}

impl fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMethod::Rendered => write!(f, "Rendered"),
            FetchMethod::DirectHttp => write!(f, "Direct HTTP"),
        }
    }
}

/// Public description of a registered provider.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub name: String,
    pub domains: Vec<String>,
    pub priority: u32,
    pub requires_rendering: bool,
    pub default_currency: String,
    pub fetch_method: FetchMethod,
}

/// Routing analysis for a single URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlAnalysis {
    pub url: String,
    pub domain: String,
    pub best_provider: Option<String>,
    pub claiming_providers: Vec<String>,
    pub fetch_method: Option<FetchMethod>,
    /// True when a site-specific provider (not the generic one) handles the URL.
    pub supported: bool,
}

/// Aggregate counts over the provider registry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total_providers: usize,
    pub rendering_providers: usize,
    pub direct_providers: usize,
    pub supported_domains: usize,
}

/// One failed provider attempt inside an exhausted fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub kind: &'static str,
    pub message: String,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.message)
    }
}

/// Errors produced by the engine.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported source type: {0}")]
    UnsupportedSource(String),

    #[error("Acquisition failed for {url}: {reason}")]
    AcquisitionFailed { url: String, reason: String },

    #[error("Not a number: {0:?}")]
    NotANumber(String),

    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("{provider} found no price candidate on {url}")]
    NoCandidateFound { provider: String, url: String },

    #[error("All providers failed for {url} ({})", join_failures(.failures))]
    AllProvidersExhausted {
        url: String,
        failures: Vec<ProviderFailure>,
        #[source]
        last: Box<EngineError>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

fn join_failures(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl EngineError {
    /// Stable machine-readable code for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidInput(_) => "E_INVALID_INPUT",
            EngineError::UnsupportedSource(_) => "E_UNSUPPORTED_SOURCE",
            EngineError::AcquisitionFailed { .. } => "E_ACQUISITION_FAILED",
            EngineError::NotANumber(_) => "E_NOT_A_NUMBER",
            EngineError::InvalidSelector { .. } => "E_INVALID_SELECTOR",
            EngineError::NoCandidateFound { .. } => "E_NO_CANDIDATE",
            EngineError::AllProvidersExhausted { .. } => "E_ALL_PROVIDERS_EXHAUSTED",
            EngineError::InvalidConfig(_) => "E_INVALID_CONFIG",
        }
    }

    /// Whether another provider might succeed where this one failed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::AcquisitionFailed { .. }
                | EngineError::NoCandidateFound { .. }
                | EngineError::NotANumber(_)
                | EngineError::InvalidSelector { .. }
        )
    }

    pub(crate) fn acquisition(url: &str, reason: impl fmt::Display) -> Self {
        EngineError::AcquisitionFailed {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
