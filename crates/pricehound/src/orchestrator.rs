// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fetch Orchestrator: routes a request to the best provider and falls back
//! through the remaining ones until a price is found.
//!
//! This is a linear chain. The first provider to produce a sane price wins
//! and no cross-provider reconciliation happens.

use crate::acquire::http::HttpFetcher;
use crate::acquire::renderer::chromium::ChromiumRenderer;
use crate::acquire::renderer::pool::RendererPool;
use crate::acquire::renderer::{NoopRenderer, Renderer};
use crate::acquire::{MarkupAcquirer, MarkupSource};
use crate::provider::run_provider;
use crate::resolver::{extract_domain, SiteResolver};
use crate::settings::EngineSettings;
use crate::sites::{SiteProfile, BROWSER_USER_AGENT};
use crate::types::{
    EngineError, EngineResult, FetchRequest, MetricSample, ProviderFailure, ProviderInfo,
    RegistryStats, UrlAnalysis, ECOMMERCE_PRODUCT,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Entry point of the engine. Safe to share across tasks.
pub struct FetchOrchestrator {
    resolver: SiteResolver,
    source: Arc<dyn MarkupSource>,
    renderer: Option<Arc<RendererPool>>,
}

impl FetchOrchestrator {
    pub fn new(resolver: SiteResolver, source: Arc<dyn MarkupSource>) -> Self {
        Self {
            resolver,
            source,
            renderer: None,
        }
    }

    /// Built-in site table, live HTTP and (when enabled) a browser pool.
    ///
    /// A missing or broken browser is not fatal: the pool is backed by a
    /// renderer that always fails, so rendering sites fall back.
    pub async fn launch(settings: &EngineSettings) -> EngineResult<Self> {
        let resolver = SiteResolver::builtin()?;

        let pool = if settings.render_enabled {
            let renderer: Arc<dyn Renderer> = match ChromiumRenderer::launch(
                settings.chromium_path.as_deref(),
                BROWSER_USER_AGENT,
            )
            .await
            {
                Ok(renderer) => Arc::new(renderer),
                Err(e) => {
                    warn!(error = %e, "browser unavailable, rendering sites will fall back");
                    Arc::new(NoopRenderer)
                }
            };
            let pool = RendererPool::new(
                renderer,
                settings.pool_size,
                settings.baseline_settle,
                settings.navigation_timeout,
            );
            info!(contexts = pool.size(), "renderer pool ready");
            Some(Arc::new(pool))
        } else {
            info!("rendering disabled");
            None
        };

        let acquirer = MarkupAcquirer::new(HttpFetcher::new(), pool.clone());
        Ok(Self {
            resolver,
            source: Arc::new(acquirer),
            renderer: pool,
        })
    }

    /// Fetch the price for `request`.
    pub async fn fetch(&self, request: &FetchRequest) -> EngineResult<MetricSample> {
        if !self.supports(&request.source_type) {
            return Err(EngineError::UnsupportedSource(request.source_type.clone()));
        }
        let url = request
            .url()
            .ok_or_else(|| EngineError::InvalidInput("url parameter is required".to_string()))?;

        let plan = self.plan(url);
        let mut failures = Vec::new();
        let mut last_error = None;

        for (attempt, profile) in plan.iter().enumerate() {
            if attempt == 0 {
                info!(url, provider = %profile.name, "fetching with best provider");
            } else {
                info!(url, provider = %profile.name, attempt, "falling back");
            }

            match run_provider(profile, self.source.as_ref(), request, url).await {
                Ok(sample) => {
                    info!(url, provider = %profile.name, value = %sample.value, unit = %sample.unit, "price fetched");
                    return Ok(sample);
                }
                Err(e) if !e.is_recoverable() => return Err(e),
                Err(e) => {
                    warn!(url, provider = %profile.name, error = %e, "provider failed");
                    failures.push(ProviderFailure {
                        provider: profile.name.clone(),
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                    last_error = Some(e);
                }
            }
        }

        let last = last_error.ok_or_else(|| {
            EngineError::InvalidConfig(format!("no provider resolved for {url}"))
        })?;
        Err(EngineError::AllProvidersExhausted {
            url: url.to_string(),
            failures,
            last: Box::new(last),
        })
    }

    /// Resolved providers in order, then the generic one if not already
    /// among them.
    fn plan(&self, url: &str) -> Vec<Arc<SiteProfile>> {
        let mut plan = self.resolver.resolve(&extract_domain(url), url);
        if !plan.iter().any(|p| p.is_generic()) {
            plan.push(Arc::clone(self.resolver.generic()));
        }
        plan
    }

    // ── Introspection ──

    pub fn supports(&self, source_type: &str) -> bool {
        source_type == ECOMMERCE_PRODUCT
    }

    /// Every provider, ascending by priority.
    pub fn providers(&self) -> Vec<ProviderInfo> {
        let mut profiles = self.resolver.profiles();
        profiles.sort_by_key(|p| p.priority);
        profiles.iter().map(|p| p.info()).collect()
    }

    /// Name of the provider that would be tried first, if the URL is usable.
    pub fn best_provider_name(&self, url: &str) -> Option<String> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }
        self.resolver
            .resolve_url(url)
            .first()
            .map(|p| p.name.clone())
    }

    /// Whether a site-specific provider handles `url`.
    pub fn is_url_supported(&self, url: &str) -> bool {
        let url = url.trim();
        !url.is_empty()
            && self
                .resolver
                .resolve_url(url)
                .first()
                .is_some_and(|p| !p.is_generic())
    }

    /// Routing view of `url`. `claiming_providers` lists every provider whose
    /// domain claim matches, whether or not it accepts this URL's shape, with
    /// the generic provider last.
    pub fn analyze(&self, url: &str) -> UrlAnalysis {
        let url = url.trim();
        let domain = extract_domain(url);
        let (resolved, claiming) = if url.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            let claiming = self
                .resolver
                .claimants(&domain)
                .iter()
                .chain(std::iter::once(self.resolver.generic()))
                .map(|p| p.name.clone())
                .collect();
            (self.resolver.resolve(&domain, url), claiming)
        };
        let best = resolved.first();

        UrlAnalysis {
            url: url.to_string(),
            domain,
            best_provider: best.map(|p| p.name.clone()),
            claiming_providers: claiming,
            fetch_method: best.map(|p| p.fetch_method()),
            supported: best.is_some_and(|p| !p.is_generic()),
        }
    }

    pub fn stats(&self) -> RegistryStats {
        let profiles = self.resolver.profiles();
        let rendering = profiles.iter().filter(|p| p.config.requires_rendering).count();
        let domains: BTreeSet<&str> = profiles
            .iter()
            .filter(|p| !p.is_generic())
            .flat_map(|p| p.domains.iter().map(String::as_str))
            .collect();

        RegistryStats {
            total_providers: profiles.len(),
            rendering_providers: rendering,
            direct_providers: profiles.len() - rendering,
            supported_domains: domains.len(),
        }
    }

    /// Tear the renderer pool down. Safe to call more than once.
    pub async fn shutdown(&self) {
        if let Some(pool) = &self.renderer {
            match pool.shutdown().await {
                Ok(()) => info!("renderer pool shut down"),
                Err(e) => warn!(error = %e, "renderer shutdown failed"),
            }
        }
    }
}
