// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markup acquisition: direct HTTP or rendered through the browser pool.

pub mod http;
pub mod renderer;

use crate::config::SiteConfig;
use crate::types::{EngineError, EngineResult};
use async_trait::async_trait;
use self::http::HttpFetcher;
use self::renderer::pool::RendererPool;
use std::sync::Arc;
use tracing::debug;

/// Anything that can turn a URL into page markup under a site config.
#[async_trait]
pub trait MarkupSource: Send + Sync {
    async fn acquire(&self, url: &str, config: &SiteConfig) -> EngineResult<String>;
}

/// Routes each acquisition to HTTP or the renderer by the site's config.
pub struct MarkupAcquirer {
    http: HttpFetcher,
    renderer: Option<Arc<RendererPool>>,
}

impl MarkupAcquirer {
    pub fn new(http: HttpFetcher, renderer: Option<Arc<RendererPool>>) -> Self {
        Self { http, renderer }
    }

    /// HTTP only. Rendering sites fail acquisition.
    pub fn http_only() -> Self {
        Self::new(HttpFetcher::new(), None)
    }
}

#[async_trait]
impl MarkupSource for MarkupAcquirer {
    async fn acquire(&self, url: &str, config: &SiteConfig) -> EngineResult<String> {
        if !config.uses_renderer() {
            return self.http.fetch(url, config).await;
        }

        let pool = self
            .renderer
            .as_ref()
            .ok_or_else(|| EngineError::acquisition(url, "rendering required but no renderer"))?;
        let extra_wait = config.wait_after_load.saturating_sub(pool.settle());
        debug!(url, extra_wait_ms = extra_wait.as_millis() as u64, "rendering page");

        pool.render(url, extra_wait)
            .await
            .map_err(|e| EngineError::acquisition(url, format!("renderer: {e:#}")))
    }
}
