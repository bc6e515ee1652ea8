// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Renderer abstraction for JavaScript-rendered pages.
//!
//! `Renderer` owns the browser engine; `RenderContext` is one tab. Contexts
//! are handed out through [`pool::RendererPool`], never shared directly.

pub mod chromium;
pub mod pool;

use anyhow::Result;
use async_trait::async_trait;

/// Result of navigating to a URL.
#[derive(Debug, Clone)]
pub struct NavigationResult {
    /// The final URL after any redirects.
    pub final_url: String,
    pub load_time_ms: u64,
}

/// A browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab).
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<()>;
    /// Number of currently open contexts.
    fn active_contexts(&self) -> usize;
}

/// A single browser context (tab).
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL with a timeout.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult>;
    /// Serialize the current DOM.
    async fn get_html(&self) -> Result<String>;
    async fn close(self: Box<Self>) -> Result<()>;
}

/// A renderer that never renders. Used when no browser is available, so
/// rendering providers fail acquisition and the orchestrator falls back.
pub struct NoopRenderer;

#[async_trait]
impl Renderer for NoopRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        Err(anyhow::anyhow!("browser not available, HTTP-only mode"))
    }
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
    fn active_contexts(&self) -> usize {
        0
    }
}
