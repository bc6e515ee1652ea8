// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Bounded pool of render contexts over one browser.
//!
//! A semaphore caps the number of contexts checked out at once, so a tab
//! never serves two navigations concurrently. A [`Checkout`] returns its
//! context to the idle list when dropped, or closes it when the render
//! failed, whatever path the caller leaves by.

use super::{RenderContext, Renderer};
use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{debug, warn};

pub struct RendererPool {
    renderer: Arc<dyn Renderer>,
    permits: Semaphore,
    idle: Mutex<Vec<Box<dyn RenderContext>>>,
    size: usize,
    settle: Duration,
    navigation_timeout: Duration,
}

impl RendererPool {
    /// `size` is clamped to at least one context.
    pub fn new(
        renderer: Arc<dyn Renderer>,
        size: usize,
        settle: Duration,
        navigation_timeout: Duration,
    ) -> Self {
        let size = size.max(1);
        Self {
            renderer,
            permits: Semaphore::new(size),
            idle: Mutex::new(Vec::with_capacity(size)),
            size,
            settle,
            navigation_timeout,
        }
    }

    /// Maximum concurrent contexts.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Settle time applied to every render.
    pub fn settle(&self) -> Duration {
        self.settle
    }

    /// Contexts currently parked in the pool.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().map(|idle| idle.len()).unwrap_or(0)
    }

    /// Wait for a free slot and lease a context.
    pub async fn checkout(&self) -> Result<Checkout<'_>> {
        let permit = self
            .permits
            .acquire()
            .await
            .context("renderer pool is shut down")?;

        let parked = self.idle.lock().ok().and_then(|mut idle| idle.pop());
        let context = match parked {
            Some(context) => context,
            None => self.renderer.new_context().await?,
        };

        Ok(Checkout {
            pool: self,
            context: Some(context),
            healthy: true,
            _permit: permit,
        })
    }

    /// Render `url`: navigate, wait the settle time plus `extra_wait`, then
    /// serialize the DOM.
    pub async fn render(&self, url: &str, extra_wait: Duration) -> Result<String> {
        let mut lease = self.checkout().await?;
        let result = lease.render(url, self.navigation_timeout, self.settle + extra_wait).await;
        if result.is_err() {
            lease.discard();
        }
        result
    }

    /// Refuse new checkouts, close idle contexts and stop the browser.
    pub async fn shutdown(&self) -> Result<()> {
        self.permits.close();
        let idle: Vec<_> = match self.idle.lock() {
            Ok(mut idle) => idle.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        for context in idle {
            if let Err(e) = context.close().await {
                debug!(error = %e, "failed to close idle context");
            }
        }
        self.renderer.shutdown().await
    }

    fn park(&self, context: Box<dyn RenderContext>) {
        if let Ok(mut idle) = self.idle.lock() {
            if !self.permits.is_closed() {
                idle.push(context);
                return;
            }
        }
        close_in_background(context);
    }
}

/// A leased context. Holds one pool slot until dropped.
pub struct Checkout<'a> {
    pool: &'a RendererPool,
    context: Option<Box<dyn RenderContext>>,
    healthy: bool,
    _permit: SemaphorePermit<'a>,
}

impl Checkout<'_> {
    /// Close the context instead of returning it to the pool.
    pub fn discard(&mut self) {
        self.healthy = false;
    }

    async fn render(&mut self, url: &str, timeout: Duration, wait: Duration) -> Result<String> {
        let context = self
            .context
            .as_mut()
            .context("checkout has no context")?;
        let nav = context.navigate(url, timeout.as_millis() as u64).await?;
        debug!(url, final_url = %nav.final_url, load_ms = nav.load_time_ms, "page loaded");
        tokio::time::sleep(wait).await;
        context.get_html().await
    }
}

impl Drop for Checkout<'_> {
    fn drop(&mut self) {
        let Some(context) = self.context.take() else {
            return;
        };
        if self.healthy {
            self.pool.park(context);
        } else {
            close_in_background(context);
        }
    }
}

fn close_in_background(context: Box<dyn RenderContext>) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(e) = context.close().await {
                    debug!(error = %e, "failed to close discarded context");
                }
            });
        }
        Err(_) => warn!("no runtime to close render context; dropping it"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::renderer::{NavigationResult, NoopRenderer};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves `<html>{url}</html>`; URLs containing "fail" fail to load.
    #[derive(Default)]
    struct FakeRenderer {
        created: Arc<AtomicUsize>,
        closed: Arc<AtomicUsize>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
    }

    struct FakeContext {
        url: String,
        closed: Arc<AtomicUsize>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Renderer for FakeRenderer {
        async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeContext {
                url: String::new(),
                closed: Arc::clone(&self.closed),
                in_flight: Arc::clone(&self.in_flight),
                max_in_flight: Arc::clone(&self.max_in_flight),
            }))
        }
        async fn shutdown(&self) -> Result<()> {
            Ok(())
        }
        fn active_contexts(&self) -> usize {
            self.created.load(Ordering::SeqCst) - self.closed.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RenderContext for FakeContext {
        async fn navigate(&mut self, url: &str, _timeout_ms: u64) -> Result<NavigationResult> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if url.contains("fail") {
                anyhow::bail!("navigation failed: net::ERR_CONNECTION_RESET");
            }
            self.url = url.to_string();
            Ok(NavigationResult {
                final_url: url.to_string(),
                load_time_ms: 20,
            })
        }
        async fn get_html(&self) -> Result<String> {
            Ok(format!("<html>{}</html>", self.url))
        }
        async fn close(self: Box<Self>) -> Result<()> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn pool(renderer: Arc<FakeRenderer>, size: usize) -> RendererPool {
        RendererPool::new(renderer, size, Duration::ZERO, Duration::from_secs(1))
    }

    #[test]
    fn test_size_is_at_least_one() {
        assert_eq!(pool(Arc::new(FakeRenderer::default()), 0).size(), 1);
        assert_eq!(pool(Arc::new(FakeRenderer::default()), 3).size(), 3);
    }

    #[tokio::test]
    async fn test_render_reuses_context() {
        let renderer = Arc::new(FakeRenderer::default());
        let pool = pool(Arc::clone(&renderer), 1);

        assert_eq!(pool.render("https://a.test/1", Duration::ZERO).await.unwrap(), "<html>https://a.test/1</html>");
        assert_eq!(pool.render("https://a.test/2", Duration::ZERO).await.unwrap(), "<html>https://a.test/2</html>");
        assert_eq!(renderer.created.load(Ordering::SeqCst), 1);
        assert_eq!(pool.idle_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_render_discards_context() {
        let renderer = Arc::new(FakeRenderer::default());
        let pool = pool(Arc::clone(&renderer), 1);

        assert!(pool.render("https://a.test/fail", Duration::ZERO).await.is_err());
        assert_eq!(pool.idle_count(), 0);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(renderer.closed.load(Ordering::SeqCst), 1);

        // The slot was released: the next render gets a fresh context.
        assert!(pool.render("https://a.test/ok", Duration::ZERO).await.is_ok());
        assert_eq!(renderer.created.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_pool_bounds_concurrency() {
        let renderer = Arc::new(FakeRenderer::default());
        let pool = Arc::new(pool(Arc::clone(&renderer), 2));

        let tasks: Vec<_> = (0..6)
            .map(|i| {
                let pool = Arc::clone(&pool);
                tokio::spawn(async move { pool.render(&format!("https://a.test/{i}"), Duration::ZERO).await })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }

        assert!(renderer.max_in_flight.load(Ordering::SeqCst) <= 2);
        assert!(renderer.created.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_checkout_released_on_early_exit() {
        let renderer = Arc::new(FakeRenderer::default());
        let pool = pool(Arc::clone(&renderer), 1);
        {
            let _lease = pool.checkout().await.unwrap();
        }
        assert_eq!(pool.idle_count(), 1);
        assert!(pool.checkout().await.is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_refuses_checkouts() {
        let renderer = Arc::new(FakeRenderer::default());
        let pool = pool(Arc::clone(&renderer), 1);
        pool.render("https://a.test/1", Duration::ZERO).await.unwrap();
        pool.shutdown().await.unwrap();

        assert!(pool.checkout().await.is_err());
        assert_eq!(renderer.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_noop_renderer_fails_checkout() {
        let pool = RendererPool::new(Arc::new(NoopRenderer), 1, Duration::ZERO, Duration::from_secs(1));
        assert!(pool.render("https://a.test/1", Duration::ZERO).await.is_err());
    }
}
