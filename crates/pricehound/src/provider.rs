// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! One provider attempt: acquire markup, run the strategy chain, build the
//! sample.

use crate::acquire::MarkupSource;
use crate::sites::SiteProfile;
use crate::strategies::run_chain;
use crate::types::{EngineError, EngineResult, ExtractionContext, FetchRequest, MetricSample};

/// Fetch `url` through `profile` and extract a price.
///
/// The unit is the request's `currency` parameter when present, else the
/// profile's default currency.
pub async fn run_provider(
    profile: &SiteProfile,
    source: &dyn MarkupSource,
    request: &FetchRequest,
    url: &str,
) -> EngineResult<MetricSample> {
    let html = source.acquire(url, &profile.config).await?;
    let ctx = ExtractionContext::new(url, html).with_params(request.params.clone());

    let extraction = run_chain(&ctx, &profile.config, &profile.strategies, &profile.name)
        .ok_or_else(|| EngineError::NoCandidateFound {
            provider: profile.name.clone(),
            url: url.to_string(),
        })?;

    let unit = request
        .currency()
        .unwrap_or(profile.config.default_currency.as_str());
    Ok(MetricSample::price(extraction.price, unit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    struct Fixed(&'static str);

    #[async_trait]
    impl MarkupSource for Fixed {
        async fn acquire(&self, _url: &str, _config: &SiteConfig) -> EngineResult<String> {
            Ok(self.0.to_string())
        }
    }

    fn generic() -> SiteProfile {
        crate::sites::generic::profile().unwrap()
    }

    const URL: &str = "https://example.com/p/123";

    #[tokio::test]
    async fn test_request_currency_wins() {
        let page = Fixed(r#"<meta property="product:price:amount" content="49.99">"#);
        let req = FetchRequest::product(URL).with_param("currency", "EUR");
        let sample = run_provider(&generic(), &page, &req, URL).await.unwrap();
        assert_eq!(sample.value, Decimal::new(4999, 2));
        assert_eq!(sample.unit, "EUR");
        assert_eq!(sample.metric, "price");
    }

    #[tokio::test]
    async fn test_default_currency_fallback() {
        let page = Fixed(r#"<meta property="product:price:amount" content="49.99">"#);
        let req = FetchRequest::product(URL);
        let sample = run_provider(&generic(), &page, &req, URL).await.unwrap();
        assert_eq!(sample.unit, "USD");
    }

    #[tokio::test]
    async fn test_empty_page_is_no_candidate() {
        let req = FetchRequest::product(URL);
        let err = run_provider(&generic(), &Fixed("<html></html>"), &req, URL)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NoCandidateFound { ref provider, .. } if provider == "Generic E-commerce"));
    }
}
