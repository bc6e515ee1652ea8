// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Full-stack fetches against a local HTTP server.

use assert_json_diff::assert_json_include;
use pricehound::sites::{generic, trendyol};
use pricehound::{
    EngineError, FetchOrchestrator, FetchRequest, MarkupAcquirer, SiteConfig, SiteProfile,
    SiteResolver, Strategy,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(route: &str, status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(&server)
        .await;
    server
}

fn http_engine(resolver: SiteResolver) -> FetchOrchestrator {
    FetchOrchestrator::new(resolver, Arc::new(MarkupAcquirer::http_only()))
}

#[tokio::test]
async fn test_meta_tag_price_end_to_end() {
    let server = serve(
        "/p/123",
        200,
        r#"<html><head><meta property="product:price:amount" content="49.99"></head><body></body></html>"#,
    )
    .await;
    let url = format!("{}/p/123", server.uri());
    let engine = http_engine(SiteResolver::builtin().unwrap());

    let request = FetchRequest::product(&url).with_param("currency", "USD");
    let sample = assert_ok!(engine.fetch(&request).await);

    assert_eq!(sample.value, Decimal::new(4999, 2));
    assert_json_include!(
        actual: serde_json::to_value(&sample).unwrap(),
        expected: json!({"metric": "price", "value": 49.99, "unit": "USD"})
    );
    assert!(serde_json::to_value(&sample).unwrap()["observedAt"].is_string());
}

#[tokio::test]
async fn test_site_provider_failure_falls_back_to_generic() {
    let server = serve(
        "/p/123",
        200,
        r#"<html><body><h1>Desk lamp</h1><p>In stock. Now only $24.99 while supplies last.</p></body></html>"#,
    )
    .await;
    let url = format!("{}/p/123", server.uri());

    // A rendering site claiming the mock host; without a browser its
    // acquisition fails and the generic provider takes over over HTTP.
    let mut site = trendyol::profile().unwrap();
    site.domains = vec!["127.0.0.1".to_string()];
    let resolver = SiteResolver::new(vec![site, generic::profile().unwrap()]).unwrap();
    let engine = http_engine(resolver);

    assert_eq!(engine.best_provider_name(&url).as_deref(), Some("Trendyol"));
    let sample = assert_ok!(engine.fetch(&FetchRequest::product(&url)).await);
    assert_eq!(sample.value, Decimal::new(2499, 2));
    assert_eq!(sample.unit, "USD");
}

#[tokio::test]
async fn test_site_provider_timeout_falls_back_to_generic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p/77"))
        .and(header("x-shop", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>$10.00</p>")
                .set_delay(Duration::from_secs(3)),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p/77"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(
                "<html><body><div>Garden hose, 15 m. Price: 31.50</div></body></html>",
            ),
        )
        .mount(&server)
        .await;
    let url = format!("{}/p/77", server.uri());

    let slow = SiteProfile {
        name: "Slow Shop".to_string(),
        domains: vec!["127.0.0.1".to_string()],
        priority: 10,
        config: SiteConfig::builder()
            .header("X-Shop", "slow")
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap(),
        strategies: vec![Strategy::FreeText],
        url_validator: |_| true,
    };
    let resolver = SiteResolver::new(vec![slow, generic::profile().unwrap()]).unwrap();
    let engine = http_engine(resolver);

    let sample = assert_ok!(engine.fetch(&FetchRequest::product(&url)).await);
    assert_eq!(sample.value, Decimal::new(3150, 2));
    assert_eq!(sample.unit, "USD");
}

#[tokio::test]
async fn test_server_error_exhausts_chain() {
    let server = serve("/p/500", 500, "oops").await;
    let url = format!("{}/p/500", server.uri());
    let engine = http_engine(SiteResolver::builtin().unwrap());

    let err = assert_err!(engine.fetch(&FetchRequest::product(&url)).await);
    match err {
        EngineError::AllProvidersExhausted { failures, last, .. } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].provider, "Generic E-commerce");
            assert!(last.to_string().contains("HTTP 500"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_json_ld_price_regardless_of_order() {
    let html = r#"<html><head><script type="application/ld+json">
        {"@context":"https://schema.org","@graph":[
          {"@type":"BreadcrumbList","itemListElement":[]},
          {"@type":"Product","name":"Chair","offers":{"@type":"Offer","price":"1200","priceCurrency":"USD"}}
        ]}</script></head><body><p>Assembly required</p></body></html>"#;
    let server = serve("/p/1200", 200, html).await;
    let url = format!("{}/p/1200", server.uri());

    let engine = http_engine(SiteResolver::builtin().unwrap());
    let sample = assert_ok!(engine.fetch(&FetchRequest::product(&url)).await);
    assert_eq!(sample.value, Decimal::from(1200));

    // Same page through every chain ordering that includes structured data.
    let ctx = pricehound::ExtractionContext::new(&url, html);
    let cfg = generic::profile().unwrap().config;
    for chain in [
        vec![Strategy::StructuredData, Strategy::FreeText],
        vec![Strategy::MetaTags, Strategy::Microdata, Strategy::StructuredData],
        vec![Strategy::ConfiguredSelectors, Strategy::StructuredData],
    ] {
        let hit = pricehound::run_chain(&ctx, &cfg, &chain, "test").unwrap();
        assert_eq!(hit.price, Decimal::from(1200));
    }
}
