// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! JSON-LD structured data.
//!
//! Walks every `application/ld+json` block (including `@graph` arrays and
//! nested entities) for a `Product` or `Offer` and reads the first populated
//! price field. JSON numbers are machine values and bypass the separator
//! heuristics; strings go through the site's parser.

use crate::config::SiteConfig;
use crate::html::Page;
use crate::types::EngineResult;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

/// Price-bearing fields, most authoritative first.
const PRICE_FIELDS: &[&str] = &[
    "price",
    "lowPrice",
    "priceValue",
    "amount",
    "value",
    "cost",
    "highPrice",
];

const PRICED_TYPES: &[&str] = &[
    "Product",
    "ProductGroup",
    "ProductModel",
    "IndividualProduct",
    "Offer",
    "AggregateOffer",
];

static RAW_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:price|lowPrice|priceValue|amount)"\s*:\s*"?([0-9][0-9.,]*)"#)
        .expect("valid regex")
});

pub fn extract(page: &Page<'_>, config: &SiteConfig) -> EngineResult<Option<Decimal>> {
    if !config.structured_data_enabled {
        return Ok(None);
    }

    for script in page.select(r#"script[type="application/ld+json"]"#)? {
        let text = script.inner_html();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(text) {
            Ok(value) => {
                if let Some(price) = find_price(&value, config) {
                    return Ok(Some(price));
                }
            }
            Err(e) => {
                debug!(url = page.url(), error = %e, "malformed JSON-LD block, scanning raw text");
                if let Some(price) = scan_raw(text, config) {
                    return Ok(Some(price));
                }
            }
        }
    }

    Ok(None)
}

fn find_price(value: &Value, config: &SiteConfig) -> Option<Decimal> {
    match value {
        Value::Array(items) => items.iter().find_map(|v| find_price(v, config)),
        Value::Object(map) => {
            if let Some(price) = map.get("@graph").and_then(|g| find_price(g, config)) {
                return Some(price);
            }
            if is_priced_type(value) {
                if let Some(price) = price_of(value, config) {
                    return Some(price);
                }
            }
            map.iter()
                .filter(|(key, v)| *key != "@graph" && (v.is_object() || v.is_array()))
                .find_map(|(_, v)| find_price(v, config))
        }
        _ => None,
    }
}

fn is_priced_type(value: &Value) -> bool {
    let matches = |t: &str| {
        let name = t.rsplit('/').next().unwrap_or(t);
        PRICED_TYPES.iter().any(|p| *p == name)
    };
    match value.get("@type") {
        Some(Value::String(t)) => matches(t.as_str()),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(matches),
        _ => false,
    }
}

/// Offers first, then the entity's own price fields.
fn price_of(entity: &Value, config: &SiteConfig) -> Option<Decimal> {
    entity
        .get("offers")
        .and_then(|offers| one_or_many(offers, |o| price_of(o, config)))
        .or_else(|| priced_fields(entity, config))
}

fn priced_fields(entity: &Value, config: &SiteConfig) -> Option<Decimal> {
    PRICE_FIELDS
        .iter()
        .filter_map(|field| entity.get(*field))
        .find_map(|v| value_to_price(v, config))
        .or_else(|| {
            entity
                .get("priceSpecification")
                .and_then(|spec| one_or_many(spec, |s| priced_fields(s, config)))
        })
}

fn one_or_many<F>(value: &Value, f: F) -> Option<Decimal>
where
    F: Fn(&Value) -> Option<Decimal>,
{
    match value {
        Value::Array(items) => items.iter().find_map(f),
        other => f(other),
    }
}

fn value_to_price(value: &Value, config: &SiteConfig) -> Option<Decimal> {
    let price = match value {
        Value::Number(n) => number_to_decimal(n),
        Value::String(s) => config.parse_price(s).ok(),
        _ => None,
    }?;
    config.bounds.contains(price).then_some(price)
}

fn number_to_decimal(n: &Number) -> Option<Decimal> {
    let s = n.to_string();
    Decimal::from_str(&s)
        .or_else(|_| Decimal::from_scientific(&s))
        .ok()
}

fn scan_raw(text: &str, config: &SiteConfig) -> Option<Decimal> {
    if !(text.contains("Product") || text.contains("Offer")) {
        return None;
    }
    RAW_PRICE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .find_map(|m| config.accept(m.as_str()))
}
