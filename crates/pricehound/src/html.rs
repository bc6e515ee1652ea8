// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parsed page shared by every strategy in one extraction chain.
//!
//! The document is parsed once per chain. `scraper::Html` is not `Send`, so
//! a [`Page`] only ever lives inside synchronous extraction code.

use crate::types::{EngineError, EngineResult, ExtractionContext};
use scraper::{ElementRef, Html, Selector};
use std::cell::OnceCell;

/// Elements whose text never renders.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

pub struct Page<'a> {
    ctx: &'a ExtractionContext,
    document: Html,
    visible_text: OnceCell<String>,
}

impl<'a> Page<'a> {
    pub fn parse(ctx: &'a ExtractionContext) -> Self {
        Self {
            ctx,
            document: Html::parse_document(&ctx.html),
            visible_text: OnceCell::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.ctx.url
    }

    /// All elements matching a CSS selector, in document order.
    pub fn select(&self, selector: &str) -> EngineResult<Vec<ElementRef<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.document.select(&sel).collect())
    }

    /// Rendered text of the page: script, style and similar content removed,
    /// whitespace collapsed.
    pub fn visible_text(&self) -> &str {
        self.visible_text.get_or_init(|| {
            let mut parts = Vec::new();
            collect_visible(self.document.root_element(), &mut parts);
            collapse_whitespace(&parts.join(" "))
        })
    }
}

pub fn parse_selector(selector: &str) -> EngineResult<Selector> {
    Selector::parse(selector).map_err(|e| EngineError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

/// Full text of an element with whitespace collapsed.
pub fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Text held directly by an element, excluding its descendants.
pub fn own_text(element: &ElementRef<'_>) -> String {
    let parts: Vec<&str> = element
        .children()
        .filter_map(|child| child.value().as_text().map(|t| &**t))
        .collect();
    collapse_whitespace(&parts.join(" "))
}

/// Whether an element's own content never renders.
pub fn is_hidden(element: &ElementRef<'_>) -> bool {
    let name = element.value().name();
    HIDDEN_TAGS.iter().any(|tag| *tag == name)
}

pub fn parent_element<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.parent().and_then(ElementRef::wrap)
}

/// Lower-cased `class` and `id` attributes joined by a space.
pub fn class_and_id(element: &ElementRef<'_>) -> String {
    let class = element.value().attr("class").unwrap_or("");
    let id = element.value().id().unwrap_or("");
    format!("{class} {id}").to_lowercase()
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_visible<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    if is_hidden(&element) {
        return;
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push(&**text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            collect_visible(child_el, out);
        }
    }
}
