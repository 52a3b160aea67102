//! Shared fixtures: page markup builders and an in-memory fetcher.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pagedom::{Document, Selector};
use seamless_lib::{FetchError, PageFetcher};
use url::Url;

pub const LOCATION: &str = "https://example.test/localities";

pub fn location() -> Url {
    Url::parse(LOCATION).unwrap()
}

pub fn page(n: u32) -> String {
    format!("{LOCATION}?page={n}")
}

/// Markup of one `.w-dyn-item` checkbox.
pub fn item(group: &str, label: &str, checked: bool) -> String {
    let (input, active, visual) = if checked {
        (" checked", " is-list-active", " w--redirected-checked")
    } else {
        ("", "", "")
    };
    format!(
        r#"<div class="w-dyn-item"><label checkbox-filter="{group}" class="w-checkbox{active}"><div class="w-checkbox-input{visual}"></div><input type="checkbox"{input}><span class="w-form-label">{label}</span></label></div>"#
    )
}

/// A seamless container holding `labels`, with optional pagination hints.
pub fn container(group: &str, labels: &[&str], next: Option<&str>, count: Option<&str>) -> String {
    let items: String = labels.iter().map(|label| item(group, label, false)).collect();
    let next = next
        .map(|href| format!(r#"<a class="w-pagination-next" href="{href}">Next</a>"#))
        .unwrap_or_default();
    let count = count
        .map(|text| format!(r#"<div class="w-pagination-count">{text}</div>"#))
        .unwrap_or_default();
    format!(
        r#"<div seamless-replace="true">
             <div seamless-replace="searching-indicator" style="display: none">Searching…</div>
             <div seamless-replace="empty" style="display: none">No results</div>
             <div class="w-dyn-list"><div class="w-dyn-items">{items}</div></div>
             <div class="w-pagination-wrapper">{next}{count}</div>
           </div>"#
    )
}

/// A full page: search box, clear button, tag region and `body`.
pub fn document_html(group: &str, body: &str) -> String {
    format!(
        r##"<html><body>
             <input type="text" searchbox-filter="{group}">
             <a href="#" clear-text-input="{group}">Clear</a>
             <div fs-list-element="tags"></div>
             {body}
           </body></html>"##
    )
}

/// Swaps the items under `.w-dyn-items` for freshly parsed `items`, the
/// way a list re-render does. Every swapped-in node gets a new handle.
pub fn rerender(document: &mut Document, items: &str) {
    let host = document
        .query_selector(document.root(), &Selector::class("w-dyn-items"))
        .unwrap();
    for child in document.element_children(host) {
        document.remove(child);
    }
    let fresh = Document::parse_html(items);
    for node in fresh.query_selector_all(fresh.root(), &Selector::class("w-dyn-item")) {
        document.append(host, fresh.export(node).unwrap());
    }
}

#[derive(Debug, Clone)]
enum Response {
    Body(String),
    Status(u16),
}

/// In-memory fetcher answering after a per-URL delay.
///
/// Delays are measured on tokio's clock, so paused-time tests control the
/// completion order exactly.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    routes: Arc<Mutex<HashMap<String, (Duration, Response)>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: impl Into<String>, delay_ms: u64, html: impl Into<String>) -> Self {
        self.routes.lock().unwrap().insert(
            url.into(),
            (Duration::from_millis(delay_ms), Response::Body(html.into())),
        );
        self
    }

    pub fn status(self, url: impl Into<String>, delay_ms: u64, status: u16) -> Self {
        self.routes.lock().unwrap().insert(
            url.into(),
            (Duration::from_millis(delay_ms), Response::Status(status)),
        );
        self
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let route = self.routes.lock().unwrap().get(url.as_str()).cloned();
        let Some((delay, response)) = route else {
            return Err(FetchError::http(404, url.as_str()));
        };
        tokio::time::sleep(delay).await;
        match response {
            Response::Body(body) => Ok(body),
            Response::Status(status) => Err(FetchError::http(status, url.as_str())),
        }
    }
}
