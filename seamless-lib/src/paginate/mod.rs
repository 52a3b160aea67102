//! Pagination loader.
//!
//! A container's first page is whatever the document already shows. The
//! remaining pages are fetched by a [`PageLoadStrategy`] and merged by the
//! engine in page order.

mod discover;
mod fetch;
mod page;
mod strategy;

use std::collections::HashSet;

pub use discover::*;
pub use fetch::*;
pub use page::*;
pub use strategy::*;

use pagedom::{Document, Element, NodeId};

use crate::index::{DEFAULT_STRATEGIES, extract_label};
use crate::markup;

/// One item known to a paginated container, rendered or not.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxSnapshot {
    pub group: String,
    pub label: String,
    /// Page the item came from; the rendered page is 1.
    pub page: u32,
    /// Live `[checkbox-filter]` node, when the item is in the document.
    pub element: Option<NodeId>,
    /// Detached copy for items not rendered yet.
    pub fragment: Option<Element>,
}

/// Cross-rebuild state of one `[seamless-replace="true"]` container.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedContainerState {
    pub container: NodeId,
    pub layout: ContainerLayout,
    /// Every item seen across pages, deduplicated by `(group, label)`, in
    /// page order.
    pub all_checkboxes: Vec<CheckboxSnapshot>,
    seen: HashSet<(String, String)>,
    /// Page URLs already merged.
    pub pages_loaded: HashSet<String>,
    pub is_loading: bool,
    /// Set once the loader finished, successfully or not.
    pub is_complete: bool,
    /// Items normal pagination reveals.
    pub revealed: usize,
}

impl PaginatedContainerState {
    pub fn new(document: &Document, container: NodeId) -> Self {
        Self {
            container,
            layout: ContainerLayout::discover(document, container),
            all_checkboxes: Vec::new(),
            seen: HashSet::new(),
            pages_loaded: HashSet::new(),
            is_loading: false,
            is_complete: false,
            revealed: 0,
        }
    }

    /// Appends `snapshot` unless its `(group, label)` is known.
    pub fn push(&mut self, snapshot: CheckboxSnapshot) -> bool {
        let key = (snapshot.group.clone(), snapshot.label.clone());
        if !self.seen.insert(key) {
            return false;
        }
        self.all_checkboxes.push(snapshot);
        true
    }

    pub fn contains(&self, group: &str, label: &str) -> bool {
        self.seen.contains(&(group.to_string(), label.to_string()))
    }

    /// Records the items currently rendered in the container as page 1.
    ///
    /// Already-known items only get their live node refreshed.
    pub fn seed(&mut self, document: &Document) {
        let mut native = 0;
        for node in document.query_selector_all(self.container, &markup::checkbox_items()) {
            let Some(group) = document.attribute(node, markup::CHECKBOX_FILTER) else {
                continue;
            };
            let label = extract_label(document, node, DEFAULT_STRATEGIES);
            if document.attribute(node, markup::DATA_PAGINATED).is_none() {
                native += 1;
            }
            if let Some(existing) = self
                .all_checkboxes
                .iter_mut()
                .find(|snapshot| snapshot.group == group && snapshot.label == label)
            {
                existing.element = Some(node);
                continue;
            }
            self.push(CheckboxSnapshot {
                group: group.to_string(),
                label,
                page: 1,
                element: Some(node),
                fragment: None,
            });
        }
        self.revealed = native;
    }

    /// Re-binds to a rebuilt container, dropping dead node handles.
    pub fn rebind(&mut self, document: &Document, container: NodeId) {
        self.container = container;
        self.layout = ContainerLayout::discover(document, container);
        for snapshot in &mut self.all_checkboxes {
            if snapshot
                .element
                .is_some_and(|node| !document.contains(container, node))
            {
                snapshot.element = None;
            }
        }
        self.seed(document);
    }

    /// Groups with at least one item in this container.
    pub fn groups(&self) -> HashSet<&str> {
        self.all_checkboxes
            .iter()
            .map(|snapshot| snapshot.group.as_str())
            .collect()
    }

    /// Items of `group` known but not rendered.
    pub fn unrendered(&self, group: &str) -> impl Iterator<Item = (usize, &CheckboxSnapshot)> {
        self.all_checkboxes
            .iter()
            .enumerate()
            .filter(move |(_, snapshot)| {
                snapshot.group == group && snapshot.element.is_none() && snapshot.fragment.is_some()
            })
    }

    /// Items per page, in merge order.
    pub fn page_sequence(&self) -> Vec<u32> {
        self.all_checkboxes.iter().map(|snapshot| snapshot.page).collect()
    }
}
