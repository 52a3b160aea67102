//! Label/token index over the `[checkbox-filter]` items of a document.

mod label;
mod tokens;

use std::collections::BTreeMap;

pub use label::*;
pub use tokens::*;

use pagedom::{Document, NodeId};

use crate::markup;

/// One checkbox-like entry of a group.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedItem {
    /// Handle of the `[checkbox-filter]` element. Not owned.
    pub element: NodeId,
    pub label_text: String,
    /// Always `normalize(label_text)`.
    pub normalized_text: String,
    pub search_tokens: SearchTokens,
    /// Written only by the reconciler.
    pub is_visible: bool,
    /// Arrived through pagination rather than the initial scan.
    pub is_paginated: bool,
}

impl IndexedItem {
    pub fn new(element: NodeId, label_text: impl Into<String>) -> Self {
        let label_text = label_text.into();
        Self {
            element,
            normalized_text: normalize(&label_text),
            search_tokens: SearchTokens::from_label(&label_text),
            label_text,
            is_visible: true,
            is_paginated: false,
        }
    }
}

/// Items sharing one group name, search box and clear button.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub name: String,
    pub search_box: Option<NodeId>,
    pub clear_button: Option<NodeId>,
    pub items: Vec<IndexedItem>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn item(&self, element: NodeId) -> Option<&IndexedItem> {
        self.items.iter().find(|item| item.element == element)
    }

    pub fn visible_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_visible).count()
    }
}

/// Indexes one `[checkbox-filter]` element.
pub fn index_item(document: &Document, element: NodeId) -> IndexedItem {
    let mut item = IndexedItem::new(element, extract_label(document, element, DEFAULT_STRATEGIES));
    item.is_visible = document.style(element, "display") != Some("none");
    item.is_paginated = document.attribute(element, markup::DATA_PAGINATED).is_some();
    item
}

/// Builds every group found under `scope`, keyed by group name.
pub fn build_groups(document: &Document, scope: NodeId) -> BTreeMap<String, Group> {
    let mut groups: BTreeMap<String, Group> = BTreeMap::new();

    for element in document.query_selector_all(scope, &markup::checkbox_items()) {
        let Some(name) = document.attribute(element, markup::CHECKBOX_FILTER) else {
            continue;
        };
        groups
            .entry(name.to_string())
            .or_insert_with(|| Group::new(name))
            .items
            .push(index_item(document, element));
    }

    for search_box in document.query_selector_all(scope, &markup::search_boxes()) {
        if let Some(name) = document.attribute(search_box, markup::SEARCHBOX_FILTER) {
            let group = groups
                .entry(name.to_string())
                .or_insert_with(|| Group::new(name));
            group.search_box.get_or_insert(search_box);
        }
    }

    for clear in document.query_selector_all(scope, &markup::clear_buttons()) {
        if let Some(name) = document.attribute(clear, markup::CLEAR_TEXT_INPUT) {
            let group = groups
                .entry(name.to_string())
                .or_insert_with(|| Group::new(name));
            group.clear_button.get_or_insert(clear);
        }
    }

    groups
}

/// Builds the single group `name` under `scope` (empty when absent).
pub fn build_group(document: &Document, scope: NodeId, name: &str) -> Group {
    build_groups(document, scope)
        .remove(name)
        .unwrap_or_else(|| Group::new(name))
}
