//! Label extraction strategies.
//!
//! Strategies are tried in order and the first non-empty trimmed result
//! wins. New strategies are added by extending the list.

use pagedom::{Document, NodeId, Selector};

use super::tokens::collapse_whitespace;
use crate::markup;

/// Extracts a candidate label for the item rooted at the given node.
pub type LabelStrategy = fn(&Document, NodeId) -> Option<String>;

/// Default order: form label, generic label, input-linked label, raw text.
pub const DEFAULT_STRATEGIES: &[LabelStrategy] =
    &[form_label, label_descendant, input_linked_label, raw_text];

/// Runs `strategies` in order; `""` when none yields text.
pub fn extract_label(document: &Document, item: NodeId, strategies: &[LabelStrategy]) -> String {
    strategies
        .iter()
        .find_map(|strategy| strategy(document, item).filter(|label| !label.is_empty()))
        .unwrap_or_default()
}

fn text_of(document: &Document, node: NodeId) -> Option<String> {
    let text = collapse_whitespace(&document.text_content(node));
    (!text.is_empty()).then_some(text)
}

/// `.w-form-label` descendant.
pub fn form_label(document: &Document, item: NodeId) -> Option<String> {
    let node = document.query_selector(item, &Selector::class(markup::FORM_LABEL_CLASS))?;
    text_of(document, node)
}

/// Any `label` descendant.
pub fn label_descendant(document: &Document, item: NodeId) -> Option<String> {
    let node = document.query_selector(item, &Selector::tag("label"))?;
    text_of(document, node)
}

/// Label of the nested checkbox input: its next sibling when that is a
/// label, else `label[for=<input id>]` anywhere in the document.
pub fn input_linked_label(document: &Document, item: NodeId) -> Option<String> {
    let input = document.query_selector(item, &markup::checkbox_input())?;
    if let Some(sibling) = document.next_element_sibling(input) {
        if document.tag(sibling) == Some("label") {
            if let Some(text) = text_of(document, sibling) {
                return Some(text);
            }
        }
    }
    let id = document.attribute(input, "id")?;
    let linked = document.query_selector(document.root(), &Selector::attr_eq("for", id))?;
    text_of(document, linked)
}

/// Whitespace-collapsed text of the whole item.
pub fn raw_text(document: &Document, item: NodeId) -> Option<String> {
    text_of(document, item)
}
