//! Checked-state persistence keyed by label text.
//!
//! The store outlives DOM rebuilds: it never holds node handles, only
//! `group → label → checked`.

use std::collections::HashMap;

use pagedom::{Document, NodeId, Selector};

use crate::markup;

/// `group → label → checked` map surviving re-renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckedStateStore {
    groups: HashMap<String, HashMap<String, bool>>,
}

impl CheckedStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, group: &str, label: &str) -> Option<bool> {
        self.groups.get(group)?.get(label).copied()
    }

    pub fn is_checked(&self, group: &str, label: &str) -> bool {
        self.get(group, label).unwrap_or(false)
    }

    /// Stores `checked`; returns `true` only when the value changed.
    pub fn record(&mut self, group: &str, label: &str, checked: bool) -> bool {
        let labels = self.groups.entry(group.to_string()).or_default();
        match labels.get(label) {
            Some(previous) if *previous == checked => false,
            _ => {
                labels.insert(label.to_string(), checked);
                true
            }
        }
    }

    /// Records an observation lazily: entries are created the first time
    /// a label is seen checked, and only existing entries are unchecked.
    pub fn observe(&mut self, group: &str, label: &str, checked: bool) -> bool {
        if checked || self.get(group, label).is_some() {
            self.record(group, label, checked)
        } else {
            false
        }
    }

    /// Total number of labels stored as checked.
    pub fn checked_count(&self) -> usize {
        self.groups
            .values()
            .map(|labels| labels.values().filter(|checked| **checked).count())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The three surfaces that together show an item as checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxParts {
    /// `input[type=checkbox]` carrying the `checked` property.
    pub input: Option<NodeId>,
    /// Element receiving `.is-list-active`.
    pub label: Option<NodeId>,
    /// `.w-checkbox-input` custom visual receiving `.w--redirected-checked`.
    pub visual: Option<NodeId>,
}

impl CheckboxParts {
    pub fn locate(document: &Document, item: NodeId) -> Self {
        let input = if document.matches(item, &markup::checkbox_input()) {
            Some(item)
        } else {
            document.query_selector(item, &markup::checkbox_input())
        };
        let label = input
            .and_then(|input| document.closest(input, &Selector::tag("label")))
            .filter(|label| document.contains(item, *label) || document.contains(*label, item))
            .or(Some(item));
        let visual =
            document.query_selector(item, &Selector::class(markup::CHECKBOX_VISUAL_CLASS));
        Self {
            input,
            label,
            visual,
        }
    }

    /// Checked as seen by the user: the input, or the visual when there is
    /// no input.
    pub fn is_checked(&self, document: &Document) -> bool {
        match (self.input, self.visual) {
            (Some(input), _) => document.is_checked(input),
            (None, Some(visual)) => document.has_class(visual, markup::REDIRECTED_CHECKED_CLASS),
            (None, None) => false,
        }
    }

    /// `true` when every present surface shows `checked`.
    pub fn agrees_with(&self, document: &Document, checked: bool) -> bool {
        self.input.is_none_or(|input| document.is_checked(input) == checked)
            && self
                .label
                .is_none_or(|label| document.has_class(label, markup::ACTIVE_CLASS) == checked)
            && self.visual.is_none_or(|visual| {
                document.has_class(visual, markup::REDIRECTED_CHECKED_CLASS) == checked
            })
    }

    /// Writes `checked` to all three surfaces; returns `true` if any changed.
    pub fn apply(&self, document: &mut Document, checked: bool) -> bool {
        let mut changed = false;
        if let Some(input) = self.input {
            changed |= document.set_checked(input, checked);
        }
        if let Some(label) = self.label {
            changed |= document.toggle_class(label, markup::ACTIVE_CLASS, checked);
        }
        if let Some(visual) = self.visual {
            changed |= document.toggle_class(visual, markup::REDIRECTED_CHECKED_CLASS, checked);
        }
        changed
    }
}

/// Checked flag of the item rooted at `item`.
pub fn read_checked(document: &Document, item: NodeId) -> bool {
    CheckboxParts::locate(document, item).is_checked(document)
}
