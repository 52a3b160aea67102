//! Finsweet bridge: mirrors the foreign filter's active selection onto the
//! indexed checkboxes.
//!
//! Two stages: a debounce delays the *decision* after the last foreign
//! signal, and the decided updates wait in a frame batch until the next
//! render tick writes them all at once.

use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};

use pagedom::{Document, MutationRecord, NodeId};

use crate::index::{Group, IndexedItem, collapse_whitespace, normalize};
use crate::markup;
use crate::persist::CheckboxParts;
use crate::schedule::{Debounce, FrameBatch};

/// Foreign filter events the bridge reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignEvent {
    Change,
    Reset,
    Click,
}

impl ForeignEvent {
    pub fn name(self) -> &'static str {
        match self {
            ForeignEvent::Change => "fs-cmsfilter-change",
            ForeignEvent::Reset => "fs-cmsfilter-reset",
            ForeignEvent::Click => "fs-cmsfilter-click",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fs-cmsfilter-change" => Some(ForeignEvent::Change),
            "fs-cmsfilter-reset" => Some(ForeignEvent::Reset),
            "fs-cmsfilter-click" => Some(ForeignEvent::Click),
            _ => None,
        }
    }
}

/// A decided checked-state change waiting for the next render tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCheck {
    pub group: String,
    pub label: String,
    pub checked: bool,
}

/// What the foreign filter currently considers active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSelection {
    /// `(field, value)` of checked `fs-list-field`/`fs-list-value` inputs.
    pub pairs: HashSet<(String, String)>,
    /// Normalized texts of rendered tag labels.
    pub tag_labels: HashSet<String>,
}

impl ActiveSelection {
    pub fn read(document: &Document, tag_regions: &[NodeId]) -> Self {
        let pairs = document
            .query_selector_all(document.root(), &markup::foreign_field_inputs())
            .into_iter()
            .filter(|input| document.is_checked(*input))
            .filter_map(|input| field_value_of(document, input))
            .collect();

        let tag_labels = tag_regions
            .iter()
            .flat_map(|region| document.query_selector_all(*region, &markup::foreign_tag_labels()))
            .map(|label| normalize(&collapse_whitespace(&document.text_content(label))))
            .filter(|text| !text.is_empty())
            .collect();

        Self { pairs, tag_labels }
    }

    /// Active state for `item`, or `None` when the selection says nothing
    /// about it.
    ///
    /// Items with a field/value pair follow the checked inputs; others
    /// follow the tag labels, but only while tags are observed.
    pub fn is_active(
        &self,
        document: &Document,
        item: &IndexedItem,
        tags_observed: bool,
    ) -> Option<bool> {
        if let Some(pair) = item_field_value(document, item.element) {
            return Some(self.pairs.contains(&pair));
        }
        tags_observed.then(|| self.tag_labels.contains(&item.normalized_text))
    }
}

fn field_value_of(document: &Document, node: NodeId) -> Option<(String, String)> {
    let field = document.attribute(node, markup::FS_LIST_FIELD)?;
    let value = document.attribute(node, markup::FS_LIST_VALUE)?;
    Some((field.to_string(), value.to_string()))
}

/// Field/value pair of an item, read from its checkbox input or the item.
pub fn item_field_value(document: &Document, item: NodeId) -> Option<(String, String)> {
    CheckboxParts::locate(document, item)
        .input
        .and_then(|input| field_value_of(document, input))
        .or_else(|| field_value_of(document, item))
}

/// Bridge state owned by the engine.
#[derive(Debug, Clone)]
pub struct FinsweetBridge {
    debounce: Debounce<()>,
    pending: FrameBatch<PendingCheck>,
    tag_regions: Vec<NodeId>,
    /// A decision ran and its completion event is still owed.
    sync_owed: bool,
}

impl FinsweetBridge {
    pub fn new(delay: Duration) -> Self {
        Self {
            debounce: Debounce::new(delay),
            pending: FrameBatch::new(),
            tag_regions: Vec::new(),
            sync_owed: false,
        }
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.debounce.set_delay(delay);
    }

    /// (Re)discovers the tag regions to watch.
    pub fn observe(&mut self, document: &Document) {
        self.tag_regions = document.query_selector_all(document.root(), &markup::foreign_tags());
    }

    pub fn tag_regions(&self) -> &[NodeId] {
        &self.tag_regions
    }

    /// Arms the debounce when a child list inside a tag region changed.
    pub fn notice_mutations(
        &mut self,
        document: &Document,
        records: &[MutationRecord],
        now: Instant,
    ) -> bool {
        let touched = records.iter().any(|record| {
            record.is_child_list()
                && self
                    .tag_regions
                    .iter()
                    .any(|region| document.contains(*region, record.target))
        });
        if touched {
            self.debounce.trigger(now, ());
        }
        touched
    }

    pub fn notice_event(&mut self, event: ForeignEvent, now: Instant) {
        log::trace!("foreign event {}", event.name());
        self.debounce.trigger(now, ());
    }

    /// `true` once the debounce window has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.debounce.poll(now).is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Decides the target state of every item and queues the items whose
    /// checked triad disagrees. Returns the number queued.
    pub fn decide(&mut self, document: &Document, groups: &BTreeMap<String, Group>) -> usize {
        self.debounce.cancel();
        let selection = ActiveSelection::read(document, &self.tag_regions);
        let tags_observed = !self.tag_regions.is_empty();
        let mut queued = 0;

        for group in groups.values() {
            for item in &group.items {
                let Some(active) = selection.is_active(document, item, tags_observed) else {
                    continue;
                };
                let parts = CheckboxParts::locate(document, item.element);
                if parts.agrees_with(document, active) {
                    continue;
                }
                self.pending.schedule(
                    item.element,
                    PendingCheck {
                        group: group.name.clone(),
                        label: item.label_text.clone(),
                        checked: active,
                    },
                );
                queued += 1;
            }
        }

        self.sync_owed = true;
        queued
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Takes the queued updates and whether a completion event is owed.
    pub fn take_pending(&mut self) -> (Vec<(NodeId, PendingCheck)>, bool) {
        let owed = std::mem::replace(&mut self.sync_owed, false);
        (self.pending.drain(), owed)
    }

    /// Drops queued updates for nodes that no longer qualify.
    pub fn forget(&mut self, keep: impl FnMut(NodeId) -> bool) {
        self.pending.retain(keep);
    }
}
