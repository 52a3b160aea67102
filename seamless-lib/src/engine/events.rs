//! DOM events consumed by the engine and events it emits.

use chrono::{DateTime, Utc};
use pagedom::NodeId;
use serde::Serialize;

use super::{FilterEngine, engine_debug};
use crate::bridge::ForeignEvent;
use crate::markup;
use crate::persist::{CheckboxParts, read_checked};
use crate::schedule::Debounce;

/// An event delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// `click` on `target`.
    Click(NodeId),
    /// `input` on a text field; `value` is the field's new value.
    Input { target: NodeId, value: String },
    /// One of the foreign filter's custom events.
    Foreign(ForeignEvent),
}

/// Events emitted by the engine, collected with
/// [`FilterEngine::drain_events`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A bridge decision landed.
    SyncComplete {
        timestamp: DateTime<Utc>,
        updated_count: usize,
    },
    /// A container stopped loading pages.
    PaginationFinished {
        container: usize,
        pages_loaded: usize,
        items: usize,
    },
}

impl FilterEngine {
    /// Routes a host event. Returns `false` when the event concerns nothing
    /// the engine tracks.
    pub fn handle_event(&mut self, event: DomEvent) -> bool {
        match event {
            DomEvent::Input { target, value } => self.on_input(target, value),
            DomEvent::Click(target) => self.on_click(target),
            DomEvent::Foreign(event) => {
                self.bridge.notice_event(event, self.clock.now());
                true
            }
        }
    }

    fn group_of_search_box(&self, target: NodeId) -> Option<String> {
        self.groups
            .values()
            .find(|group| group.search_box == Some(target))
            .map(|group| group.name.clone())
            .or_else(|| {
                self.document
                    .attribute(target, markup::SEARCHBOX_FILTER)
                    .map(str::to_string)
            })
    }

    fn on_input(&mut self, target: NodeId, value: String) -> bool {
        let Some(group) = self.group_of_search_box(target) else {
            return false;
        };
        self.document.set_value(target, &value);
        let now = self.clock.now();
        let delay = self.config.search_debounce;
        self.search
            .entry(group)
            .or_insert_with(|| Debounce::new(delay))
            .trigger(now, value);
        true
    }

    fn on_click(&mut self, target: NodeId) -> bool {
        if let Some(clear) = self.document.closest(target, &markup::clear_buttons()) {
            let Some(group) = self
                .document
                .attribute(clear, markup::CLEAR_TEXT_INPUT)
                .map(str::to_string)
            else {
                return false;
            };
            if let Some(search_box) = self.groups.get(&group).and_then(|group| group.search_box) {
                self.document.set_value(search_box, "");
            }
            self.filter_group(&group, "");
            return true;
        }

        if self
            .document
            .closest(target, &markup::foreign_tag_remove())
            .is_some()
        {
            self.bridge.notice_event(ForeignEvent::Click, self.clock.now());
            return true;
        }

        let Some(node) = self.document.closest(target, &markup::checkbox_items()) else {
            return false;
        };
        let Some((group, label)) = self.groups.values().find_map(|group| {
            group
                .item(node)
                .map(|item| (group.name.clone(), item.label_text.clone()))
        }) else {
            return false;
        };

        let checked = !read_checked(&self.document, node);
        CheckboxParts::locate(&self.document, node).apply(&mut self.document, checked);
        self.checked.record(&group, &label, checked);
        engine_debug!(self, "{group:?}/{label:?} clicked, checked = {checked}");

        if let Some(query) = self.active_queries.get(&group).cloned() {
            self.apply_filter(&group, &query);
        }
        true
    }
}
