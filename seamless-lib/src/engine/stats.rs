//! Cache statistics.

use serde::Serialize;

use super::FilterEngine;

/// Snapshot of what the engine has indexed and loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub groups: Vec<GroupStats>,
    pub total_items: usize,
    pub visible_items: usize,
    /// Labels stored as checked across all groups.
    pub checked_states: usize,
    /// Labels with any stored state.
    pub persisted_states: usize,
    pub containers: Vec<ContainerStats>,
    /// Writes waiting for the next render tick.
    pub pending_updates: usize,
    pub debug: bool,
}

/// Per-group counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupStats {
    pub name: String,
    pub items: usize,
    pub visible: usize,
    pub paginated: usize,
    pub query: Option<String>,
}

/// Per-container pagination counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContainerStats {
    /// Unique items known across all pages.
    pub known_items: usize,
    pub rendered_items: usize,
    pub revealed_items: usize,
    pub pages_loaded: usize,
    pub is_loading: bool,
    pub is_complete: bool,
}

impl FilterEngine {
    pub fn cache_stats(&self) -> CacheStats {
        let groups: Vec<GroupStats> = self
            .groups
            .values()
            .map(|group| GroupStats {
                name: group.name.clone(),
                items: group.items.len(),
                visible: group.visible_count(),
                paginated: group.items.iter().filter(|item| item.is_paginated).count(),
                query: self.active_queries.get(&group.name).cloned(),
            })
            .collect();

        let containers = self
            .containers
            .iter()
            .map(|state| ContainerStats {
                known_items: state.all_checkboxes.len(),
                rendered_items: state
                    .all_checkboxes
                    .iter()
                    .filter(|snapshot| snapshot.element.is_some())
                    .count(),
                revealed_items: state.revealed,
                pages_loaded: state.pages_loaded.len(),
                is_loading: state.is_loading,
                is_complete: state.is_complete,
            })
            .collect();

        CacheStats {
            total_items: groups.iter().map(|group| group.items).sum(),
            visible_items: groups.iter().map(|group| group.visible).sum(),
            groups,
            checked_states: self.checked.checked_count(),
            persisted_states: self.checked.len(),
            containers,
            pending_updates: self.frame.len() + self.bridge.pending_len(),
            debug: self.config.debug,
        }
    }
}
