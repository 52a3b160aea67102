//! The filter engine: one owner for the document, the index and every
//! piece of state that outlives a re-render.

mod events;
mod pagination;
mod stats;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;

use pagedom::{Document, NodeId};
use url::Url;

pub use events::*;
pub use pagination::*;
pub use stats::*;

use crate::bridge::FinsweetBridge;
use crate::clock::{Clock, SystemClock};
use crate::config::FilterConfig;
use crate::index::{Group, build_groups};
use crate::markup;
use crate::paginate::PaginatedContainerState;
use crate::persist::{CheckboxParts, CheckedStateStore, read_checked};
use crate::reconcile::{EmptyQuery, PassOptions, VisibilityWrite, apply_write, plan_group};
use crate::schedule::{Debounce, FrameBatch};
use crate::score::Query;

/// Logs at debug level only while debug mode is on.
macro_rules! engine_debug {
    ($engine:expr, $($arg:tt)*) => {
        if $engine.config.debug {
            log::debug!($($arg)*);
        }
    };
}
pub(crate) use engine_debug;

/// Checkbox filter engine bound to one document.
///
/// Every operation is infallible from the caller's point of view: missing
/// markup makes an operation a no-op and failures are logged when debug
/// mode is on.
///
/// # Example
///
/// ```ignore
/// let mut engine = FilterEngine::new(document, FilterConfig::default());
/// engine.filter_group("locality", "nab");
/// engine.flush_updates();
/// ```
pub struct FilterEngine {
    document: Document,
    location: Option<Url>,
    config: FilterConfig,
    clock: Arc<dyn Clock>,
    groups: BTreeMap<String, Group>,
    /// Non-empty queries currently applied, by group.
    active_queries: HashMap<String, String>,
    checked: CheckedStateStore,
    containers: Vec<PaginatedContainerState>,
    search: HashMap<String, Debounce<String>>,
    restore: Debounce<()>,
    bridge: FinsweetBridge,
    frame: FrameBatch<VisibilityWrite>,
    events: Vec<EngineEvent>,
}

impl std::fmt::Debug for FilterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEngine")
            .field("location", &self.location.as_ref().map(Url::as_str))
            .field("groups", &self.groups.len())
            .field("active_queries", &self.active_queries)
            .field("containers", &self.containers.len())
            .field("pending_writes", &self.frame.len())
            .finish_non_exhaustive()
    }
}

impl FilterEngine {
    /// Creates an engine and indexes `document` right away.
    pub fn new(document: Document, config: FilterConfig) -> Self {
        let mut engine = Self {
            document,
            location: None,
            clock: Arc::new(SystemClock),
            groups: BTreeMap::new(),
            active_queries: HashMap::new(),
            checked: CheckedStateStore::new(),
            containers: Vec::new(),
            search: HashMap::new(),
            restore: Debounce::new(config.restore_delay),
            bridge: FinsweetBridge::new(config.sync_debounce),
            frame: FrameBatch::new(),
            events: Vec::new(),
            config,
        };
        engine.recache_elements();
        engine
    }

    /// URL the document was loaded from; relative pagination links resolve
    /// against it.
    pub fn with_location(mut self, location: Url) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for hosts that re-render parts of the page.
    ///
    /// Call [`FilterEngine::recache_elements`] (or
    /// [`FilterEngine::force_rebuild`]) after replacing indexed markup.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn location(&self) -> Option<&Url> {
        self.location.as_ref()
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn groups(&self) -> &BTreeMap<String, Group> {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn checked_states(&self) -> &CheckedStateStore {
        &self.checked
    }

    pub fn containers(&self) -> &[PaginatedContainerState] {
        &self.containers
    }

    /// Query currently applied to `group`, if any.
    pub fn active_query(&self, group: &str) -> Option<&str> {
        self.active_queries.get(group).map(String::as_str)
    }

    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.config.debug = enabled;
        log::info!("debug mode {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Labels of the visible items of `group`, in index order.
    pub fn visible_labels(&self, group: &str) -> Vec<&str> {
        self.groups
            .get(group)
            .map(|group| {
                group
                    .items
                    .iter()
                    .filter(|item| item.is_visible)
                    .map(|item| item.label_text.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    // =========================================================================
    // Indexing
    // =========================================================================

    /// Rebuilds groups and items from the current document.
    ///
    /// Checked state and paginated container state survive; containers are
    /// re-bound by document order. Pending writes for nodes that are no
    /// longer indexed are dropped.
    pub fn recache_elements(&mut self) {
        // Queued writes land first; the rebuilt index reads visibility back
        // from the document.
        self.apply_frame();
        self.pump_mutations(self.clock.now());

        let root = self.document.root();
        self.groups = build_groups(&self.document, root);

        for group in self.groups.values() {
            for item in &group.items {
                if read_checked(&self.document, item.element) {
                    self.checked.observe(&group.name, &item.label_text, true);
                }
            }
        }

        let nodes = self
            .document
            .query_selector_all(root, &markup::seamless_containers());
        self.containers.truncate(nodes.len());
        for (index, node) in nodes.into_iter().enumerate() {
            match self.containers.get_mut(index) {
                Some(state) => state.rebind(&self.document, node),
                None => {
                    let mut state = PaginatedContainerState::new(&self.document, node);
                    state.seed(&self.document);
                    self.containers.push(state);
                }
            }
        }

        let indexed: BTreeSet<NodeId> = self
            .groups
            .values()
            .flat_map(|group| group.items.iter().map(|item| item.element))
            .collect();
        self.bridge.forget(|node| indexed.contains(&node));
        self.bridge.observe(&self.document);

        engine_debug!(
            self,
            "recached {} groups, {} items, {} seamless containers",
            self.groups.len(),
            indexed.len(),
            self.containers.len()
        );
    }

    /// Full rebuild after a destructive re-render: capture, recache,
    /// re-apply the active queries and schedule a restore of checked state.
    pub fn force_rebuild(&mut self) {
        self.capture_current_checked_states();
        self.recache_elements();
        let queries: Vec<(String, String)> = self
            .active_queries
            .iter()
            .map(|(group, query)| (group.clone(), query.clone()))
            .collect();
        for (group, query) in queries {
            self.apply_filter(&group, &query);
        }
        self.restore_all_checked_states();
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// Filters `group` by `query` and queues the resulting writes for the
    /// next render tick.
    ///
    /// In a seamless container a non-empty query also splices matching
    /// items from pages that are not rendered.
    ///
    /// Supersedes a keystroke still waiting in the group's search debounce.
    pub fn filter_group(&mut self, group: &str, query: &str) {
        if let Some(debounce) = self.search.get_mut(group) {
            debounce.cancel();
        }
        self.apply_filter(group, query);
    }

    /// One filter pass. Leaves the search debounce alone, so re-filters
    /// triggered by merges, clicks and syncs never drop pending input.
    fn apply_filter(&mut self, group: &str, query: &str) {
        let prepared = Query::new(query);
        if prepared.is_empty() {
            self.active_queries.remove(group);
        } else {
            self.active_queries.insert(group.to_string(), query.to_string());
        }

        if !self.groups.contains_key(group) && !self.has_unrendered(group) {
            engine_debug!(self, "filter: no group named {group:?}");
            return;
        }

        if !prepared.is_empty() {
            let spliced = self.splice_matches(group, &prepared);
            if spliced > 0 {
                engine_debug!(self, "spliced {spliced} paginated items into {group:?}");
            }
        }

        let options = PassOptions {
            threshold: self.config.score_threshold,
            sort_by_score: self.config.sort_by_score,
            empty_query: if self.in_seamless_container(group) {
                EmptyQuery::RestorePagination
            } else {
                EmptyQuery::ShowAll
            },
        };

        let Some(indexed) = self.groups.get_mut(group) else {
            return;
        };
        let document = &self.document;
        let store = &self.checked;
        let plan = plan_group(indexed, &prepared, options, |item| {
            store.is_checked(group, &item.label_text) || read_checked(document, item.element)
        });

        engine_debug!(
            self,
            "filter {group:?} by {query:?}: {} visible, {} writes queued",
            plan.visible,
            plan.writes.len()
        );
        for (node, write) in plan.writes {
            self.frame.schedule(node, write);
        }
        self.update_indicators();
    }

    fn in_seamless_container(&self, group: &str) -> bool {
        self.containers
            .iter()
            .any(|state| state.groups().contains(group))
    }

    fn has_unrendered(&self, group: &str) -> bool {
        self.containers
            .iter()
            .any(|state| state.unrendered(group).next().is_some())
    }

    /// Shows each container's searching indicator and empty state
    /// according to the active searches of its groups.
    fn update_indicators(&mut self) {
        for state in &self.containers {
            let active: Vec<&Group> = state
                .groups()
                .into_iter()
                .filter(|group| self.active_queries.contains_key(*group))
                .filter_map(|group| self.groups.get(group))
                .collect();
            let searching = !active.is_empty();
            let visible = active
                .iter()
                .flat_map(|group| group.items.iter())
                .filter(|item| {
                    item.is_visible && self.document.contains(state.container, item.element)
                })
                .count();

            if let Some(indicator) = state.layout.searching_indicator {
                set_shown(&mut self.document, indicator, searching && state.is_loading);
            }
            if let Some(empty) = state.layout.empty_state {
                set_shown(&mut self.document, empty, searching && visible == 0);
            }
        }
    }

    // =========================================================================
    // Checked state
    // =========================================================================

    /// Merges the checked flag of every rendered item into the store.
    /// Returns the number of stored values that changed.
    pub fn capture_current_checked_states(&mut self) -> usize {
        let mut changed = 0;
        for group in self.groups.values() {
            for item in &group.items {
                if !self.document.is_connected(item.element) {
                    continue;
                }
                let checked = read_checked(&self.document, item.element);
                if self.checked.record(&group.name, &item.label_text, checked) {
                    changed += 1;
                }
            }
        }
        engine_debug!(self, "captured checked state, {changed} changed");
        changed
    }

    /// Schedules the stored checked states to be re-applied once the
    /// settle delay has passed.
    pub fn restore_all_checked_states(&mut self) {
        self.restore.trigger(self.clock.now(), ());
    }

    /// Writes the stored flag of every rendered item whose label is known,
    /// then re-filters groups whose visibility may have changed.
    fn restore_now(&mut self) -> usize {
        let mut restored = 0;
        let mut touched = Vec::new();
        for group in self.groups.values() {
            for item in &group.items {
                let Some(checked) = self.checked.get(&group.name, &item.label_text) else {
                    continue;
                };
                if !self.document.is_connected(item.element) {
                    continue;
                }
                let parts = CheckboxParts::locate(&self.document, item.element);
                if parts.apply(&mut self.document, checked) {
                    restored += 1;
                    touched.push(group.name.clone());
                }
            }
        }
        engine_debug!(self, "restored {restored} checked states");
        touched.dedup();
        self.refilter(touched);
        restored
    }

    fn refilter(&mut self, groups: impl IntoIterator<Item = String>) {
        for group in groups {
            if let Some(query) = self.active_queries.get(&group).cloned() {
                self.apply_filter(&group, &query);
            }
        }
    }

    // =========================================================================
    // Finsweet bridge
    // =========================================================================

    /// Decides the bridge updates now instead of waiting for the debounce.
    /// The updates land on the next [`FilterEngine::flush_updates`].
    pub fn sync_with_finsweet(&mut self) -> usize {
        let queued = self.bridge.decide(&self.document, &self.groups);
        engine_debug!(self, "finsweet sync queued {queued} updates");
        queued
    }

    /// Feeds the document's mutation journal to the bridge.
    fn pump_mutations(&mut self, now: Instant) {
        let records = self.document.take_mutations();
        if !records.is_empty() && self.bridge.notice_mutations(&self.document, &records, now) {
            log::trace!("tag region changed, sync armed");
        }
    }

    // =========================================================================
    // Render tick
    // =========================================================================

    /// Applies every queued write in one batch. Returns the number of nodes
    /// that changed.
    pub fn flush_updates(&mut self) -> usize {
        let mut applied = self.apply_frame();

        let (pending, sync_owed) = self.bridge.take_pending();
        let mut updated = 0;
        let mut touched = BTreeSet::new();
        for (node, check) in pending {
            if !self.document.is_connected(node) {
                continue;
            }
            let parts = CheckboxParts::locate(&self.document, node);
            if parts.apply(&mut self.document, check.checked) {
                updated += 1;
            }
            self.checked.record(&check.group, &check.label, check.checked);
            touched.insert(check.group);
        }
        if sync_owed {
            self.events.push(EngineEvent::SyncComplete {
                timestamp: chrono::Utc::now(),
                updated_count: updated,
            });
        }

        self.refilter(touched);
        applied += self.apply_frame() + updated;
        applied
    }

    fn apply_frame(&mut self) -> usize {
        self.frame
            .drain()
            .into_iter()
            .filter(|(node, write)| {
                self.document.is_connected(*node) && apply_write(&mut self.document, *node, *write)
            })
            .count()
    }

    /// Runs every timer that is due, then flushes. Returns the number of
    /// nodes that changed.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        self.pump_mutations(now);

        let mut due: Vec<(String, String)> = self
            .search
            .iter_mut()
            .filter_map(|(group, debounce)| debounce.poll(now).map(|query| (group.clone(), query)))
            .collect();
        due.sort();
        for (group, query) in due {
            self.apply_filter(&group, &query);
        }

        if self.bridge.poll(now) {
            self.sync_with_finsweet();
        }
        if self.restore.poll(now).is_some() {
            self.restore_now();
        }

        self.flush_updates()
    }

    /// Earliest instant at which [`FilterEngine::tick`] has work to do.
    ///
    /// Queued writes are due immediately.
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.frame.is_empty() || self.bridge.pending_len() > 0 {
            return Some(self.clock.now());
        }
        self.search
            .values()
            .filter_map(Debounce::deadline)
            .chain(self.bridge.deadline())
            .chain(self.restore.deadline())
            .min()
    }

    /// Takes the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

fn set_shown(document: &mut Document, node: NodeId, shown: bool) -> bool {
    document.set_style(node, "display", (!shown).then_some("none"))
}
