//! Merging pagination pages into the engine.
//!
//! Loading is split so a host can interleave user input with page arrival:
//! [`FilterEngine::begin_pagination`] hands out one job per container, the
//! host polls the job streams and passes each item back through
//! [`FilterEngine::apply_progress`].

use std::sync::Arc;

use futures::StreamExt;
use futures::stream::select_all;
use pagedom::{Document, NodeId};

use super::{EngineEvent, FilterEngine, engine_debug};
use crate::index::{Group, IndexedItem, index_item};
use crate::markup;
use crate::paginate::{
    CheckboxSnapshot, PageFetcher, PageOutcome, PageProgress, PagePlan, PaginationJob,
    pagination_param, select_strategy,
};
use crate::persist::CheckboxParts;
use crate::score::{Query, is_match, score};

/// What merging one page did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// New `(group, label)` pairs recorded.
    pub appended: usize,
    /// Items inserted into the document.
    pub spliced: usize,
    /// The page URL had already been merged.
    pub duplicate_page: bool,
    pub failed: bool,
}

impl FilterEngine {
    /// Starts loading every seamless container that is neither loading nor
    /// complete.
    pub fn begin_pagination(&mut self) -> Vec<PaginationJob> {
        let mut jobs = Vec::new();

        for index in 0..self.containers.len() {
            let state = &mut self.containers[index];
            if state.is_loading || state.is_complete {
                continue;
            }
            let next_url = state.layout.next_url(self.location.as_ref());
            let total_pages = state.layout.total_pages.filter(|total| *total > 1);
            let Some(location) = self.location.clone() else {
                state.is_complete = true;
                engine_debug!(self, "container {index}: no document location, pagination skipped");
                continue;
            };
            if next_url.is_none() && total_pages.is_none() {
                state.is_complete = true;
                continue;
            }

            state.pages_loaded.insert(location.to_string());
            let plan = PagePlan {
                container_index: index,
                page_param: next_url
                    .as_ref()
                    .and_then(|next| pagination_param(&location, next)),
                location,
                next_url,
                total_pages,
                pages_loaded: state.pages_loaded.clone(),
            };
            state.is_loading = true;

            let strategy = select_strategy(&plan, self.config.max_in_flight_pages);
            log::info!(
                "container {index}: loading pages with the {} strategy",
                strategy.name()
            );
            jobs.push(PaginationJob {
                container: index,
                plan,
                strategy,
            });
        }

        self.update_indicators();
        jobs
    }

    /// Hands one item of a job stream back to the engine.
    pub fn apply_progress(&mut self, container: usize, progress: PageProgress) -> MergeReport {
        match progress {
            PageProgress::Page(outcome) => self.merge_page(container, outcome),
            PageProgress::Done => {
                self.finish_pagination(container);
                MergeReport::default()
            }
        }
    }

    /// Records the items of a fetched page and splices the ones an active
    /// search wants to see.
    ///
    /// Pages must arrive in page order; the strategies guarantee it.
    pub fn merge_page(&mut self, container: usize, outcome: PageOutcome) -> MergeReport {
        let mut report = MergeReport::default();
        let Some(state) = self.containers.get_mut(container) else {
            return report;
        };

        let page = match outcome {
            PageOutcome::Loaded(page) => page,
            PageOutcome::Failed {
                page_number,
                url,
                error,
            } => {
                engine_debug!(
                    self,
                    "container {container}: page {page_number} ({url}) failed: {error}"
                );
                report.failed = true;
                return report;
            }
        };

        if !state.pages_loaded.insert(page.url.to_string()) {
            report.duplicate_page = true;
            return report;
        }

        let mut groups = Vec::new();
        for item in page.items {
            if !groups.contains(&item.group) {
                groups.push(item.group.clone());
            }
            let appended = state.push(CheckboxSnapshot {
                group: item.group,
                label: item.label,
                page: page.page_number,
                element: None,
                fragment: Some(item.fragment),
            });
            if appended {
                report.appended += 1;
            }
        }
        engine_debug!(
            self,
            "container {container}: merged page {} ({} new items)",
            page.page_number,
            report.appended
        );

        for group in groups {
            if let Some(query) = self.active_queries.get(&group).cloned() {
                let before = self.rendered_count(container);
                self.apply_filter(&group, &query);
                report.spliced += self.rendered_count(container).saturating_sub(before);
            }
        }
        self.update_indicators();
        report
    }

    /// Marks a container as done loading, successfully or not.
    pub fn finish_pagination(&mut self, container: usize) {
        let Some(state) = self.containers.get_mut(container) else {
            return;
        };
        state.is_loading = false;
        state.is_complete = true;
        let pages_loaded = state.pages_loaded.len();
        let items = state.all_checkboxes.len();
        log::info!(
            "container {container}: pagination finished, {pages_loaded} pages, {items} items"
        );
        self.events.push(EngineEvent::PaginationFinished {
            container,
            pages_loaded,
            items,
        });
        self.update_indicators();
    }

    /// Loads the remaining pages of every seamless container, merging them
    /// in page order per container.
    pub async fn load_all_paginated_items(&mut self, fetcher: Arc<dyn PageFetcher>) {
        let jobs = self.begin_pagination();
        if jobs.is_empty() {
            return;
        }
        let mut progress = select_all(
            jobs.into_iter()
                .map(|job| job.into_stream(Arc::clone(&fetcher))),
        );
        while let Some((container, item)) = progress.next().await {
            self.apply_progress(container, item);
        }
    }

    fn rendered_count(&self, container: usize) -> usize {
        self.containers.get(container).map_or(0, |state| {
            state
                .all_checkboxes
                .iter()
                .filter(|snapshot| snapshot.element.is_some())
                .count()
        })
    }

    /// Inserts the unrendered items of `group` that match `query` or are
    /// stored as checked. Returns the number inserted.
    pub(super) fn splice_matches(&mut self, group: &str, query: &Query) -> usize {
        let mut spliced = 0;
        for container in 0..self.containers.len() {
            let state = &self.containers[container];
            let wanted: Vec<usize> = state
                .unrendered(group)
                .filter(|(_, snapshot)| {
                    self.checked.is_checked(group, &snapshot.label) || {
                        let candidate = IndexedItem::new(state.container, &snapshot.label);
                        is_match(score(query, &candidate), self.config.score_threshold)
                    }
                })
                .map(|(index, _)| index)
                .collect();
            for index in wanted {
                if self.splice(container, index).is_some() {
                    spliced += 1;
                }
            }
        }
        spliced
    }

    /// Inserts one snapshot into its container's items host, before the
    /// first rendered item that follows it in page order.
    fn splice(&mut self, container: usize, index: usize) -> Option<NodeId> {
        let state = self.containers.get(container)?;
        let snapshot = state.all_checkboxes.get(index)?;
        let fragment = snapshot.fragment.clone()?;
        let host = state.layout.items_host.unwrap_or(state.container);

        let reference = state.all_checkboxes[index + 1..]
            .iter()
            .filter_map(|later| later.element)
            .find_map(|node| host_child(&self.document, host, node));

        let root = self.document.insert_before(host, fragment, reference);
        let node = if self.document.matches(root, &markup::checkbox_items()) {
            root
        } else {
            self.document.query_selector(root, &markup::checkbox_items())?
        };
        self.document.set_attribute(node, markup::DATA_PAGINATED, "true");

        let group = snapshot.group.clone();
        let label = snapshot.label.clone();
        if self.checked.is_checked(&group, &label) {
            CheckboxParts::locate(&self.document, node).apply(&mut self.document, true);
        }

        let item = index_item(&self.document, node);
        self.groups
            .entry(group.clone())
            .or_insert_with(|| Group::new(&group))
            .items
            .push(item);
        if let Some(snapshot) = self.containers[container].all_checkboxes.get_mut(index) {
            snapshot.element = Some(node);
        }
        Some(node)
    }
}

/// The child of `host` that contains `node`.
fn host_child(document: &Document, host: NodeId, node: NodeId) -> Option<NodeId> {
    let mut current = node;
    loop {
        let parent = document.parent(current)?;
        if parent == host {
            return Some(current);
        }
        current = parent;
    }
}
