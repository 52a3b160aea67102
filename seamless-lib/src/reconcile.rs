//! Visibility reconciliation.
//!
//! Planning decides which items change; applying performs the DOM writes.
//! The engine queues planned writes and applies them together on the next
//! render tick.

use pagedom::{Document, NodeId};

use crate::index::{Group, IndexedItem};
use crate::markup;
use crate::score::{Query, is_match, score};

/// What an empty query shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyQuery {
    /// Every tracked item.
    ShowAll,
    /// Only what normal pagination reveals: items that were not spliced in
    /// by a search.
    RestorePagination,
}

/// Per-pass settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassOptions {
    pub threshold: f64,
    pub sort_by_score: bool,
    pub empty_query: EmptyQuery,
}

/// `style.order` handling of one write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderWrite {
    Keep,
    Set(i64),
    Clear,
}

/// A pending DOM write for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityWrite {
    pub visible: bool,
    pub order: OrderWrite,
}

/// Outcome of planning one group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPlan {
    pub writes: Vec<(NodeId, VisibilityWrite)>,
    /// Items visible once the writes land.
    pub visible: usize,
}

/// Rank used for `style.order`: better scores sort first.
pub fn order_for(score: f64) -> i64 {
    ((1.0 - score.clamp(0.0, 1.0)) * 1000.0).round() as i64
}

/// Decides visibility for every item of `group` and updates `is_visible`.
///
/// Checked items are shown before any score is consulted. Only items whose
/// visibility flips produce a write, except that score sorting also
/// re-ranks shown items.
pub fn plan_group(
    group: &mut Group,
    query: &Query,
    options: PassOptions,
    is_checked: impl Fn(&IndexedItem) -> bool,
) -> FilterPlan {
    let mut plan = FilterPlan::default();

    for item in &mut group.items {
        let (show, rank) = decide(item, query, options, &is_checked);

        let order = match (options.sort_by_score, query.is_empty(), show) {
            (false, _, _) => OrderWrite::Keep,
            (true, true, _) => OrderWrite::Clear,
            (true, false, true) => OrderWrite::Set(order_for(rank)),
            (true, false, false) => OrderWrite::Keep,
        };

        if show != item.is_visible || order != OrderWrite::Keep {
            item.is_visible = show;
            plan.writes.push((
                item.element,
                VisibilityWrite {
                    visible: show,
                    order,
                },
            ));
        }
        if show {
            plan.visible += 1;
        }
    }

    plan
}

/// Visibility and ranking score for one item.
pub fn decide(
    item: &IndexedItem,
    query: &Query,
    options: PassOptions,
    is_checked: impl Fn(&IndexedItem) -> bool,
) -> (bool, f64) {
    if is_checked(item) {
        return (true, 1.0);
    }
    if query.is_empty() {
        let show = match options.empty_query {
            EmptyQuery::ShowAll => true,
            EmptyQuery::RestorePagination => !item.is_paginated,
        };
        return (show, 1.0);
    }
    let s = score(query, item);
    (is_match(s, options.threshold), s)
}

/// Applies one write. Returns `true` if the document changed.
pub fn apply_write(document: &mut Document, node: NodeId, write: VisibilityWrite) -> bool {
    let mut changed = if write.visible {
        let a = document.set_style(node, "display", None);
        let b = document.remove_attribute(node, markup::DATA_FILTERED);
        a | b
    } else {
        let a = document.set_style(node, "display", Some("none"));
        let b = document.set_attribute(node, markup::DATA_FILTERED, "hidden");
        a | b
    };
    changed |= match write.order {
        OrderWrite::Keep => false,
        OrderWrite::Set(order) => document.set_style(node, "order", Some(&order.to_string())),
        OrderWrite::Clear => document.set_style(node, "order", None),
    };
    changed
}
