mod common;

use std::sync::Arc;
use std::time::Duration;

use pagedom::{Document, NodeId, Selector};
use seamless_lib::markup;
use seamless_lib::{DomEvent, FilterConfig, FilterEngine, ManualClock};

use common::{document_html, item, rerender};

fn engine_with(html: &str, config: FilterConfig) -> (FilterEngine, ManualClock) {
    let clock = ManualClock::new();
    let engine = FilterEngine::new(Document::parse_html(html), config)
        .with_clock(Arc::new(clock.clone()));
    (engine, clock)
}

fn engine(labels: &[&str]) -> (FilterEngine, ManualClock) {
    let items: String = labels
        .iter()
        .map(|label| item("locality", label, false))
        .collect();
    let html = document_html("locality", &format!(r#"<div class="w-dyn-items">{items}</div>"#));
    engine_with(&html, FilterConfig::default())
}

fn visible(engine: &FilterEngine) -> Vec<String> {
    engine
        .visible_labels("locality")
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn node_for(engine: &FilterEngine, label: &str) -> NodeId {
    engine
        .group("locality")
        .unwrap()
        .items
        .iter()
        .find(|item| item.label_text == label)
        .unwrap()
        .element
}

fn search_box(engine: &FilterEngine) -> NodeId {
    engine.group("locality").unwrap().search_box.unwrap()
}

// =============================================================================
// Fuzzy filtering
// =============================================================================

#[test]
fn test_prefix_query_keeps_only_match() {
    let (mut engine, _) = engine(&["Nablus", "Ramallah", "Hebron"]);

    engine.filter_group("locality", "nabl");
    engine.flush_updates();

    assert_eq!(visible(&engine), vec!["Nablus"]);
    let ramallah = node_for(&engine, "Ramallah");
    assert_eq!(engine.document().style(ramallah, "display"), Some("none"));
    assert_eq!(engine.document().attribute(ramallah, "data-filtered"), Some("hidden"));
    let nablus = node_for(&engine, "Nablus");
    assert_eq!(engine.document().style(nablus, "display"), None);
    assert_eq!(engine.document().attribute(nablus, "data-filtered"), None);
}

#[test]
fn test_nonsense_query_hides_everything_but_checked() {
    let (mut engine, _) = engine(&["Nablus", "Ramallah", "Hebron"]);

    engine.filter_group("locality", "xyz123");
    engine.flush_updates();
    assert!(visible(&engine).is_empty());

    let hebron = node_for(&engine, "Hebron");
    engine.handle_event(DomEvent::Click(hebron));
    engine.flush_updates();
    assert_eq!(visible(&engine), vec!["Hebron"]);
    assert_eq!(engine.document().style(hebron, "display"), None);
}

#[test]
fn test_checked_item_is_shown_regardless_of_score() {
    let items = format!(
        "{}{}",
        item("locality", "Nablus", false),
        item("locality", "Hebron", true)
    );
    let html = document_html("locality", &format!(r#"<div class="w-dyn-items">{items}</div>"#));
    let (mut engine, _) = engine_with(&html, FilterConfig::default());

    engine.filter_group("locality", "nablus");
    engine.flush_updates();

    assert_eq!(visible(&engine), vec!["Nablus", "Hebron"]);
}

#[test]
fn test_empty_query_twice_writes_nothing_the_second_time() {
    let (mut engine, _) = engine(&["Nablus", "Ramallah", "Hebron"]);
    engine.filter_group("locality", "heb");
    engine.flush_updates();

    engine.filter_group("locality", "");
    assert_eq!(engine.flush_updates(), 2);
    assert_eq!(visible(&engine), vec!["Nablus", "Ramallah", "Hebron"]);

    let journal = engine.document().pending_mutations();
    engine.filter_group("locality", "");
    assert_eq!(engine.flush_updates(), 0);
    assert_eq!(engine.document().pending_mutations(), journal);
}

#[test]
fn test_writes_wait_for_the_render_tick() {
    let (mut engine, _) = engine(&["Nablus", "Hebron"]);

    engine.filter_group("locality", "nab");
    let hebron = node_for(&engine, "Hebron");
    assert_eq!(engine.document().style(hebron, "display"), None);
    assert!(engine.next_deadline().is_some());
    assert_eq!(engine.cache_stats().pending_updates, 1);

    engine.tick();
    assert_eq!(engine.document().style(hebron, "display"), Some("none"));
    assert_eq!(engine.next_deadline(), None);
}

#[test]
fn test_score_sorting_orders_and_clears() {
    let config = FilterConfig::default().sort_by_score(true);
    let items: String = ["Ramallah", "Al Bireh", "Ramla"]
        .iter()
        .map(|label| item("locality", label, false))
        .collect();
    let html = document_html("locality", &format!(r#"<div class="w-dyn-items">{items}</div>"#));
    let (mut engine, _) = engine_with(&html, config);

    engine.filter_group("locality", "ramla");
    engine.flush_updates();
    let ramla = node_for(&engine, "Ramla");
    let ramallah = node_for(&engine, "Ramallah");
    assert_eq!(engine.document().style(ramla, "order"), Some("0"));
    let ramallah_order: i64 = engine
        .document()
        .style(ramallah, "order")
        .map(|order| order.parse().unwrap())
        .unwrap_or(i64::MAX);
    assert!(ramallah_order > 0);

    engine.filter_group("locality", "");
    engine.flush_updates();
    assert_eq!(engine.document().style(ramla, "order"), None);
}

// =============================================================================
// Events
// =============================================================================

#[test]
fn test_input_is_debounced() {
    let (mut engine, clock) = engine(&["Nablus", "Ramallah", "Hebron"]);
    let input = search_box(&engine);

    engine.handle_event(DomEvent::Input {
        target: input,
        value: "ra".into(),
    });
    clock.advance(Duration::from_millis(100));
    engine.handle_event(DomEvent::Input {
        target: input,
        value: "ram".into(),
    });
    clock.advance(Duration::from_millis(149));
    engine.tick();
    assert_eq!(visible(&engine).len(), 3);

    clock.advance(Duration::from_millis(1));
    engine.tick();
    assert_eq!(visible(&engine), vec!["Ramallah"]);
    assert_eq!(engine.active_query("locality"), Some("ram"));
    assert_eq!(engine.document().value(input), "ram");
}

#[test]
fn test_clear_button_resets_query() {
    let (mut engine, _) = engine(&["Nablus", "Ramallah"]);
    engine.filter_group("locality", "nab");
    engine.flush_updates();

    let clear = engine
        .document()
        .query_selector(engine.document().root(), &markup::clear_buttons())
        .unwrap();
    assert!(engine.handle_event(DomEvent::Click(clear)));
    engine.flush_updates();

    assert_eq!(visible(&engine), vec!["Nablus", "Ramallah"]);
    assert_eq!(engine.active_query("locality"), None);
    assert_eq!(engine.document().value(search_box(&engine)), "");
}

#[test]
fn test_click_toggles_triad_and_store() {
    let (mut engine, _) = engine(&["Nablus"]);
    let nablus = node_for(&engine, "Nablus");
    let span = engine
        .document()
        .query_selector(nablus, &Selector::class("w-form-label"))
        .unwrap();

    assert!(engine.handle_event(DomEvent::Click(span)));
    let document = engine.document();
    let input = document.query_selector(nablus, &markup::checkbox_input()).unwrap();
    let visual = document
        .query_selector(nablus, &Selector::class("w-checkbox-input"))
        .unwrap();
    assert!(document.is_checked(input));
    assert!(document.has_class(nablus, "is-list-active"));
    assert!(document.has_class(visual, "w--redirected-checked"));
    assert_eq!(engine.checked_states().get("locality", "Nablus"), Some(true));

    engine.handle_event(DomEvent::Click(span));
    assert!(!engine.document().is_checked(input));
    assert_eq!(engine.checked_states().get("locality", "Nablus"), Some(false));
}

#[test]
fn test_unrelated_click_is_ignored() {
    let (mut engine, _) = engine(&["Nablus"]);
    let root = engine.document().root();
    assert!(!engine.handle_event(DomEvent::Click(root)));
}

// =============================================================================
// Checked-state persistence
// =============================================================================

#[test]
fn test_checked_state_survives_rerender() {
    let (mut engine, clock) = engine(&["Nablus", "Ramallah", "Hebron"]);
    let nablus = node_for(&engine, "Nablus");
    engine.handle_event(DomEvent::Click(nablus));

    engine.capture_current_checked_states();
    let fresh: String = ["Nablus", "Ramallah", "Hebron"]
        .iter()
        .map(|label| item("locality", label, false))
        .collect();
    rerender(engine.document_mut(), &fresh);
    engine.recache_elements();

    let fresh_nablus = node_for(&engine, "Nablus");
    assert_ne!(fresh_nablus, nablus);
    assert!(!seamless_lib::persist::read_checked(engine.document(), fresh_nablus));

    engine.restore_all_checked_states();
    clock.advance(Duration::from_millis(199));
    engine.tick();
    assert!(!seamless_lib::persist::read_checked(engine.document(), fresh_nablus));

    clock.advance(Duration::from_millis(1));
    engine.tick();
    let parts = seamless_lib::persist::CheckboxParts::locate(engine.document(), fresh_nablus);
    assert!(parts.agrees_with(engine.document(), true));
    let ramallah = node_for(&engine, "Ramallah");
    assert!(!seamless_lib::persist::read_checked(engine.document(), ramallah));
}

#[test]
fn test_recache_lands_queued_writes_first() {
    let (mut engine, _) = engine(&["Nablus", "Ramallah", "Hebron"]);
    engine.filter_group("locality", "nabl");
    engine.recache_elements();
    assert_eq!(visible(&engine), vec!["Nablus"]);

    engine.filter_group("locality", "");
    engine.flush_updates();

    assert_eq!(visible(&engine), vec!["Nablus", "Ramallah", "Hebron"]);
    for label in ["Nablus", "Ramallah", "Hebron"] {
        let node = node_for(&engine, label);
        assert_eq!(engine.document().style(node, "display"), None, "{label}");
    }
}

#[test]
fn test_force_rebuild_reapplies_query() {
    let (mut engine, clock) = engine(&["Nablus", "Ramallah", "Hebron"]);
    engine.filter_group("locality", "heb");
    engine.flush_updates();

    engine.force_rebuild();
    engine.flush_updates();
    assert_eq!(visible(&engine), vec!["Hebron"]);

    clock.advance(Duration::from_millis(200));
    engine.tick();
    assert_eq!(visible(&engine), vec!["Hebron"]);
}

#[test]
fn test_capture_only_counts_changes() {
    let (mut engine, _) = engine(&["Nablus", "Ramallah"]);
    assert_eq!(engine.capture_current_checked_states(), 2);
    assert_eq!(engine.capture_current_checked_states(), 0);
    assert_eq!(engine.checked_states().checked_count(), 0);
}

// =============================================================================
// Stats
// =============================================================================

#[test]
fn test_cache_stats_serialize() {
    let (mut engine, _) = engine(&["Nablus", "Ramallah", "Hebron"]);
    engine.filter_group("locality", "nabl");
    engine.flush_updates();
    engine.set_debug_mode(true);

    let stats = engine.cache_stats();
    assert_eq!(stats.total_items, 3);
    assert_eq!(stats.visible_items, 1);
    assert_eq!(stats.groups[0].query.as_deref(), Some("nabl"));
    assert!(stats.debug);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["groups"][0]["name"], "locality");
    assert_eq!(json["pending_updates"], 0);
}
