mod common;

use std::sync::Arc;
use std::time::Duration;

use pagedom::{Document, NodeId};
use seamless_lib::bridge::ForeignEvent;
use seamless_lib::markup;
use seamless_lib::persist::CheckboxParts;
use seamless_lib::{DomEvent, EngineEvent, FilterConfig, FilterEngine, ManualClock};

use common::{item, rerender};

fn tag(label: &str) -> String {
    format!(
        r#"<div fs-list-element="tag"><div fs-list-element="tag-label">{label}</div><div fs-list-element="tag-remove">×</div></div>"#
    )
}

fn engine(tags: &[&str], items: &str) -> (FilterEngine, ManualClock) {
    let tags: String = tags.iter().map(|label| tag(label)).collect();
    let html = format!(
        r#"<html><body>
             <div fs-list-element="tags">{tags}</div>
             <div class="w-dyn-items">{items}</div>
           </body></html>"#
    );
    let clock = ManualClock::new();
    let engine = FilterEngine::new(Document::parse_html(&html), FilterConfig::default())
        .with_clock(Arc::new(clock.clone()));
    (engine, clock)
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

fn agrees(engine: &FilterEngine, label: &str, checked: bool) -> bool {
    let node = node_for(engine, label);
    CheckboxParts::locate(engine.document(), node).agrees_with(engine.document(), checked)
}

fn remove_tag(engine: &mut FilterEngine, label: &str) {
    let document = engine.document_mut();
    let tag = document
        .query_selector_all(document.root(), &markup::foreign_tag_labels())
        .into_iter()
        .find(|node| document.text_content(*node) == label)
        .and_then(|node| document.parent(node))
        .unwrap();
    document.remove(tag);
}

#[test]
fn test_tag_removal_unchecks_after_debounce() {
    let items = format!(
        "{}{}",
        item("locality", "Nablus", true),
        item("locality", "Hebron", true)
    );
    let (mut engine, clock) = engine(&["Nablus", "Hebron"], &items);
    assert_eq!(engine.checked_states().get("locality", "Nablus"), Some(true));

    remove_tag(&mut engine, "Nablus");
    engine.tick();
    clock.advance(Duration::from_millis(49));
    engine.tick();
    assert!(agrees(&engine, "Nablus", true));

    clock.advance(Duration::from_millis(1));
    engine.tick();
    assert!(agrees(&engine, "Nablus", false));
    assert!(agrees(&engine, "Hebron", true));
    assert_eq!(engine.checked_states().get("locality", "Nablus"), Some(false));

    let events = engine.drain_events();
    assert!(matches!(
        events.as_slice(),
        [EngineEvent::SyncComplete { updated_count: 1, .. }]
    ));
}

#[test]
fn test_signals_rearm_the_debounce() {
    let (mut engine, clock) = engine(&["Nablus"], &item("locality", "Nablus", true));

    remove_tag(&mut engine, "Nablus");
    engine.tick();
    clock.advance(Duration::from_millis(40));
    engine.handle_event(DomEvent::Foreign(ForeignEvent::Change));
    clock.advance(Duration::from_millis(40));
    engine.tick();
    assert!(agrees(&engine, "Nablus", true));

    clock.advance(Duration::from_millis(10));
    engine.tick();
    assert!(agrees(&engine, "Nablus", false));
}

#[test]
fn test_field_value_pairs_take_precedence() {
    let items = r#"
        <label checkbox-filter="locality" class="w-checkbox">
          <div class="w-checkbox-input"></div>
          <input type="checkbox" fs-list-field="locality" fs-list-value="nablus" checked>
          <span class="w-form-label">Nablus</span>
        </label>
        <label checkbox-filter="locality" class="w-checkbox is-list-active">
          <div class="w-checkbox-input w--redirected-checked"></div>
          <input type="checkbox" fs-list-field="locality" fs-list-value="hebron">
          <span class="w-form-label">Hebron</span>
        </label>"#;
    // Tags say Hebron, but the inputs are authoritative for items with a pair.
    let (mut engine, _) = engine(&["Hebron"], items);

    assert_eq!(engine.sync_with_finsweet(), 2);
    engine.flush_updates();

    assert!(agrees(&engine, "Nablus", true));
    assert!(agrees(&engine, "Hebron", false));
    assert_eq!(engine.checked_states().get("locality", "Hebron"), Some(false));
}

#[test]
fn test_tag_remove_click_arms_sync() {
    let (mut engine, clock) = engine(&["Nablus"], &item("locality", "Nablus", true));
    let remove = engine
        .document()
        .query_selector(engine.document().root(), &markup::foreign_tag_remove())
        .unwrap();

    assert!(engine.handle_event(DomEvent::Click(remove)));
    assert!(engine.next_deadline().is_some());

    // Nothing changed yet, so the decision finds everything in agreement.
    clock.advance(Duration::from_millis(50));
    engine.tick();
    assert!(agrees(&engine, "Nablus", true));
    assert!(matches!(
        engine.drain_events().as_slice(),
        [EngineEvent::SyncComplete { updated_count: 0, .. }]
    ));
}

#[test]
fn test_pending_updates_dropped_on_recache() {
    let (mut engine, _) = engine(&[], &item("locality", "Nablus", true));
    assert_eq!(engine.sync_with_finsweet(), 1);

    rerender(engine.document_mut(), &item("locality", "Nablus", true));
    engine.recache_elements();

    assert_eq!(engine.cache_stats().pending_updates, 0);
    engine.flush_updates();
    assert!(agrees(&engine, "Nablus", true));
}

#[test]
fn test_without_foreign_markup_bridge_is_idle() {
    let html = format!(
        r#"<div class="w-dyn-items">{}</div>"#,
        item("locality", "Nablus", true)
    );
    let mut engine = FilterEngine::new(Document::parse_html(&html), FilterConfig::default());

    assert_eq!(engine.sync_with_finsweet(), 0);
    engine.flush_updates();
    assert!(agrees(&engine, "Nablus", true));
}
