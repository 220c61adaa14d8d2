#![allow(clippy::float_cmp)]

use std::collections::HashSet;

use serde_json::json;

use super::*;
use crate::geom::Viewport;

fn make_item(id: &str, kind: ItemKind, z: i64) -> CanvasItem {
    CanvasItem {
        id: ItemId::new(id),
        kind,
        content: "hello".to_owned(),
        x: 10.0,
        y: 20.0,
        z_index: z,
        selected: false,
    }
}

fn store_with(n: usize) -> ItemStore {
    let mut store = ItemStore::new();
    for i in 0..n {
        store.add(ItemKind::Text, format!("t{i}"), Point::new(0.0, 0.0));
    }
    store
}

fn selected_count(store: &ItemStore) -> usize {
    store.items().iter().filter(|item| item.selected).count()
}

// =============================================================
// ItemId
// =============================================================

#[test]
fn id_from_counter_formats_with_prefix() {
    assert_eq!(ItemId::from_counter(0).as_str(), "item-0");
    assert_eq!(ItemId::from_counter(42).to_string(), "item-42");
}

#[test]
fn id_numeric_suffix_parses_counter() {
    assert_eq!(ItemId::new("item-7").numeric_suffix(), 7);
}

#[test]
fn id_numeric_suffix_uses_leading_digits() {
    assert_eq!(ItemId::new("item-12abc").numeric_suffix(), 12);
}

#[test]
fn id_numeric_suffix_non_numeric_is_zero() {
    assert_eq!(ItemId::new("item-abc").numeric_suffix(), 0);
    assert_eq!(ItemId::new("nodash").numeric_suffix(), 0);
}

#[test]
fn id_serializes_as_plain_string() {
    let v = serde_json::to_value(ItemId::new("item-3")).unwrap();
    assert_eq!(v, json!("item-3"));
}

// =============================================================
// CanvasItem serde
// =============================================================

#[test]
fn item_wire_shape_matches_storage_format() {
    let item = make_item("item-1", ItemKind::Image, 2);
    let v = serde_json::to_value(&item).unwrap();
    assert_eq!(
        v,
        json!({
            "id": "item-1",
            "type": "image",
            "content": "hello",
            "x": 10.0,
            "y": 20.0,
            "zIndex": 2,
            "selected": false,
        })
    );
}

#[test]
fn item_deserializes_browser_written_record() {
    let raw = r#"{"id":"item-4","type":"text","content":"Hi","x":300,"y":300,"zIndex":5,"selected":true}"#;
    let item: CanvasItem = serde_json::from_str(raw).unwrap();
    assert_eq!(item.id, ItemId::new("item-4"));
    assert_eq!(item.kind, ItemKind::Text);
    assert_eq!(item.position(), Point::new(300.0, 300.0));
    assert_eq!(item.z_index, 5);
    assert!(item.selected);
}

#[test]
fn item_rejects_unknown_kind() {
    let raw = r#"{"id":"item-4","type":"video","content":"x","x":0,"y":0,"zIndex":1,"selected":false}"#;
    assert!(serde_json::from_str::<CanvasItem>(raw).is_err());
}

// =============================================================
// IdGenerator
// =============================================================

#[test]
fn generator_starts_at_zero() {
    let mut ids = IdGenerator::new();
    assert_eq!(ids.next_id().as_str(), "item-0");
    assert_eq!(ids.next_id().as_str(), "item-1");
    assert_eq!(ids.peek(), 2);
}

#[test]
fn generator_reseed_moves_past_max_suffix() {
    let mut ids = IdGenerator::new();
    let items = vec![
        make_item("item-0", ItemKind::Text, 1),
        make_item("item-1", ItemKind::Text, 2),
        make_item("item-5", ItemKind::Text, 3),
    ];
    ids.reseed(&items);
    assert_eq!(ids.next_id().as_str(), "item-6");
}

#[test]
fn generator_reseed_empty_keeps_counter() {
    let mut ids = IdGenerator::new();
    ids.next_id();
    ids.reseed(&[]);
    assert_eq!(ids.peek(), 1);
}

#[test]
fn generator_reseed_never_moves_backwards() {
    let mut ids = IdGenerator::new();
    for _ in 0..10 {
        ids.next_id();
    }
    ids.reseed(&[make_item("item-2", ItemKind::Text, 1)]);
    assert_eq!(ids.peek(), 10);
}

#[test]
fn generator_reseed_skips_suffix_without_successor() {
    let mut ids = IdGenerator::new();
    ids.reseed(&[make_item("item-18446744073709551615", ItemKind::Text, 1), make_item("item-4", ItemKind::Text, 2)]);
    assert_eq!(ids.peek(), 5);
}

#[test]
fn generator_wraps_instead_of_repeating_at_max() {
    let mut ids = IdGenerator::new();
    ids.reseed(&[make_item("item-18446744073709551614", ItemKind::Text, 1)]);
    assert_eq!(ids.next_id().as_str(), "item-18446744073709551615");
    assert_eq!(ids.next_id().as_str(), "item-0");
    assert_eq!(ids.next_id().as_str(), "item-1");
}

// =============================================================
// ItemStore: add
// =============================================================

#[test]
fn add_assigns_unique_ids() {
    let store = store_with(50);
    let ids: HashSet<_> = store.items().iter().map(|item| item.id.clone()).collect();
    assert_eq!(ids.len(), 50);
}

#[test]
fn add_assigns_z_as_count_plus_one() {
    let store = store_with(3);
    let zs: Vec<i64> = store.items().iter().map(|item| item.z_index).collect();
    assert_eq!(zs, vec![1, 2, 3]);
}

#[test]
fn add_is_not_selected_and_appends() {
    let mut store = store_with(1);
    let id = store.add(ItemKind::Image, "/img/a.png", Point::new(50.0, 50.0)).id.clone();
    assert_eq!(store.items().last().unwrap().id, id);
    let item = store.get(&id).unwrap();
    assert!(!item.selected);
    assert_eq!(item.kind, ItemKind::Image);
    assert_eq!(item.content, "/img/a.png");
    assert_eq!(item.position(), Point::new(50.0, 50.0));
}

#[test]
fn add_after_remove_does_not_reuse_ids() {
    let mut store = store_with(2);
    let first = store.items()[0].id.clone();
    store.remove(&first);
    let id = store.add(ItemKind::Text, "x", Point::default()).id.clone();
    assert_eq!(id.as_str(), "item-2");
}

#[test]
fn add_after_remove_can_repeat_z_index() {
    let mut store = store_with(2);
    let first = store.items()[0].id.clone();
    store.remove(&first);
    let z = store.add(ItemKind::Text, "x", Point::default()).z_index;
    assert_eq!(z, 2);
    // Existing z values are untouched by removal.
    assert_eq!(store.items()[0].z_index, 2);
}

// =============================================================
// ItemStore: remove
// =============================================================

#[test]
fn remove_returns_removed_item() {
    let mut store = store_with(2);
    let id = store.items()[1].id.clone();
    let removed = store.remove(&id).unwrap();
    assert_eq!(removed.id, id);
    assert_eq!(store.len(), 1);
    assert!(store.get(&id).is_none());
}

#[test]
fn remove_absent_is_noop() {
    let mut store = store_with(2);
    assert!(store.remove(&ItemId::new("item-99")).is_none());
    assert_eq!(store.len(), 2);
}

#[test]
fn remove_preserves_order_of_rest() {
    let mut store = store_with(3);
    let middle = store.items()[1].id.clone();
    store.remove(&middle);
    let ids: Vec<&str> = store.items().iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["item-0", "item-2"]);
}

// =============================================================
// ItemStore: selection
// =============================================================

#[test]
fn select_is_exclusive() {
    let mut store = store_with(4);
    for i in 0..4 {
        let id = store.items()[i].id.clone();
        assert!(store.select(&id));
        assert_eq!(selected_count(&store), 1);
        assert_eq!(store.selected().unwrap().id, id);
    }
}

#[test]
fn select_is_idempotent() {
    let mut store = store_with(2);
    let id = store.items()[0].id.clone();
    store.select(&id);
    store.select(&id);
    assert_eq!(selected_count(&store), 1);
    assert!(store.get(&id).unwrap().selected);
}

#[test]
fn select_absent_changes_nothing() {
    let mut store = store_with(2);
    let id = store.items()[0].id.clone();
    store.select(&id);
    assert!(!store.select(&ItemId::new("item-99")));
    assert_eq!(store.selected().unwrap().id, id);
}

#[test]
fn select_does_not_restack() {
    let mut store = store_with(3);
    let id = store.items()[0].id.clone();
    store.select(&id);
    assert_eq!(store.get(&id).unwrap().z_index, 1);
}

#[test]
fn deselect_all_clears_selection() {
    let mut store = store_with(3);
    let id = store.items()[2].id.clone();
    store.select(&id);
    store.deselect_all();
    assert_eq!(selected_count(&store), 0);
    assert!(store.selected().is_none());
}

// =============================================================
// ItemStore: update_position
// =============================================================

#[test]
fn update_position_clamps() {
    let mut store = store_with(1);
    let id = store.items()[0].id.clone();
    let bounds = Bounds::new(Some(Viewport::new(400.0, 400.0)), 100.0);
    assert!(store.update_position(&id, Point::new(1000.0, -20.0), &bounds));
    assert_eq!(store.get(&id).unwrap().position(), Point::new(300.0, 0.0));
}

#[test]
fn update_position_absent_returns_false() {
    let mut store = store_with(1);
    let bounds = Bounds::new(None, 100.0);
    assert!(!store.update_position(&ItemId::new("item-9"), Point::new(1.0, 1.0), &bounds));
}

// =============================================================
// ItemStore: hydrate
// =============================================================

#[test]
fn hydrate_replaces_items_and_reseeds() {
    let mut store = store_with(2);
    store.hydrate(vec![
        make_item("item-0", ItemKind::Text, 1),
        make_item("item-1", ItemKind::Image, 2),
        make_item("item-5", ItemKind::Text, 3),
    ]);
    assert_eq!(store.len(), 3);
    let id = store.add(ItemKind::Text, "next", Point::default()).id.clone();
    assert_eq!(id.as_str(), "item-6");
}

#[test]
fn hydrate_keeps_order_and_z() {
    let mut store = ItemStore::new();
    store.hydrate(vec![make_item("item-3", ItemKind::Text, 9), make_item("item-1", ItemKind::Text, 4)]);
    let got: Vec<(&str, i64)> = store.items().iter().map(|item| (item.id.as_str(), item.z_index)).collect();
    assert_eq!(got, vec![("item-3", 9), ("item-1", 4)]);
}

#[test]
fn hydrate_keeps_only_first_selection() {
    let mut a = make_item("item-0", ItemKind::Text, 1);
    let mut b = make_item("item-1", ItemKind::Text, 2);
    a.selected = true;
    b.selected = true;
    let mut store = ItemStore::new();
    store.hydrate(vec![a, b]);
    assert_eq!(selected_count(&store), 1);
    assert_eq!(store.selected().unwrap().id.as_str(), "item-0");
}

#[test]
fn hydrate_drops_duplicate_ids() {
    let mut store = ItemStore::new();
    store.hydrate(vec![make_item("item-0", ItemKind::Text, 1), make_item("item-0", ItemKind::Image, 2)]);
    assert_eq!(store.len(), 1);
    assert_eq!(store.items()[0].kind, ItemKind::Text);
}

#[test]
fn hydrate_floors_negative_positions() {
    let mut item = make_item("item-0", ItemKind::Text, 1);
    item.x = -12.0;
    let mut store = ItemStore::new();
    store.hydrate(vec![item]);
    assert_eq!(store.items()[0].position(), Point::new(0.0, 20.0));
}

#[test]
fn add_after_counter_wrap_skips_ids_in_use() {
    let mut store = ItemStore::new();
    store.hydrate(vec![
        make_item("item-18446744073709551614", ItemKind::Text, 1),
        make_item("item-0", ItemKind::Text, 2),
    ]);
    let a = store.add(ItemKind::Text, "a", Point::default()).id.clone();
    let b = store.add(ItemKind::Text, "b", Point::default()).id.clone();
    assert_eq!(a.as_str(), "item-18446744073709551615");
    assert_eq!(b.as_str(), "item-1");
    let ids: HashSet<_> = store.items().iter().map(|item| item.id.clone()).collect();
    assert_eq!(ids.len(), 4);
}
