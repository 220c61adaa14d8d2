//! Document model: canvas items, their identifiers, and the in-memory store.
//!
//! This module defines what is on the canvas (`CanvasItem`, `ItemKind`), how
//! items are named (`ItemId`, `IdGenerator`), and the ordered collection that
//! owns them (`ItemStore`). The store is the single source of truth for
//! content, position, selection, and z-order. It never touches persistence;
//! the engine decides when a mutation is committed and written through.
//!
//! Insertion order is significant: it is the serialization order and the
//! default stacking order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::ID_PREFIX;
use crate::geom::{Bounds, Point};

/// Unique identifier for a canvas item, of the form `item-<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap an existing id string, e.g. one read back from the DOM.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn from_counter(n: u64) -> Self {
        Self(format!("{ID_PREFIX}-{n}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The counter value encoded after the first `-`.
    ///
    /// Only leading digits count; an id without a numeric suffix yields `0`.
    #[must_use]
    pub fn numeric_suffix(&self) -> u64 {
        let Some((_, rest)) = self.0.split_once('-') else {
            return 0;
        };
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        digits.parse::<u64>().unwrap_or(0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an item shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Literal text; `content` is the text itself.
    Text,
    /// An image; `content` is its URL.
    Image,
}

/// A placed item as stored in memory and in `localStorage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasItem {
    /// Stable for the item's lifetime and never reused.
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub content: String,
    /// Left offset in canvas pixels.
    pub x: f64,
    /// Top offset in canvas pixels.
    pub y: f64,
    /// Paint order, assigned once at creation. Higher paints on top.
    pub z_index: i64,
    pub selected: bool,
}

impl CanvasItem {
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Issues `item-<n>` ids from an increasing counter.
///
/// The counter wraps to `0` instead of saturating once `u64::MAX` is issued;
/// [`ItemStore::add`] skips any wrapped id that is still in use.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a fresh id and advance the counter.
    pub fn next_id(&mut self) -> ItemId {
        let id = ItemId::from_counter(self.next);
        self.next = self.next.checked_add(1).unwrap_or_else(|| {
            log::warn!("id counter exhausted at {id}; wrapping to 0");
            0
        });
        id
    }

    /// The counter value the next call to `next_id` will use.
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Move the counter past every suffix in `items`. Never moves it backwards.
    ///
    /// A suffix of `u64::MAX` has no successor and is left out of the scan.
    pub fn reseed(&mut self, items: &[CanvasItem]) {
        let mut exhausted = None;
        let next = items
            .iter()
            .filter_map(|item| {
                let successor = item.id.numeric_suffix().checked_add(1);
                if successor.is_none() {
                    exhausted = Some(&item.id);
                }
                successor
            })
            .max();
        if let Some(id) = exhausted {
            log::warn!("id {id} has no successor; not reseeding from it");
        }
        if let Some(next) = next {
            self.next = self.next.max(next);
        }
    }
}

/// Ordered, in-memory collection of canvas items.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<CanvasItem>,
    ids: IdGenerator,
}

impl ItemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all items with a loaded snapshot and reseed the id counter.
    ///
    /// Records that would break store invariants are repaired: later
    /// duplicates of an id are dropped, only the first selected item stays
    /// selected, and negative or non-finite coordinates snap to zero.
    pub fn hydrate(&mut self, items: Vec<CanvasItem>) {
        self.ids.reseed(&items);
        let floor = Bounds::new(None, 0.0);
        let mut seen = HashSet::new();
        let mut has_selection = false;
        self.items = Vec::with_capacity(items.len());
        for mut item in items {
            if !seen.insert(item.id.clone()) {
                log::warn!("dropping duplicate item id {}", item.id);
                continue;
            }
            if item.selected {
                item.selected = !has_selection;
                has_selection = true;
            }
            let p = floor.clamp(item.position());
            item.x = p.x;
            item.y = p.y;
            self.items.push(item);
        }
    }

    /// Append a new, unselected item at `position`.
    ///
    /// The z-index is the item count before insertion plus one. Ids already
    /// held by a loaded item are skipped.
    pub fn add(&mut self, kind: ItemKind, content: impl Into<String>, position: Point) -> &CanvasItem {
        let z_index = i64::try_from(self.items.len()).map_or(i64::MAX, |n| n.saturating_add(1));
        let id = loop {
            let id = self.ids.next_id();
            if self.get(&id).is_none() {
                break id;
            }
            log::warn!("id {id} is already taken; skipping");
        };
        let item = CanvasItem {
            id,
            kind,
            content: content.into(),
            x: position.x,
            y: position.y,
            z_index,
            selected: false,
        };
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    /// Remove an item by id, returning it if it was present.
    pub fn remove(&mut self, id: &ItemId) -> Option<CanvasItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Select `id` and deselect everything else. Returns `false` if `id` is absent,
    /// in which case nothing changes.
    pub fn select(&mut self, id: &ItemId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        for item in &mut self.items {
            item.selected = &item.id == id;
        }
        true
    }

    /// Clear the selection flag on every item.
    pub fn deselect_all(&mut self) {
        for item in &mut self.items {
            item.selected = false;
        }
    }

    /// Move an item to `candidate`, clamped into `bounds`. Returns `false` if
    /// the item no longer exists.
    pub fn update_position(&mut self, id: &ItemId, candidate: Point, bounds: &Bounds) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };
        let p = bounds.clamp(candidate);
        item.x = p.x;
        item.y = p.y;
        true
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&CanvasItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// The selected item, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&CanvasItem> {
        self.items.iter().find(|item| item.selected)
    }

    /// All items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CanvasItem] {
        &self.items
    }

    #[must_use]
    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
