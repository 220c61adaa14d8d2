//! Rendering: projects store state into a scene description.
//!
//! This module is pure. It reads the item list and the drag state and
//! produces a [`Scene`] that says what each item looks like and which
//! interactions it offers. It holds no state of its own, so projecting the
//! same store twice yields equal scenes. Applying a scene to a live surface
//! is the DOM adapter's job (`dom`, browser builds only).
//!
//! A delete control is only ever produced for the selected item; there is no
//! way to obtain one for an unselected item from a scene.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::doc::{CanvasItem, ItemId, ItemKind};
use crate::input::DragState;

/// An interaction a projected item offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Click selects the item.
    Select,
    /// Press starts dragging the item.
    BeginDrag,
    /// A delete control that removes the item.
    Delete,
}

impl Affordance {
    /// Value of the `data-affordance` attribute on the control's element.
    #[must_use]
    pub fn as_attr(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::BeginDrag => "drag",
            Self::Delete => "delete",
        }
    }
}

/// Pointer cursor hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Move,
    Grabbing,
}

impl Cursor {
    /// CSS `cursor` value.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Move => "move",
            Self::Grabbing => "grabbing",
        }
    }
}

/// One positioned, stacked item on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: ItemId,
    pub kind: ItemKind,
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub z_index: i64,
    pub selected: bool,
    /// True while this item follows the pointer; the adapter disables transitions.
    pub dragging: bool,
    pub cursor: Cursor,
    pub affordances: Vec<Affordance>,
}

impl ItemView {
    #[must_use]
    pub fn offers(&self, affordance: Affordance) -> bool {
        self.affordances.contains(&affordance)
    }

    /// CSS `transform` placing the item at its position.
    #[must_use]
    pub fn transform(&self) -> String {
        format!("translate({}px, {}px)", self.x, self.y)
    }
}

/// Full description of the canvas surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Items in insertion order; paint order comes from `z_index`.
    pub items: Vec<ItemView>,
    /// Cursor for the page body.
    pub cursor: Cursor,
}

impl Scene {
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&ItemView> {
        self.items.iter().find(|view| &view.id == id)
    }
}

/// Project every item. Replaces, never patches, the previous scene.
#[must_use]
pub fn render_all(items: &[CanvasItem], drag: &DragState) -> Scene {
    let dragging = drag.target();
    Scene {
        items: items.iter().map(|item| project(item, dragging == Some(&item.id))).collect(),
        cursor: if dragging.is_some() { Cursor::Grabbing } else { Cursor::Default },
    }
}

fn project(item: &CanvasItem, dragging: bool) -> ItemView {
    let mut affordances = vec![Affordance::Select, Affordance::BeginDrag];
    if item.selected {
        affordances.push(Affordance::Delete);
    }
    ItemView {
        id: item.id.clone(),
        kind: item.kind,
        content: item.content.clone(),
        x: item.x,
        y: item.y,
        z_index: item.z_index,
        selected: item.selected,
        dragging,
        cursor: if dragging { Cursor::Grabbing } else { Cursor::Move },
        affordances,
    }
}
