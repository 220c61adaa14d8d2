//! The canvas engine: selection and drag controllers over one owned state.
//!
//! ARCHITECTURE
//! ============
//! [`EngineCore`] holds all the mutable canvas state: the item store (with
//! its id counter), the drag gesture, the pending-frame slot, and the last
//! measured viewport. The host owns it and passes events in. It has no
//! browser dependencies and is tested natively. [`Engine`] (browser builds)
//! pairs a core backed by `localStorage` with the DOM surface it paints.
//!
//! WRITE-THROUGH
//! =============
//! Every committed mutation (add, remove, select, deselect, drag release)
//! saves the full item list exactly once before returning. Position updates
//! inside a drag only touch memory; the release commits them.
//!
//! GESTURES
//! ========
//! Press, frame, and release only restyle the dragged item
//! ([`Action::ItemRestyled`]); the surface is rebuilt only when the store's
//! content or selection changed. A press on an item claims the click that
//! ends the same gesture, so a click the browser retargets to the canvas
//! background after a rebuild or a drag never deselects the pressed item.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::config::CanvasConfig;
use crate::doc::{CanvasItem, ItemId, ItemKind, ItemStore};
use crate::geom::{Bounds, Point, Viewport};
use crate::input::{ClickTarget, DragState, FrameSlot};
use crate::persist::{KeyValueStore, PersistenceGateway};
use crate::render::{self, Cursor, Scene};

/// Actions returned from event handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ItemAdded(ItemId),
    ItemRemoved(ItemId),
    /// The scene changed; project and repaint.
    RenderNeeded,
    /// Only this item's position or drag styling changed; patch it in place.
    ItemRestyled(ItemId),
    /// A pointer sample is pending; schedule one frame callback.
    RequestFrame,
    SetCursor(Cursor),
}

/// Core engine state: everything that doesn't depend on the DOM.
pub struct EngineCore<S> {
    store: ItemStore,
    drag: DragState,
    frame: FrameSlot<Point>,
    /// Item the current gesture was pressed on; consumed by the next click.
    pressed: Option<ItemId>,
    viewport: Option<Viewport>,
    config: CanvasConfig,
    persistence: PersistenceGateway<S>,
}

impl<S: KeyValueStore> EngineCore<S> {
    /// Create an empty engine writing through to `backend`.
    pub fn new(config: CanvasConfig, backend: S) -> Self {
        let persistence = PersistenceGateway::new(config.storage_key.clone(), backend);
        Self {
            store: ItemStore::new(),
            drag: DragState::Idle,
            frame: FrameSlot::new(),
            pressed: None,
            viewport: None,
            config,
            persistence,
        }
    }

    // --- Data inputs ---

    /// Load the stored canvas. Unreadable data is logged and replaced by an
    /// empty canvas; startup never fails.
    pub fn hydrate(&mut self) -> Vec<Action> {
        match self.persistence.load() {
            Ok(items) => {
                log::info!("restored {} canvas items", items.len());
                self.store.hydrate(items);
            }
            Err(e) => {
                log::error!("error loading canvas from storage: {e}");
                self.store.hydrate(Vec::new());
            }
        }
        self.drag = DragState::Idle;
        self.frame.clear();
        self.pressed = None;
        vec![Action::RenderNeeded]
    }

    /// Record the canvas surface size used for clamping.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Some(Viewport::new(width, height));
    }

    // --- Item commands ---

    /// Add a text item. Surrounding whitespace is trimmed; blank text adds nothing.
    pub fn add_text(&mut self, content: &str) -> Vec<Action> {
        let text = content.trim();
        if text.is_empty() {
            return Vec::new();
        }
        let at = self.config.text_drop;
        self.add(ItemKind::Text, text, at)
    }

    /// Add an image item showing `locator`.
    pub fn add_image(&mut self, locator: &str) -> Vec<Action> {
        let at = self.config.image_drop;
        self.add(ItemKind::Image, locator, at)
    }

    fn add(&mut self, kind: ItemKind, content: &str, at: Point) -> Vec<Action> {
        let at = self.bounds().clamp(at);
        let id = self.store.add(kind, content, at).id.clone();
        log::debug!("added {kind:?} item {id}");
        self.commit();
        vec![Action::ItemAdded(id), Action::RenderNeeded]
    }

    /// Remove an item. Absent ids are a silent no-op.
    pub fn remove(&mut self, id: &ItemId) -> Vec<Action> {
        if self.store.remove(id).is_none() {
            log::debug!("remove of unknown item {id} ignored");
            return Vec::new();
        }
        self.commit();
        vec![Action::ItemRemoved(id.clone()), Action::RenderNeeded]
    }

    /// Remove the selected item, if there is one.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        match self.store.selected().map(|item| item.id.clone()) {
            Some(id) => self.remove(&id),
            None => Vec::new(),
        }
    }

    // --- Selection controller ---

    /// Make `id` the only selected item.
    pub fn select(&mut self, id: &ItemId) -> Vec<Action> {
        if !self.store.select(id) {
            return Vec::new();
        }
        self.commit();
        vec![Action::RenderNeeded]
    }

    pub fn deselect_all(&mut self) -> Vec<Action> {
        self.store.deselect_all();
        self.commit();
        vec![Action::RenderNeeded]
    }

    /// Route a resolved click. Item clicks select and never reach the
    /// background handler; a delete click only acts on the selected item.
    /// A background click that ends a gesture pressed on an item is ignored.
    pub fn on_click(&mut self, target: &ClickTarget) -> Vec<Action> {
        let pressed = self.pressed.take();
        match target {
            ClickTarget::Background => match pressed {
                Some(id) => {
                    log::debug!("click ending the press on {id} kept off the background");
                    Vec::new()
                }
                None => self.deselect_all(),
            },
            ClickTarget::Item(id) => self.select(id),
            ClickTarget::Delete(id) => {
                if self.store.get(id).is_some_and(|item| item.selected) {
                    self.remove(id)
                } else {
                    log::debug!("delete on unselected item {id} ignored");
                    Vec::new()
                }
            }
        }
    }

    // --- Drag controller ---

    /// Press on an item: select it if needed and start following the pointer.
    pub fn on_pointer_down(&mut self, id: &ItemId, pointer: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.drag.is_dragging() {
            actions.extend(self.on_pointer_up());
        }
        self.pressed = None;
        let Some(item) = self.store.get(id) else {
            return actions;
        };
        let offset = pointer - item.position();
        if !item.selected {
            actions.extend(self.select(id));
        }
        self.drag = DragState::Dragging { id: id.clone(), offset };
        self.frame.clear();
        self.pressed = Some(id.clone());
        actions.push(Action::SetCursor(Cursor::Grabbing));
        actions.push(Action::ItemRestyled(id.clone()));
        actions
    }

    /// Press that landed on no item: the click that follows belongs to the background.
    pub fn on_background_press(&mut self) -> Vec<Action> {
        self.pressed = None;
        Vec::new()
    }

    /// Queue a pointer sample. At most one frame is requested per pending slot;
    /// newer samples replace the queued one.
    pub fn on_pointer_move(&mut self, pointer: Point) -> Vec<Action> {
        let DragState::Dragging { id, offset } = &self.drag else {
            return Vec::new();
        };
        if self.store.get(id).is_none() {
            log::debug!("dropping move sample for removed item {id}");
            return Vec::new();
        }
        if self.frame.offer(pointer - *offset) {
            vec![Action::RequestFrame]
        } else {
            Vec::new()
        }
    }

    /// Frame callback: apply the latest pending sample, clamped to the viewport.
    pub fn on_frame(&mut self) -> Vec<Action> {
        let Some(candidate) = self.frame.take() else {
            return Vec::new();
        };
        let bounds = self.bounds();
        let DragState::Dragging { id, .. } = &self.drag else {
            return Vec::new();
        };
        if self.store.update_position(id, candidate, &bounds) {
            vec![Action::ItemRestyled(id.clone())]
        } else {
            log::debug!("dropping frame update for removed item {id}");
            Vec::new()
        }
    }

    /// Release: keep the last applied position and commit it once.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let DragState::Dragging { id, .. } = std::mem::take(&mut self.drag) else {
            return Vec::new();
        };
        self.frame.clear();
        log::debug!("drag of {id} released");
        self.commit();
        let mut actions = vec![Action::SetCursor(Cursor::Default)];
        if self.store.get(&id).is_some() {
            actions.push(Action::ItemRestyled(id));
        }
        actions
    }

    // --- Queries ---

    /// Project the current state for painting.
    #[must_use]
    pub fn scene(&self) -> Scene {
        render::render_all(self.store.items(), &self.drag)
    }

    #[must_use]
    pub fn items(&self) -> &[CanvasItem] {
        self.store.items()
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&CanvasItem> {
        self.store.get(id)
    }

    /// The currently selected item, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&ItemId> {
        self.store.selected().map(|item| &item.id)
    }

    #[must_use]
    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.frame.is_pending()
    }

    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    #[must_use]
    pub fn persistence(&self) -> &PersistenceGateway<S> {
        &self.persistence
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.viewport, self.config.item_footprint)
    }

    /// Write the store through. A failed write is logged; memory stays authoritative.
    fn commit(&mut self) {
        if let Err(e) = self.persistence.save(self.store.items()) {
            log::error!("error saving canvas to storage: {e}");
        }
    }
}

// =============================================================================
// BROWSER ENGINE
// =============================================================================

#[cfg(feature = "browser")]
pub use browser::Engine;

#[cfg(feature = "browser")]
mod browser {
    use wasm_bindgen::JsValue;

    use super::{Action, EngineCore};
    use crate::config::CanvasConfig;
    use crate::dom::Surface;
    use crate::persist::{LocalStorage, PersistError};

    /// The full engine: a `localStorage`-backed core and the surface it paints.
    pub struct Engine {
        surface: Surface,
        pub core: EngineCore<LocalStorage>,
    }

    impl Engine {
        /// Bind to the canvas element with id `area_id`.
        ///
        /// # Errors
        ///
        /// Returns `Err` if the element is missing or storage is unavailable.
        pub fn new(area_id: &str, config: CanvasConfig) -> Result<Self, JsValue> {
            let surface = Surface::attach(area_id)?;
            let storage = LocalStorage::open().map_err(|e: PersistError| JsValue::from_str(&e.to_string()))?;
            Ok(Self { surface, core: EngineCore::new(config, storage) })
        }

        #[must_use]
        pub fn surface(&self) -> &Surface {
            &self.surface
        }

        /// Re-measure the surface before a frame is applied.
        pub fn measure(&mut self) {
            let vp = self.surface.measure();
            self.core.set_viewport(vp.width, vp.height);
        }

        /// Carry out the painting side of `actions`. Returns `true` if a frame
        /// callback must be scheduled.
        ///
        /// # Errors
        ///
        /// Returns `Err` if a DOM call fails.
        pub fn apply(&self, actions: &[Action]) -> Result<bool, JsValue> {
            let mut wants_frame = false;
            let mut needs_render = false;
            let mut restyled = Vec::new();
            for action in actions {
                match action {
                    Action::RenderNeeded => needs_render = true,
                    Action::ItemRestyled(id) => restyled.push(id),
                    Action::RequestFrame => wants_frame = true,
                    Action::SetCursor(cursor) => self.surface.set_body_cursor(*cursor)?,
                    Action::ItemAdded(_) | Action::ItemRemoved(_) => {}
                }
            }
            if needs_render {
                self.render()?;
            } else if !restyled.is_empty() {
                let scene = self.core.scene();
                for view in restyled.into_iter().filter_map(|id| scene.get(id)) {
                    self.surface.restyle(view)?;
                }
            }
            Ok(wants_frame)
        }

        /// Repaint the whole surface from the current store.
        ///
        /// # Errors
        ///
        /// Returns `Err` if a DOM call fails.
        pub fn render(&self) -> Result<(), JsValue> {
            self.surface.apply(&self.core.scene())
        }
    }
}
