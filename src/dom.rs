//! DOM adapter: applies a [`Scene`] to the live canvas element.
//!
//! This module is the only place that builds or styles item elements. It
//! clears the canvas area and rebuilds every item from the scene, tagging
//! each element with `data-item-id` and each control with
//! `data-affordance` so that delegated listeners in `app` can resolve
//! events back to items without per-element closures.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Node};

use crate::doc::{ItemId, ItemKind};
use crate::geom::Viewport;
use crate::input::ClickTarget;
use crate::render::{Affordance, Cursor, ItemView, Scene};

const ITEM_ATTR: &str = "data-item-id";
const AFFORDANCE_ATTR: &str = "data-affordance";
const ITEM_TRANSITION: &str = "transform 0.1s ease-out";
const IMAGE_WIDTH: &str = "150px";
const TEXT_FONT_SIZE: &str = "24px";
const TEXT_PADDING: &str = "10px";

/// The canvas area and the document it lives in.
pub struct Surface {
    document: Document,
    area: HtmlElement,
}

impl Surface {
    /// Find the canvas area by element id.
    ///
    /// # Errors
    ///
    /// Returns `Err` if there is no document or no such element.
    pub fn attach(area_id: &str) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let area = document
            .get_element_by_id(area_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {area_id}")))?
            .dyn_into::<HtmlElement>()
            .map_err(JsValue::from)?;
        Ok(Self { document, area })
    }

    #[must_use]
    pub fn area(&self) -> &HtmlElement {
        &self.area
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Current on-screen size of the canvas area.
    #[must_use]
    pub fn measure(&self) -> Viewport {
        let rect = self.area.get_bounding_client_rect();
        Viewport::new(rect.width(), rect.height())
    }

    /// Replace the area's contents with `scene`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if element creation or styling fails.
    pub fn apply(&self, scene: &Scene) -> Result<(), JsValue> {
        self.area.set_inner_html("");
        for view in &scene.items {
            let el = self.build_item(view)?;
            self.area.append_child(&el)?;
        }
        self.set_body_cursor(scene.cursor)
    }

    /// Set the page-wide cursor.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the style cannot be set.
    pub fn set_body_cursor(&self, cursor: Cursor) -> Result<(), JsValue> {
        match self.document.body() {
            Some(body) => body.style().set_property("cursor", cursor.as_css()),
            None => Ok(()),
        }
    }

    /// Resolve a click target to what the engine should act on.
    ///
    /// Returns `None` for clicks inside the area that hit neither an item nor
    /// the bare background (e.g. foreign overlays).
    #[must_use]
    pub fn resolve_click(&self, target: &Element) -> Option<ClickTarget> {
        let area: &Node = self.area.as_ref();
        if target.is_same_node(Some(area)) {
            return Some(ClickTarget::Background);
        }
        if let Some(id) = self.item_id_of_control(target, Affordance::Delete) {
            return Some(ClickTarget::Delete(id));
        }
        self.item_id_of(target).map(ClickTarget::Item)
    }

    /// The item a press landed on, unless it landed on the delete control.
    #[must_use]
    pub fn resolve_press(&self, target: &Element) -> Option<ItemId> {
        if self.item_id_of_control(target, Affordance::Delete).is_some() {
            return None;
        }
        self.item_id_of(target)
    }

    fn item_id_of(&self, target: &Element) -> Option<ItemId> {
        let selector = format!("[{ITEM_ATTR}]");
        match target.closest(&selector) {
            Ok(Some(el)) => {
                // Stale items outside the area don't count.
                let node: &Node = el.as_ref();
                if self.area.contains(Some(node)) { el.get_attribute(ITEM_ATTR).map(ItemId::new) } else { None }
            }
            Ok(None) => None,
            Err(e) => {
                log::debug!("item lookup failed: {e:?}");
                None
            }
        }
    }

    fn item_id_of_control(&self, target: &Element, affordance: Affordance) -> Option<ItemId> {
        let selector = format!("[{AFFORDANCE_ATTR}=\"{}\"]", affordance.as_attr());
        match target.closest(&selector) {
            Ok(Some(control)) => self.item_id_of(&control),
            Ok(None) => None,
            Err(e) => {
                log::debug!("control lookup failed: {e:?}");
                None
            }
        }
    }

    fn build_item(&self, view: &ItemView) -> Result<Element, JsValue> {
        let el = self.create_html("div")?;
        el.set_id(view.id.as_str());
        el.set_attribute(ITEM_ATTR, view.id.as_str())?;
        el.set_attribute(AFFORDANCE_ATTR, Affordance::BeginDrag.as_attr())?;

        let style = el.style();
        style.set_property("position", "absolute")?;
        style.set_property("z-index", &view.z_index.to_string())?;
        style.set_property("will-change", "transform")?;
        Self::style_item(&el, view)?;

        let body = match view.kind {
            ItemKind::Image => {
                let wrap = self.create_html("div")?;
                let img = self.create_html("img")?;
                img.set_attribute("src", &view.content)?;
                img.style().set_property("width", IMAGE_WIDTH)?;
                img.style().set_property("height", "auto")?;
                wrap.append_child(&img)?;
                wrap
            }
            ItemKind::Text => {
                let text = self.create_html("div")?;
                text.style().set_property("font-size", TEXT_FONT_SIZE)?;
                text.style().set_property("padding", TEXT_PADDING)?;
                text.set_text_content(Some(view.content.as_str()));
                text
            }
        };
        el.append_child(&body)?;

        if view.offers(Affordance::Delete) {
            let delete_button = self.build_delete_button()?;
            el.append_child(&delete_button)?;
        }
        Ok(el.into())
    }

    /// Patch an existing item element's position and drag styling in place.
    ///
    /// Leaves the element, and any press or click in flight on it, attached.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the style cannot be set.
    pub fn restyle(&self, view: &ItemView) -> Result<(), JsValue> {
        let Some(el) = self.document.get_element_by_id(view.id.as_str()) else {
            log::debug!("no element for item {} to restyle", view.id);
            return Ok(());
        };
        match el.dyn_into::<HtmlElement>() {
            Ok(el) => Self::style_item(&el, view),
            Err(_) => {
                log::debug!("element for item {} is not an HTML element", view.id);
                Ok(())
            }
        }
    }

    /// The parts of an item's look that change during a gesture.
    fn style_item(el: &HtmlElement, view: &ItemView) -> Result<(), JsValue> {
        el.set_class_name(if view.selected { "item selected" } else { "item" });
        let style = el.style();
        style.set_property("transform", &view.transform())?;
        style.set_property("transition", if view.dragging { "none" } else { ITEM_TRANSITION })?;
        style.set_property("cursor", view.cursor.as_css())
    }

    fn build_delete_button(&self) -> Result<HtmlElement, JsValue> {
        let button = self.create_html("button")?;
        button.set_class_name("btn btn-sm btn-danger");
        button.set_attribute(AFFORDANCE_ATTR, Affordance::Delete.as_attr())?;
        button.set_text_content(Some("\u{d7}"));
        let style = button.style();
        style.set_property("position", "absolute")?;
        style.set_property("right", "-10px")?;
        style.set_property("top", "-10px")?;
        Ok(button)
    }

    fn create_html(&self, tag: &str) -> Result<HtmlElement, JsValue> {
        self.document.create_element(tag)?.dyn_into::<HtmlElement>().map_err(JsValue::from)
    }
}
