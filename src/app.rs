//! `wasm-bindgen` entry points: the page constructs a [`CanvasApp`] and calls it.
//!
//! SYSTEM CONTEXT
//! ==============
//! The app installs delegated listeners once: `click` and `mousedown` on the
//! canvas area, `mousemove` and `mouseup` on the document. Pointer moves are
//! coalesced through one `requestAnimationFrame` callback per pending sample
//! slot. Page controls (text input, asset list, upload form) stay in the
//! host's markup and call the exported methods below.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{Element, File, MouseEvent};

use crate::assets::{AssetPanel, PendingUpload, UploadOutcome};
use crate::config::CanvasConfig;
use crate::doc::ItemId;
use crate::engine::{Action, Engine};
use crate::geom::Point;
use crate::net;

type Shared<T> = Rc<RefCell<T>>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

fn init_logging(config: &CanvasConfig) {
    let (level, invalid) = match config.level() {
        Ok(level) => (level, None),
        Err(e) => (log::Level::Info, Some(e)),
    };
    if let Err(e) = console_log::init_with_level(level) {
        log::debug!("logger already installed: {e}");
    }
    if let Some(e) = invalid {
        log::warn!("{e}; logging at info");
    }
}

fn pointer(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

fn event_element(event: &MouseEvent) -> Option<Element> {
    event.target().and_then(|t| t.dyn_ref::<Element>().cloned())
}

/// Run an engine command and paint its effects.
fn dispatch(engine: &Shared<Engine>, command: impl FnOnce(&mut Engine) -> Vec<Action>) {
    let wants_frame = {
        let mut engine = engine.borrow_mut();
        let actions = command(&mut engine);
        match engine.apply(&actions) {
            Ok(wants_frame) => wants_frame,
            Err(e) => {
                log::error!("render failed: {e:?}");
                false
            }
        }
    };
    if wants_frame {
        request_frame(engine);
    }
}

/// Schedule one frame that measures the surface and applies the pending sample.
fn request_frame(engine: &Shared<Engine>) {
    let Some(window) = web_sys::window() else {
        dispatch(engine, |e| {
            e.measure();
            e.core.on_frame()
        });
        return;
    };

    let engine_for_cb = Rc::clone(engine);
    let holder: Shared<Option<Closure<dyn FnMut(f64)>>> = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        dispatch(&engine_for_cb, |e| {
            e.measure();
            e.core.on_frame()
        });
        holder_for_cb.borrow_mut().take();
    }) as Box<dyn FnMut(f64)>);

    match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
        Ok(_) => *holder.borrow_mut() = Some(cb),
        Err(e) => {
            log::warn!("requestAnimationFrame failed: {e:?}");
            dispatch(engine, |e| {
                e.measure();
                e.core.on_frame()
            });
        }
    }
}

fn listen(target: &web_sys::EventTarget, kind: &str, handler: impl FnMut(MouseEvent) + 'static) -> Result<(), JsValue> {
    let cb = Closure::<dyn FnMut(MouseEvent)>::new(handler);
    target.add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    cb.forget();
    Ok(())
}

#[wasm_bindgen]
pub struct CanvasApp {
    engine: Shared<Engine>,
    assets: Shared<AssetPanel<File>>,
    config: CanvasConfig,
}

#[wasm_bindgen]
impl CanvasApp {
    /// Bind to the element with id `area_id`, restore the stored canvas, and
    /// wire pointer handling. `config_json` is an optional partial config object.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element is missing or listeners cannot be installed.
    #[wasm_bindgen(constructor)]
    pub fn new(area_id: &str, config_json: Option<String>) -> Result<CanvasApp, JsValue> {
        let config = CanvasConfig::from_json_or_default(config_json.as_deref());
        init_logging(&config);

        let mut engine = Engine::new(area_id, config.clone())?;
        engine.measure();
        let hydrated = engine.core.hydrate();
        engine.apply(&hydrated)?;

        let app = CanvasApp {
            engine: Rc::new(RefCell::new(engine)),
            assets: Rc::new(RefCell::new(AssetPanel::new())),
            config,
        };
        app.wire()?;
        Ok(app)
    }

    #[wasm_bindgen(js_name = addText)]
    pub fn add_text(&self, content: &str) {
        dispatch(&self.engine, |e| e.core.add_text(content));
    }

    #[wasm_bindgen(js_name = addImage)]
    pub fn add_image(&self, locator: &str) {
        dispatch(&self.engine, |e| e.core.add_image(locator));
    }

    /// Add the asset at `index` in the current list as an image item.
    #[wasm_bindgen(js_name = addAsset)]
    pub fn add_asset(&self, index: usize) {
        let locator = self.assets.borrow().asset(index).map(str::to_owned);
        if let Some(locator) = locator {
            self.add_image(&locator);
        }
    }

    #[wasm_bindgen(js_name = deleteSelected)]
    pub fn delete_selected(&self) {
        dispatch(&self.engine, |e| e.core.delete_selected());
    }

    #[wasm_bindgen(js_name = beginDrag)]
    pub fn begin_drag(&self, id: &str, client_x: f64, client_y: f64) {
        let id = ItemId::new(id);
        dispatch(&self.engine, |e| e.core.on_pointer_down(&id, Point::new(client_x, client_y)));
    }

    #[wasm_bindgen(js_name = moveDrag)]
    pub fn move_drag(&self, client_x: f64, client_y: f64) {
        dispatch(&self.engine, |e| e.core.on_pointer_move(Point::new(client_x, client_y)));
    }

    #[wasm_bindgen(js_name = endDrag)]
    pub fn end_drag(&self) {
        dispatch(&self.engine, |e| e.core.on_pointer_up());
    }

    /// Current asset locators.
    pub fn assets(&self) -> Vec<String> {
        self.assets.borrow().assets().to_vec()
    }

    #[wasm_bindgen(js_name = fileLabel)]
    pub fn file_label(&self) -> String {
        self.assets.borrow().file_label().to_owned()
    }

    /// Record the file picked for upload (`None` clears it).
    #[wasm_bindgen(js_name = chooseFile)]
    pub fn choose_file(&self, file: Option<File>) {
        let choice = file.map(|file| PendingUpload { name: file.name(), file });
        self.assets.borrow_mut().choose_file(choice);
    }

    /// Re-fetch the asset list. Resolves to the new list; never rejects.
    #[wasm_bindgen(js_name = refreshAssets)]
    pub fn refresh_assets(&self) -> js_sys::Promise {
        let assets = Rc::clone(&self.assets);
        let url = self.config.assets_url.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            refresh(&assets, &url).await;
            Ok(to_js_array(assets.borrow().assets()))
        })
    }

    /// Upload the pending file, then refresh the list on success. Resolves to
    /// `true` if the upload was stored; never rejects.
    pub fn upload(&self) -> js_sys::Promise {
        let assets = Rc::clone(&self.assets);
        let config = self.config.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            let chosen = {
                let panel = assets.borrow();
                panel.pending().map(|p| (p.file.clone(), panel.choice()))
            };
            let Some((file, choice)) = chosen else {
                return Ok(JsValue::FALSE);
            };
            let result = net::upload_asset(&config.upload_url, &config.upload_field, &file).await;
            let outcome = assets.borrow_mut().apply_upload(choice, result);
            if outcome == UploadOutcome::Refresh {
                refresh(&assets, &config.assets_url).await;
            }
            Ok(JsValue::from_bool(outcome == UploadOutcome::Refresh))
        })
    }
}

impl CanvasApp {
    fn wire(&self) -> Result<(), JsValue> {
        let (area, document) = {
            let engine = self.engine.borrow();
            let surface = engine.surface();
            (surface.area().clone(), surface.document().clone())
        };

        let engine = Rc::clone(&self.engine);
        listen(&area, "click", move |event| {
            let Some(el) = event_element(&event) else {
                return;
            };
            let target = engine.borrow().surface().resolve_click(&el);
            if let Some(target) = target {
                event.stop_propagation();
                dispatch(&engine, |e| e.core.on_click(&target));
            }
        })?;

        let engine = Rc::clone(&self.engine);
        listen(&area, "mousedown", move |event| {
            let pressed = event_element(&event).and_then(|el| engine.borrow().surface().resolve_press(&el));
            match pressed {
                Some(id) => {
                    event.stop_propagation();
                    dispatch(&engine, |e| e.core.on_pointer_down(&id, pointer(&event)));
                }
                None => dispatch(&engine, |e| e.core.on_background_press()),
            }
        })?;

        let engine = Rc::clone(&self.engine);
        listen(&document, "mousemove", move |event| {
            if engine.borrow().core.drag().is_dragging() {
                dispatch(&engine, |e| e.core.on_pointer_move(pointer(&event)));
            }
        })?;

        let engine = Rc::clone(&self.engine);
        listen(&document, "mouseup", move |_event| {
            dispatch(&engine, |e| e.core.on_pointer_up());
        })?;

        Ok(())
    }
}

async fn refresh(assets: &Shared<AssetPanel<File>>, url: &str) {
    let result = net::list_assets(url).await;
    assets.borrow_mut().apply_listing(result);
}

fn to_js_array(items: &[String]) -> JsValue {
    items.iter().map(|s| JsValue::from_str(s)).collect::<js_sys::Array>().into()
}
