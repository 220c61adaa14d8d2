//! Item state and drag engine for a browser-resident canvas editor.
//!
//! Users place text and image items onto a freeform surface, drag them
//! around, select and delete them, and the arrangement survives reloads via
//! `localStorage`. Everything that holds an invariant (unique ids, exclusive
//! selection, creation-time z-order, clamped positions, frame-coalesced drag
//! updates) lives in [`engine::EngineCore`] and compiles natively, so it is
//! tested without a browser. The `browser` feature adds the WebAssembly
//! shell: DOM adapter, asset requests, and `wasm-bindgen` entry points.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`]: selection and drag controllers over one owned state |
//! | [`doc`] | Canvas items, id generator, and the ordered item store |
//! | [`persist`] | Key-value backends and the persistence gateway |
//! | [`input`] | Click targets, drag state machine, and the pending-frame slot |
//! | [`render`] | Pure projection from store state to a [`render::Scene`] |
//! | [`assets`] | Asset list / upload panel state |
//! | [`geom`] | Points, viewport, and bounds clamping |
//! | [`config`] | Runtime settings with defaults |
//! | [`consts`] | Shared constants (storage key, footprint, drop positions) |

pub mod assets;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod input;
pub mod persist;
pub mod render;

#[cfg(feature = "browser")]
pub mod app;
#[cfg(feature = "browser")]
pub mod dom;
#[cfg(feature = "browser")]
pub mod net;
