//! Shared constants for the canvas crate.

// ── Persistence ─────────────────────────────────────────────────

/// `localStorage` key holding the serialized item list.
pub const STORAGE_KEY: &str = "mini-piktochart-canvas";

/// Prefix of every generated item id (`item-<n>`).
pub const ID_PREFIX: &str = "item";

// ── Geometry ────────────────────────────────────────────────────

/// Fixed item footprint in CSS pixels, subtracted from the viewport when clamping.
pub const ITEM_FOOTPRINT_PX: f64 = 100.0;

/// Where new text items land.
pub const TEXT_DROP_X: f64 = 300.0;
pub const TEXT_DROP_Y: f64 = 300.0;

/// Where new image items land.
pub const IMAGE_DROP_X: f64 = 50.0;
pub const IMAGE_DROP_Y: f64 = 50.0;

// ── Assets ──────────────────────────────────────────────────────

pub const ASSETS_URL: &str = "/images";
pub const UPLOAD_URL: &str = "/uploads";

/// Multipart field name the upload endpoint expects.
pub const UPLOAD_FIELD: &str = "upload";

/// File label shown when no upload is pending.
pub const CHOOSE_IMAGE_LABEL: &str = "Choose Image";
