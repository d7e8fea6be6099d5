//! Shared numeric constants for the resize controller.

// ── Bounds ──────────────────────────────────────────────────────

/// Smallest width or height, in CSS pixels, a resize can produce.
pub const MIN_SIZE_PX: f64 = 50.0;

/// Largest width or height, in CSS pixels, a resize can produce.
pub const MAX_SIZE_PX: f64 = 1200.0;

// ── Handle ──────────────────────────────────────────────────────

/// Edge length of the square resize handle, in CSS pixels.
pub const HANDLE_SIZE_PX: f64 = 16.0;

/// Fill color of the resize handle.
pub const HANDLE_FILL: &str = "#3b82f6";

/// Stacking order of the handle above editor content.
pub const HANDLE_Z_INDEX: &str = "1000";

// ── Fallback sizing ─────────────────────────────────────────────

/// Start width used when an element has neither an explicit nor a natural size.
pub const DEFAULT_WIDTH_PX: f64 = 300.0;

/// Start height used when an element has neither an explicit nor a natural size.
pub const DEFAULT_HEIGHT_PX: f64 = 200.0;

// ── Attributes ──────────────────────────────────────────────────

/// Node attribute holding the persisted width.
pub const ATTR_WIDTH: &str = "width";

/// Node attribute holding the persisted height.
pub const ATTR_HEIGHT: &str = "height";

/// Node attribute holding the media source URL.
pub const ATTR_SRC: &str = "src";
