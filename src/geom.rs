//! Geometry primitives and the pure resize math.
//!
//! Everything here is side-effect free: points and boxes come in as plain
//! values (already measured by a [`crate::host::Layout`]) and sizes go out
//! rounded to whole pixels, ready to be applied to an element or committed.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use crate::consts::{MAX_SIZE_PX, MIN_SIZE_PX};

/// A point in screen space (CSS pixels), or a screen-space delta.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - origin`.
    #[must_use]
    pub fn delta_from(self, origin: Point) -> Point {
        Point { x: self.x - origin.x, y: self.y - origin.y }
    }
}

/// A width/height pair in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions rounded to the nearest whole pixel.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self { width: self.width.round(), height: self.height.round() }
    }

    /// Whole-pixel dimensions for persisting into node attributes.
    ///
    /// Negative or NaN dimensions saturate to zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_pixels(self) -> (u32, u32) {
        (self.width.round() as u32, self.height.round() as u32)
    }

    /// Whether both dimensions are finite and strictly positive.
    #[must_use]
    pub fn is_usable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// An axis-aligned box in screen space, as reported by a bounding-box query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Inclusive lower/upper limit applied independently to each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self { min: MIN_SIZE_PX, max: MAX_SIZE_PX }
    }
}

impl Bounds {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        clamp(value, self.min, self.max)
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics; a NaN input collapses to `min`.
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Width-over-height ratio, or `1.0` when the height is not positive.
#[must_use]
pub fn aspect_ratio(size: Size) -> f64 {
    if size.height > 0.0 && size.width.is_finite() && size.height.is_finite() {
        size.width / size.height
    } else {
        1.0
    }
}

/// Compute the size produced by dragging the bottom-right corner by `delta`.
///
/// Each axis is clamped into `bounds` independently. With `aspect_lock`
/// set, width drives and height is re-derived from the given ratio (the
/// ratio captured when the drag started, never the live size) before being
/// clamped again. The result is rounded to whole pixels.
#[must_use]
pub fn resize(start: Size, delta: Point, aspect_lock: Option<f64>, bounds: Bounds) -> Size {
    let width = bounds.clamp(start.width + delta.x);
    let mut height = bounds.clamp(start.height + delta.y);

    if let Some(ratio) = aspect_lock.filter(|r| r.is_finite() && *r > 0.0) {
        height = bounds.clamp(width / ratio);
    }

    Size::new(width, height).rounded()
}
