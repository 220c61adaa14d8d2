#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// A point in canvas pixel space (CSS pixels, origin at the canvas top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// Measured size of the canvas surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Build a viewport, treating non-finite or negative extents as zero.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width: sanitize(width), height: sanitize(height) }
    }
}

/// The region an item's top-left corner may occupy.
///
/// Each axis spans `[0, extent - footprint]`. With no viewport measured yet
/// only the lower bound applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub viewport: Option<Viewport>,
    pub footprint: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(viewport: Option<Viewport>, footprint: f64) -> Self {
        Self { viewport, footprint: sanitize(footprint) }
    }

    /// Force `candidate` into the allowed region. Never rejects.
    #[must_use]
    pub fn clamp(&self, candidate: Point) -> Point {
        match self.viewport {
            Some(vp) => Point {
                x: clamp_axis(candidate.x, Some(vp.width - self.footprint)),
                y: clamp_axis(candidate.y, Some(vp.height - self.footprint)),
            },
            None => Point { x: clamp_axis(candidate.x, None), y: clamp_axis(candidate.y, None) },
        }
    }
}

fn clamp_axis(value: f64, max: Option<f64>) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let value = value.max(0.0);
    match max {
        // A viewport smaller than the footprint pins the item to the origin.
        Some(max) => value.min(sanitize(max)),
        None => value,
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
