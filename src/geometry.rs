//! Screen-space geometry
//!
//! All coordinates are CSS pixels relative to the viewport's top-left corner,
//! y pointing down.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::clamp_axis;

/// An axis-aligned on-screen box (as returned by `getBoundingClientRect`)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.left, self.top)
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        self.origin() + self.size() / 2.0
    }

    /// Same size, new top-left corner
    pub fn moved_to(&self, origin: DVec2) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }
}

/// Visible viewport size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Combine per-axis reads, filling any missing axis from `fallback`.
    ///
    /// Returns `Err` with the patched viewport when a fallback was used.
    pub fn from_reads(
        width: Option<f64>,
        height: Option<f64>,
        fallback: impl FnOnce() -> Viewport,
    ) -> Result<Self, Self> {
        match (width, height) {
            (Some(width), Some(height)) => Ok(Self::new(width, height)),
            _ => {
                let fallback = fallback();
                Err(Self::new(
                    width.unwrap_or(fallback.width),
                    height.unwrap_or(fallback.height),
                ))
            }
        }
    }
}

/// Allowed range for a control's top-left corner
///
/// `min` is always `(padding, padding)`. If the viewport cannot hold the control
/// plus padding, `max` ends up below `min` and clamping resolves to `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub fn new(viewport: Viewport, size: DVec2, padding: f64) -> Self {
        Self {
            min: DVec2::splat(padding),
            max: DVec2::new(
                viewport.width - size.x - padding,
                viewport.height - size.y - padding,
            ),
        }
    }

    pub fn clamp(&self, point: DVec2) -> DVec2 {
        DVec2::new(
            clamp_axis(point.x, self.min.x, self.max.x),
            clamp_axis(point.y, self.min.y, self.max.y),
        )
    }

    /// Whether `point` lies inside the range (inclusive)
    pub fn contains(&self, point: DVec2) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    /// Linear interpolation inside the range, `t` in [0, 1] per axis
    pub fn lerp(&self, t: DVec2) -> DVec2 {
        self.min + (self.max - self.min) * t
    }
}

/// Geometry read fresh from the page for a single decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub decline: Rect,
    pub viewport: Viewport,
}
