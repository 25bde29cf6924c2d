//! Dodge placement
//!
//! Pure functions: given the pointer, a geometry snapshot and the random
//! draws, decide where Decline goes next.

use glam::DVec2;

use crate::config::Config;
use crate::geometry::{Bounds, Rect, Snapshot, Viewport};

/// Where a dodge lands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// New top-left corner (viewport coordinates)
    pub position: DVec2,
    /// The escape vector was pinned against an edge and the diagonal fallback was used
    pub cornered: bool,
}

/// Whether the pointer is close enough to the Decline center to trigger a dodge
#[inline]
pub fn within_reach(pointer: DVec2, decline: Rect, threshold: f64) -> bool {
    pointer.distance(decline.center()) < threshold
}

/// Move Decline away from the pointer.
///
/// The escape direction points from the pointer to the Decline center,
/// rotated by `jitter` radians. The resulting top-left corner is clamped into
/// the padded viewport; if clamping leaves the control within
/// `config.cornered_distance()` of the pointer, it jumps to the quadrant
/// diagonally opposite the pointer instead.
pub fn escape_placement(pointer: DVec2, snapshot: &Snapshot, jitter: f64, config: &Config) -> Placement {
    let rect = snapshot.decline;
    let half = rect.size() / 2.0;
    let center = rect.center();

    let away = center - pointer;
    let angle = away.y.atan2(away.x) + jitter;
    let candidate = center + DVec2::from_angle(angle) * config.dodge_distance - half;

    let bounds = Bounds::new(snapshot.viewport, rect.size(), config.screen_padding);
    let clamped = bounds.clamp(candidate);

    if (clamped + half).distance(pointer) < config.cornered_distance() {
        Placement {
            position: diagonal_fallback(pointer, snapshot.viewport, &bounds),
            cornered: true,
        }
    } else {
        Placement {
            position: clamped,
            cornered: false,
        }
    }
}

/// Corner of `bounds` in the quadrant diagonally opposite the pointer
pub fn diagonal_fallback(pointer: DVec2, viewport: Viewport, bounds: &Bounds) -> DVec2 {
    let mid = viewport.center();
    DVec2::new(
        if pointer.x < mid.x { bounds.max.x } else { bounds.min.x },
        if pointer.y < mid.y { bounds.max.y } else { bounds.min.y },
    )
}

/// Touch jump: `t` (per-axis in [0, 1)) picks a spot inside the padded viewport
pub fn touch_placement(snapshot: &Snapshot, t: DVec2, padding: f64) -> DVec2 {
    Bounds::new(snapshot.viewport, snapshot.decline.size(), padding).lerp(t)
}
