//! Evasion controller
//!
//! Turns pointer samples and touches into dodge decisions. Owns the evasion
//! state and the seeded RNG; never touches the page itself.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::escape::{escape_placement, touch_placement, within_reach};
use super::state::{DodgeSource, EvasionState, PositionMode};
use crate::config::Config;
use crate::geometry::{Rect, Snapshot};

/// A dodge decision, to be applied to the page in field order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relocation {
    /// Set on the `Flow` -> `Fixed` transition: pin Decline here first
    pub pin_at: Option<DVec2>,
    /// New Decline top-left corner
    pub position: DVec2,
    pub accept_scale: f64,
    /// Evasion count after this dodge
    pub evasions: u64,
    pub cornered: bool,
    pub source: DodgeSource,
}

/// What to do with a click on Decline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickVerdict {
    /// Still in flow layout; let the click through
    Allow,
    /// Evasion has started; cancel the click and stop propagation
    Suppress,
}

pub struct EvasionController {
    config: Config,
    state: EvasionState,
    rng: Pcg32,
}

impl EvasionController {
    pub fn new(config: Config, seed: u64) -> Self {
        Self {
            config,
            state: EvasionState::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> &EvasionState {
        &self.state
    }

    /// Re-express the layout position of Decline as fixed coordinates.
    ///
    /// Returns the pin position on the first call only; later calls are no-ops.
    pub fn switch_to_fixed(&mut self, decline: Rect) -> Option<DVec2> {
        if self.state.is_fixed() {
            return None;
        }
        self.state.mode = PositionMode::Fixed;
        log::info!(
            "Decline switched to fixed positioning at ({:.1}, {:.1})",
            decline.left,
            decline.top
        );
        Some(decline.origin())
    }

    /// Handle one (coalesced) pointer sample. `None` when out of reach.
    pub fn on_pointer(&mut self, pointer: DVec2, snapshot: &Snapshot) -> Option<Relocation> {
        if !within_reach(pointer, snapshot.decline, self.config.dodge_threshold) {
            return None;
        }

        let pin_at = self.switch_to_fixed(snapshot.decline);
        let jitter = self.config.escape_jitter;
        let offset = if jitter > 0.0 {
            self.rng.random_range(-jitter..=jitter)
        } else {
            0.0
        };
        let placement = escape_placement(pointer, snapshot, offset, &self.config);

        Some(self.finish(pin_at, placement.position, placement.cornered, DodgeSource::Pointer))
    }

    /// Handle a touch on Decline: jump somewhere random inside the viewport
    pub fn on_touch(&mut self, snapshot: &Snapshot) -> Relocation {
        let pin_at = self.switch_to_fixed(snapshot.decline);
        let t = DVec2::new(self.rng.random::<f64>(), self.rng.random::<f64>());
        let position = touch_placement(snapshot, t, self.config.screen_padding);

        self.finish(pin_at, position, false, DodgeSource::Touch)
    }

    pub fn on_decline_click(&self) -> ClickVerdict {
        if self.state.is_fixed() {
            ClickVerdict::Suppress
        } else {
            ClickVerdict::Allow
        }
    }

    fn finish(&mut self, pin_at: Option<DVec2>, position: DVec2, cornered: bool, source: DodgeSource) -> Relocation {
        self.state
            .record_dodge(self.config.accept_scale_step, self.config.accept_scale_max);

        log::debug!(
            "dodge #{} ({:?}{}) -> ({:.1}, {:.1}), accept scale {:.2}",
            self.state.evasions,
            source,
            if cornered { ", cornered" } else { "" },
            position.x,
            position.y,
            self.state.accept_scale
        );

        Relocation {
            pin_at,
            position,
            accept_scale: self.state.accept_scale,
            evasions: self.state.evasions,
            cornered,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Bounds, Viewport};

    fn snapshot(left: f64, top: f64) -> Snapshot {
        Snapshot {
            decline: Rect::new(left, top, 40.0, 40.0),
            viewport: Viewport::new(1000.0, 800.0),
        }
    }

    #[test]
    fn test_far_pointer_does_nothing() {
        let mut controller = EvasionController::new(Config::default(), 1);
        assert!(controller.on_pointer(DVec2::new(10.0, 10.0), &snapshot(500.0, 400.0)).is_none());
        assert_eq!(controller.state().evasions, 0);
        assert_eq!(controller.state().mode, PositionMode::Flow);
        assert_eq!(controller.on_decline_click(), ClickVerdict::Allow);
    }

    #[test]
    fn test_first_dodge_scenario() {
        let config = Config::default();
        let mut controller = EvasionController::new(config.clone(), 42);
        let snap = snapshot(500.0, 400.0);
        let pointer = DVec2::new(490.0, 410.0);

        let relocation = controller.on_pointer(pointer, &snap).unwrap();

        assert_eq!(relocation.pin_at, Some(DVec2::new(500.0, 400.0)));
        assert_eq!(relocation.evasions, 1);
        assert!((relocation.accept_scale - 1.02).abs() < 1e-12);
        let landed = relocation.position + DVec2::splat(20.0);
        assert!(relocation.cornered || landed.distance(pointer) >= config.cornered_distance());
        assert_eq!(controller.on_decline_click(), ClickVerdict::Suppress);
    }

    #[test]
    fn test_pin_only_once() {
        let mut controller = EvasionController::new(Config::default(), 3);
        assert!(controller.switch_to_fixed(Rect::new(1.0, 2.0, 40.0, 40.0)).is_some());
        assert!(controller.switch_to_fixed(Rect::new(5.0, 6.0, 40.0, 40.0)).is_none());

        let relocation = controller.on_touch(&snapshot(500.0, 400.0));
        assert_eq!(relocation.pin_at, None);
    }

    #[test]
    fn test_touch_pins_and_counts() {
        let mut controller = EvasionController::new(Config::default(), 9);
        let snap = snapshot(500.0, 400.0);
        let relocation = controller.on_touch(&snap);

        assert_eq!(relocation.source, DodgeSource::Touch);
        assert_eq!(relocation.pin_at, Some(DVec2::new(500.0, 400.0)));
        assert_eq!(relocation.evasions, 1);
        assert!(controller.state().is_fixed());
        let bounds = Bounds::new(snap.viewport, snap.decline.size(), 20.0);
        assert!(bounds.contains(relocation.position));
    }

    #[test]
    fn test_counter_counts_both_sources() {
        let mut controller = EvasionController::new(Config::default(), 5);
        let mut snap = snapshot(500.0, 400.0);
        for n in 1..=20u64 {
            let relocation = if n % 2 == 0 {
                controller.on_touch(&snap)
            } else {
                let pointer = snap.decline.center() + DVec2::new(-5.0, 3.0);
                controller.on_pointer(pointer, &snap).unwrap()
            };
            assert_eq!(relocation.evasions, n);
            snap.decline = snap.decline.moved_to(relocation.position);
        }
        assert_eq!(controller.state().accept_scale, 1.3);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let run = |seed| {
            let mut controller = EvasionController::new(Config::default(), seed);
            let mut snap = snapshot(500.0, 400.0);
            let mut path = Vec::new();
            for _ in 0..10 {
                let pointer = snap.decline.center() + DVec2::new(10.0, -4.0);
                let relocation = controller.on_pointer(pointer, &snap).unwrap();
                snap.decline = snap.decline.moved_to(relocation.position);
                path.push(relocation.position);
            }
            path
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_widest_valid_jitter_still_dodges() {
        let config = Config {
            escape_jitter: std::f64::consts::PI,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        let mut controller = EvasionController::new(config, 8);
        let snap = snapshot(500.0, 400.0);
        for _ in 0..50 {
            let relocation = controller.on_pointer(DVec2::new(510.0, 410.0), &snap).unwrap();
            let bounds = Bounds::new(snap.viewport, snap.decline.size(), 20.0);
            assert!(bounds.contains(relocation.position));
        }
    }

    #[test]
    fn test_zero_jitter_is_deterministic_without_rng() {
        let config = Config {
            escape_jitter: 0.0,
            ..Config::default()
        };
        let mut controller = EvasionController::new(config, 0);
        let relocation = controller
            .on_pointer(DVec2::new(490.0, 420.0), &snapshot(500.0, 400.0))
            .unwrap();
        assert!((relocation.position - DVec2::new(560.0, 400.0)).length() < 1e-9);
    }
}
