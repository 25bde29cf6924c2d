//! Evasion state
//!
//! Everything the dodge logic remembers between events lives here.

use serde::{Deserialize, Serialize};

/// Snap distance so repeated float steps land exactly on the scale ceiling
const SCALE_EPSILON: f64 = 1e-9;

/// How the Decline control is positioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionMode {
    /// Placed by normal document layout
    #[default]
    Flow,
    /// Pinned to absolute viewport coordinates (after the first dodge)
    Fixed,
}

/// What triggered a dodge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DodgeSource {
    Pointer,
    Touch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvasionState {
    /// Successful dodges so far
    pub evasions: u64,
    /// Current Accept scale, in [1, max]
    pub accept_scale: f64,
    /// Decline positioning mode (one-way `Flow` -> `Fixed`)
    pub mode: PositionMode,
}

impl Default for EvasionState {
    fn default() -> Self {
        Self {
            evasions: 0,
            accept_scale: 1.0,
            mode: PositionMode::Flow,
        }
    }
}

impl EvasionState {
    pub fn is_fixed(&self) -> bool {
        self.mode == PositionMode::Fixed
    }

    /// Count a dodge and grow Accept by `step`, capped at `max`
    pub fn record_dodge(&mut self, step: f64, max: f64) {
        self.evasions += 1;
        self.accept_scale = grow_scale(self.accept_scale, step, max);
    }
}

/// `min(scale + step, max)`, snapping onto `max` when within float noise of it
pub fn grow_scale(scale: f64, step: f64, max: f64) -> f64 {
    let next = scale + step;
    if next >= max - SCALE_EPSILON { max } else { next }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = EvasionState::default();
        assert_eq!(state.evasions, 0);
        assert_eq!(state.accept_scale, 1.0);
        assert!(!state.is_fixed());
    }

    #[test]
    fn test_scale_hits_ceiling_exactly_after_fifteen_dodges() {
        let mut state = EvasionState::default();
        for n in 1..=14 {
            state.record_dodge(0.02, 1.3);
            assert!(state.accept_scale < 1.3, "dodge {n} reached the ceiling early");
        }
        state.record_dodge(0.02, 1.3);
        assert_eq!(state.accept_scale, 1.3);
        assert_eq!(state.evasions, 15);

        for _ in 0..10 {
            state.record_dodge(0.02, 1.3);
        }
        assert_eq!(state.accept_scale, 1.3);
        assert_eq!(state.evasions, 25);
    }

    #[test]
    fn test_first_dodge_scale() {
        assert!((grow_scale(1.0, 0.02, 1.3) - 1.02).abs() < 1e-12);
    }
}
