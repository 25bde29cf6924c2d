//! Accept sequence
//!
//! Clicking Accept hides the prompt, reveals the celebration view after a
//! short delay and rains a batch of confetti that is cleared after a fixed
//! lifetime. Runs at most once.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// PCG stream for confetti, kept apart from the dodge stream
const CONFETTI_STREAM: u64 = 0xc0ff_ee;

/// Confetti corner style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfettiShape {
    Round,
    Square,
}

impl ConfettiShape {
    /// CSS `border-radius` value
    pub fn border_radius(&self) -> &'static str {
        match self {
            ConfettiShape::Round => "50%",
            ConfettiShape::Square => "2px",
        }
    }
}

/// One decorative piece; the page animates it from its custom properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfettiPiece {
    /// Horizontal start offset (vw, 0-100)
    pub x_vw: f64,
    pub color: String,
    /// Edge length (px, 5-13)
    pub size_px: f64,
    /// Fall start delay (s, 0-2.5)
    pub delay_s: f64,
    /// Fall duration (s, 2.5-4.5)
    pub fall_duration_s: f64,
    /// Horizontal sway amplitude (px, -30..30)
    pub sway_px: f64,
    pub shape: ConfettiShape,
}

impl ConfettiPiece {
    pub fn random<R: Rng>(rng: &mut R, palette: &[String]) -> Self {
        let color = if palette.is_empty() {
            String::new()
        } else {
            palette[rng.random_range(0..palette.len())].clone()
        };
        Self {
            x_vw: rng.random::<f64>() * 100.0,
            color,
            size_px: rng.random::<f64>() * 8.0 + 5.0,
            delay_s: rng.random::<f64>() * 2.5,
            fall_duration_s: rng.random::<f64>() * 2.0 + 2.5,
            sway_px: rng.random::<f64>() * 60.0 - 30.0,
            shape: if rng.random_bool(0.5) {
                ConfettiShape::Round
            } else {
                ConfettiShape::Square
            },
        }
    }

    /// CSS custom properties consumed by the confetti stylesheet
    pub fn style_properties(&self) -> [(&'static str, String); 7] {
        [
            ("--x", format!("{}vw", self.x_vw)),
            ("--color", self.color.clone()),
            ("--size", format!("{}px", self.size_px)),
            ("--delay", format!("{}s", self.delay_s)),
            ("--fall-duration", format!("{}s", self.fall_duration_s)),
            ("--sway", format!("{}px", self.sway_px)),
            ("--shape", self.shape.border_radius().to_string()),
        ]
    }
}

/// Generate `count` independently randomized pieces
pub fn confetti_batch<R: Rng>(rng: &mut R, palette: &[String], count: usize) -> Vec<ConfettiPiece> {
    (0..count).map(|_| ConfettiPiece::random(rng, palette)).collect()
}

/// Deferred celebration steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    RevealCelebration,
    ClearConfetti,
}

/// Fire-once timer to schedule, delay measured from the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub timer: Timer,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CelebrationPhase {
    /// Accept not clicked yet
    #[default]
    Waiting,
    /// Prompt hidden, reveal timer running
    Pending,
    /// Celebration visible, confetti falling
    Celebrating,
    /// Confetti cleared
    Finished,
}

pub struct Celebration {
    phase: CelebrationPhase,
    delay_ms: u32,
    lifetime_ms: u32,
    count: usize,
    palette: Vec<String>,
    rng: Pcg32,
}

impl Celebration {
    pub fn new(config: &Config, seed: u64) -> Self {
        Self {
            phase: CelebrationPhase::Waiting,
            delay_ms: config.celebration_delay_ms,
            lifetime_ms: config.confetti_lifetime_ms,
            count: config.confetti_count,
            palette: config.confetti_palette.clone(),
            rng: Pcg32::new(seed, CONFETTI_STREAM),
        }
    }

    pub fn phase(&self) -> CelebrationPhase {
        self.phase
    }

    pub fn is_triggered(&self) -> bool {
        self.phase != CelebrationPhase::Waiting
    }

    /// Accept clicked. Returns the timers to start, or `None` if already triggered.
    pub fn trigger(&mut self) -> Option<[TimerRequest; 2]> {
        if self.is_triggered() {
            return None;
        }
        self.phase = CelebrationPhase::Pending;
        log::info!("Accepted! Celebration in {}ms", self.delay_ms);
        Some([
            TimerRequest {
                timer: Timer::RevealCelebration,
                delay_ms: self.delay_ms,
            },
            TimerRequest {
                timer: Timer::ClearConfetti,
                delay_ms: self.lifetime_ms,
            },
        ])
    }

    /// Reveal timer fired: the confetti batch to spawn
    pub fn reveal(&mut self) -> Option<Vec<ConfettiPiece>> {
        if self.phase != CelebrationPhase::Pending {
            return None;
        }
        self.phase = CelebrationPhase::Celebrating;
        Some(confetti_batch(&mut self.rng, &self.palette, self.count))
    }

    /// Cleanup timer fired. Returns `true` if confetti should be removed.
    pub fn finish(&mut self) -> bool {
        if self.phase != CelebrationPhase::Celebrating {
            return false;
        }
        self.phase = CelebrationPhase::Finished;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn palette() -> Vec<String> {
        Config::default().confetti_palette
    }

    #[test]
    fn test_piece_parameters_in_range() {
        let mut rng = Pcg32::seed_from_u64(11);
        let palette = palette();
        for piece in confetti_batch(&mut rng, &palette, 500) {
            assert!((0.0..100.0).contains(&piece.x_vw));
            assert!(palette.contains(&piece.color));
            assert!((5.0..13.0).contains(&piece.size_px));
            assert!((0.0..2.5).contains(&piece.delay_s));
            assert!((2.5..4.5).contains(&piece.fall_duration_s));
            assert!((-30.0..30.0).contains(&piece.sway_px));
        }
    }

    #[test]
    fn test_style_properties() {
        let piece = ConfettiPiece {
            x_vw: 12.5,
            color: "#ffd700".into(),
            size_px: 6.0,
            delay_s: 0.5,
            fall_duration_s: 3.0,
            sway_px: -10.0,
            shape: ConfettiShape::Round,
        };
        let props = piece.style_properties();
        assert_eq!(props[0], ("--x", "12.5vw".to_string()));
        assert_eq!(props[1], ("--color", "#ffd700".to_string()));
        assert_eq!(props[4], ("--fall-duration", "3s".to_string()));
        assert_eq!(props[5], ("--sway", "-10px".to_string()));
        assert_eq!(props[6], ("--shape", "50%".to_string()));
    }

    #[test]
    fn test_celebration_runs_once() {
        let mut celebration = Celebration::new(&Config::default(), 1);
        assert_eq!(celebration.phase(), CelebrationPhase::Waiting);

        let timers = celebration.trigger().unwrap();
        assert_eq!(timers[0].timer, Timer::RevealCelebration);
        assert_eq!(timers[0].delay_ms, 300);
        assert_eq!(timers[1].timer, Timer::ClearConfetti);
        assert_eq!(timers[1].delay_ms, 6000);
        assert!(celebration.trigger().is_none());

        assert_eq!(celebration.reveal().unwrap().len(), 60);
        assert!(celebration.reveal().is_none());
        assert!(celebration.trigger().is_none());

        assert!(celebration.finish());
        assert!(!celebration.finish());
        assert_eq!(celebration.phase(), CelebrationPhase::Finished);
    }

    #[test]
    fn test_timers_ignored_before_trigger() {
        let mut celebration = Celebration::new(&Config::default(), 1);
        assert!(celebration.reveal().is_none());
        assert!(!celebration.finish());
        assert_eq!(celebration.phase(), CelebrationPhase::Waiting);
    }
}
