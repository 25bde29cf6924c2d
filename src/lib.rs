//! Dodge Prompt - a yes/no prompt whose "no" runs away
//!
//! Core modules:
//! - `evasion`: Deterministic dodge logic (proximity, escape placement, scale growth)
//! - `celebration`: One-shot accept sequence and confetti generation
//! - `widget`: Glues both to a `Page` and to frame/timer scheduling
//! - `platform`: Page adapters (in-memory and browser)
//! - `config`: Data-driven tuning

pub mod celebration;
pub mod config;
pub mod error;
pub mod evasion;
pub mod frame;
pub mod geometry;
pub mod platform;
pub mod widget;

pub use config::{Config, ElementIds};
pub use error::WidgetError;
pub use widget::Widget;

/// Default tuning constants
pub mod consts {
    /// Pointer distance (px, to the Decline center) that triggers a dodge
    pub const DODGE_THRESHOLD: f64 = 80.0;
    /// How far the Decline center jumps per dodge (px)
    pub const DODGE_DISTANCE: f64 = 60.0;
    /// Half-width of the random escape angle perturbation (radians, ±60°)
    pub const ESCAPE_JITTER: f64 = std::f64::consts::FRAC_PI_3;
    /// Fraction of the threshold below which a clamped position counts as cornered
    pub const CORNERED_RATIO: f64 = 0.6;
    /// Margin kept between Decline and every viewport edge (px)
    pub const SCREEN_PADDING: f64 = 20.0;

    /// Accept grows by this much per dodge
    pub const ACCEPT_SCALE_STEP: f64 = 0.02;
    pub const ACCEPT_SCALE_MAX: f64 = 1.3;

    /// Delay between hiding the card and revealing the celebration (ms)
    pub const CELEBRATION_DELAY_MS: u32 = 300;
    pub const CONFETTI_COUNT: usize = 60;
    /// Confetti is cleared this long after Accept is clicked (ms)
    pub const CONFETTI_LIFETIME_MS: u32 = 6000;

    pub const CONFETTI_PALETTE: [&str; 8] = [
        "#ff4778", "#ff85a2", "#ffb6c8", "#ff6b9d", "#ffd700", "#ff69b4", "#e74c6f", "#ff1493",
    ];

    pub const CELEBRATION_ASSET: &str = "kiss.gif";
}

/// Clamp without panicking when `min > max` (`max` wins, like a
/// `min(max(v, lo), hi)` chain)
#[inline]
pub fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}
