//! Widget tuning and page wiring
//!
//! Read once at start-up from an optional inline JSON block; never written back.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::WidgetError;

/// Ids of the page elements the widget drives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    /// Prompt card holding both buttons
    pub card: String,
    pub accept: String,
    pub decline: String,
    /// Celebration view (hidden until accepted)
    pub celebration: String,
    /// Container confetti pieces are appended to
    pub confetti: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            card: "card".into(),
            accept: "btn-yes".into(),
            decline: "btn-no".into(),
            celebration: "celebration".into(),
            confetti: "confetti".into(),
        }
    }
}

/// Widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Evasion ===
    /// Pointer distance to the Decline center that triggers a dodge (px)
    pub dodge_threshold: f64,
    /// Distance the Decline center travels per dodge (px)
    pub dodge_distance: f64,
    /// Half-width of the random escape angle offset (radians)
    pub escape_jitter: f64,
    /// Cornered when the clamped center lands closer than `threshold * ratio`
    pub cornered_ratio: f64,
    /// Viewport margin (px)
    pub screen_padding: f64,

    // === Accept growth ===
    pub accept_scale_step: f64,
    pub accept_scale_max: f64,

    // === Celebration ===
    pub celebration_delay_ms: u32,
    pub confetti_count: usize,
    /// Measured from the Accept click
    pub confetti_lifetime_ms: u32,
    pub confetti_palette: Vec<String>,
    /// Preloaded at start-up
    pub celebration_asset: String,

    pub elements: ElementIds,

    /// Fixed RNG seed (reproducible dodges); clock-seeded when absent
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dodge_threshold: DODGE_THRESHOLD,
            dodge_distance: DODGE_DISTANCE,
            escape_jitter: ESCAPE_JITTER,
            cornered_ratio: CORNERED_RATIO,
            screen_padding: SCREEN_PADDING,

            accept_scale_step: ACCEPT_SCALE_STEP,
            accept_scale_max: ACCEPT_SCALE_MAX,

            celebration_delay_ms: CELEBRATION_DELAY_MS,
            confetti_count: CONFETTI_COUNT,
            confetti_lifetime_ms: CONFETTI_LIFETIME_MS,
            confetti_palette: CONFETTI_PALETTE.iter().map(|c| c.to_string()).collect(),
            celebration_asset: CELEBRATION_ASSET.into(),

            elements: ElementIds::default(),

            seed: None,
        }
    }
}

impl Config {
    /// Id of the `<script type="application/json">` element holding overrides
    pub const ELEMENT_ID: &'static str = "dodge-config";

    /// Distance under which a clamped position counts as cornered
    pub fn cornered_distance(&self) -> f64 {
        self.dodge_threshold * self.cornered_ratio
    }

    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, WidgetError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WidgetError> {
        let invalid = |msg: String| Err(WidgetError::InvalidConfig(msg));

        for (name, value) in [
            ("dodge_threshold", self.dodge_threshold),
            ("dodge_distance", self.dodge_distance),
            ("escape_jitter", self.escape_jitter),
            ("cornered_ratio", self.cornered_ratio),
            ("screen_padding", self.screen_padding),
            ("accept_scale_step", self.accept_scale_step),
            ("accept_scale_max", self.accept_scale_max),
        ] {
            if !value.is_finite() {
                return invalid(format!("{name} must be finite, got {value}"));
            }
        }

        if self.dodge_threshold <= 0.0 {
            return invalid(format!("dodge_threshold must be positive, got {}", self.dodge_threshold));
        }
        if self.dodge_distance < 0.0 {
            return invalid(format!("dodge_distance must not be negative, got {}", self.dodge_distance));
        }
        // The jitter range is sampled uniformly; beyond ±π it only wraps around
        if !(0.0..=PI).contains(&self.escape_jitter) {
            return invalid(format!("escape_jitter must be in [0, π], got {}", self.escape_jitter));
        }
        if self.cornered_ratio <= 0.0 || self.cornered_ratio > 1.0 {
            return invalid(format!("cornered_ratio must be in (0, 1], got {}", self.cornered_ratio));
        }
        if self.screen_padding < 0.0 {
            return invalid(format!("screen_padding must not be negative, got {}", self.screen_padding));
        }
        if self.accept_scale_step < 0.0 {
            return invalid(format!(
                "accept_scale_step must not be negative, got {}",
                self.accept_scale_step
            ));
        }
        if self.accept_scale_max < 1.0 {
            return invalid(format!("accept_scale_max must be at least 1, got {}", self.accept_scale_max));
        }
        if self.confetti_palette.is_empty() {
            return invalid("confetti_palette is empty".into());
        }
        if self.confetti_lifetime_ms <= self.celebration_delay_ms {
            return invalid(format!(
                "confetti_lifetime_ms ({}) must exceed celebration_delay_ms ({})",
                self.confetti_lifetime_ms, self.celebration_delay_ms
            ));
        }
        Ok(())
    }

    /// Load overrides from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from #{}", Self::ELEMENT_ID);
                    return config;
                }
                Err(e) => log::warn!("Ignoring #{}: {}", Self::ELEMENT_ID, e),
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
