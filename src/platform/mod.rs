//! Platform abstraction layer
//!
//! The widget reads geometry from, and writes decisions to, a `Page`:
//! - `HeadlessPage`: in-memory page for tests and the native demo
//! - `WebPage`: the real DOM (wasm32 only)

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessPage;
#[cfg(target_arch = "wasm32")]
pub use web::WebPage;

use glam::DVec2;

use crate::celebration::ConfettiPiece;
use crate::error::WidgetError;
use crate::geometry::{Rect, Viewport};

/// The page elements the widget drives
pub trait Page {
    /// Current on-screen box of Decline
    fn decline_rect(&self) -> Rect;
    fn viewport(&self) -> Viewport;

    /// Switch Decline to fixed positioning, keeping it visually at `at`
    fn pin_decline(&mut self, at: DVec2) -> Result<(), WidgetError>;
    /// Move Decline's top-left corner (fixed mode)
    fn move_decline(&mut self, to: DVec2) -> Result<(), WidgetError>;
    fn scale_accept(&mut self, scale: f64) -> Result<(), WidgetError>;

    fn hide_decline(&mut self) -> Result<(), WidgetError>;
    fn hide_card(&mut self) -> Result<(), WidgetError>;
    fn show_celebration(&mut self) -> Result<(), WidgetError>;
    fn spawn_confetti(&mut self, pieces: &[ConfettiPiece]) -> Result<(), WidgetError>;
    fn clear_confetti(&mut self) -> Result<(), WidgetError>;

    /// Start fetching an asset so it is cached before it is shown
    fn preload(&mut self, url: &str) -> Result<(), WidgetError>;
}
