//! In-memory page
//!
//! Tracks exactly what a browser page would show, without a browser.

use glam::DVec2;
use serde::Serialize;

use super::Page;
use crate::celebration::ConfettiPiece;
use crate::error::WidgetError;
use crate::evasion::PositionMode;
use crate::geometry::{Rect, Viewport};

#[derive(Debug, Clone, Serialize)]
pub struct HeadlessPage {
    pub viewport: Viewport,
    pub decline: Rect,
    pub decline_mode: PositionMode,
    pub decline_hidden: bool,
    pub accept_scale: f64,
    pub card_hidden: bool,
    pub celebration_visible: bool,
    pub confetti: Vec<ConfettiPiece>,
    pub preloaded: Vec<String>,
}

impl HeadlessPage {
    /// A page with Decline laid out at `decline`
    pub fn new(viewport: Viewport, decline: Rect) -> Self {
        Self {
            viewport,
            decline,
            decline_mode: PositionMode::Flow,
            decline_hidden: false,
            accept_scale: 1.0,
            card_hidden: false,
            celebration_visible: false,
            confetti: Vec::new(),
            preloaded: Vec::new(),
        }
    }
}

impl Page for HeadlessPage {
    fn decline_rect(&self) -> Rect {
        self.decline
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn pin_decline(&mut self, at: DVec2) -> Result<(), WidgetError> {
        self.decline_mode = PositionMode::Fixed;
        self.decline = self.decline.moved_to(at);
        Ok(())
    }

    fn move_decline(&mut self, to: DVec2) -> Result<(), WidgetError> {
        self.decline = self.decline.moved_to(to);
        Ok(())
    }

    fn scale_accept(&mut self, scale: f64) -> Result<(), WidgetError> {
        self.accept_scale = scale;
        Ok(())
    }

    fn hide_decline(&mut self) -> Result<(), WidgetError> {
        self.decline_hidden = true;
        Ok(())
    }

    fn hide_card(&mut self) -> Result<(), WidgetError> {
        self.card_hidden = true;
        Ok(())
    }

    fn show_celebration(&mut self) -> Result<(), WidgetError> {
        self.celebration_visible = true;
        Ok(())
    }

    fn spawn_confetti(&mut self, pieces: &[ConfettiPiece]) -> Result<(), WidgetError> {
        self.confetti.extend_from_slice(pieces);
        Ok(())
    }

    fn clear_confetti(&mut self) -> Result<(), WidgetError> {
        self.confetti.clear();
        Ok(())
    }

    fn preload(&mut self, url: &str) -> Result<(), WidgetError> {
        self.preloaded.push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_dumps_as_json() {
        let mut page = HeadlessPage::new(Viewport::new(1000.0, 800.0), Rect::new(500.0, 400.0, 40.0, 40.0));
        page.pin_decline(DVec2::new(500.0, 400.0)).unwrap();
        page.move_decline(DVec2::new(20.0, 30.0)).unwrap();

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["decline_mode"], "Fixed");
        assert_eq!(json["decline"]["left"], 20.0);
        assert_eq!(json["decline"]["top"], 30.0);
        assert_eq!(json["viewport"]["width"], 1000.0);
        assert!(json["confetti"].as_array().unwrap().is_empty());
    }
}
