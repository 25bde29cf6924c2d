//! Widget orchestration
//!
//! Owns the evasion controller, the celebration sequence and the frame slot,
//! and applies their decisions to a `Page`. Event plumbing (listeners,
//! animation frames, timeouts) stays with the caller:
//! - `pointer_moved` -> if it returns `true`, call `run_frame` on the next frame
//! - `touch_started`, `decline_clicked`, `accept_clicked` from the listeners
//! - every returned `TimerRequest` -> call `timer_fired` after its delay

use glam::DVec2;

use crate::celebration::{Celebration, CelebrationPhase, Timer, TimerRequest};
use crate::config::Config;
use crate::error::WidgetError;
use crate::evasion::{ClickVerdict, EvasionController, EvasionState, Relocation};
use crate::frame::FrameSlot;
use crate::geometry::Snapshot;
use crate::platform::Page;

pub struct Widget<P: Page> {
    page: P,
    evasion: EvasionController,
    celebration: Celebration,
    pending_pointer: FrameSlot<DVec2>,
}

impl<P: Page> Widget<P> {
    pub fn new(config: Config, page: P, seed: u64) -> Self {
        log::info!(
            "Widget ready (threshold {}px, padding {}px, seed {})",
            config.dodge_threshold,
            config.screen_padding,
            seed
        );
        Self {
            page,
            celebration: Celebration::new(&config, seed),
            evasion: EvasionController::new(config, seed),
            pending_pointer: FrameSlot::new(),
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn evasion_state(&self) -> &EvasionState {
        self.evasion.state()
    }

    pub fn celebration_phase(&self) -> CelebrationPhase {
        self.celebration.phase()
    }

    pub fn preload(&mut self, url: &str) -> Result<(), WidgetError> {
        log::debug!("Preloading {}", url);
        self.page.preload(url)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            decline: self.page.decline_rect(),
            viewport: self.page.viewport(),
        }
    }

    fn apply(&mut self, relocation: &Relocation) -> Result<(), WidgetError> {
        if let Some(at) = relocation.pin_at {
            self.page.pin_decline(at)?;
        }
        self.page.move_decline(relocation.position)?;
        self.page.scale_accept(relocation.accept_scale)
    }

    /// Queue a pointer sample. Returns `true` when a frame must be requested.
    pub fn pointer_moved(&mut self, at: DVec2) -> bool {
        if self.celebration.is_triggered() {
            return false;
        }
        self.pending_pointer.offer(at)
    }

    /// Drop the queued sample when its frame could not be scheduled, so the
    /// next `pointer_moved` requests a fresh one
    pub fn cancel_frame(&mut self) {
        if self.pending_pointer.take().is_some() {
            log::debug!("Pending pointer sample discarded");
        }
    }

    /// Animation frame: run the proximity check for the queued sample
    pub fn run_frame(&mut self) -> Result<Option<Relocation>, WidgetError> {
        let Some(pointer) = self.pending_pointer.take() else {
            return Ok(None);
        };
        log::debug!(
            "Frame check at ({:.0}, {:.0}), {} samples coalesced so far",
            pointer.x,
            pointer.y,
            self.pending_pointer.dropped()
        );
        if self.celebration.is_triggered() {
            return Ok(None);
        }

        let snapshot = self.snapshot();
        match self.evasion.on_pointer(pointer, &snapshot) {
            Some(relocation) => {
                self.apply(&relocation)?;
                Ok(Some(relocation))
            }
            None => Ok(None),
        }
    }

    /// Touch on Decline (default action is always suppressed by the caller)
    pub fn touch_started(&mut self) -> Result<Option<Relocation>, WidgetError> {
        if self.celebration.is_triggered() {
            return Ok(None);
        }
        let snapshot = self.snapshot();
        let relocation = self.evasion.on_touch(&snapshot);
        self.apply(&relocation)?;
        Ok(Some(relocation))
    }

    pub fn decline_clicked(&self) -> ClickVerdict {
        self.evasion.on_decline_click()
    }

    /// Accept clicked: hide the prompt and hand back the timers to start
    pub fn accept_clicked(&mut self) -> Result<Vec<TimerRequest>, WidgetError> {
        let Some(timers) = self.celebration.trigger() else {
            log::debug!("Accept clicked again; ignoring");
            return Ok(Vec::new());
        };
        self.page.hide_decline()?;
        self.page.hide_card()?;
        Ok(timers.to_vec())
    }

    pub fn timer_fired(&mut self, timer: Timer) -> Result<(), WidgetError> {
        match timer {
            Timer::RevealCelebration => {
                if let Some(pieces) = self.celebration.reveal() {
                    self.page.show_celebration()?;
                    self.page.spawn_confetti(&pieces)?;
                    log::info!("Celebrating with {} confetti pieces", pieces.len());
                }
            }
            Timer::ClearConfetti => {
                if self.celebration.finish() {
                    self.page.clear_confetti()?;
                    log::info!("Confetti cleared");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evasion::{DodgeSource, PositionMode};
    use crate::geometry::{Bounds, Rect, Viewport};
    use crate::platform::HeadlessPage;

    fn widget(seed: u64) -> Widget<HeadlessPage> {
        let page = HeadlessPage::new(Viewport::new(1000.0, 800.0), Rect::new(500.0, 400.0, 40.0, 40.0));
        Widget::new(Config::default(), page, seed)
    }

    /// Fire timers in delay order, checking the page right after each
    fn run_timers(widget: &mut Widget<HeadlessPage>, mut timers: Vec<TimerRequest>) -> Vec<(u32, bool, usize)> {
        timers.sort_by_key(|t| t.delay_ms);
        timers
            .into_iter()
            .map(|t| {
                widget.timer_fired(t.timer).unwrap();
                let page = widget.page();
                (t.delay_ms, page.celebration_visible, page.confetti.len())
            })
            .collect()
    }

    #[test]
    fn test_pointer_dodge_scenario() {
        let mut widget = widget(2024);
        let pointer = DVec2::new(510.0, 430.0);

        assert!(widget.pointer_moved(pointer));
        let relocation = widget.run_frame().unwrap().unwrap();

        let page = widget.page();
        assert_eq!(page.decline_mode, PositionMode::Fixed);
        assert_eq!(page.decline.origin(), relocation.position);
        assert!((page.accept_scale - 1.02).abs() < 1e-12);
        assert_eq!(widget.evasion_state().evasions, 1);

        let landed = page.decline.center();
        assert!(relocation.cornered || landed.distance(pointer) >= 48.0);
        let bounds = Bounds::new(page.viewport, page.decline.size(), 20.0);
        assert!(bounds.contains(page.decline.origin()));
    }

    #[test]
    fn test_samples_coalesce_per_frame() {
        let mut widget = widget(1);
        assert!(widget.pointer_moved(DVec2::new(520.0, 420.0)));
        assert!(!widget.pointer_moved(DVec2::new(521.0, 420.0)));
        assert!(!widget.pointer_moved(DVec2::new(522.0, 420.0)));

        assert!(widget.run_frame().unwrap().is_some());
        // Only one check ran for the three samples
        assert_eq!(widget.evasion_state().evasions, 1);
        // Nothing queued: a stray frame does nothing
        assert!(widget.run_frame().unwrap().is_none());
    }

    #[test]
    fn test_cancelled_frame_frees_the_slot() {
        let mut widget = widget(1);
        assert!(widget.pointer_moved(DVec2::new(520.0, 420.0)));
        // Frame request failed: without cancelling, every later sample would be dropped
        widget.cancel_frame();
        assert!(widget.pointer_moved(DVec2::new(521.0, 420.0)));
        assert!(widget.run_frame().unwrap().is_some());
        assert_eq!(widget.evasion_state().evasions, 1);
    }

    #[test]
    fn test_far_pointer_leaves_page_alone() {
        let mut widget = widget(1);
        assert!(widget.pointer_moved(DVec2::new(10.0, 10.0)));
        assert!(widget.run_frame().unwrap().is_none());
        assert_eq!(widget.page().decline_mode, PositionMode::Flow);
        assert_eq!(widget.page().accept_scale, 1.0);
        assert_eq!(widget.decline_clicked(), ClickVerdict::Allow);
    }

    #[test]
    fn test_chasing_pointer_caps_accept_scale() {
        let mut widget = widget(99);
        let mut last_scale = 1.0;
        for n in 1..=30u64 {
            let center = widget.page().decline.center();
            assert!(widget.pointer_moved(center + DVec2::new(3.0, -2.0)));
            widget.run_frame().unwrap().unwrap();

            let scale = widget.page().accept_scale;
            assert!(scale >= last_scale && scale <= 1.3);
            assert_eq!(widget.evasion_state().evasions, n);
            if n >= 15 {
                assert_eq!(scale, 1.3);
            }
            last_scale = scale;
        }
    }

    #[test]
    fn test_touch_scenario() {
        let mut widget = widget(5);
        let relocation = widget.touch_started().unwrap().unwrap();

        assert_eq!(relocation.source, DodgeSource::Touch);
        let page = widget.page();
        assert_eq!(page.decline_mode, PositionMode::Fixed);
        let bounds = Bounds::new(page.viewport, page.decline.size(), 20.0);
        assert!(bounds.contains(page.decline.origin()));
        assert_eq!(widget.evasion_state().evasions, 1);
        assert_eq!(widget.decline_clicked(), ClickVerdict::Suppress);

        // Already fixed: a second touch still dodges and counts
        widget.touch_started().unwrap().unwrap();
        assert_eq!(widget.evasion_state().evasions, 2);
    }

    #[test]
    fn test_accept_scenario() {
        let mut widget = widget(7);
        widget.preload("kiss.gif").unwrap();
        assert_eq!(widget.page().preloaded, vec!["kiss.gif".to_string()]);

        let timers = widget.accept_clicked().unwrap();
        assert!(widget.page().decline_hidden);
        assert!(widget.page().card_hidden);
        assert!(!widget.page().celebration_visible);
        assert_eq!(widget.celebration_phase(), CelebrationPhase::Pending);

        let steps = run_timers(&mut widget, timers);
        assert_eq!(steps, vec![(300, true, 60), (6000, true, 0)]);
        assert_eq!(widget.celebration_phase(), CelebrationPhase::Finished);
    }

    #[test]
    fn test_accept_fires_once() {
        let mut widget = widget(7);
        let timers = widget.accept_clicked().unwrap();
        assert_eq!(timers.len(), 2);
        assert!(widget.accept_clicked().unwrap().is_empty());

        run_timers(&mut widget, timers);
        assert!(widget.accept_clicked().unwrap().is_empty());
        assert!(widget.page().confetti.is_empty());
    }

    #[test]
    fn test_no_dodging_after_accept() {
        let mut widget = widget(7);
        widget.accept_clicked().unwrap();
        assert!(!widget.pointer_moved(DVec2::new(520.0, 420.0)));
        assert!(widget.touch_started().unwrap().is_none());
        assert_eq!(widget.evasion_state().evasions, 0);
    }
}
