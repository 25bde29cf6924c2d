//! Per-frame work coalescing
//!
//! Pointer samples can arrive many times per rendered frame. `FrameSlot` is a
//! pending-work queue of depth one: the first sample offered while the slot is
//! empty is kept and a frame should be requested; anything offered before that
//! frame runs is dropped.

#[derive(Debug)]
pub struct FrameSlot<T> {
    pending: Option<T>,
    dropped: u64,
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        Self {
            pending: None,
            dropped: 0,
        }
    }
}

impl<T> FrameSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer work. Returns `true` if the slot was empty, meaning the caller
    /// must schedule a frame to drain it.
    pub fn offer(&mut self, work: T) -> bool {
        if self.pending.is_some() {
            self.dropped += 1;
            return false;
        }
        self.pending = Some(work);
        true
    }

    /// Drain the slot (run from the frame callback)
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Samples dropped because a frame was already pending
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
