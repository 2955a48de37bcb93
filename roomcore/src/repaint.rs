//! Repaint scheduling.
//!
//! egui repaints on input and whenever something asks it to. A writing
//! room spends almost all of its time idle, so nothing here may request
//! continuous repaints: the only timed wakes are the status fade (25 ms
//! ticks while fading, one wake at the end of the hold) and the autosave
//! deadline. `RepaintController` coalesces those into the single
//! earliest `request_repaint_after` per frame.

use std::time::Duration;

/// Bracket your `update()` with [`begin_frame`](Self::begin_frame) and
/// [`end_frame`](Self::end_frame); call [`wake_in`](Self::wake_in) for
/// every timed event that needs a frame.
#[derive(Debug, Default)]
pub struct RepaintController {
    pending_wake: Option<Duration>,
}

impl RepaintController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the start of `update()`. Drops any wake left over from
    /// the previous frame; each frame schedules its own.
    pub fn begin_frame(&mut self) {
        self.pending_wake = None;
    }

    /// Ask for a frame after `delay`. Multiple requests in one frame
    /// keep the earliest.
    pub fn wake_in(&mut self, delay: Duration) {
        self.pending_wake = Some(match self.pending_wake {
            Some(current) => current.min(delay),
            None => delay,
        });
    }

    /// The wake currently scheduled for this frame, if any.
    pub fn pending_wake(&self) -> Option<Duration> {
        self.pending_wake
    }

    /// Call at the end of `update()`. Schedules at most one repaint;
    /// with no pending wake egui sleeps until the next input event.
    pub fn end_frame(&mut self, ctx: &egui::Context) {
        if let Some(delay) = self.pending_wake.take() {
            ctx.request_repaint_after(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wake_keeps_earliest() {
        let mut rc = RepaintController::new();
        rc.wake_in(Duration::from_millis(500));
        rc.wake_in(Duration::from_millis(25));
        rc.wake_in(Duration::from_millis(3000));
        assert_eq!(rc.pending_wake(), Some(Duration::from_millis(25)));
    }

    #[test]
    fn test_begin_frame_drops_stale_wake() {
        let mut rc = RepaintController::new();
        rc.wake_in(Duration::from_millis(25));
        rc.begin_frame();
        assert_eq!(rc.pending_wake(), None);
    }

    #[test]
    fn test_end_frame_clears_wake() {
        let ctx = egui::Context::default();
        let mut rc = RepaintController::new();
        rc.wake_in(Duration::from_millis(25));
        rc.end_frame(&ctx);
        assert_eq!(rc.pending_wake(), None);
    }
}
