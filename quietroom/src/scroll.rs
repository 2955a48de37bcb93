//! Scroll state for the scrollbar-less text view.
//!
//! Scrollbars are never shown; the wheel and the ctrl+arrow chords move
//! a clamped offset in step increments. Extents come from the previous
//! frame's layout, so every move clamps against what was actually on
//! screen.

/// Vertical scroll offset, clamped to the scrollable range.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomScroll {
    offset: f32,
    content: f32,
    viewport: f32,
    moved: bool,
}

impl RoomScroll {
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Largest valid offset for the known extents.
    fn max_offset(&self) -> f32 {
        (self.content - self.viewport).max(0.0)
    }

    fn clamp(&mut self) {
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    /// Scroll one step toward the end of the text.
    pub fn scroll_down(&mut self, step: f32) {
        self.offset += step;
        self.clamp();
        self.moved = true;
    }

    /// Scroll one step toward the start of the text.
    pub fn scroll_up(&mut self, step: f32) {
        self.offset -= step;
        self.clamp();
        self.moved = true;
    }

    /// Apply a wheel delta (egui's `raw_scroll_delta.y`: positive means
    /// the user scrolled up).
    pub fn apply_wheel(&mut self, delta_y: f32) {
        if delta_y != 0.0 {
            self.offset -= delta_y;
            self.clamp();
            self.moved = true;
        }
    }

    /// Whether anything moved the offset since the last sync. Clears
    /// the flag; the caller forces the scroll area to [`offset`](Self::offset).
    pub fn take_moved(&mut self) -> bool {
        std::mem::take(&mut self.moved)
    }

    /// Record where the scroll area actually ended up and this frame's
    /// extents, then re-clamp (content may have shrunk).
    pub fn sync(&mut self, offset: f32, content: f32, viewport: f32) {
        self.offset = offset;
        self.content = content;
        self.viewport = viewport;
        self.clamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrollable() -> RoomScroll {
        let mut scroll = RoomScroll::default();
        scroll.sync(0.0, 1000.0, 400.0);
        scroll
    }

    #[test]
    fn test_clamps_at_top() {
        let mut scroll = scrollable();
        scroll.scroll_up(30.0);
        assert_eq!(scroll.offset(), 0.0);
    }

    #[test]
    fn test_clamps_at_bottom() {
        let mut scroll = scrollable();
        for _ in 0..100 {
            scroll.scroll_down(30.0);
        }
        assert_eq!(scroll.offset(), 600.0);
    }

    #[test]
    fn test_short_content_never_scrolls() {
        let mut scroll = RoomScroll::default();
        scroll.sync(0.0, 200.0, 400.0);
        scroll.scroll_down(30.0);
        assert_eq!(scroll.offset(), 0.0);
        scroll.apply_wheel(-50.0);
        assert_eq!(scroll.offset(), 0.0);
    }

    #[test]
    fn test_wheel_direction() {
        let mut scroll = scrollable();
        // wheel down (negative delta) moves the offset forward
        scroll.apply_wheel(-40.0);
        assert_eq!(scroll.offset(), 40.0);
        scroll.apply_wheel(25.0);
        assert_eq!(scroll.offset(), 15.0);
    }

    #[test]
    fn test_moves_are_consumed_once() {
        let mut scroll = scrollable();
        assert!(!scroll.take_moved());
        scroll.scroll_down(30.0);
        assert!(scroll.take_moved());
        assert_eq!(scroll.offset(), 30.0);
        assert!(!scroll.take_moved());
    }

    #[test]
    fn test_sync_reclamps_after_content_shrinks() {
        let mut scroll = scrollable();
        scroll.sync(600.0, 500.0, 400.0);
        assert_eq!(scroll.offset(), 100.0);
    }

    #[test]
    fn test_wheel_of_zero_is_not_a_move() {
        let mut scroll = scrollable();
        scroll.apply_wheel(0.0);
        assert!(!scroll.take_moved());
    }
}
