//! Fading status label.
//!
//! A message is shown at the active color, held for a few seconds, then
//! faded linearly to the inactive color (normally the room background,
//! so it disappears). Setting new text cancels a fade in progress and
//! restarts the hold.

use crate::color::lerp_color;
use egui::Color32;
use std::time::{Duration, Instant};

/// How long a message stays at full strength before fading.
pub const ACTIVE_DURATION: Duration = Duration::from_millis(3000);

/// How long the fade itself takes.
pub const FADE_DURATION: Duration = Duration::from_millis(1500);

/// Repaint interval while a fade is running.
pub const FADE_TICK: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Holding { until: Instant },
    Fading { since: Instant },
}

/// Status text with a timed fade-out.
#[derive(Debug, Clone)]
pub struct FadeLabel {
    message: String,
    pub active_color: Color32,
    pub inactive_color: Color32,
    phase: Phase,
}

impl Default for FadeLabel {
    fn default() -> Self {
        Self::new()
    }
}

impl FadeLabel {
    pub fn new() -> Self {
        Self {
            message: String::new(),
            active_color: Color32::from_rgb(255, 255, 255),
            inactive_color: Color32::from_rgb(0, 0, 0),
            phase: Phase::Idle,
        }
    }

    /// Point the label at the current theme's colors. Takes effect on
    /// the next frame; an in-flight fade just continues with the new
    /// endpoints.
    pub fn set_colors(&mut self, active: Color32, inactive: Color32) {
        self.active_color = active;
        self.inactive_color = inactive;
    }

    /// Show a message with the default hold time.
    pub fn set_text(&mut self, message: impl Into<String>, now: Instant) {
        self.set_text_for(message, ACTIVE_DURATION, now);
    }

    /// Show a message held for `hold` before the fade starts. Replaces
    /// any message currently holding or fading.
    pub fn set_text_for(&mut self, message: impl Into<String>, hold: Duration, now: Instant) {
        self.message = message.into();
        self.phase = Phase::Holding { until: now + hold };
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Advance the phase machine and return the color to draw with.
    pub fn color_at(&mut self, now: Instant) -> Color32 {
        if let Phase::Holding { until } = self.phase {
            if now >= until {
                self.phase = Phase::Fading { since: now };
            }
        }
        match self.phase {
            Phase::Idle => self.inactive_color,
            Phase::Holding { .. } => self.active_color,
            Phase::Fading { since } => {
                let elapsed = now.saturating_duration_since(since);
                if elapsed >= FADE_DURATION {
                    self.phase = Phase::Idle;
                    return self.inactive_color;
                }
                let t = elapsed.as_secs_f32() / FADE_DURATION.as_secs_f32();
                lerp_color(self.active_color, self.inactive_color, t)
            }
        }
    }

    /// Whether the label still needs frames (the timer self-cancels by
    /// returning `false` once the fade completes).
    pub fn is_animating(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// When the label next needs a repaint: the end of the hold, the
    /// fade tick, or never.
    pub fn next_wake(&self, now: Instant) -> Option<Duration> {
        match self.phase {
            Phase::Idle => None,
            Phase::Holding { until } => Some(until.saturating_duration_since(now)),
            Phase::Fading { .. } => Some(FADE_TICK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_on_black() -> FadeLabel {
        let mut label = FadeLabel::new();
        label.set_colors(
            Color32::from_rgb(255, 255, 255),
            Color32::from_rgb(0, 0, 0),
        );
        label
    }

    #[test]
    fn test_holds_at_active_color() {
        let t0 = Instant::now();
        let mut label = white_on_black();
        label.set_text("saved", t0);
        assert_eq!(label.color_at(t0), label.active_color);
        assert_eq!(label.color_at(t0 + Duration::from_millis(2999)), label.active_color);
        assert!(label.is_animating());
    }

    #[test]
    fn test_fades_then_goes_idle() {
        let t0 = Instant::now();
        let mut label = white_on_black();
        label.set_text("saved", t0);

        // Hold expires exactly at t0 + ACTIVE_DURATION; fade starts there.
        let fade_start = t0 + ACTIVE_DURATION;
        assert_eq!(label.color_at(fade_start), label.active_color);

        let mid = fade_start + FADE_DURATION / 2;
        let c = label.color_at(mid);
        assert!(c.r() > 0 && c.r() < 255, "mid-fade should be between endpoints");

        let done = fade_start + FADE_DURATION + Duration::from_millis(1);
        assert_eq!(label.color_at(done), label.inactive_color);
        assert!(!label.is_animating());
        assert_eq!(label.next_wake(done), None);
    }

    #[test]
    fn test_new_text_restarts_the_hold() {
        let t0 = Instant::now();
        let mut label = white_on_black();
        label.set_text("first", t0);

        // Advance into the fade, then set new text.
        let mid_fade = t0 + ACTIVE_DURATION + FADE_DURATION / 2;
        let _ = label.color_at(mid_fade);
        label.set_text("second", mid_fade);

        assert_eq!(label.message(), "second");
        assert_eq!(label.color_at(mid_fade), label.active_color);
        assert_eq!(
            label.color_at(mid_fade + ACTIVE_DURATION - Duration::from_millis(1)),
            label.active_color
        );
    }

    #[test]
    fn test_custom_hold_duration() {
        let t0 = Instant::now();
        let mut label = white_on_black();
        label.set_text_for("quick", Duration::from_millis(100), t0);
        assert_eq!(label.color_at(t0 + Duration::from_millis(50)), label.active_color);
        // Past the short hold the fade has begun.
        let c = label.color_at(t0 + Duration::from_millis(100) + FADE_DURATION / 2);
        assert_ne!(c, label.active_color);
    }

    #[test]
    fn test_wake_schedule() {
        let t0 = Instant::now();
        let mut label = white_on_black();
        assert_eq!(label.next_wake(t0), None);

        label.set_text("hello", t0);
        assert_eq!(label.next_wake(t0), Some(ACTIVE_DURATION));

        let _ = label.color_at(t0 + ACTIVE_DURATION);
        assert_eq!(label.next_wake(t0 + ACTIVE_DURATION), Some(FADE_TICK));
    }
}
