//! HUD text and styling helpers
//!
//! Pure functions so the browser layer only moves strings into the DOM.

use crate::sim::Timer;

/// Timer color band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Normal,
    /// One minute or less
    Warning,
    /// Thirty seconds or less
    Critical,
}

impl Urgency {
    pub fn from_remaining(seconds: f32) -> Self {
        if seconds <= 30.0 {
            Urgency::Critical
        } else if seconds <= 60.0 {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }

    /// CSS class for the timer element
    pub fn css_class(&self) -> &'static str {
        match self {
            Urgency::Normal => "timer",
            Urgency::Warning => "timer warning",
            Urgency::Critical => "timer critical",
        }
    }
}

/// Whole seconds left, rounded up
pub fn seconds_left(timer: &Timer) -> u32 {
    timer.remaining.max(0.0).ceil() as u32
}

/// `MM:SS`
pub fn clock_text(timer: &Timer) -> String {
    let secs = timer.remaining.max(0.0).floor() as u32;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Timer bar width in percent
pub fn progress_percent(timer: &Timer) -> f32 {
    (timer.fraction() * 100.0).clamp(0.0, 100.0)
}

pub fn count_text(score: u32, total: u32) -> String {
    format!("Count: {} / {}", score, total)
}

/// Menu footer, e.g. `Cleared 3 / 10`
pub fn cleared_text(cleared: usize, total: u32) -> String {
    format!("Cleared {} / {}", cleared, total)
}

/// Class list with only the `hidden` token toggled; layout classes such as
/// `overlay` are kept in their original order.
pub fn with_hidden(classes: &str, visible: bool) -> String {
    let mut tokens: Vec<&str> = classes
        .split_whitespace()
        .filter(|t| *t != "hidden")
        .collect();
    if !visible {
        tokens.push("hidden");
    }
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_text() {
        let mut timer = Timer::new(120.0);
        assert_eq!(clock_text(&timer), "02:00");
        timer.remaining = 59.9;
        assert_eq!(clock_text(&timer), "00:59");
        assert_eq!(seconds_left(&timer), 60);
        timer.remaining = 0.0;
        assert_eq!(clock_text(&timer), "00:00");
        assert_eq!(seconds_left(&timer), 0);
    }

    #[test]
    fn test_urgency_bands() {
        assert_eq!(Urgency::from_remaining(90.0), Urgency::Normal);
        assert_eq!(Urgency::from_remaining(60.0), Urgency::Warning);
        assert_eq!(Urgency::from_remaining(30.0), Urgency::Critical);
        assert_eq!(Urgency::from_remaining(0.0), Urgency::Critical);
    }

    #[test]
    fn test_progress_and_count() {
        let mut timer = Timer::new(120.0);
        timer.remaining = 30.0;
        assert!((progress_percent(&timer) - 25.0).abs() < 1e-4);
        assert_eq!(count_text(3, 8), "Count: 3 / 8");
        assert_eq!(cleared_text(3, 10), "Cleared 3 / 10");
    }

    #[test]
    fn test_showing_a_panel_keeps_its_layout_class() {
        assert_eq!(with_hidden("overlay hidden", true), "overlay");
        assert_eq!(with_hidden("overlay", false), "overlay hidden");
        assert_eq!(with_hidden("hidden", true), "");
        assert_eq!(with_hidden("", false), "hidden");
    }

    #[test]
    fn test_toggling_is_idempotent() {
        let shown = with_hidden("overlay hidden", true);
        assert_eq!(with_hidden(&shown, true), "overlay");
        let hidden = with_hidden("overlay hidden", false);
        assert_eq!(hidden, "overlay hidden");
        assert_eq!(with_hidden(&hidden, false), "overlay hidden");
    }
}
