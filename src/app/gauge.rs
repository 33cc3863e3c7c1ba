use std::time::{Duration, Instant};
use ratatui::style::Color;

/// Raw reading that maps to a full bar.
pub const FULL_SCALE: f64 = 200.0;

const THRESHOLDS: [f64; 3] = [40.0, 80.0, 100.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdColor {
    Blue,
    Green,
    Red,
}

impl ThresholdColor {
    const ORDER: [ThresholdColor; 3] = [Self::Blue, Self::Green, Self::Red];

    /// First threshold the progress does not exceed, red otherwise.
    pub fn for_progress(progress: f64) -> Self {
        THRESHOLDS
            .iter()
            .position(|threshold| progress <= *threshold)
            .map_or(Self::Red, |idx| Self::ORDER[idx])
    }

    pub fn rgba(self) -> [f32; 4] {
        match self {
            Self::Blue => [0.0, 0.0, 1.0, 1.0],
            Self::Green => [0.0, 1.0, 0.0, 1.0],
            Self::Red => [1.0, 0.0, 0.0, 1.0],
        }
    }
}

impl From<ThresholdColor> for Color {
    fn from(color: ThresholdColor) -> Self {
        let [r, g, b, _] = color.rgba();
        Color::Rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
    }
}

/// Scales a reading onto the bar. Not clamped.
pub fn progress_for(value: f64) -> f64 {
    (value / FULL_SCALE) * 100.0
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
}

impl Animation {
    fn value_at(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.start);
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * t
    }
}

#[derive(Debug)]
pub struct ProgressBar {
    value: f64,
    color: ThresholdColor,
    animation: Option<Animation>,
    duration: Duration,
}

impl ProgressBar {
    pub fn new(duration: Duration) -> Self {
        Self {
            value: 0.0,
            color: ThresholdColor::Green,
            animation: None,
            duration,
        }
    }

    /// Value shown at `now`, following the running animation if any.
    pub fn value_at(&self, now: Instant) -> f64 {
        self.animation.map_or(self.value, |anim| anim.value_at(now))
    }

    /// Value the bar settles on.
    pub fn target(&self) -> f64 {
        self.animation.map_or(self.value, |anim| anim.to)
    }

    pub fn color(&self) -> ThresholdColor {
        self.color
    }

    /// Replaces any running animation with one heading to the progress
    /// of `value`. The color switches at once.
    pub fn update(&mut self, value: f64, now: Instant) {
        let progress = progress_for(value);
        self.value = self.value_at(now);
        self.animation = Some(Animation {
            from: self.value,
            to: progress,
            start: now,
            duration: self.duration,
        });
        self.color = ThresholdColor::for_progress(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_scales_without_clamping() {
        assert_eq!(progress_for(0.0), 0.0);
        assert_eq!(progress_for(200.0), 100.0);
        assert_eq!(progress_for(400.0), 200.0);
        assert_eq!(progress_for(23.5), 11.75);
    }

    #[test]
    fn color_follows_thresholds() {
        assert_eq!(ThresholdColor::for_progress(0.0), ThresholdColor::Blue);
        assert_eq!(ThresholdColor::for_progress(40.0), ThresholdColor::Blue);
        assert_eq!(ThresholdColor::for_progress(40.5), ThresholdColor::Green);
        assert_eq!(ThresholdColor::for_progress(80.0), ThresholdColor::Green);
        assert_eq!(ThresholdColor::for_progress(80.1), ThresholdColor::Red);
        assert_eq!(ThresholdColor::for_progress(100.0), ThresholdColor::Red);
        assert_eq!(ThresholdColor::for_progress(150.0), ThresholdColor::Red);
        assert_eq!(ThresholdColor::for_progress(f64::NAN), ThresholdColor::Red);
    }

    #[test]
    fn colors_map_to_terminal_rgb() {
        assert_eq!(Color::from(ThresholdColor::Blue), Color::Rgb(0, 0, 255));
        assert_eq!(Color::from(ThresholdColor::Green), Color::Rgb(0, 255, 0));
        assert_eq!(Color::from(ThresholdColor::Red), Color::Rgb(255, 0, 0));
    }

    #[test]
    fn animation_reaches_target_after_duration() {
        let start = Instant::now();
        let mut bar = ProgressBar::new(Duration::from_secs(1));
        bar.update(100.0, start);

        assert_eq!(bar.value_at(start), 0.0);
        assert_eq!(bar.value_at(start + Duration::from_millis(500)), 25.0);
        assert_eq!(bar.value_at(start + Duration::from_secs(1)), 50.0);
        assert_eq!(bar.value_at(start + Duration::from_secs(3)), 50.0);
        assert_eq!(bar.target(), 50.0);
        assert_eq!(bar.color(), ThresholdColor::Green);
    }

    #[test]
    fn new_update_restarts_from_displayed_value() {
        let start = Instant::now();
        let mut bar = ProgressBar::new(Duration::from_secs(1));
        bar.update(100.0, start);

        let midway = start + Duration::from_millis(500);
        bar.update(0.0, midway);

        assert_eq!(bar.value_at(midway), 25.0);
        assert_eq!(bar.value_at(midway + Duration::from_millis(500)), 12.5);
        assert_eq!(bar.value_at(midway + Duration::from_secs(1)), 0.0);
        assert_eq!(bar.color(), ThresholdColor::Blue);
    }
}
