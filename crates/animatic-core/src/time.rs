//! Time representation for the animatic timeline.
//!
//! Panel timings are edited in milliseconds, but export walks the timeline
//! at exact frame boundaries. Rational arithmetic keeps both views in sync
//! without floating-point drift over long sequences.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// A point in time (or a duration) on the animatic timeline.
///
/// Stored as a rational number of seconds so that millisecond-edited
/// values and frame-exact virtual timestamps compare exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time {
    value: Rational64,
}

impl Time {
    /// Time of `numerator / denominator` seconds.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new(numerator, denominator),
        }
    }

    /// Exact time from integer milliseconds, the unit panel timings are
    /// edited in.
    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        Self {
            value: Rational64::new(millis, 1000),
        }
    }

    /// Exact virtual timestamp of frame `frame` at the given rate.
    #[inline]
    pub fn from_frames(frames: i64, rate: FrameRate) -> Self {
        Self {
            value: Rational64::new(frames * rate.denominator as i64, rate.numerator as i64),
        }
    }

    /// Approximate time from float seconds. May introduce sub-microsecond
    /// rounding; fine for wall-clock deltas, not for stored timings.
    pub fn from_seconds_f64(seconds: f64) -> Self {
        const PRECISION: i64 = 1_000_000;
        Self {
            value: Rational64::new((seconds * PRECISION as f64).round() as i64, PRECISION),
        }
    }

    /// Convert to seconds as f64.
    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Convert to milliseconds as f64.
    #[inline]
    pub fn to_millis_f64(self) -> f64 {
        self.to_seconds_f64() * 1000.0
    }

    /// Frame number containing this time at the given rate (floor).
    #[inline]
    pub fn to_frames(self, rate: FrameRate) -> i64 {
        let frames = self.value * Rational64::new(rate.numerator as i64, rate.denominator as i64);
        frames.floor().to_integer()
    }

    /// Number of whole frames needed to cover this duration (ceiling).
    /// This is the frame count an export of this duration renders.
    #[inline]
    pub fn to_frames_ceil(self, rate: FrameRate) -> i64 {
        let frames = self.value * Rational64::new(rate.numerator as i64, rate.denominator as i64);
        frames.ceil().to_integer()
    }

    /// Snap to the nearest frame boundary at the given rate.
    pub fn snap_to_frame(self, rate: FrameRate) -> Self {
        let frames = self.value * Rational64::new(rate.numerator as i64, rate.denominator as i64);
        Self::from_frames(frames.round().to_integer(), rate)
    }

    /// Scale by a float factor (playback rate). Approximate, wall-clock use.
    pub fn scale_f64(self, factor: f64) -> Self {
        Self::from_seconds_f64(self.to_seconds_f64() * factor)
    }

    /// Clamp into `[lo, hi]`.
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        if self < lo {
            lo
        } else if self > hi {
            hi
        } else {
            self
        }
    }

    /// Zero time constant.
    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };

    /// Check if this time is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        *self.value.numer() == 0
    }

    /// Check if this time is negative.
    #[inline]
    pub fn is_negative(self) -> bool {
        *self.value.numer() < 0
    }

    /// Negative values become zero. Durations are never negative.
    #[inline]
    pub fn max_zero(self) -> Self {
        if self.is_negative() {
            Self::ZERO
        } else {
            self
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Time {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
        }
    }
}

impl Sub for Time {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
        }
    }
}

impl Mul<i64> for Time {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self {
            value: self.value * rhs,
        }
    }
}

impl Div<i64> for Time {
    type Output = Self;
    fn div(self, rhs: i64) -> Self {
        Self {
            value: self.value / rhs,
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}

/// Frame rate as a rational number of frames per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Integer frames per second, the form export settings carry.
    #[inline]
    pub const fn from_fps(fps: u32) -> Self {
        Self::new(fps, 1)
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Duration of a single frame.
    #[inline]
    pub fn frame_duration(self) -> Time {
        Time::new(self.denominator as i64, self.numerator as i64)
    }

    // Rates the animatic preview and export offer
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// A time range with inclusive start and exclusive end. Used for panel
/// windows and tail transition windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time (inclusive)
    pub start: Time,
    /// Duration of the range
    pub duration: Time,
}

impl TimeRange {
    /// Create a new time range from start and duration.
    #[inline]
    pub fn new(start: Time, duration: Time) -> Self {
        Self { start, duration }
    }

    /// Create a time range from start and end times.
    #[inline]
    pub fn from_start_end(start: Time, end: Time) -> Self {
        Self {
            start,
            duration: end - start,
        }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> Time {
        self.start + self.duration
    }

    /// Check if a time is within this range.
    #[inline]
    pub fn contains(self, time: Time) -> bool {
        time >= self.start && time < self.end()
    }

    /// Progress of `time` through the range in `[0,1]`, clamped.
    pub fn progress(self, time: Time) -> f64 {
        let span = self.duration.to_seconds_f64();
        if span <= 0.0 {
            return 1.0;
        }
        (((time - self.start).to_seconds_f64()) / span).clamp(0.0, 1.0)
    }

    /// Empty range starting at zero.
    pub const EMPTY: Self = Self {
        start: Time::ZERO,
        duration: Time::ZERO,
    };
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn millis_roundtrip_is_exact() {
        let t = Time::from_millis(2100);
        assert_eq!(t.to_millis_f64(), 2100.0);
        assert_eq!(t, Time::new(21, 10));
    }

    #[test]
    fn frame_timestamps_are_exact() {
        let rate = FrameRate::FPS_30;
        let t = Time::from_frames(90, rate);
        assert_eq!(t, Time::new(3, 1));
        assert_eq!(t.to_frames(rate), 90);
    }

    #[test]
    fn frames_ceil_covers_partial_frames() {
        let rate = FrameRate::FPS_30;
        // 6.5s at 30fps = 195 frames exactly
        assert_eq!(Time::from_millis(6500).to_frames_ceil(rate), 195);
        // 100ms at 30fps = 3 frames, ceil to 3
        assert_eq!(Time::from_millis(100).to_frames_ceil(rate), 3);
        // 101ms needs a 4th frame to cover the tail
        assert_eq!(Time::from_millis(101).to_frames_ceil(rate), 4);
    }

    #[test]
    fn snap_to_frame_rounds_to_boundary() {
        let rate = FrameRate::FPS_24;
        let t = Time::from_millis(1020); // 24.48 frames
        assert_eq!(t.snap_to_frame(rate), Time::from_frames(24, rate));
    }

    #[test]
    fn max_zero_clamps_negative() {
        let t = Time::from_millis(-500);
        assert!(t.is_negative());
        assert_eq!(t.max_zero(), Time::ZERO);
        assert_eq!(Time::from_millis(500).max_zero(), Time::from_millis(500));
    }

    #[test]
    fn range_contains_and_progress() {
        let r = TimeRange::new(Time::from_millis(2000), Time::from_millis(500));
        assert!(r.contains(Time::from_millis(2000)));
        assert!(r.contains(Time::from_millis(2499)));
        assert!(!r.contains(Time::from_millis(2500)));
        assert!((r.progress(Time::from_millis(2250)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn clamp_into_range() {
        let lo = Time::ZERO;
        let hi = Time::from_millis(6500);
        assert_eq!(Time::from_millis(-10).clamp(lo, hi), lo);
        assert_eq!(Time::from_millis(9000).clamp(lo, hi), hi);
        let mid = Time::from_millis(3000);
        assert_eq!(mid.clamp(lo, hi), mid);
    }

    proptest! {
        #[test]
        fn sum_of_millis_matches_total(durations in prop::collection::vec(0i64..60_000, 0..32)) {
            let total: Time = durations
                .iter()
                .fold(Time::ZERO, |acc, &ms| acc + Time::from_millis(ms));
            let expected: i64 = durations.iter().sum();
            prop_assert_eq!(total, Time::from_millis(expected));
        }

        #[test]
        fn frame_ceil_never_undershoots(ms in 0i64..3_600_000, fps in 1u32..121) {
            let rate = FrameRate::from_fps(fps);
            let duration = Time::from_millis(ms);
            let frames = duration.to_frames_ceil(rate);
            prop_assert!(Time::from_frames(frames, rate) >= duration);
        }
    }
}
