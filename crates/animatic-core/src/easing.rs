//! Easing functions for time-based interpolation.
//!
//! Every interpolation in the engine (transition progress, Ken Burns
//! pan/zoom, audio fades) converts "elapsed time in a window" to
//! "perceived progress" through one of these functions. All of them are
//! pure and total over `[0,1]`; the Bézier variant may overshoot.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cubic Bézier control points for easing (x1, y1, x2, y2).
/// The curve goes from (0,0) to (1,1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample_x(&self, t: f64) -> f64 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        3.0 * mt2 * t * self.x1 + 3.0 * mt * t2 * self.x2 + t3
    }

    fn sample_y(&self, t: f64) -> f64 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        3.0 * mt2 * t * self.y1 + 3.0 * mt * t2 * self.y2 + t3
    }

    fn sample_dx(&self, t: f64) -> f64 {
        let mt = 1.0 - t;
        3.0 * mt * mt * self.x1 + 6.0 * mt * t * (self.x2 - self.x1) + 3.0 * t * t * (1.0 - self.x2)
    }

    /// Solve for the parameter t given an x value using Newton-Raphson.
    /// Returns the y value at that x.
    pub fn evaluate(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        let mut t = x; // initial guess

        for _ in 0..8 {
            let x_est = self.sample_x(t) - x;
            let dx = self.sample_dx(t);
            if dx.abs() < 1e-12 {
                break;
            }
            t -= x_est / dx;
            t = t.clamp(0.0, 1.0);
            if x_est.abs() < 1e-10 {
                break;
            }
        }

        self.sample_y(t)
    }

    pub const EASE: Self = Self::new(0.25, 0.1, 0.25, 1.0);
}

/// Named easing function.
///
/// The serialized names (`"ease-in"`, `"ease-in-cubic"`, ...) match the
/// timing values the authoring UI stores per panel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    /// Custom cubic Bézier curve. Not part of the fixed registry, but
    /// accepted wherever an easing is configured.
    #[serde(untagged)]
    Bezier(CubicBezier),
}

impl Easing {
    /// The fixed registry of named easings, in UI listing order.
    pub const ALL: [Easing; 7] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
    ];

    /// Map normalized progress to eased progress.
    ///
    /// Input outside `[0,1]` is clamped first; the Bézier variant may
    /// still return values outside `[0,1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    0.5 * u * u * u + 1.0
                }
            }
            Easing::Bezier(bezier) => bezier.evaluate(t),
        }
    }

    /// Registry lookup by serialized name. Unknown names return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Easing::Linear),
            "ease-in" => Some(Easing::EaseIn),
            "ease-out" => Some(Easing::EaseOut),
            "ease-in-out" => Some(Easing::EaseInOut),
            "ease-in-cubic" => Some(Easing::EaseInCubic),
            "ease-out-cubic" => Some(Easing::EaseOutCubic),
            "ease-in-out-cubic" => Some(Easing::EaseInOutCubic),
            _ => None,
        }
    }

    /// Serialized name of this easing.
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
            Easing::EaseInCubic => "ease-in-cubic",
            Easing::EaseOutCubic => "ease-out-cubic",
            Easing::EaseInOutCubic => "ease-in-out-cubic",
            Easing::Bezier(_) => "bezier",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Linear interpolation with an easing applied to `t`.
#[inline]
pub fn lerp_eased(from: f64, to: f64, t: f64, easing: Easing) -> f64 {
    from + (to - from) * easing.apply(t)
}
