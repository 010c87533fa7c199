//! Per-panel timing records.

use animatic_core::{Easing, PanelId, Time};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

/// The eleven transition algorithms the compositor implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    #[default]
    Cut,
    Fade,
    Dissolve,
    WipeLeft,
    WipeRight,
    WipeUp,
    WipeDown,
    PushLeft,
    PushRight,
    ZoomIn,
    ZoomOut,
}

impl TransitionKind {
    /// All transition kinds, in UI listing order.
    pub const ALL: [TransitionKind; 11] = [
        TransitionKind::Cut,
        TransitionKind::Fade,
        TransitionKind::Dissolve,
        TransitionKind::WipeLeft,
        TransitionKind::WipeRight,
        TransitionKind::WipeUp,
        TransitionKind::WipeDown,
        TransitionKind::PushLeft,
        TransitionKind::PushRight,
        TransitionKind::ZoomIn,
        TransitionKind::ZoomOut,
    ];

    /// Serialized name.
    pub fn name(self) -> &'static str {
        match self {
            TransitionKind::Cut => "cut",
            TransitionKind::Fade => "fade",
            TransitionKind::Dissolve => "dissolve",
            TransitionKind::WipeLeft => "wipe-left",
            TransitionKind::WipeRight => "wipe-right",
            TransitionKind::WipeUp => "wipe-up",
            TransitionKind::WipeDown => "wipe-down",
            TransitionKind::PushLeft => "push-left",
            TransitionKind::PushRight => "push-right",
            TransitionKind::ZoomIn => "zoom-in",
            TransitionKind::ZoomOut => "zoom-out",
        }
    }
}

/// How a panel blends into its successor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub kind: TransitionKind,
    pub duration: Time,
    pub easing: Easing,
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self {
            kind: TransitionKind::Cut,
            duration: Time::from_millis(500),
            easing: Easing::Linear,
        }
    }
}

/// Continuous pan-and-zoom applied to a still panel over its screen time.
///
/// Offsets are center-relative in `[-1, 1]`; scale ≥ 1 zooms in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KenBurnsEffect {
    pub enabled: bool,
    pub start_scale: f64,
    pub end_scale: f64,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub easing: Easing,
}

impl Default for KenBurnsEffect {
    fn default() -> Self {
        Self {
            enabled: false,
            start_scale: 1.0,
            end_scale: 1.0,
            start_x: 0.0,
            start_y: 0.0,
            end_x: 0.0,
            end_y: 0.0,
            easing: Easing::Linear,
        }
    }
}

impl KenBurnsEffect {
    /// Whether this effect leaves the panel untouched at every progress.
    pub fn is_identity(&self) -> bool {
        !self.enabled
            || (self.start_scale == 1.0
                && self.end_scale == 1.0
                && self.start_x == self.end_x
                && self.start_y == self.end_y
                && self.start_x == 0.0
                && self.start_y == 0.0)
    }
}

/// The pan/zoom transform at one instant, applied about the surface center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KenBurnsTransform {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
}

impl KenBurnsTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.x == 0.0 && self.y == 0.0
    }
}

/// Informational marker on a panel's local time axis. Never validated
/// against the panel duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMarker {
    pub id: Uuid,
    /// Relative to the owning panel's start.
    pub time: Time,
    pub kind: String,
    pub label: String,
}

/// Timing record for one panel.
///
/// `hold_time + transition.duration == duration` is maintained by the
/// model: `hold_time` is always re-derived from the other two (clamped to
/// zero), so the transition window is the tail of the panel's screen time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelTiming {
    pub panel_id: PanelId,
    pub duration: Time,
    pub hold_time: Time,
    pub transition: TransitionSpec,
    pub ken_burns: KenBurnsEffect,
    pub audio_markers: SmallVec<[AudioMarker; 4]>,
}

impl PanelTiming {
    /// System defaults assigned when a panel enters the timeline:
    /// 3000 ms on screen, 2500 ms hold, 500 ms cut, Ken Burns disabled.
    pub fn with_defaults(panel_id: PanelId) -> Self {
        Self {
            panel_id,
            duration: Time::from_millis(3000),
            hold_time: Time::from_millis(2500),
            transition: TransitionSpec::default(),
            ken_burns: KenBurnsEffect::default(),
            audio_markers: SmallVec::new(),
        }
    }

    /// Re-derive `hold_time` from `duration - transition.duration`.
    pub(crate) fn rederive_hold_time(&mut self) {
        self.hold_time = (self.duration - self.transition.duration).max_zero();
    }
}

// ── Partial updates ─────────────────────────────────────────────

/// Partial update merged into a [`TransitionSpec`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TransitionUpdate {
    pub kind: Option<TransitionKind>,
    pub duration: Option<Time>,
    pub easing: Option<Easing>,
}

impl TransitionUpdate {
    pub(crate) fn merge_into(&self, spec: &mut TransitionSpec) {
        if let Some(kind) = self.kind {
            spec.kind = kind;
        }
        if let Some(duration) = self.duration {
            spec.duration = duration.max_zero();
        }
        if let Some(easing) = self.easing {
            spec.easing = easing;
        }
    }
}

/// Partial update merged into a [`KenBurnsEffect`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct KenBurnsUpdate {
    pub enabled: Option<bool>,
    pub start_scale: Option<f64>,
    pub end_scale: Option<f64>,
    pub start_x: Option<f64>,
    pub start_y: Option<f64>,
    pub end_x: Option<f64>,
    pub end_y: Option<f64>,
    pub easing: Option<Easing>,
}

impl KenBurnsUpdate {
    pub(crate) fn merge_into(&self, effect: &mut KenBurnsEffect) {
        if let Some(enabled) = self.enabled {
            effect.enabled = enabled;
        }
        if let Some(v) = self.start_scale {
            effect.start_scale = v.max(1.0);
        }
        if let Some(v) = self.end_scale {
            effect.end_scale = v.max(1.0);
        }
        if let Some(v) = self.start_x {
            effect.start_x = v.clamp(-1.0, 1.0);
        }
        if let Some(v) = self.start_y {
            effect.start_y = v.clamp(-1.0, 1.0);
        }
        if let Some(v) = self.end_x {
            effect.end_x = v.clamp(-1.0, 1.0);
        }
        if let Some(v) = self.end_y {
            effect.end_y = v.clamp(-1.0, 1.0);
        }
        if let Some(easing) = self.easing {
            effect.easing = easing;
        }
    }
}

/// Partial update merged into a [`PanelTiming`]. Nested transition and
/// Ken Burns updates merge field-by-field instead of replacing the whole
/// object. There is intentionally no `hold_time` field: the model always
/// re-derives it from `duration - transition.duration`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PanelTimingUpdate {
    pub duration: Option<Time>,
    pub transition: Option<TransitionUpdate>,
    pub ken_burns: Option<KenBurnsUpdate>,
}

impl PanelTimingUpdate {
    pub(crate) fn merge_into(&self, timing: &mut PanelTiming) {
        if let Some(duration) = self.duration {
            timing.duration = duration.max_zero();
        }
        if let Some(transition) = &self.transition {
            transition.merge_into(&mut timing.transition);
        }
        if let Some(ken_burns) = &self.ken_burns {
            ken_burns.merge_into(&mut timing.ken_burns);
        }
        timing.rederive_hold_time();
    }
}
