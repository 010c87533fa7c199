//! Audio tracks positioned on the global timeline.
//!
//! The engine only places audio; decoding and mixing belong to the host.

use animatic_core::Time;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of audio track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioTrackKind {
    #[default]
    Music,
    Voiceover,
    Sfx,
}

/// An audio track on the global timeline, independent of panel boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    /// Generated by the model on add.
    pub id: Uuid,
    pub name: String,
    pub kind: AudioTrackKind,
    /// Decodable audio asset reference; resolved by the host.
    pub url: String,
    /// Position on the global timeline.
    pub start_time: Time,
    pub duration: Time,
    /// Linear gain in `[0, 1]`.
    pub volume: f64,
    pub fade_in: Time,
    pub fade_out: Time,
    pub muted: bool,
}

impl AudioTrack {
    /// New track with neutral volume and no fades, starting at zero.
    pub fn new(name: impl Into<String>, kind: AudioTrackKind, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::nil(),
            name: name.into(),
            kind,
            url: url.into(),
            start_time: Time::ZERO,
            duration: Time::ZERO,
            volume: 1.0,
            fade_in: Time::ZERO,
            fade_out: Time::ZERO,
            muted: false,
        }
    }

    /// Timeline position builder.
    pub fn at(mut self, start_time: Time, duration: Time) -> Self {
        self.start_time = start_time;
        self.duration = duration.max_zero();
        self
    }
}

/// Partial update merged into an [`AudioTrack`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioTrackUpdate {
    pub name: Option<String>,
    pub kind: Option<AudioTrackKind>,
    pub url: Option<String>,
    pub start_time: Option<Time>,
    pub duration: Option<Time>,
    pub volume: Option<f64>,
    pub fade_in: Option<Time>,
    pub fade_out: Option<Time>,
    pub muted: Option<bool>,
}

impl AudioTrackUpdate {
    pub(crate) fn merge_into(&self, track: &mut AudioTrack) {
        if let Some(name) = &self.name {
            track.name = name.clone();
        }
        if let Some(kind) = self.kind {
            track.kind = kind;
        }
        if let Some(url) = &self.url {
            track.url = url.clone();
        }
        if let Some(start_time) = self.start_time {
            track.start_time = start_time.max_zero();
        }
        if let Some(duration) = self.duration {
            track.duration = duration.max_zero();
        }
        if let Some(volume) = self.volume {
            track.volume = volume.clamp(0.0, 1.0);
        }
        if let Some(fade_in) = self.fade_in {
            track.fade_in = fade_in.max_zero();
        }
        if let Some(fade_out) = self.fade_out {
            track.fade_out = fade_out.max_zero();
        }
        if let Some(muted) = self.muted {
            track.muted = muted;
        }
    }
}
