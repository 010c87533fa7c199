//! Animatic Timeline - Timeline data model
//!
//! Implements the deterministic timeline behind the animatic preview:
//! - Ordered per-panel timing records with transitions and Ken Burns
//! - Audio tracks and per-panel markers
//! - Pure time-indexed queries (active panel, transition, pan/zoom)
//! - Play/pause/seek clock driven by host tick notifications
//! - Versioned timing-data serialization

pub mod audio;
pub mod model;
pub mod panel_timing;
pub mod serialization;

pub use audio::{AudioTrack, AudioTrackKind, AudioTrackUpdate};
pub use model::{
    ActiveTransition, ListenerId, PanelSample, TimelineModel, TimelineState,
};
pub use panel_timing::{
    AudioMarker, KenBurnsEffect, KenBurnsTransform, KenBurnsUpdate, PanelTiming,
    PanelTimingUpdate, TransitionKind, TransitionSpec, TransitionUpdate,
};
pub use serialization::{TimingDocument, CURRENT_VERSION};
