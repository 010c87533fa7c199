//! The timeline model: ordered per-panel timing records, audio tracks,
//! pure time-indexed queries, and the play/pause/seek clock.
//!
//! The model is caller-owned (no global instance) and single-threaded;
//! preview and export both hold `&TimelineModel` and only read. The
//! clock is advanced by [`TimelineModel::tick`], which is pure given the
//! previous state and an elapsed wall-clock delta, so tests drive it with
//! a fake clock.

use std::collections::HashMap;

use animatic_core::{Easing, FrameRate, PanelId, Time, TimeRange};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::audio::{AudioTrack, AudioTrackUpdate};
use crate::panel_timing::{
    AudioMarker, KenBurnsTransform, KenBurnsUpdate, PanelTiming, PanelTimingUpdate,
    TransitionKind, TransitionUpdate,
};

/// Derived playback state, recomputed on every mutation.
///
/// Listeners always receive this by value, never a live reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineState {
    pub current_time: Time,
    pub total_duration: Time,
    pub is_playing: bool,
    pub playback_rate: f64,
    pub looping: bool,
    pub current_panel_index: Option<usize>,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self {
            current_time: Time::ZERO,
            total_duration: Time::ZERO,
            is_playing: false,
            playback_rate: 1.0,
            looping: false,
            current_panel_index: None,
        }
    }
}

/// Which panel is active at a queried time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSample {
    pub panel_id: PanelId,
    pub index: usize,
    /// Time elapsed within the panel's window.
    pub local_time: Time,
    /// Progress through the panel's window in `[0, 1]`.
    pub progress: f64,
}

/// An in-progress transition between two adjacent panels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveTransition {
    pub from_panel: PanelId,
    pub to_panel: PanelId,
    pub kind: TransitionKind,
    pub easing: Easing,
    /// Progress through the transition window with the configured easing
    /// already applied.
    pub progress: f64,
}

/// Handle returned by [`TimelineModel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(TimelineState) + Send + Sync>;

/// Owner of all panel timing records and audio tracks.
pub struct TimelineModel {
    order: Vec<PanelId>,
    timings: HashMap<PanelId, PanelTiming>,
    audio_tracks: Vec<AudioTrack>,
    state: TimelineState,
    /// When set, edited durations are snapped to this frame granularity.
    frame_snap: Option<FrameRate>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

impl Default for TimelineModel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TimelineModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineModel")
            .field("panels", &self.order.len())
            .field("audio_tracks", &self.audio_tracks.len())
            .field("state", &self.state)
            .finish()
    }
}

impl TimelineModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            timings: HashMap::new(),
            audio_tracks: Vec::new(),
            state: TimelineState::default(),
            frame_snap: None,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Current derived state (snapshot copy).
    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// Ordered panel ids.
    pub fn panel_order(&self) -> &[PanelId] {
        &self.order
    }

    /// Timing record for one panel.
    pub fn timing(&self, id: PanelId) -> Option<&PanelTiming> {
        self.timings.get(&id)
    }

    /// Timing records in panel order.
    pub fn timings_in_order(&self) -> impl Iterator<Item = &PanelTiming> {
        self.order.iter().filter_map(|id| self.timings.get(id))
    }

    /// All audio tracks.
    pub fn audio_tracks(&self) -> &[AudioTrack] {
        &self.audio_tracks
    }

    /// Sum of all panel durations. Never stale: recomputed on every
    /// mutation.
    pub fn total_duration(&self) -> Time {
        self.state.total_duration
    }

    /// Configure (or clear) frame snapping for edited durations.
    pub fn set_frame_snap(&mut self, rate: Option<FrameRate>) {
        self.frame_snap = rate;
    }

    // ── Panel mutations ─────────────────────────────────────────

    /// Replace the active panel order.
    ///
    /// Ids already tracked keep their (possibly customized) timings; new
    /// ids get system defaults; ids no longer present are dropped.
    pub fn initialize_panels(&mut self, ordered_ids: &[PanelId]) {
        self.order = ordered_ids.to_vec();
        self.timings.retain(|id, _| self.order.contains(id));
        for &id in &self.order {
            self.timings
                .entry(id)
                .or_insert_with(|| PanelTiming::with_defaults(id));
        }
        debug!(panels = self.order.len(), "initialized panel order");
        self.after_mutation();
    }

    /// Merge a partial update into a panel's timing record. Unknown ids
    /// are a no-op.
    pub fn update_panel_timing(&mut self, id: PanelId, update: &PanelTimingUpdate) {
        let snap = self.frame_snap;
        let Some(timing) = self.timings.get_mut(&id) else {
            warn!(panel = %id, "update for unknown panel ignored");
            return;
        };
        update.merge_into(timing);
        Self::apply_snap(timing, snap);
        self.after_mutation();
    }

    /// Set a panel's total duration, re-deriving its hold time.
    pub fn set_panel_duration(&mut self, id: PanelId, duration: Time) {
        self.update_panel_timing(
            id,
            &PanelTimingUpdate {
                duration: Some(duration),
                ..Default::default()
            },
        );
    }

    /// Set a panel's outgoing transition kind and optionally its duration.
    pub fn set_panel_transition(
        &mut self,
        id: PanelId,
        kind: TransitionKind,
        duration: Option<Time>,
    ) {
        self.update_panel_timing(
            id,
            &PanelTimingUpdate {
                transition: Some(TransitionUpdate {
                    kind: Some(kind),
                    duration,
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
    }

    /// Merge a partial Ken Burns update into a panel.
    pub fn set_ken_burns_effect(&mut self, id: PanelId, update: &KenBurnsUpdate) {
        self.update_panel_timing(
            id,
            &PanelTimingUpdate {
                ken_burns: Some(*update),
                ..Default::default()
            },
        );
    }

    fn apply_snap(timing: &mut PanelTiming, snap: Option<FrameRate>) {
        if let Some(rate) = snap {
            timing.duration = timing.duration.snap_to_frame(rate).max_zero();
            timing.transition.duration = timing.transition.duration.snap_to_frame(rate).max_zero();
            timing.rederive_hold_time();
        }
    }

    // ── Audio tracks and markers ────────────────────────────────

    /// Add an audio track, assigning it a fresh id. Returns the id.
    pub fn add_audio_track(&mut self, mut track: AudioTrack) -> Uuid {
        let id = Uuid::new_v4();
        track.id = id;
        self.audio_tracks.push(track);
        id
    }

    /// Merge a partial update into an audio track. Returns false for
    /// unknown ids.
    pub fn update_audio_track(&mut self, id: Uuid, update: &AudioTrackUpdate) -> bool {
        match self.audio_tracks.iter_mut().find(|t| t.id == id) {
            Some(track) => {
                update.merge_into(track);
                true
            }
            None => false,
        }
    }

    /// Remove an audio track. Returns false for unknown ids.
    pub fn remove_audio_track(&mut self, id: Uuid) -> bool {
        let before = self.audio_tracks.len();
        self.audio_tracks.retain(|t| t.id != id);
        self.audio_tracks.len() != before
    }

    /// Add an informational marker on a panel's local time axis.
    /// Returns the generated marker id, or `None` for unknown panels.
    pub fn add_audio_marker(
        &mut self,
        panel_id: PanelId,
        time: Time,
        kind: impl Into<String>,
        label: impl Into<String>,
    ) -> Option<Uuid> {
        let timing = self.timings.get_mut(&panel_id)?;
        let id = Uuid::new_v4();
        timing.audio_markers.push(AudioMarker {
            id,
            time,
            kind: kind.into(),
            label: label.into(),
        });
        Some(id)
    }

    /// Remove a marker from a panel. Returns false if absent.
    pub fn remove_audio_marker(&mut self, panel_id: PanelId, marker_id: Uuid) -> bool {
        let Some(timing) = self.timings.get_mut(&panel_id) else {
            return false;
        };
        let before = timing.audio_markers.len();
        timing.audio_markers.retain(|m| m.id != marker_id);
        timing.audio_markers.len() != before
    }

    // ── Time-indexed queries ────────────────────────────────────

    /// Timeline start of a panel's window.
    pub fn panel_start_time(&self, id: PanelId) -> Option<Time> {
        let mut start = Time::ZERO;
        for &panel_id in &self.order {
            if panel_id == id {
                return Some(start);
            }
            start = start + self.duration_of(panel_id);
        }
        None
    }

    /// Which panel is active at time `t`.
    ///
    /// Past-the-end queries return the last panel saturated at
    /// `progress = 1` rather than failing; `None` only when the timeline
    /// is empty.
    pub fn panel_at_time(&self, t: Time) -> Option<PanelSample> {
        if self.order.is_empty() {
            return None;
        }
        let t = t.max_zero();
        let mut start = Time::ZERO;
        for (index, &panel_id) in self.order.iter().enumerate() {
            let duration = self.duration_of(panel_id);
            let window = TimeRange::new(start, duration);
            if window.contains(t) {
                return Some(PanelSample {
                    panel_id,
                    index,
                    local_time: t - start,
                    progress: window.progress(t),
                });
            }
            start = window.end();
        }
        // Saturate at the last panel
        let index = self.order.len() - 1;
        let panel_id = self.order[index];
        Some(PanelSample {
            panel_id,
            index,
            local_time: self.duration_of(panel_id),
            progress: 1.0,
        })
    }

    /// Whether `t` falls inside the tail transition window of a non-final
    /// panel. The last panel has no outgoing transition by construction.
    pub fn transition_state(&self, t: Time) -> Option<ActiveTransition> {
        if self.order.len() < 2 {
            return None;
        }
        let mut start = Time::ZERO;
        for pair in self.order.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let timing = self.timings.get(&from)?;
            // An oversized transition never spills past the panel's end.
            let available = (timing.duration - timing.hold_time).max_zero();
            let span = timing.transition.duration.clamp(Time::ZERO, available);
            let window = TimeRange::new(start + timing.hold_time, span);
            if window.contains(t) {
                let raw = window.progress(t);
                return Some(ActiveTransition {
                    from_panel: from,
                    to_panel: to,
                    kind: timing.transition.kind,
                    easing: timing.transition.easing,
                    progress: timing.transition.easing.apply(raw),
                });
            }
            start = start + timing.duration;
        }
        None
    }

    /// The pan/zoom transform of a panel at the given window progress.
    /// Identity when the effect is disabled or the panel is unknown.
    pub fn ken_burns_transform(&self, id: PanelId, progress: f64) -> KenBurnsTransform {
        let Some(timing) = self.timings.get(&id) else {
            return KenBurnsTransform::IDENTITY;
        };
        let effect = &timing.ken_burns;
        if effect.is_identity() {
            return KenBurnsTransform::IDENTITY;
        }
        let t = effect.easing.apply(progress.clamp(0.0, 1.0));
        KenBurnsTransform {
            scale: effect.start_scale + (effect.end_scale - effect.start_scale) * t,
            x: effect.start_x + (effect.end_x - effect.start_x) * t,
            y: effect.start_y + (effect.end_y - effect.start_y) * t,
        }
    }

    fn duration_of(&self, id: PanelId) -> Time {
        self.timings
            .get(&id)
            .map(|t| t.duration)
            .unwrap_or(Time::ZERO)
    }

    // ── Playback clock ──────────────────────────────────────────

    /// Start playback at the current position.
    pub fn play(&mut self) {
        if self.state.is_playing {
            return;
        }
        // Pressing play at the end restarts from the top
        if !self.state.looping && self.state.current_time >= self.state.total_duration {
            self.state.current_time = Time::ZERO;
        }
        self.state.is_playing = true;
        self.after_clock_change();
    }

    /// Pause playback, keeping the current position.
    pub fn pause(&mut self) {
        if !self.state.is_playing {
            return;
        }
        self.state.is_playing = false;
        self.after_clock_change();
    }

    /// Stop playback and rewind to zero.
    pub fn stop(&mut self) {
        self.state.is_playing = false;
        self.state.current_time = Time::ZERO;
        self.after_clock_change();
    }

    /// Seek to an absolute time, clamped into `[0, total_duration]`.
    pub fn seek(&mut self, t: Time) {
        self.state.current_time = t.clamp(Time::ZERO, self.state.total_duration);
        self.after_clock_change();
    }

    /// Seek to the start of a panel's window. Unknown ids are a no-op.
    pub fn seek_to_panel(&mut self, id: PanelId) {
        if let Some(start) = self.panel_start_time(id) {
            self.seek(start);
        }
    }

    /// Set the playback rate. Non-positive rates are rejected.
    pub fn set_playback_rate(&mut self, rate: f64) {
        if rate <= 0.0 || !rate.is_finite() {
            warn!(rate, "ignoring non-positive playback rate");
            return;
        }
        self.state.playback_rate = rate;
        self.after_clock_change();
    }

    /// Enable or disable looping at the end of the timeline.
    pub fn set_loop(&mut self, looping: bool) {
        self.state.looping = looping;
        self.after_clock_change();
    }

    /// Advance the clock by an elapsed wall-clock delta.
    ///
    /// The host calls this from its display-refresh loop; tests call it
    /// with synthetic deltas. Does nothing while paused. On reaching the
    /// end, wraps to zero when looping, otherwise clamps and auto-pauses.
    pub fn tick(&mut self, elapsed_wall: Time) {
        if !self.state.is_playing || elapsed_wall.is_negative() {
            return;
        }
        let total = self.state.total_duration;
        if total.is_zero() {
            return;
        }
        let mut t = self.state.current_time + elapsed_wall.scale_f64(self.state.playback_rate);
        if t >= total {
            if self.state.looping {
                while t >= total {
                    t = t - total;
                }
            } else {
                t = total;
                self.state.is_playing = false;
            }
        }
        self.state.current_time = t;
        self.after_clock_change();
    }

    // ── Subscriptions ───────────────────────────────────────────

    /// Register a listener notified synchronously after every state
    /// change with a snapshot copy.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(TimelineState) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn notify(&self) {
        let snapshot = self.state;
        for (_, listener) in &self.listeners {
            listener(snapshot);
        }
    }

    /// Recompute derived state after a timing mutation and notify.
    fn after_mutation(&mut self) {
        self.state.total_duration = self
            .timings_in_order()
            .fold(Time::ZERO, |acc, t| acc + t.duration);
        self.state.current_time = self
            .state
            .current_time
            .clamp(Time::ZERO, self.state.total_duration);
        self.state.current_panel_index = self
            .panel_at_time(self.state.current_time)
            .map(|s| s.index);
        self.notify();
    }

    /// Replace the model's contents wholesale (timing-data import).
    pub(crate) fn restore(
        &mut self,
        order: Vec<PanelId>,
        timings: HashMap<PanelId, PanelTiming>,
        audio_tracks: Vec<AudioTrack>,
    ) {
        self.order = order;
        self.timings = timings;
        self.audio_tracks = audio_tracks;
        self.after_mutation();
    }

    fn after_clock_change(&mut self) {
        self.state.current_panel_index = self
            .panel_at_time(self.state.current_time)
            .map(|s| s.index);
        self.notify();
    }
}
