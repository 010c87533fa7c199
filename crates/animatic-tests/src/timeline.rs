//! Integration tests for the timeline model and its serialization.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use animatic_core::{PanelId, Time};
use animatic_timeline::{
    AudioTrack, AudioTrackKind, KenBurnsUpdate, TimelineModel, TimingDocument, TransitionKind,
};

// ── Helpers ────────────────────────────────────────────────────

fn build_model(durations_ms: &[i64]) -> (Vec<PanelId>, TimelineModel) {
    let ids: Vec<PanelId> = durations_ms.iter().map(|_| PanelId::generate()).collect();
    let mut model = TimelineModel::new();
    model.initialize_panels(&ids);
    for (id, ms) in ids.iter().zip(durations_ms) {
        model.set_panel_duration(*id, Time::from_millis(*ms));
    }
    (ids, model)
}

// ── Timing and queries across panels ───────────────────────────

#[test]
fn total_duration_is_sum_of_panels() {
    crate::init_tracing();
    let (_, model) = build_model(&[2000, 3000, 1500]);
    assert_eq!(model.total_duration(), Time::from_millis(6500));
}

#[test]
fn time_query_lands_in_second_panel() {
    let (ids, model) = build_model(&[2000, 3000, 1500]);
    let sample = model.panel_at_time(Time::from_millis(2100)).unwrap();
    assert_eq!(sample.panel_id, ids[1]);
    assert_eq!(sample.index, 1);
    assert_eq!(sample.local_time, Time::from_millis(100));
}

#[test]
fn panel_windows_are_half_open() {
    let (ids, model) = build_model(&[2000, 3000, 1500]);
    assert_eq!(model.panel_at_time(Time::from_millis(2000)).unwrap().panel_id, ids[1]);
    assert_eq!(model.panel_at_time(Time::from_millis(5000)).unwrap().panel_id, ids[2]);
    // past the end saturates at the last panel, fully elapsed
    let past = model.panel_at_time(Time::from_millis(9000)).unwrap();
    assert_eq!(past.panel_id, ids[2]);
    assert_eq!(past.progress, 1.0);
}

#[test]
fn transition_occupies_panel_tail() {
    let (ids, mut model) = build_model(&[2000, 3000]);
    model.set_panel_transition(ids[0], TransitionKind::Fade, Some(Time::from_millis(500)));

    // 1500..2000 is the fade window
    assert!(model.transition_state(Time::from_millis(1400)).is_none());
    let active = model.transition_state(Time::from_millis(1750)).unwrap();
    assert_eq!(active.from_panel, ids[0]);
    assert_eq!(active.to_panel, ids[1]);
    assert_eq!(active.kind, TransitionKind::Fade);
    assert!((active.progress - 0.5).abs() < 1e-9);
    assert!(model.transition_state(Time::from_millis(2000)).is_none());
}

#[test]
fn ken_burns_interpolates_midway() {
    let (ids, mut model) = build_model(&[4000]);
    model.set_ken_burns_effect(
        ids[0],
        &KenBurnsUpdate {
            enabled: Some(true),
            start_scale: Some(1.0),
            end_scale: Some(1.2),
            ..Default::default()
        },
    );
    let transform = model.ken_burns_transform(ids[0], 0.5);
    assert!((transform.scale - 1.1).abs() < 1e-9);
}

// ── Playback clock ─────────────────────────────────────────────

#[test]
fn play_tick_pause_advances_and_holds() {
    let (_, mut model) = build_model(&[2000, 2000]);
    model.play();
    model.tick(Time::from_millis(500));
    model.tick(Time::from_millis(500));
    assert_eq!(model.state().current_time, Time::from_millis(1000));

    model.pause();
    model.tick(Time::from_millis(500));
    assert_eq!(model.state().current_time, Time::from_millis(1000));
}

#[test]
fn playback_rate_scales_wall_clock() {
    let (_, mut model) = build_model(&[4000]);
    model.set_playback_rate(2.0);
    model.play();
    model.tick(Time::from_millis(1000));
    assert_eq!(model.state().current_time, Time::from_millis(2000));
}

#[test]
fn reaching_the_end_auto_pauses_without_loop() {
    let (_, mut model) = build_model(&[1000]);
    model.play();
    model.tick(Time::from_millis(1500));
    let state = model.state();
    assert!(!state.is_playing);
    assert_eq!(state.current_time, Time::from_millis(1000));

    // play again restarts from the top
    model.play();
    assert_eq!(model.state().current_time, Time::ZERO);
    assert!(model.state().is_playing);
}

#[test]
fn looping_wraps_the_clock() {
    let (_, mut model) = build_model(&[1000]);
    model.set_loop(true);
    model.play();
    model.tick(Time::from_millis(2300));
    let state = model.state();
    assert!(state.is_playing);
    assert_eq!(state.current_time, Time::from_millis(300));
}

#[test]
fn listeners_see_every_clock_change() {
    let (ids, mut model) = build_model(&[1000, 1000]);
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_inner = Arc::clone(&hits);
    let listener = model.subscribe(move |_| {
        hits_inner.fetch_add(1, Ordering::SeqCst);
    });

    model.play();
    model.tick(Time::from_millis(100));
    model.seek_to_panel(ids[1]);
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    assert!(model.unsubscribe(listener));
    model.pause();
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

// ── Persistence round trip ─────────────────────────────────────

#[test]
fn timing_document_round_trip_preserves_queries() {
    let (ids, mut model) = build_model(&[2000, 3000, 1500]);
    model.set_panel_transition(ids[1], TransitionKind::PushLeft, Some(Time::from_millis(800)));
    model.add_audio_track(
        AudioTrack::new("VO", AudioTrackKind::Voiceover, "vo.ogg")
            .at(Time::from_millis(500), Time::from_millis(4000)),
    );
    model.add_audio_marker(ids[0], Time::from_millis(250), "beat", "drum hit");

    let json = model.export_timing_data().to_json().unwrap();
    let mut restored = TimelineModel::new();
    restored
        .import_timing_data(TimingDocument::from_json(&json).unwrap())
        .unwrap();

    assert_eq!(restored.total_duration(), model.total_duration());
    assert_eq!(restored.audio_tracks().len(), 1);
    let sample = restored.panel_at_time(Time::from_millis(2100)).unwrap();
    assert_eq!(sample.panel_id, ids[1]);
    let active = restored.transition_state(Time::from_millis(4500)).unwrap();
    assert_eq!(active.kind, TransitionKind::PushLeft);
}

#[test]
fn audio_track_lifecycle_by_id() {
    let (_, mut model) = build_model(&[2000]);
    let id = model.add_audio_track(AudioTrack::new("Music", AudioTrackKind::Music, "bed.mp3"));
    assert!(model.update_audio_track(
        id,
        &animatic_timeline::AudioTrackUpdate {
            volume: Some(0.5),
            ..Default::default()
        },
    ));
    assert_eq!(model.audio_tracks()[0].volume, 0.5);

    assert!(!model.update_audio_track(uuid::Uuid::new_v4(), &Default::default()));
    assert!(model.remove_audio_track(id));
    assert!(model.audio_tracks().is_empty());
}

#[test]
fn reinitializing_panels_keeps_known_timings() {
    let (ids, mut model) = build_model(&[2000, 3000]);
    // drop the first panel, add a new one
    let new_panel = PanelId::generate();
    model.initialize_panels(&[ids[1], new_panel]);

    assert_eq!(model.timing(ids[1]).unwrap().duration, Time::from_millis(3000));
    assert!(model.timing(ids[0]).is_none());
    // the new panel picked up default timing
    assert!(model.timing(new_panel).is_some());
}
