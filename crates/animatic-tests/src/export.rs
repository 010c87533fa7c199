//! End-to-end export tests: timeline through compositor into a fake
//! streaming encoder.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use animatic_core::{AnimaticError, Bitmap, Color, FrameRate, PanelId, Panel, Result, Surface, Time};
use animatic_export::{
    AssetCache, EncodedArtifact, EncoderConfig, ExportPhase, ExportPipeline, ExportSettings,
    Quality, Resolution, StreamEncoder, VideoFormat,
};
use animatic_timeline::{TimelineModel, TransitionKind};

// ── Helpers ────────────────────────────────────────────────────

/// Encoder that keeps the center pixel of every frame it receives.
#[derive(Default)]
struct ProbeEncoder {
    supported: Vec<VideoFormat>,
    config: Option<EncoderConfig>,
    center_pixels: Vec<[u8; 4]>,
    finalized: bool,
    aborted: bool,
}

impl ProbeEncoder {
    fn new() -> Self {
        Self {
            supported: VideoFormat::FALLBACK_ORDER.to_vec(),
            ..Self::default()
        }
    }

    fn only(format: VideoFormat) -> Self {
        Self {
            supported: vec![format],
            ..Self::default()
        }
    }
}

impl StreamEncoder for ProbeEncoder {
    fn supports(&self, format: VideoFormat) -> bool {
        self.supported.contains(&format)
    }

    fn open(&mut self, config: &EncoderConfig) -> Result<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn submit_frame(&mut self, frame: &Surface) -> Result<()> {
        self.center_pixels
            .push(frame.pixel(frame.width() / 2, frame.height() / 2));
        Ok(())
    }

    fn finalize(&mut self) -> Result<EncodedArtifact> {
        self.finalized = true;
        Ok(EncodedArtifact {
            path: PathBuf::from("/tmp/probe.webm"),
            file_size: self.center_pixels.len() as u64 * 4,
        })
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

fn storyboard(durations_ms: &[i64]) -> (Vec<Panel>, TimelineModel, AssetCache) {
    let cache = AssetCache::new();
    let mut panels = Vec::new();
    for (i, _) in durations_ms.iter().enumerate() {
        let url = format!("cut/{i}.png");
        let shade = if i % 2 == 0 { Color::BLACK } else { Color::WHITE };
        cache.insert(url.clone(), Bitmap::solid(8, 8, shade));
        panels.push(Panel::with_url(PanelId::generate(), format!("Cut {i}"), url));
    }
    let ids: Vec<PanelId> = panels.iter().map(|p| p.id).collect();
    let mut model = TimelineModel::new();
    model.initialize_panels(&ids);
    for (id, ms) in ids.iter().zip(durations_ms) {
        model.set_panel_duration(*id, Time::from_millis(*ms));
    }
    (panels, model, cache)
}

fn settings() -> ExportSettings {
    ExportSettings {
        format: VideoFormat::Webm,
        quality: Quality::Medium,
        resolution: Resolution::Hd720,
        frame_rate: FrameRate::FPS_30,
        include_audio: true,
        watermark: None,
        output_path: None,
    }
}

// ── Full pipeline ──────────────────────────────────────────────

#[test]
fn export_covers_whole_timeline_frame_exactly() {
    crate::init_tracing();
    let (panels, model, cache) = storyboard(&[1000, 1000]);
    let pipeline = ExportPipeline::new();
    let mut encoder = ProbeEncoder::new();

    let result = pipeline
        .export(&panels, &model, &cache, &settings(), &mut encoder, &|_| {})
        .unwrap();

    assert_eq!(result.frame_count, 60);
    assert_eq!(result.duration, Time::from_millis(2000));
    assert_eq!(encoder.center_pixels.len(), 60);
    assert!(encoder.finalized);
    // first second is the black panel, second is white (cut at default
    // transition midpoint inside the tail)
    assert_eq!(encoder.center_pixels[0], [0, 0, 0, 255]);
    assert_eq!(encoder.center_pixels[59], [255, 255, 255, 255]);
}

#[test]
fn exported_transition_frames_match_preview_renders() {
    let (panels, mut model, cache) = storyboard(&[1000, 1000]);
    model.set_panel_transition(
        panels[0].id,
        TransitionKind::Dissolve,
        Some(Time::from_millis(500)),
    );
    let pipeline = ExportPipeline::new();
    let mut encoder = ProbeEncoder::new();
    pipeline
        .export(&panels, &model, &cache, &settings(), &mut encoder, &|_| {})
        .unwrap();

    // frame 22 sits at 733ms, midway through the 500..1000 dissolve
    let px = encoder.center_pixels[22];
    assert!(px[0] > 60 && px[0] < 200, "expected a blend, got {:?}", px);
}

#[test]
fn progress_phases_run_in_order() {
    let (panels, model, cache) = storyboard(&[500]);
    let pipeline = ExportPipeline::new();
    let mut encoder = ProbeEncoder::new();
    let phases = Arc::new(Mutex::new(Vec::new()));
    let phases_inner = Arc::clone(&phases);

    pipeline
        .export(&panels, &model, &cache, &settings(), &mut encoder, &|p| {
            let mut seen = phases_inner.lock().unwrap();
            if seen.last() != Some(&p.phase) {
                seen.push(p.phase);
            }
        })
        .unwrap();

    assert_eq!(
        *phases.lock().unwrap(),
        vec![
            ExportPhase::Preparing,
            ExportPhase::Rendering,
            ExportPhase::Encoding,
            ExportPhase::Complete,
        ]
    );
}

#[test]
fn cancel_mid_export_leaves_pipeline_reusable() {
    let (panels, model, cache) = storyboard(&[2000, 2000]);
    let pipeline = ExportPipeline::new();
    let cancel = pipeline.cancel_handle();
    let mut encoder = ProbeEncoder::new();
    let frames_seen = Arc::new(AtomicUsize::new(0));
    let frames_inner = Arc::clone(&frames_seen);

    let err = pipeline
        .export(&panels, &model, &cache, &settings(), &mut encoder, &|p| {
            frames_inner.store(p.current_frame as usize, Ordering::SeqCst);
            if p.current_frame == 30 {
                cancel.cancel();
            }
        })
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(encoder.aborted);
    assert!(!encoder.finalized);
    assert_eq!(encoder.center_pixels.len(), 30);
    assert!(!pipeline.is_busy());

    let mut encoder = ProbeEncoder::new();
    let result = pipeline
        .export(&panels, &model, &cache, &settings(), &mut encoder, &|_| {})
        .unwrap();
    assert_eq!(result.frame_count, 120);
}

#[test]
fn requested_format_falls_back_in_stable_order() {
    let (panels, model, cache) = storyboard(&[500]);
    let pipeline = ExportPipeline::new();

    let mut encoder = ProbeEncoder::only(VideoFormat::Gif);
    let result = pipeline
        .export(&panels, &model, &cache, &settings(), &mut encoder, &|_| {})
        .unwrap();
    assert_eq!(result.format, VideoFormat::Gif);

    let mut none = ProbeEncoder::only(VideoFormat::Gif);
    none.supported.clear();
    let err = pipeline
        .export(&panels, &model, &cache, &settings(), &mut none, &|_| {})
        .unwrap_err();
    assert!(matches!(err, AnimaticError::UnsupportedFormat(_)));
}

#[test]
fn missing_artwork_exports_placeholders_not_errors() {
    let (panels, model, _) = storyboard(&[500]);
    let empty_cache = AssetCache::new();
    let pipeline = ExportPipeline::new();
    let mut encoder = ProbeEncoder::new();

    let result = pipeline
        .export(&panels, &model, &empty_cache, &settings(), &mut encoder, &|_| {})
        .unwrap();
    assert_eq!(result.frame_count, 15);
    // placeholder card fills the frame center
    assert_eq!(encoder.center_pixels[0][3], 255);
    assert_ne!(encoder.center_pixels[0], [17, 17, 17, 255]);
}
