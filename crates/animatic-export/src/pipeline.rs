//! The export pipeline: renders timeline frames at a fixed rate and
//! streams them into an encoder, with progress reporting and
//! cooperative cancellation.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use animatic_core::{AnimaticError, Panel, Result, Surface, Time};
use animatic_render::{Compositor, CompositorOptions};
use animatic_timeline::TimelineModel;
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::assets::AssetCache;
use crate::encoder::{EncodedArtifact, EncoderConfig, StreamEncoder};
use crate::progress::{ExportPhase, ExportProgress, ExportResult};
use crate::settings::{ExportSettings, VideoFormat};

/// Handle for cancelling a running export from another thread.
///
/// Cancellation is cooperative: the pipeline checks the flag before
/// each frame, aborts the encoder, and removes partial output.
#[derive(Clone)]
pub struct ExportCancel {
    flag: Arc<AtomicBool>,
}

impl ExportCancel {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Runs exports one at a time; a second call while one is in flight is
/// rejected with [`AnimaticError::Busy`].
pub struct ExportPipeline {
    busy: AtomicBool,
    cancel: Arc<AtomicBool>,
    subscribers: Mutex<Vec<Sender<ExportProgress>>>,
}

impl ExportPipeline {
    pub fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            cancel: Arc::new(AtomicBool::new(false)),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Handle that cancels the current (or next) export.
    pub fn cancel_handle(&self) -> ExportCancel {
        ExportCancel {
            flag: Arc::clone(&self.cancel),
        }
    }

    /// Receive every progress snapshot of subsequent exports.
    pub fn subscribe(&self) -> Receiver<ExportProgress> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Run one export to completion.
    ///
    /// Preloads panel artwork into `assets`, renders every frame of the
    /// timeline at the settings' rate, streams each into `encoder`, and
    /// reports progress both to `on_progress` and to channel
    /// subscribers. Returns the finished artifact summary, or
    /// `Cancelled` if the cancel handle fired.
    pub fn export(
        &self,
        panels: &[Panel],
        model: &TimelineModel,
        assets: &AssetCache,
        settings: &ExportSettings,
        encoder: &mut dyn StreamEncoder,
        on_progress: &dyn Fn(&ExportProgress),
    ) -> Result<ExportResult> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AnimaticError::Busy);
        }
        let _guard = BusyGuard {
            busy: &self.busy,
            cancel: &self.cancel,
        };
        self.cancel.store(false, Ordering::SeqCst);

        let outcome = self.run_export(panels, model, assets, settings, encoder, on_progress);
        if let Err(e) = &outcome {
            // Cancellation is terminal too; subscribers must not be left
            // at Rendering. The Cancelled display text distinguishes it.
            self.emit(
                on_progress,
                ExportProgress {
                    phase: ExportPhase::Error,
                    message: e.to_string(),
                    ..ExportProgress::idle()
                },
            );
        }
        outcome
    }

    fn run_export(
        &self,
        panels: &[Panel],
        model: &TimelineModel,
        assets: &AssetCache,
        settings: &ExportSettings,
        encoder: &mut dyn StreamEncoder,
        on_progress: &dyn Fn(&ExportProgress),
    ) -> Result<ExportResult> {
        let rate = settings.frame_rate;
        if rate.numerator == 0 || rate.denominator == 0 {
            return Err(AnimaticError::Encoder(format!(
                "Invalid export frame rate: {}/{}",
                rate.numerator, rate.denominator
            )));
        }

        let duration = model.total_duration();
        if duration.is_zero() {
            return Err(AnimaticError::Timeline("Nothing to export".into()));
        }

        let format = select_format(settings.format, encoder)?;
        if format != settings.format {
            warn!(
                requested = settings.format.extension(),
                using = format.extension(),
                "requested export format unavailable"
            );
        }

        let size = settings.resolution.pixel_size();
        let total_frames = duration.to_frames_ceil(rate).max(1) as u64;
        let total_panels = model.panel_order().len();

        self.emit(
            on_progress,
            ExportProgress {
                phase: ExportPhase::Preparing,
                total_frames,
                total_panels,
                message: "Preparing export".into(),
                ..ExportProgress::idle()
            },
        );
        // Idempotent: panels whose artwork is already cached are skipped,
        // the rest are decoded here; failures fall back to placeholders.
        assets.prepare_panels(panels);

        let output_path = settings
            .output_path
            .clone()
            .unwrap_or_else(|| default_output_path(format));
        encoder.open(&EncoderConfig {
            size,
            frame_rate: rate,
            format,
            quality: settings.quality,
            include_audio: settings.include_audio,
            output_path,
        })?;

        let compositor = Compositor::new(CompositorOptions {
            watermark: settings.watermark.clone(),
            ..CompositorOptions::default()
        });
        let mut frame = Surface::with_size(size);
        let started = Instant::now();

        for f in 0..total_frames {
            if self.cancel.load(Ordering::SeqCst) {
                info!(frame = f, "export cancelled");
                encoder.abort();
                return Err(AnimaticError::Cancelled);
            }

            // frame-exact timestamp, immune to float drift over long runs
            let t = Time::from_frames(f as i64, rate);
            compositor.render_frame(&mut frame, panels, assets, model, t);
            if let Err(e) = encoder.submit_frame(&frame) {
                encoder.abort();
                return Err(e);
            }

            let done = f + 1;
            let elapsed = started.elapsed().as_secs_f64();
            let eta = if done >= 5 {
                Some(elapsed / done as f64 * (total_frames - done) as f64)
            } else {
                None
            };
            self.emit(
                on_progress,
                ExportProgress {
                    phase: ExportPhase::Rendering,
                    current_frame: done,
                    total_frames,
                    current_panel: model.panel_at_time(t).map(|s| s.index).unwrap_or(0),
                    total_panels,
                    percentage: done as f64 / total_frames as f64 * 90.0,
                    estimated_seconds_remaining: eta,
                    message: format!("Rendering frame {} of {}", done, total_frames),
                },
            );
            // let UI / cancel threads run between frames
            std::thread::yield_now();
        }

        self.emit(
            on_progress,
            ExportProgress {
                phase: ExportPhase::Encoding,
                current_frame: total_frames,
                total_frames,
                current_panel: total_panels.saturating_sub(1),
                total_panels,
                percentage: 95.0,
                estimated_seconds_remaining: None,
                message: "Finalizing video".into(),
            },
        );
        let artifact = encoder.finalize()?;

        self.emit(
            on_progress,
            ExportProgress {
                phase: ExportPhase::Complete,
                current_frame: total_frames,
                total_frames,
                current_panel: total_panels.saturating_sub(1),
                total_panels,
                percentage: 100.0,
                estimated_seconds_remaining: None,
                message: "Export complete".into(),
            },
        );
        info!(
            frames = total_frames,
            bytes = artifact.file_size,
            path = %artifact.path.display(),
            "export finished"
        );

        Ok(ExportResult {
            format,
            frame_count: total_frames,
            duration,
            output_path: Some(artifact.path),
            file_size: artifact.file_size,
        })
    }

    fn emit(&self, on_progress: &dyn Fn(&ExportProgress), progress: ExportProgress) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(progress.clone()).is_ok());
        on_progress(&progress);
    }
}

impl Default for ExportPipeline {
    fn default() -> Self {
        Self::new()
    }
}

struct BusyGuard<'a> {
    busy: &'a AtomicBool,
    cancel: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.cancel.store(false, Ordering::SeqCst);
        self.busy.store(false, Ordering::SeqCst);
    }
}

/// Requested format first, then the stable fallback order.
fn select_format(requested: VideoFormat, encoder: &dyn StreamEncoder) -> Result<VideoFormat> {
    std::iter::once(requested)
        .chain(VideoFormat::FALLBACK_ORDER)
        .find(|&f| encoder.supports(f))
        .ok_or_else(|| {
            AnimaticError::UnsupportedFormat("No supported export format available".into())
        })
}

fn default_output_path(format: VideoFormat) -> PathBuf {
    std::env::temp_dir().join(format!("animatic-export.{}", format.extension()))
}

/// Copy a finished export to its final destination.
pub fn save_artifact(artifact: &EncodedArtifact, dest: impl AsRef<Path>) -> Result<u64> {
    Ok(std::fs::copy(&artifact.path, dest.as_ref())?)
}
