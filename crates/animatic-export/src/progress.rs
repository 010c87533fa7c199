//! Progress reporting for a running export.

use std::path::PathBuf;

use animatic_core::Time;
use serde::{Deserialize, Serialize};

use crate::settings::VideoFormat;

/// Phase of the export pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportPhase {
    #[default]
    Idle,
    Preparing,
    Rendering,
    Encoding,
    Complete,
    Error,
}

/// A progress snapshot, emitted at least once per rendered frame.
///
/// `percentage` maps rendering to `[0, 90]`, encoding finalization to
/// `95`, and completion to `100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportProgress {
    pub phase: ExportPhase,
    pub current_frame: u64,
    pub total_frames: u64,
    pub current_panel: usize,
    pub total_panels: usize,
    pub percentage: f64,
    /// Estimated seconds remaining, from the average frame cost so far.
    pub estimated_seconds_remaining: Option<f64>,
    pub message: String,
}

impl ExportProgress {
    pub fn idle() -> Self {
        Self {
            phase: ExportPhase::Idle,
            current_frame: 0,
            total_frames: 0,
            current_panel: 0,
            total_panels: 0,
            percentage: 0.0,
            estimated_seconds_remaining: None,
            message: String::new(),
        }
    }
}

/// Summary of a finished export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportResult {
    pub format: VideoFormat,
    pub frame_count: u64,
    /// Timeline duration that was exported.
    pub duration: Time,
    /// Finished file, when the encoder wrote one.
    pub output_path: Option<PathBuf>,
    pub file_size: u64,
}
