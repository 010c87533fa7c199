//! Export settings: container format, quality tier, resolution, rate.

use std::path::PathBuf;

use animatic_core::{FrameRate, PixelSize};
use animatic_render::Watermark;
use serde::{Deserialize, Serialize};

/// Output container / codec family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoFormat {
    #[default]
    Webm,
    Mp4,
    Gif,
}

impl VideoFormat {
    /// Fallback order when the requested format is unavailable.
    pub const FALLBACK_ORDER: [VideoFormat; 3] =
        [VideoFormat::Webm, VideoFormat::Mp4, VideoFormat::Gif];

    pub fn extension(self) -> &'static str {
        match self {
            VideoFormat::Webm => "webm",
            VideoFormat::Mp4 => "mp4",
            VideoFormat::Gif => "gif",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            VideoFormat::Webm => "video/webm",
            VideoFormat::Mp4 => "video/mp4",
            VideoFormat::Gif => "image/gif",
        }
    }
}

/// Quality tier, mapped to a target bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

impl Quality {
    /// Target video bitrate in megabits per second.
    pub fn bitrate_mbps(self) -> u32 {
        match self {
            Quality::Low => 2,
            Quality::Medium => 5,
            Quality::High => 10,
            Quality::Ultra => 20,
        }
    }
}

/// Output resolution preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    Hd720,
    #[default]
    Hd1080,
    Qhd1440,
    Uhd2160,
}

impl Resolution {
    pub fn pixel_size(self) -> PixelSize {
        match self {
            Resolution::Hd720 => PixelSize::new(1280, 720),
            Resolution::Hd1080 => PixelSize::new(1920, 1080),
            Resolution::Qhd1440 => PixelSize::new(2560, 1440),
            Resolution::Uhd2160 => PixelSize::new(3840, 2160),
        }
    }
}

/// Everything the pipeline needs to run one export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    pub format: VideoFormat,
    pub quality: Quality,
    pub resolution: Resolution,
    pub frame_rate: FrameRate,
    /// Whether audio tracks are muxed into the output. The engine does
    /// not decode audio; this is forwarded to the encoder as-is.
    pub include_audio: bool,
    /// Overlay stamped on every exported frame.
    pub watermark: Option<Watermark>,
    /// Where the encoder writes the finished file. A `None` lets the
    /// encoder pick a temporary location.
    pub output_path: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: VideoFormat::default(),
            quality: Quality::default(),
            resolution: Resolution::default(),
            frame_rate: FrameRate::FPS_30,
            include_audio: true,
            watermark: None,
            output_path: None,
        }
    }
}
