//! Streaming video encoders.
//!
//! The pipeline renders frames one at a time and hands each to a
//! [`StreamEncoder`]; frames are never buffered in bulk. The production
//! encoder pipes raw RGBA into a spawned FFmpeg process.

use std::io::Write;
use std::path::PathBuf;

use animatic_core::{AnimaticError, FrameRate, PixelSize, Result, Surface};
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use tracing::{debug, warn};

use crate::settings::{Quality, VideoFormat};

/// Parameters fixed for the lifetime of one encode.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    pub size: PixelSize,
    pub frame_rate: FrameRate,
    pub format: VideoFormat,
    pub quality: Quality,
    pub include_audio: bool,
    pub output_path: PathBuf,
}

/// A sink that accepts rendered frames one at a time and produces a
/// finished video file.
pub trait StreamEncoder: Send {
    /// Whether this encoder can produce the given format.
    fn supports(&self, format: VideoFormat) -> bool;

    /// Start an encode. Must be called before the first frame.
    fn open(&mut self, config: &EncoderConfig) -> Result<()>;

    /// Submit one rendered frame. Frame size must match the config.
    fn submit_frame(&mut self, frame: &Surface) -> Result<()>;

    /// Flush and close the output, returning the finished file.
    fn finalize(&mut self) -> Result<EncodedArtifact>;

    /// Stop a cancelled encode and remove any partial output.
    fn abort(&mut self);
}

/// A finished encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    pub path: PathBuf,
    pub file_size: u64,
}

/// Encoder that pipes raw RGBA frames into a spawned FFmpeg process.
pub struct FfmpegEncoder {
    child: Option<FfmpegChild>,
    stdin: Option<std::process::ChildStdin>,
    config: Option<EncoderConfig>,
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self {
            child: None,
            stdin: None,
            config: None,
        }
    }

    fn spawn(config: &EncoderConfig) -> Result<FfmpegChild> {
        let fps = config.frame_rate.numerator as f32 / config.frame_rate.denominator as f32;
        let mut cmd = FfmpegCommand::new();
        cmd.format("rawvideo")
            .pix_fmt("rgba")
            .size(config.size.width, config.size.height)
            .rate(fps)
            .input("pipe:0");

        let bitrate = format!("{}M", config.quality.bitrate_mbps());
        match config.format {
            VideoFormat::Webm => {
                cmd.codec_video("libvpx-vp9")
                    .args(["-b:v", &bitrate])
                    .pix_fmt("yuv420p");
            }
            VideoFormat::Mp4 => {
                cmd.codec_video("libx264")
                    .args(["-b:v", &bitrate])
                    .pix_fmt("yuv420p")
                    .args(["-movflags", "+faststart"]);
            }
            VideoFormat::Gif => {
                // palette-less gif keeps the pipeline single-pass
                cmd.args(["-loop", "0"]);
            }
        }
        if !config.include_audio {
            cmd.args(["-an"]);
        }
        cmd.overwrite().output(config.output_path.to_string_lossy());

        cmd.spawn()
            .map_err(|e| AnimaticError::Encoder(format!("Failed to spawn ffmpeg: {}", e)))
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamEncoder for FfmpegEncoder {
    fn supports(&self, _format: VideoFormat) -> bool {
        // a system ffmpeg handles all three containers
        true
    }

    fn open(&mut self, config: &EncoderConfig) -> Result<()> {
        if self.child.is_some() {
            return Err(AnimaticError::Encoder("Encoder already open".into()));
        }
        debug!(
            path = %config.output_path.display(),
            format = ?config.format,
            "starting ffmpeg encode"
        );
        let mut child = Self::spawn(config)?;
        let stdin = child
            .take_stdin()
            .ok_or_else(|| AnimaticError::Encoder("ffmpeg stdin unavailable".into()))?;
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.config = Some(config.clone());
        Ok(())
    }

    fn submit_frame(&mut self, frame: &Surface) -> Result<()> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| AnimaticError::Encoder("Encoder not open".into()))?;
        if frame.size() != config.size {
            return Err(AnimaticError::Encoder(format!(
                "Frame size {}x{} does not match encode size {}x{}",
                frame.width(),
                frame.height(),
                config.size.width,
                config.size.height
            )));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| AnimaticError::Encoder("Encoder not open".into()))?;
        stdin
            .write_all(frame.data())
            .map_err(|e| AnimaticError::Encoder(format!("ffmpeg pipe write failed: {}", e)))
    }

    fn finalize(&mut self) -> Result<EncodedArtifact> {
        // closing stdin signals end-of-stream
        self.stdin = None;
        let mut child = self
            .child
            .take()
            .ok_or_else(|| AnimaticError::Encoder("Encoder not open".into()))?;
        let config = self
            .config
            .take()
            .ok_or_else(|| AnimaticError::Encoder("Encoder not open".into()))?;

        let status = child
            .wait()
            .map_err(|e| AnimaticError::Encoder(format!("ffmpeg wait failed: {}", e)))?;
        if !status.success() {
            return Err(AnimaticError::Encoder(format!(
                "ffmpeg exited with {}",
                status
            )));
        }
        let file_size = std::fs::metadata(&config.output_path)?.len();
        Ok(EncodedArtifact {
            path: config.output_path,
            file_size,
        })
    }

    fn abort(&mut self) {
        self.stdin = None;
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                warn!("Failed to kill ffmpeg after cancel: {}", e);
            }
            let _ = child.wait();
        }
        if let Some(config) = self.config.take() {
            if config.output_path.exists() {
                if let Err(e) = std::fs::remove_file(&config.output_path) {
                    warn!(
                        path = %config.output_path.display(),
                        "Failed to remove partial export: {}", e
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_before_open_is_an_error() {
        let mut enc = FfmpegEncoder::new();
        let frame = Surface::new(2, 2);
        assert!(enc.submit_frame(&frame).is_err());
        assert!(enc.finalize().is_err());
    }

    #[test]
    fn ffmpeg_supports_all_formats() {
        let enc = FfmpegEncoder::new();
        for format in VideoFormat::FALLBACK_ORDER {
            assert!(enc.supports(format));
        }
    }
}
