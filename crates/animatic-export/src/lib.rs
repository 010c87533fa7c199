//! Animatic Export - streaming video export
//!
//! Renders the timeline frame by frame through the compositor and
//! streams each frame into an encoder, with progress snapshots and
//! cooperative cancellation. The production encoder pipes raw RGBA
//! into a spawned FFmpeg process.

pub mod assets;
pub mod encoder;
pub mod pipeline;
pub mod progress;
pub mod settings;

pub use assets::AssetCache;
pub use encoder::{EncodedArtifact, EncoderConfig, FfmpegEncoder, StreamEncoder};
pub use pipeline::{save_artifact, ExportCancel, ExportPipeline};
pub use progress::{ExportPhase, ExportProgress, ExportResult};
pub use settings::{ExportSettings, Quality, Resolution, VideoFormat};
