//! Animatic Render - CPU frame compositor
//!
//! Renders timeline frames: per-panel artwork with Ken Burns pan/zoom,
//! panel-to-panel transitions, placeholder cards for missing assets,
//! and an optional watermark overlay. Output frames are plain RGBA8
//! surfaces, consumed directly by the export encoders.

pub mod compositor;
pub mod font;
pub mod raster;
pub mod transition;
pub mod transitions;
pub mod watermark;

pub use compositor::{AssetSource, Compositor, CompositorOptions};
pub use transition::{Transition, TransitionRegistry};
pub use watermark::{Watermark, WatermarkCorner};
