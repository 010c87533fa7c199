//! Animatic Core - Foundation types for the animatic engine
//!
//! This crate provides the fundamental types used throughout the engine:
//! - Time representation (Time, FrameRate, TimeRange)
//! - Easing functions for time-based interpolation
//! - Colors, pixel surfaces, and decoded bitmaps
//! - Geometric primitives and aspect-fit math
//! - Panel identity and artwork references

pub mod color;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod panel;
pub mod surface;
pub mod time;

pub use color::Color;
pub use easing::{lerp_eased, CubicBezier, Easing};
pub use error::{AnimaticError, Result};
pub use geometry::Rect;
pub use panel::{ImageSource, Panel, PanelId};
pub use surface::{blend_rgba, Bitmap, PixelSize, Surface};
pub use time::{FrameRate, Time, TimeRange};
