//! Text watermark drawn over every composited frame.

use animatic_core::{Color, Surface};
use serde::{Deserialize, Serialize};

use crate::font;

/// Which corner of the frame the watermark sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

/// A text overlay stamped on every frame, preview and export alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watermark {
    pub text: String,
    pub corner: WatermarkCorner,
    /// Text opacity in `[0,1]`.
    pub opacity: f32,
    /// Distance from the frame edge in pixels.
    pub margin: u32,
    /// Integer glyph scale.
    pub scale: u32,
}

impl Watermark {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            corner: WatermarkCorner::default(),
            opacity: 0.7,
            margin: 12,
            scale: 2,
        }
    }

    /// Draw the watermark with a one-glyph-pixel drop shadow.
    pub fn draw(&self, surface: &mut Surface) {
        if self.text.is_empty() || self.opacity <= 0.0 {
            return;
        }
        let scale = self.scale.max(1);
        let (w, h) = font::measure_text(&self.text, scale);
        let margin = self.margin as i32;
        let x = match self.corner {
            WatermarkCorner::TopLeft | WatermarkCorner::BottomLeft => margin,
            _ => surface.width() as i32 - w as i32 - margin,
        };
        let y = match self.corner {
            WatermarkCorner::TopLeft | WatermarkCorner::TopRight => margin,
            _ => surface.height() as i32 - h as i32 - margin,
        };
        let opacity = self.opacity.clamp(0.0, 1.0);
        let shadow = Color::BLACK.with_alpha(opacity * 0.6);
        let ink = Color::WHITE.with_alpha(opacity);
        let offset = scale as i32;
        font::draw_text(surface, x + offset, y + offset, &self.text, scale, shadow);
        font::draw_text(surface, x, y, &self.text, scale, ink);
    }
}
