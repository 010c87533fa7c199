use animatic_core::{Color, Rect, Surface};
use animatic_timeline::TransitionKind;

use crate::raster;
use crate::transition::Transition;

/// Fade through black: the outgoing panel dips fully to black by the
/// midpoint, then the incoming panel fades up from black.
pub struct Fade;

impl Transition for Fade {
    fn kind(&self) -> TransitionKind {
        TransitionKind::Fade
    }

    fn composite(&self, from: &Surface, to: &Surface, out: &mut Surface, progress: f32) {
        let full = Rect::new(0.0, 0.0, out.width() as f32, out.height() as f32);
        if progress < 0.5 {
            raster::copy(out, from);
            let dim = (progress * 2.0).clamp(0.0, 1.0);
            raster::fill_rect(out, full, Color::BLACK.with_alpha(dim));
        } else {
            raster::copy(out, to);
            let dim = ((1.0 - progress) * 2.0).clamp(0.0, 1.0);
            raster::fill_rect(out, full, Color::BLACK.with_alpha(dim));
        }
    }
}
