use animatic_core::Surface;
use animatic_timeline::TransitionKind;

use crate::raster;
use crate::transition::Transition;

/// Hard cut: the incoming panel replaces the outgoing one at the
/// midpoint of the window.
pub struct Cut;

impl Transition for Cut {
    fn kind(&self) -> TransitionKind {
        TransitionKind::Cut
    }

    fn composite(&self, from: &Surface, to: &Surface, out: &mut Surface, progress: f32) {
        if progress < 0.5 {
            raster::copy(out, from);
        } else {
            raster::copy(out, to);
        }
    }
}
