use animatic_core::Surface;
use animatic_timeline::TransitionKind;

use crate::raster;
use crate::transition::Transition;

/// Cross-dissolve: the incoming panel blends directly over the outgoing
/// one with opacity equal to progress.
pub struct Dissolve;

impl Transition for Dissolve {
    fn kind(&self) -> TransitionKind {
        TransitionKind::Dissolve
    }

    fn composite(&self, from: &Surface, to: &Surface, out: &mut Surface, progress: f32) {
        raster::copy(out, from);
        raster::blend_over(out, to, progress);
    }
}
