use animatic_core::Surface;
use animatic_timeline::TransitionKind;

use crate::raster;
use crate::transition::Transition;

/// Push: the incoming panel slides in and shoves the outgoing panel off
/// the opposite edge. Both panels translate together.
pub struct Push {
    kind: TransitionKind,
}

impl Push {
    /// `kind` must be `PushLeft` or `PushRight`.
    pub fn new(kind: TransitionKind) -> Self {
        debug_assert!(matches!(
            kind,
            TransitionKind::PushLeft | TransitionKind::PushRight
        ));
        Self { kind }
    }
}

impl Transition for Push {
    fn kind(&self) -> TransitionKind {
        self.kind
    }

    fn composite(&self, from: &Surface, to: &Surface, out: &mut Surface, progress: f32) {
        let w = out.width() as f32;
        let progress = progress.clamp(0.0, 1.0);
        let shift = (w * progress).round() as i32;
        match self.kind {
            TransitionKind::PushLeft => {
                // incoming enters from the right
                raster::copy_offset(out, from, -shift, 0);
                raster::copy_offset(out, to, out.width() as i32 - shift, 0);
            }
            _ => {
                raster::copy_offset(out, from, shift, 0);
                raster::copy_offset(out, to, shift - out.width() as i32, 0);
            }
        }
    }
}
