use animatic_core::Surface;
use animatic_timeline::TransitionKind;

use crate::raster;
use crate::transition::Transition;

/// Zoom: the incoming panel fades in while scaling toward identity,
/// growing from half size (zoom in) or shrinking from 1.5x (zoom out).
pub struct Zoom {
    kind: TransitionKind,
}

impl Zoom {
    /// `kind` must be `ZoomIn` or `ZoomOut`.
    pub fn new(kind: TransitionKind) -> Self {
        debug_assert!(matches!(
            kind,
            TransitionKind::ZoomIn | TransitionKind::ZoomOut
        ));
        Self { kind }
    }
}

impl Transition for Zoom {
    fn kind(&self) -> TransitionKind {
        self.kind
    }

    fn composite(&self, from: &Surface, to: &Surface, out: &mut Surface, progress: f32) {
        let progress = progress.clamp(0.0, 1.0);
        raster::copy(out, from);
        let scale = match self.kind {
            TransitionKind::ZoomIn => 0.5 + 0.5 * progress,
            _ => 1.5 - 0.5 * progress,
        };
        raster::blend_scaled_centered(out, to, scale, progress);
    }
}
