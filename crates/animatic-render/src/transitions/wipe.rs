use animatic_core::{Rect, Surface};
use animatic_timeline::TransitionKind;

use crate::raster;
use crate::transition::Transition;

/// Directional wipe: the incoming panel is revealed behind a hard edge
/// that sweeps across the frame.
pub struct Wipe {
    kind: TransitionKind,
}

impl Wipe {
    /// `kind` must be one of the four wipe kinds.
    pub fn new(kind: TransitionKind) -> Self {
        debug_assert!(matches!(
            kind,
            TransitionKind::WipeLeft
                | TransitionKind::WipeRight
                | TransitionKind::WipeUp
                | TransitionKind::WipeDown
        ));
        Self { kind }
    }

    fn reveal_region(&self, w: f32, h: f32, progress: f32) -> Rect {
        match self.kind {
            // edge sweeps left-to-right, revealing from the left edge
            TransitionKind::WipeLeft => Rect::new(0.0, 0.0, w * progress, h),
            TransitionKind::WipeRight => Rect::new(w * (1.0 - progress), 0.0, w * progress, h),
            TransitionKind::WipeDown => Rect::new(0.0, 0.0, w, h * progress),
            _ => Rect::new(0.0, h * (1.0 - progress), w, h * progress),
        }
    }
}

impl Transition for Wipe {
    fn kind(&self) -> TransitionKind {
        self.kind
    }

    fn composite(&self, from: &Surface, to: &Surface, out: &mut Surface, progress: f32) {
        raster::copy(out, from);
        let progress = progress.clamp(0.0, 1.0);
        if progress <= 0.0 {
            return;
        }
        let region = self.reveal_region(out.width() as f32, out.height() as f32, progress);
        raster::copy_region(out, to, region);
    }
}
