//! Transition trait and registry.
//!
//! Each transition composites an outgoing and an incoming full-frame
//! render into the output surface at an eased progress. The registry
//! owns one instance per [`TransitionKind`].

use animatic_core::Surface;
use animatic_timeline::TransitionKind;

use crate::transitions;

/// A panel-to-panel transition effect.
pub trait Transition: Send + Sync {
    /// The timeline kind this transition implements.
    fn kind(&self) -> TransitionKind;

    /// Stable name, matching the timeline kind's serialized form.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Composite `from` (outgoing) and `to` (incoming) into `out` at
    /// eased `progress` in `[0,1]`. All three surfaces share a size.
    fn composite(&self, from: &Surface, to: &Surface, out: &mut Surface, progress: f32);
}

/// Registry of available transitions, looked up by kind per frame.
pub struct TransitionRegistry {
    transitions: Vec<Box<dyn Transition>>,
}

impl TransitionRegistry {
    /// Registry with every built-in transition.
    pub fn with_builtins() -> Self {
        let transitions: Vec<Box<dyn Transition>> = vec![
            Box::new(transitions::Cut),
            Box::new(transitions::Fade),
            Box::new(transitions::Dissolve),
            Box::new(transitions::Wipe::new(TransitionKind::WipeLeft)),
            Box::new(transitions::Wipe::new(TransitionKind::WipeRight)),
            Box::new(transitions::Wipe::new(TransitionKind::WipeUp)),
            Box::new(transitions::Wipe::new(TransitionKind::WipeDown)),
            Box::new(transitions::Push::new(TransitionKind::PushLeft)),
            Box::new(transitions::Push::new(TransitionKind::PushRight)),
            Box::new(transitions::Zoom::new(TransitionKind::ZoomIn)),
            Box::new(transitions::Zoom::new(TransitionKind::ZoomOut)),
        ];
        Self { transitions }
    }

    /// Register a custom transition. A later registration does not
    /// shadow an earlier one for the same kind.
    pub fn register(&mut self, transition: Box<dyn Transition>) {
        self.transitions.push(transition);
    }

    /// Look up the transition implementing `kind`.
    pub fn find(&self, kind: TransitionKind) -> Option<&dyn Transition> {
        self.transitions
            .iter()
            .find(|t| t.kind() == kind)
            .map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = TransitionKind> + '_ {
        self.transitions.iter().map(|t| t.kind())
    }
}

impl Default for TransitionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
