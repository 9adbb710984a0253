// inspector_core/src/serialization/cycle.rs
use crate::constants::DEFAULT_MAX_INSTANTIATION_DEPTH;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// The three traversals that share one detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Pass {
    Edit,
    Measure,
    Scene,
}

impl Pass {
    fn slot(self) -> usize {
        match self {
            Pass::Edit => 0,
            Pass::Measure => 1,
            Pass::Scene => 2,
        }
    }
}

/// Tracks traversal depth per pass and suspends automatic instantiation of
/// nested objects once any pass goes deeper than the cap.
///
/// Self referential types such as `struct Node { next: Option<Box<Node>> }`
/// would otherwise instantiate forever.
#[derive(Debug, Clone)]
pub struct CycleDetector {
    depths: [usize; 3],
    pass: Pass,
    cap: usize,
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INSTANTIATION_DEPTH)
    }
}

impl CycleDetector {
    pub fn new(cap: usize) -> Self {
        Self {
            depths: [0; 3],
            pass: Pass::Edit,
            cap,
        }
    }

    /// Same detector, counting against `pass`.
    pub fn with_pass(mut self, pass: Pass) -> Self {
        self.pass = pass;
        self
    }

    /// Switches the active pass and returns the previous one.
    pub fn set_pass(&mut self, pass: Pass) -> Pass {
        std::mem::replace(&mut self.pass, pass)
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn depth(&self, pass: Pass) -> usize {
        self.depths[pass.slot()]
    }

    /// True while any pass sits at or beyond the cap.
    pub fn is_suspended(&self) -> bool {
        Pass::iter().any(|pass| self.depth(pass) >= self.cap)
    }

    /// Enters one level of the active pass. Returns `false` without
    /// entering when instantiation is suspended.
    pub fn try_enter(&mut self) -> bool {
        if self.is_suspended() {
            return false;
        }
        self.depths[self.pass.slot()] += 1;
        true
    }

    /// Leaves one level of the active pass.
    pub fn exit(&mut self) {
        let depth = &mut self.depths[self.pass.slot()];
        *depth = depth.saturating_sub(1);
    }

    /// Clears every depth counter.
    pub fn reset(&mut self) {
        self.depths = [0; 3];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suspends_at_cap_and_resumes_after_exit() {
        let mut detector = CycleDetector::new(2);
        assert!(detector.try_enter());
        assert!(detector.try_enter());
        assert!(detector.is_suspended());
        assert!(!detector.try_enter());

        detector.exit();
        assert!(!detector.is_suspended());
        assert!(detector.try_enter());
    }

    #[test]
    fn depth_in_one_pass_suspends_every_pass() {
        let mut detector = CycleDetector::new(1).with_pass(Pass::Measure);
        assert!(detector.try_enter());
        assert_eq!(detector.depth(Pass::Measure), 1);

        let previous = detector.set_pass(Pass::Scene);
        assert_eq!(previous, Pass::Measure);
        assert!(!detector.try_enter());
        assert_eq!(detector.depth(Pass::Scene), 0);

        detector.exit();
        assert_eq!(detector.depth(Pass::Measure), 1);
        detector.reset();
        assert!(!detector.is_suspended());
        assert!(Pass::iter().all(|pass| detector.depth(pass) == 0));
    }
}
