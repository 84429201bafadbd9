//! Progress reporting hooks.
//!
//! Planning and selection stay free of console output; callers that want
//! to show progress implement [`PlanObserver`] and pass it in.

use crate::catalog::ImagePath;
use crate::duration::SlidePlan;
use crate::selector::SlideSequence;

/// Receives informational events during planning and selection.
///
/// Every method has a no-op default, so implementors only override what
/// they display.
pub trait PlanObserver {
    /// A slide plan has been computed.
    fn plan_computed(&mut self, _plan: &SlidePlan) {}

    /// The requested slide count was reduced to the cap.
    fn slide_cap_applied(&mut self, _requested: usize, _cap: usize) {}

    /// A random repeat was appended. `filled` counts all slides so far.
    fn repeat_progress(&mut self, _filled: usize, _target: usize, _image: &ImagePath) {}

    /// Selection finished.
    fn selection_complete(&mut self, _sequence: &SlideSequence, _unique: usize, _repeats: usize) {}
}

/// Silent observer.
impl PlanObserver for () {}

/// Observer that forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PlanObserver for TracingObserver {
    fn plan_computed(&mut self, plan: &SlidePlan) {
        tracing::debug!(
            count = plan.count,
            requested = plan.requested,
            capped = plan.capped,
            "plan computed"
        );
    }

    fn slide_cap_applied(&mut self, requested: usize, cap: usize) {
        tracing::debug!(requested, cap, "slide cap applied");
    }

    fn repeat_progress(&mut self, filled: usize, target: usize, image: &ImagePath) {
        tracing::trace!(filled, target, image = %image, "repeat appended");
    }

    fn selection_complete(&mut self, sequence: &SlideSequence, unique: usize, repeats: usize) {
        tracing::debug!(len = sequence.len(), unique, repeats, "selection complete");
    }
}
