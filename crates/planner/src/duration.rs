//! Slide-count planning.
//!
//! Converts a target duration into the number of slides needed, given the
//! allowed per-slide duration range. The planning mode is resolved once into a
//! [`PlanTarget`] so the planner itself never branches on CLI flags.

use serde::Serialize;
use slidecast_common::error::{SlidecastError, SlidecastResult};

use crate::observer::PlanObserver;

/// Length of the synthetic target used in test mode (seconds).
pub const TEST_TARGET_SECS: f64 = 60.0;

/// Default hard ceiling on the slide count in full mode.
pub const DEFAULT_MAX_SLIDES: usize = 1000;

/// Allowed on-screen time for a single slide, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationRange {
    min: f64,
    max: f64,
}

impl DurationRange {
    /// Build a range, rejecting anything the planner cannot divide by.
    pub fn new(min: f64, max: f64) -> SlidecastResult<Self> {
        let valid = min.is_finite() && max.is_finite() && min >= 0.0 && min <= max;
        let range = Self { min, max };
        if !valid || range.average() <= 0.0 {
            return Err(SlidecastError::InvalidDurationRange { min, max });
        }
        Ok(range)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Mean slide duration, used to convert seconds into slides.
    pub fn average(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Which kind of slideshow a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningMode {
    /// Short, reproducible validation video.
    Test,
    /// Production video matched to the real audio length.
    Full,
}

impl PlanningMode {
    /// Resolve the planner target for this mode.
    ///
    /// Test mode ignores `audio_secs` entirely. A full-mode run without an
    /// audio duration plans for zero seconds.
    pub fn target(self, audio_secs: Option<f64>) -> PlanTarget {
        match self {
            PlanningMode::Test => PlanTarget::Synthetic {
                seconds: TEST_TARGET_SECS,
            },
            PlanningMode::Full => PlanTarget::Audio {
                seconds: audio_secs.unwrap_or(0.0),
            },
        }
    }

    /// Resolve the selection policy for this mode.
    pub fn selection_policy(self) -> crate::selector::SelectionPolicy {
        match self {
            PlanningMode::Test => crate::selector::SelectionPolicy::Prefix,
            PlanningMode::Full => crate::selector::SelectionPolicy::FullCoverage,
        }
    }
}

/// Duration the slideshow should fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanTarget {
    /// Fixed synthetic duration. Never capped.
    Synthetic { seconds: f64 },
    /// Real audio duration. Subject to the slide cap.
    Audio { seconds: f64 },
}

impl PlanTarget {
    /// Target seconds, with negative or non-finite values treated as zero.
    pub fn seconds(&self) -> f64 {
        let secs = match *self {
            PlanTarget::Synthetic { seconds } | PlanTarget::Audio { seconds } => seconds,
        };
        if secs.is_finite() && secs > 0.0 {
            secs
        } else {
            0.0
        }
    }

    fn is_capped(&self) -> bool {
        matches!(self, PlanTarget::Audio { .. })
    }
}

/// Result of planning: how many slides to render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlidePlan {
    /// Final slide count, never above the cap for audio targets.
    pub count: usize,

    /// Slide count before the cap was applied.
    pub requested: usize,

    /// Seconds the plan was computed for.
    pub target_secs: f64,

    /// Average slide duration used for the division.
    pub average_secs: f64,

    /// Whether the cap reduced the count.
    pub capped: bool,
}

impl SlidePlan {
    /// Expected runtime of the rendered slideshow.
    pub fn estimated_runtime_secs(&self) -> f64 {
        self.count as f64 * self.average_secs
    }
}

/// Computes slide counts under a hard ceiling.
#[derive(Debug, Clone, Copy)]
pub struct DurationPlanner {
    max_slides: usize,
}

impl Default for DurationPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SLIDES)
    }
}

impl DurationPlanner {
    pub fn new(max_slides: usize) -> Self {
        Self { max_slides }
    }

    pub fn max_slides(&self) -> usize {
        self.max_slides
    }

    /// Plan the slide count for `target`.
    ///
    /// `count = floor(seconds / range.average())`. Audio targets above the cap
    /// are clamped to it and reported through `observer`; synthetic targets are
    /// left alone.
    pub fn plan(
        &self,
        target: PlanTarget,
        range: &DurationRange,
        observer: &mut dyn PlanObserver,
    ) -> SlidecastResult<SlidePlan> {
        let average_secs = range.average();
        if !(average_secs.is_finite() && average_secs > 0.0) {
            return Err(SlidecastError::InvalidDurationRange {
                min: range.min(),
                max: range.max(),
            });
        }

        let target_secs = target.seconds();
        // Saturating float-to-int cast; absurd targets end up at the cap anyway.
        let requested = (target_secs / average_secs).floor() as usize;

        let mut count = requested;
        let mut capped = false;
        if target.is_capped() && requested > self.max_slides {
            tracing::warn!(
                requested,
                cap = self.max_slides,
                "slide count exceeds cap; limiting"
            );
            observer.slide_cap_applied(requested, self.max_slides);
            count = self.max_slides;
            capped = true;
        }

        let plan = SlidePlan {
            count,
            requested,
            target_secs,
            average_secs,
            capped,
        };
        tracing::info!(
            target_secs,
            average_secs,
            count,
            estimated_secs = plan.estimated_runtime_secs(),
            "slide plan computed"
        );
        observer.plan_computed(&plan);
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Default)]
    struct CapRecorder {
        caps: Vec<(usize, usize)>,
        plans: usize,
    }

    impl PlanObserver for CapRecorder {
        fn slide_cap_applied(&mut self, requested: usize, cap: usize) {
            self.caps.push((requested, cap));
        }

        fn plan_computed(&mut self, _plan: &SlidePlan) {
            self.plans += 1;
        }
    }

    fn range(min: f64, max: f64) -> DurationRange {
        DurationRange::new(min, max).unwrap()
    }

    #[test]
    fn test_full_mode_matches_audio_length() {
        let plan = DurationPlanner::new(1000)
            .plan(PlanningMode::Full.target(Some(100.0)), &range(3.0, 7.0), &mut ())
            .unwrap();
        assert_eq!(plan.average_secs, 5.0);
        assert_eq!(plan.count, 20);
        assert!(!plan.capped);
        assert_eq!(plan.estimated_runtime_secs(), 100.0);
    }

    #[test]
    fn test_full_mode_clamps_to_cap_and_warns() {
        let mut recorder = CapRecorder::default();
        let plan = DurationPlanner::new(1000)
            .plan(
                PlanningMode::Full.target(Some(100_000.0)),
                &range(3.0, 7.0),
                &mut recorder,
            )
            .unwrap();
        assert_eq!(plan.requested, 20_000);
        assert_eq!(plan.count, 1000);
        assert!(plan.capped);
        assert_eq!(recorder.caps, vec![(20_000, 1000)]);
        assert_eq!(recorder.plans, 1);
    }

    #[test]
    fn test_test_mode_ignores_audio() {
        let planner = DurationPlanner::new(1000);
        for audio in [None, Some(0.0), Some(5_000.0)] {
            let plan = planner
                .plan(PlanningMode::Test.target(audio), &range(2.0, 4.0), &mut ())
                .unwrap();
            assert_eq!(plan.target_secs, 60.0);
            assert_eq!(plan.count, 20);
        }
    }

    #[test]
    fn test_synthetic_target_is_not_capped() {
        let mut recorder = CapRecorder::default();
        let plan = DurationPlanner::new(5)
            .plan(PlanningMode::Test.target(None), &range(1.0, 1.0), &mut recorder)
            .unwrap();
        assert_eq!(plan.count, 60);
        assert!(!plan.capped);
        assert!(recorder.caps.is_empty());
    }

    #[test]
    fn test_zero_audio_yields_zero_slides() {
        let plan = DurationPlanner::default()
            .plan(PlanningMode::Full.target(Some(0.0)), &range(3.0, 7.0), &mut ())
            .unwrap();
        assert_eq!(plan.count, 0);
    }

    #[test]
    fn test_negative_and_nan_targets_plan_zero() {
        let planner = DurationPlanner::default();
        for secs in [-10.0, f64::NAN, f64::NEG_INFINITY] {
            let plan = planner
                .plan(PlanTarget::Audio { seconds: secs }, &range(3.0, 7.0), &mut ())
                .unwrap();
            assert_eq!(plan.count, 0);
        }
    }

    #[test]
    fn test_count_is_floored() {
        let plan = DurationPlanner::default()
            .plan(PlanTarget::Audio { seconds: 29.9 }, &range(3.0, 7.0), &mut ())
            .unwrap();
        assert_eq!(plan.count, 5);
    }

    #[test]
    fn test_zero_range_is_rejected() {
        let err = DurationRange::new(0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            SlidecastError::InvalidDurationRange { min, max } if min == 0.0 && max == 0.0
        ));
    }

    #[test]
    fn test_inverted_and_negative_ranges_are_rejected() {
        assert!(DurationRange::new(7.0, 3.0).is_err());
        assert!(DurationRange::new(-1.0, 3.0).is_err());
        assert!(DurationRange::new(1.0, f64::INFINITY).is_err());
        assert!(DurationRange::new(0.0, 2.0).is_ok());
    }

    #[test]
    fn test_mode_resolves_selection_policy() {
        use crate::selector::SelectionPolicy;
        assert_eq!(PlanningMode::Test.selection_policy(), SelectionPolicy::Prefix);
        assert_eq!(
            PlanningMode::Full.selection_policy(),
            SelectionPolicy::FullCoverage
        );
    }

    proptest! {
        #[test]
        fn prop_plan_is_monotonic_in_target(
            a in 0.0f64..50_000.0,
            b in 0.0f64..50_000.0,
            min in 0.1f64..20.0,
            spread in 0.0f64..20.0,
        ) {
            let range = DurationRange::new(min, min + spread).unwrap();
            let planner = DurationPlanner::new(usize::MAX);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_plan = planner.plan(PlanTarget::Audio { seconds: lo }, &range, &mut ()).unwrap();
            let hi_plan = planner.plan(PlanTarget::Audio { seconds: hi }, &range, &mut ()).unwrap();
            prop_assert!(lo_plan.count <= hi_plan.count);
        }

        #[test]
        fn prop_full_mode_never_exceeds_cap(
            secs in 0.0f64..1e9,
            min in 0.01f64..20.0,
            spread in 0.0f64..20.0,
            cap in 0usize..5000,
        ) {
            let range = DurationRange::new(min, min + spread).unwrap();
            let plan = DurationPlanner::new(cap)
                .plan(PlanningMode::Full.target(Some(secs)), &range, &mut ())
                .unwrap();
            prop_assert!(plan.count <= cap);
            prop_assert_eq!(plan.capped, plan.requested > cap);
        }
    }
}
