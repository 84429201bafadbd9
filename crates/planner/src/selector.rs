//! Slide selection.
//!
//! Turns the catalog and a planned slide count into the ordered list of
//! images the renderer will show. Entries may repeat.

use rand::Rng;
use serde::Serialize;

use crate::catalog::ImagePath;
use crate::observer::PlanObserver;

/// Progress is reported on every this-many repeats, plus the last one.
const PROGRESS_INTERVAL: usize = 100;

/// How the catalog is turned into a slide sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Take the first `count` catalog entries in order. Never random.
    Prefix,
    /// Every catalog entry once, then uniform random repeats (with
    /// replacement) until `count` is reached. Never truncates.
    FullCoverage,
}

/// Ordered images to render. Immutable once produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SlideSequence(Vec<ImagePath>);

impl SlideSequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImagePath> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ImagePath] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a SlideSequence {
    type Item = &'a ImagePath;
    type IntoIter = std::slice::Iter<'a, ImagePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Select `count` slides from `catalog` under `policy`.
///
/// An empty catalog always yields an empty sequence. Repeats are drawn from
/// `rng` only under [`SelectionPolicy::FullCoverage`], so a seeded generator
/// makes the whole selection reproducible.
pub fn select_slides<R: Rng + ?Sized>(
    catalog: &[ImagePath],
    count: usize,
    policy: SelectionPolicy,
    rng: &mut R,
    observer: &mut dyn PlanObserver,
) -> SlideSequence {
    if catalog.is_empty() {
        let sequence = SlideSequence::default();
        observer.selection_complete(&sequence, 0, 0);
        return sequence;
    }

    let sequence = match policy {
        SelectionPolicy::Prefix => {
            let take = count.min(catalog.len());
            tracing::info!(count = take, "using leading catalog images");
            SlideSequence(catalog[..take].to_vec())
        }
        SelectionPolicy::FullCoverage => fill_with_repeats(catalog, count, rng, observer),
    };

    let unique = sequence.len().min(catalog.len());
    let repeats = sequence.len() - unique;
    tracing::info!(
        selected = sequence.len(),
        unique,
        repeats,
        "slide selection complete"
    );
    observer.selection_complete(&sequence, unique, repeats);
    sequence
}

fn fill_with_repeats<R: Rng + ?Sized>(
    catalog: &[ImagePath],
    count: usize,
    rng: &mut R,
    observer: &mut dyn PlanObserver,
) -> SlideSequence {
    let remaining = count.saturating_sub(catalog.len());
    let mut images = Vec::with_capacity(catalog.len() + remaining);
    images.extend_from_slice(catalog);

    if remaining > 0 {
        tracing::info!(remaining, "adding random repeats to reach target");
    }
    for i in 0..remaining {
        let image = &catalog[rng.random_range(0..catalog.len())];
        images.push(image.clone());

        if i % PROGRESS_INTERVAL == 0 || i == remaining - 1 {
            observer.repeat_progress(catalog.len() + i + 1, count, image);
        }
    }

    SlideSequence(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn catalog(n: usize) -> Vec<ImagePath> {
        (0..n)
            .map(|i| ImagePath::new(format!("/photos/img_{i:03}.jpg")))
            .collect()
    }

    #[derive(Default)]
    struct ProgressRecorder {
        ticks: Vec<(usize, usize)>,
        completed: Option<(usize, usize, usize)>,
    }

    impl PlanObserver for ProgressRecorder {
        fn repeat_progress(&mut self, filled: usize, target: usize, _image: &ImagePath) {
            self.ticks.push((filled, target));
        }

        fn selection_complete(&mut self, sequence: &SlideSequence, unique: usize, repeats: usize) {
            self.completed = Some((sequence.len(), unique, repeats));
        }
    }

    #[test]
    fn test_full_coverage_exact_count_has_no_repeats() {
        let images = catalog(5);
        let mut rng = StdRng::seed_from_u64(7);
        let seq = select_slides(&images, 5, SelectionPolicy::FullCoverage, &mut rng, &mut ());
        assert_eq!(seq.as_slice(), images.as_slice());
    }

    #[test]
    fn test_full_coverage_appends_repeats_after_catalog() {
        let images = catalog(5);
        let mut rng = StdRng::seed_from_u64(7);
        let mut recorder = ProgressRecorder::default();
        let seq = select_slides(
            &images,
            8,
            SelectionPolicy::FullCoverage,
            &mut rng,
            &mut recorder,
        );

        assert_eq!(seq.len(), 8);
        assert_eq!(&seq.as_slice()[..5], images.as_slice());
        assert!(seq.as_slice()[5..].iter().all(|img| images.contains(img)));
        assert_eq!(recorder.ticks, vec![(6, 8), (8, 8)]);
        assert_eq!(recorder.completed, Some((8, 5, 3)));
    }

    #[test]
    fn test_full_coverage_is_seed_reproducible() {
        let images = catalog(5);
        let a = select_slides(
            &images,
            40,
            SelectionPolicy::FullCoverage,
            &mut StdRng::seed_from_u64(42),
            &mut (),
        );
        let b = select_slides(
            &images,
            40,
            SelectionPolicy::FullCoverage,
            &mut StdRng::seed_from_u64(42),
            &mut (),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_full_coverage_never_truncates() {
        let images = catalog(10);
        let mut rng = StdRng::seed_from_u64(1);
        let seq = select_slides(&images, 3, SelectionPolicy::FullCoverage, &mut rng, &mut ());
        assert_eq!(seq.as_slice(), images.as_slice());
    }

    #[test]
    fn test_repeats_are_spread_across_catalog() {
        let images = catalog(4);
        let mut rng = StdRng::seed_from_u64(99);
        let seq = select_slides(
            &images,
            4 + 4000,
            SelectionPolicy::FullCoverage,
            &mut rng,
            &mut (),
        );
        for image in &images {
            let hits = seq.as_slice()[4..].iter().filter(|s| *s == image).count();
            // Expect ~1000 each; a uniform draw stays well inside this band.
            assert!((800..1200).contains(&hits), "{image}: {hits}");
        }
    }

    #[test]
    fn test_progress_ticks_every_hundred_repeats() {
        let images = catalog(2);
        let mut recorder = ProgressRecorder::default();
        select_slides(
            &images,
            2 + 250,
            SelectionPolicy::FullCoverage,
            &mut StdRng::seed_from_u64(3),
            &mut recorder,
        );
        let filled: Vec<_> = recorder.ticks.iter().map(|t| t.0).collect();
        assert_eq!(filled, vec![3, 103, 203, 252]);
    }

    #[test]
    fn test_prefix_takes_leading_entries() {
        let images = catalog(10);
        let mut rng = StdRng::seed_from_u64(0);
        let seq = select_slides(&images, 4, SelectionPolicy::Prefix, &mut rng, &mut ());
        assert_eq!(seq.as_slice(), &images[..4]);
    }

    #[test]
    fn test_prefix_with_short_catalog_returns_catalog() {
        let images = catalog(3);
        let mut rng = StdRng::seed_from_u64(0);
        let seq = select_slides(&images, 20, SelectionPolicy::Prefix, &mut rng, &mut ());
        assert_eq!(seq.as_slice(), images.as_slice());
    }

    #[test]
    fn test_zero_count() {
        let images = catalog(3);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(select_slides(&images, 0, SelectionPolicy::Prefix, &mut rng, &mut ()).is_empty());
        let full = select_slides(&images, 0, SelectionPolicy::FullCoverage, &mut rng, &mut ());
        assert_eq!(full.len(), 3);
    }

    proptest! {
        #[test]
        fn prop_empty_catalog_is_always_empty(count in 0usize..10_000, full in any::<bool>()) {
            let policy = if full { SelectionPolicy::FullCoverage } else { SelectionPolicy::Prefix };
            let mut rng = StdRng::seed_from_u64(0);
            let seq = select_slides(&[], count, policy, &mut rng, &mut ());
            prop_assert!(seq.is_empty());
        }

        #[test]
        fn prop_prefix_is_catalog_prefix(n in 1usize..50, count in 0usize..100, seed in any::<u64>()) {
            let images = catalog(n);
            let mut rng = StdRng::seed_from_u64(seed);
            let seq = select_slides(&images, count, SelectionPolicy::Prefix, &mut rng, &mut ());
            prop_assert_eq!(seq.len(), count.min(n));
            prop_assert_eq!(seq.as_slice(), &images[..seq.len()]);
        }

        #[test]
        fn prop_full_coverage_includes_every_image(
            n in 1usize..40,
            extra in 0usize..200,
            seed in any::<u64>(),
        ) {
            let images = catalog(n);
            let count = n + extra;
            let mut rng = StdRng::seed_from_u64(seed);
            let seq = select_slides(&images, count, SelectionPolicy::FullCoverage, &mut rng, &mut ());
            prop_assert_eq!(seq.len(), count);
            let seen: HashSet<_> = seq.iter().collect();
            prop_assert_eq!(seen.len(), n);
        }
    }
}
