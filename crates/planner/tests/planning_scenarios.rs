use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use slidecast_planner::{
    discover_images, select_slides, DurationPlanner, DurationRange, PlanningMode,
};

fn write_images(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), b"img").expect("fixture image should be writable");
    }
}

fn plan_and_select(
    dir: &Path,
    mode: PlanningMode,
    audio_secs: f64,
    seed: u64,
) -> (usize, Vec<String>) {
    let extensions = vec!["jpg".to_string(), "png".to_string()];
    let catalog = discover_images(dir, &extensions).expect("catalog should scan");
    let range = DurationRange::new(3.0, 7.0).expect("range should be valid");
    let plan = DurationPlanner::new(1000)
        .plan(mode.target(Some(audio_secs)), &range, &mut ())
        .expect("plan should succeed");
    let mut rng = StdRng::seed_from_u64(seed);
    let sequence = select_slides(
        &catalog,
        plan.count,
        mode.selection_policy(),
        &mut rng,
        &mut (),
    );
    let names = sequence.iter().map(|img| img.display_name()).collect();
    (plan.count, names)
}

#[test]
fn full_mode_fills_audio_with_every_image_first() {
    let dir = tempfile::tempdir().unwrap();
    write_images(dir.path(), &["e.jpg", "a.png", "c.jpg", "b.jpg", "d.png"]);

    // 40s / 5s average = 8 slides over a catalog of 5.
    let (count, names) = plan_and_select(dir.path(), PlanningMode::Full, 40.0, 11);
    assert_eq!(count, 8);
    assert_eq!(names.len(), 8);
    assert_eq!(&names[..5], ["a.png", "b.jpg", "c.jpg", "d.png", "e.jpg"]);

    let (_, again) = plan_and_select(dir.path(), PlanningMode::Full, 40.0, 11);
    assert_eq!(names, again);
}

#[test]
fn test_mode_truncates_to_leading_images() {
    let dir = tempfile::tempdir().unwrap();
    let many: Vec<String> = (0..30).map(|i| format!("shot_{i:02}.jpg")).collect();
    let refs: Vec<&str> = many.iter().map(String::as_str).collect();
    write_images(dir.path(), &refs);

    // 60s synthetic / 5s average = 12 slides, audio length ignored.
    let (count, names) = plan_and_select(dir.path(), PlanningMode::Test, 9_999.0, 1);
    assert_eq!(count, 12);
    assert_eq!(names, many[..12].to_vec());
}

#[test]
fn empty_directory_produces_empty_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let (count, names) = plan_and_select(dir.path(), PlanningMode::Full, 100.0, 5);
    assert_eq!(count, 20);
    assert!(names.is_empty());
}
