//! Dry-run planning summary.

use std::path::{Path, PathBuf};

use serde::Serialize;
use slidecast_common::error::SlidecastResult;
use slidecast_planner::{DurationRange, PlanningMode, SlidePlan};

/// What a run would produce, computed without touching any output.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    /// RFC 3339 timestamp of when the summary was computed.
    pub generated_at: String,
    pub directory: PathBuf,
    pub mode: PlanningMode,
    pub min_slide_secs: f64,
    pub max_slide_secs: f64,
    /// Audio file names, without directories.
    pub audio_files: Vec<String>,
    pub audio_duration_secs: f64,
    pub image_count: usize,
    pub slide_count: usize,
    pub requested_slides: usize,
    pub capped: bool,
    pub estimated_duration_secs: f64,
    pub output: PathBuf,
}

impl PlanSummary {
    pub(crate) fn new(
        directory: &Path,
        mode: PlanningMode,
        range: &DurationRange,
        audio_files: &[PathBuf],
        audio_duration_secs: f64,
        image_count: usize,
        plan: &SlidePlan,
        output: PathBuf,
    ) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            directory: directory.to_path_buf(),
            mode,
            min_slide_secs: range.min(),
            max_slide_secs: range.max(),
            audio_files: audio_files.iter().map(|p| file_label(p)).collect(),
            audio_duration_secs,
            image_count,
            slide_count: plan.count,
            requested_slides: plan.requested,
            capped: plan.capped,
            estimated_duration_secs: plan.estimated_runtime_secs(),
            output,
        }
    }

    /// Estimated duration in minutes.
    pub fn estimated_minutes(&self) -> f64 {
        self.estimated_duration_secs / 60.0
    }

    pub fn to_json_pretty(&self) -> SlidecastResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_plan() {
        let range = DurationRange::new(3.0, 7.0).unwrap();
        let plan = SlidePlan {
            count: 20,
            requested: 20,
            target_secs: 100.0,
            average_secs: 5.0,
            capped: false,
        };
        let summary = PlanSummary::new(
            Path::new("/photos"),
            PlanningMode::Full,
            &range,
            &[PathBuf::from("/photos/a.mp3"), PathBuf::from("/photos/b.wav")],
            100.0,
            12,
            &plan,
            PathBuf::from("/photos/slideshow_final.mp4"),
        );

        assert_eq!(summary.audio_files, ["a.mp3", "b.wav"]);
        assert_eq!(summary.estimated_duration_secs, 100.0);
        assert!((summary.estimated_minutes() - 100.0 / 60.0).abs() < 1e-9);

        let json = summary.to_json_pretty().unwrap();
        assert!(json.contains("\"mode\": \"full\""));
        assert!(json.contains("\"slide_count\": 20"));
    }
}
