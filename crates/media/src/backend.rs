//! Contract between the orchestrator and the external media engine.

use std::path::{Path, PathBuf};

use slidecast_common::error::SlidecastResult;
use slidecast_planner::{DurationRange, SlideSequence};

/// Trait for media backends (ffmpeg, test doubles, ...).
///
/// Every call is synchronous and may run an external process for a long
/// time. Failures are reported once and never retried.
pub trait MediaBackend: Send {
    /// Backend name.
    fn name(&self) -> &str;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Audio inputs directly inside `directory`, sorted. Empty if none.
    fn find_audio_files(&self, directory: &Path) -> SlidecastResult<Vec<PathBuf>>;

    /// Combined duration of `files` in seconds. Must not merge anything.
    fn total_duration(&self, files: &[PathBuf]) -> SlidecastResult<f64>;

    /// Concatenate `files` into a single track at `output`.
    fn merge_audio(&mut self, files: &[PathBuf], output: &Path) -> SlidecastResult<()>;

    /// Render `slides` to a video-only file at `output`.
    ///
    /// Each slide's on-screen time is drawn by the backend, uniformly and
    /// independently, from `range`.
    fn render_slideshow(
        &mut self,
        slides: &SlideSequence,
        output: &Path,
        range: &DurationRange,
    ) -> SlidecastResult<()>;

    /// Mux `video` and `audio` into `output`.
    fn combine(&mut self, video: &Path, audio: &Path, output: &Path) -> SlidecastResult<()>;
}
