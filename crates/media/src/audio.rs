//! Audio input discovery and duration probing.

use std::path::{Path, PathBuf};
use std::process::Command;

use slidecast_common::error::{SlidecastError, SlidecastResult};
use walkdir::WalkDir;

/// Find audio files directly inside `directory`.
///
/// Extensions match case-insensitively. Files whose names appear in
/// `exclude` (the tool's own outputs) are skipped, as are hidden files.
pub fn find_audio_files(
    directory: &Path,
    extensions: &[String],
    exclude: &[&str],
) -> SlidecastResult<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(SlidecastError::directory_not_found(directory));
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
    {
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if name.starts_with('.') || exclude.contains(&name) {
            continue;
        }
        if is_audio(entry.path(), extensions) {
            out.push(entry.into_path());
        }
    }
    out.sort();

    tracing::debug!(directory = %directory.display(), count = out.len(), "audio discovery complete");
    Ok(out)
}

fn is_audio(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Duration of a single media file in seconds, via ffprobe.
pub fn probe_duration(path: &Path) -> SlidecastResult<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .map_err(|e| SlidecastError::probe(format!("Failed to start ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(SlidecastError::probe(format!(
            "ffprobe failed for {} (status {}): {}",
            path.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    parse_probe_duration(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
        SlidecastError::probe(format!("ffprobe reported no duration for {}", path.display()))
    })
}

/// Parse the first line of ffprobe's `format=duration` output.
fn parse_probe_duration(raw: &str) -> Option<f64> {
    let secs = raw.lines().next()?.trim().parse::<f64>().ok()?;
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}
