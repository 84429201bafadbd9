//! ffmpeg/ffprobe backend.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slidecast_common::config::{AppConfig, RenderSettings};
use slidecast_common::error::{SlidecastError, SlidecastResult};
use slidecast_planner::{DurationRange, SlideSequence};
use tempfile::NamedTempFile;

use crate::audio;
use crate::backend::MediaBackend;
use crate::tools::command_exists;

/// Media backend that shells out to ffmpeg and ffprobe.
pub struct FfmpegBackend {
    audio_extensions: Vec<String>,
    excluded_names: Vec<String>,
    render: RenderSettings,
    rng: StdRng,
}

impl FfmpegBackend {
    /// Build a backend from configuration. `seed` fixes slide durations.
    pub fn new(config: &AppConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            audio_extensions: config.slideshow.audio_extensions.clone(),
            excluded_names: config
                .outputs
                .all()
                .iter()
                .map(|n| n.to_string())
                .collect(),
            render: config.render.clone(),
            rng,
        }
    }

    fn run_ffmpeg(
        &self,
        args: &[String],
        fail: fn(String) -> SlidecastError,
    ) -> SlidecastResult<()> {
        tracing::debug!(args = ?args, "Running ffmpeg");
        let start = std::time::Instant::now();
        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-y"])
            .args(args)
            .output()
            .map_err(|e| fail(format!("Failed to start ffmpeg: {e}")))?;

        if !output.status.success() {
            return Err(fail(format!(
                "ffmpeg failed (status {}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        tracing::info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            "ffmpeg finished"
        );
        Ok(())
    }
}

impl MediaBackend for FfmpegBackend {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn is_available(&self) -> bool {
        command_exists("ffmpeg") && command_exists("ffprobe")
    }

    fn find_audio_files(&self, directory: &Path) -> SlidecastResult<Vec<PathBuf>> {
        let exclude: Vec<&str> = self.excluded_names.iter().map(String::as_str).collect();
        audio::find_audio_files(directory, &self.audio_extensions, &exclude)
    }

    fn total_duration(&self, files: &[PathBuf]) -> SlidecastResult<f64> {
        let mut total = 0.0;
        for file in files {
            let secs = audio::probe_duration(file)?;
            tracing::debug!(path = %file.display(), secs, "probed audio duration");
            total += secs;
        }
        Ok(total)
    }

    fn merge_audio(&mut self, files: &[PathBuf], output: &Path) -> SlidecastResult<()> {
        if files.is_empty() {
            return Err(SlidecastError::audio_merge("no audio files to merge"));
        }
        let list = write_concat_list(files.iter().map(|f| (f.as_path(), None)))
            .map_err(|e| SlidecastError::audio_merge(format!("Failed to write concat list: {e}")))?;

        let args = merge_args(list.path(), output, self.render.audio_bitrate_kbps);
        self.run_ffmpeg(&args, SlidecastError::audio_merge)?;
        tracing::info!(output = %output.display(), inputs = files.len(), "audio merged");
        Ok(())
    }

    fn render_slideshow(
        &mut self,
        slides: &SlideSequence,
        output: &Path,
        range: &DurationRange,
    ) -> SlidecastResult<()> {
        if slides.is_empty() {
            return Err(SlidecastError::render("no slides to render"));
        }

        let durations: Vec<f64> = slides
            .iter()
            .map(|_| self.rng.random_range(range.min()..=range.max()))
            .collect();
        let total: f64 = durations.iter().sum();

        let entries = slides
            .iter()
            .zip(&durations)
            .map(|(slide, secs)| (slide.as_path(), Some(*secs)));
        let list = write_concat_list(entries)
            .map_err(|e| SlidecastError::render(format!("Failed to write concat list: {e}")))?;

        tracing::info!(
            slides = slides.len(),
            total_secs = total,
            output = %output.display(),
            "rendering slideshow"
        );
        let args = render_args(list.path(), output, &self.render);
        self.run_ffmpeg(&args, SlidecastError::render)
    }

    fn combine(&mut self, video: &Path, audio: &Path, output: &Path) -> SlidecastResult<()> {
        let args = combine_args(video, audio, output, self.render.audio_bitrate_kbps);
        self.run_ffmpeg(&args, SlidecastError::combine)?;
        tracing::info!(output = %output.display(), "video and audio combined");
        Ok(())
    }
}

/// Write an ffconcat list. Entries with a duration get a `duration` line;
/// the last timed entry is repeated so the demuxer honours its duration.
fn write_concat_list<'a>(
    entries: impl Iterator<Item = (&'a Path, Option<f64>)>,
) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("slidecast-")
        .suffix(".ffconcat")
        .tempfile()?;
    let body = concat_list_body(entries);
    file.write_all(body.as_bytes())?;
    file.flush()?;
    Ok(file)
}

fn concat_list_body<'a>(entries: impl Iterator<Item = (&'a Path, Option<f64>)>) -> String {
    let mut body = String::from("ffconcat version 1.0\n");
    let mut last_timed = None;
    for (path, duration) in entries {
        let path = absolute(path);
        body.push_str(&format!("file '{}'\n", escape_concat_path(&path)));
        if let Some(secs) = duration {
            body.push_str(&format!("duration {secs:.3}\n"));
            last_timed = Some(path);
        }
    }
    if let Some(path) = last_timed {
        body.push_str(&format!("file '{}'\n", escape_concat_path(&path)));
    }
    body
}

/// The list file lives in the temp dir, so relative paths must be resolved.
fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn escape_concat_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "'\\''")
}

fn merge_args(list: &Path, output: &Path, bitrate_kbps: u32) -> Vec<String> {
    vec![
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        list.display().to_string(),
        "-vn".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        format!("{bitrate_kbps}k"),
        output.display().to_string(),
    ]
}

fn render_args(list: &Path, output: &Path, settings: &RenderSettings) -> Vec<String> {
    let (w, h) = (settings.width, settings.height);
    let filter = format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,\
         pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1,format=yuv420p"
    );
    vec![
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        list.display().to_string(),
        "-vf".to_string(),
        filter,
        "-r".to_string(),
        settings.fps.to_string(),
        "-c:v".to_string(),
        settings.video_codec.clone(),
        "-an".to_string(),
        output.display().to_string(),
    ]
}

fn combine_args(video: &Path, audio: &Path, output: &Path, bitrate_kbps: u32) -> Vec<String> {
    vec![
        "-i".to_string(),
        video.display().to_string(),
        "-i".to_string(),
        audio.display().to_string(),
        "-map".to_string(),
        "0:v:0".to_string(),
        "-map".to_string(),
        "1:a:0".to_string(),
        "-c:v".to_string(),
        "copy".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        format!("{bitrate_kbps}k"),
        "-shortest".to_string(),
        output.display().to_string(),
    ]
}
