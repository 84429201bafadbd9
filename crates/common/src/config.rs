//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SlidecastError, SlidecastResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Slide planning defaults.
    pub slideshow: SlideshowDefaults,

    /// Names of the files a run produces.
    pub outputs: OutputNames,

    /// Parameters handed through to the external renderer.
    pub render: RenderSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default slide planning parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideshowDefaults {
    /// Shortest on-screen time for a single slide (seconds).
    pub min_slide_secs: f64,

    /// Longest on-screen time for a single slide (seconds).
    pub max_slide_secs: f64,

    /// Hard ceiling on the slide count in full mode.
    pub max_slides: usize,

    /// Recognized image extensions, without the dot. Matched case-sensitively.
    pub image_extensions: Vec<String>,

    /// Recognized audio extensions, without the dot.
    pub audio_extensions: Vec<String>,
}

/// Output file names, resolved against the output directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputNames {
    /// Merged audio track. Kept between runs for reuse.
    pub merged_audio: String,

    /// Video-only intermediate, removed after combining.
    pub video_only: String,

    /// Final video with audio.
    pub final_video: String,
}

/// Render parameters passed to ffmpeg untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub video_codec: String,
    pub audio_bitrate_kbps: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "slidecast=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for SlideshowDefaults {
    fn default() -> Self {
        Self {
            min_slide_secs: 3.0,
            max_slide_secs: 7.0,
            max_slides: 1000,
            image_extensions: ["jpg", "jpeg", "png", "webp", "JPG", "JPEG", "PNG", "WEBP"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            audio_extensions: ["mp3", "wav", "m4a", "flac", "ogg", "aac"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            merged_audio: "slideshow_audio.m4a".to_string(),
            video_only: "slideshow_video.mp4".to_string(),
            final_video: "slideshow_final.mp4".to_string(),
        }
    }
}

impl OutputNames {
    /// All output names, used to keep them out of input discovery.
    pub fn all(&self) -> [&str; 3] {
        [
            self.merged_audio.as_str(),
            self.video_only.as_str(),
            self.final_video.as_str(),
        ]
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30,
            video_codec: "libx264".to_string(),
            audio_bitrate_kbps: 192,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from `path`, falling back to defaults on any problem.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", path, e);
                }
            }
        }
        Self::default()
    }

    /// Reject settings no run could succeed with.
    ///
    /// Loading never fails, so this is checked once the effective config
    /// (file plus command-line overrides) is known.
    pub fn validate(&self) -> SlidecastResult<()> {
        let slideshow = &self.slideshow;
        if slideshow.image_extensions.is_empty() {
            return Err(SlidecastError::config("slideshow.image_extensions is empty"));
        }
        if slideshow.audio_extensions.is_empty() {
            return Err(SlidecastError::config("slideshow.audio_extensions is empty"));
        }

        let names = self.outputs.all();
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(SlidecastError::config("output file names must not be empty"));
        }
        if names[0] == names[1] || names[0] == names[2] || names[1] == names[2] {
            return Err(SlidecastError::config(format!(
                "output file names must be distinct, got {names:?}"
            )));
        }

        let render = &self.render;
        if render.width == 0 || render.height == 0 {
            return Err(SlidecastError::config(format!(
                "render size must be non-zero, got {}x{}",
                render.width, render.height
            )));
        }
        if render.fps == 0 {
            return Err(SlidecastError::config("render.fps must be non-zero"));
        }
        if render.video_codec.trim().is_empty() {
            return Err(SlidecastError::config("render.video_codec is empty"));
        }
        Ok(())
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let path = config_file_path();
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("slidecast").join("config.json")
}
