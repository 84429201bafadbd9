//! Error types shared across Slidecast crates.

use std::path::PathBuf;

/// Top-level error type for Slidecast operations.
///
/// Every variant is terminal for the current run. Nothing here is retried:
/// external tool failures are treated as non-transient.
#[derive(Debug, thiserror::Error)]
pub enum SlidecastError {
    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("No audio files found in {}", path.display())]
    NoAudioFound { path: PathBuf },

    #[error("Invalid slide duration range: {min}-{max} seconds")]
    InvalidDurationRange { min: f64, max: f64 },

    #[error("Audio merge failed: {message}")]
    AudioMergeFailed { message: String },

    #[error("Slideshow render failed: {message}")]
    RenderFailed { message: String },

    #[error("Combining video and audio failed: {message}")]
    CombineFailed { message: String },

    #[error("Media probe error: {message}")]
    Probe { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using SlidecastError.
pub type SlidecastResult<T> = Result<T, SlidecastError>;

impl SlidecastError {
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DirectoryNotFound { path: path.into() }
    }

    pub fn no_audio(path: impl Into<PathBuf>) -> Self {
        Self::NoAudioFound { path: path.into() }
    }

    pub fn audio_merge(msg: impl Into<String>) -> Self {
        Self::AudioMergeFailed {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::RenderFailed {
            message: msg.into(),
        }
    }

    pub fn combine(msg: impl Into<String>) -> Self {
        Self::CombineFailed {
            message: msg.into(),
        }
    }

    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
