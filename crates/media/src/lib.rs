//! Slidecast Media
//!
//! Thin wrappers around the external media tools. Nothing in here makes
//! planning decisions; it only runs ffprobe/ffmpeg with the inputs it is given.
//!
//! # Pipeline
//!
//! ```text
//! *.mp3 / *.wav ... ──► ffprobe (duration) ──► planner
//!        │
//!        └──► ffmpeg concat ──► slideshow_audio.m4a ──┐
//!                                                     ├──► ffmpeg mux ──► slideshow_final.mp4
//! slide sequence ──► ffmpeg concat ──► video only ────┘
//! ```

pub mod audio;
pub mod backend;
pub mod ffmpeg;
pub mod tools;

pub use backend::MediaBackend;
pub use ffmpeg::FfmpegBackend;
