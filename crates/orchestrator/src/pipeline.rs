//! Run sequencing.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use slidecast_common::config::{AppConfig, OutputNames};
use slidecast_common::error::{SlidecastError, SlidecastResult};
use slidecast_media::MediaBackend;
use slidecast_planner::{
    discover_images, select_slides, DurationPlanner, DurationRange, ImagePath, PlanObserver,
    PlanningMode, SlidePlan, SlideSequence, TracingObserver,
};

use crate::summary::PlanSummary;

/// Stages of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    DryRunCheck,
    Discovery,
    Planning,
    Selection,
    Delegation,
    Cleanup,
    Done,
    Failed,
}

/// Receives stage transitions and discovery results on top of the
/// planning events.
pub trait RunObserver: PlanObserver {
    fn stage_entered(&mut self, _stage: Stage) {}

    fn audio_found(&mut self, _files: &[PathBuf], _duration_secs: f64) {}

    fn images_found(&mut self, _count: usize) {}

    fn merged_audio_reused(&mut self, _path: &Path) {}
}

impl RunObserver for () {}

/// Stage transitions are already logged by the orchestrator.
impl RunObserver for TracingObserver {}

/// Settings that stay fixed across runs.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub image_extensions: Vec<String>,
    pub max_slides: usize,
    pub outputs: OutputNames,
}

impl From<&AppConfig> for OrchestratorSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            image_extensions: config.slideshow.image_extensions.clone(),
            max_slides: config.slideshow.max_slides,
            outputs: config.outputs.clone(),
        }
    }
}

/// One slideshow request.
#[derive(Debug, Clone)]
pub struct SlideshowRequest {
    /// Directory holding the images and audio.
    pub directory: PathBuf,

    /// Where outputs go. Defaults to `directory`.
    pub output_dir: Option<PathBuf>,

    pub mode: PlanningMode,

    pub range: DurationRange,

    /// Plan and report only.
    pub dry_run: bool,

    /// Seed for repeat selection. OS entropy when `None`.
    pub seed: Option<u64>,
}

impl SlideshowRequest {
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.directory)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    DryRun(PlanSummary),
    Completed(RunReport),
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub final_video: PathBuf,
    pub merged_audio: PathBuf,
    /// The merged audio existed already and was not rebuilt.
    pub audio_reused: bool,
    pub plan: SlidePlan,
    pub slides: usize,
    pub unique_images: usize,
    pub repeats: usize,
    /// `None` when the final file is not on disk (e.g. a stub backend).
    pub file_size_bytes: Option<u64>,
}

struct Discovered {
    audio_files: Vec<PathBuf>,
    audio_duration_secs: f64,
    catalog: Vec<ImagePath>,
}

/// Drives discovery, planning, selection, and the media backend.
pub struct Orchestrator<B: MediaBackend> {
    backend: B,
    settings: OrchestratorSettings,
    stage: Stage,
}

impl<B: MediaBackend> Orchestrator<B> {
    pub fn new(backend: B, settings: OrchestratorSettings) -> Self {
        Self {
            backend,
            settings,
            stage: Stage::Init,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Stage the last run ended in.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Execute one run.
    pub fn run<O: RunObserver>(
        &mut self,
        request: &SlideshowRequest,
        observer: &mut O,
    ) -> SlidecastResult<RunOutcome> {
        tracing::info!(
            directory = %request.directory.display(),
            mode = ?request.mode,
            dry_run = request.dry_run,
            min_secs = request.range.min(),
            max_secs = request.range.max(),
            "Starting slideshow run"
        );

        match self.run_stages(request, observer) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                tracing::error!(stage = ?self.stage, error = %err, "Run failed");
                self.enter(Stage::Failed, observer);
                Err(err)
            }
        }
    }

    fn run_stages<O: RunObserver>(
        &mut self,
        request: &SlideshowRequest,
        observer: &mut O,
    ) -> SlidecastResult<RunOutcome> {
        self.enter(Stage::Init, observer);
        if !request.directory.is_dir() {
            return Err(SlidecastError::directory_not_found(&request.directory));
        }

        self.enter(Stage::DryRunCheck, observer);
        if request.dry_run {
            return self.dry_run(request, observer).map(RunOutcome::DryRun);
        }

        if !self.backend.is_available() {
            return Err(SlidecastError::unsupported(format!(
                "media backend '{}' is not available (expected ffmpeg and ffprobe in PATH)",
                self.backend.name()
            )));
        }

        let found = self.discover(request, observer)?;
        let plan = self.plan(request, &found, observer)?;

        self.enter(Stage::Selection, observer);
        let mut rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let sequence = select_slides(
            &found.catalog,
            plan.count,
            request.mode.selection_policy(),
            &mut rng,
            observer,
        );

        let report = self.delegate(request, &found, plan, &sequence, observer)?;

        self.enter(Stage::Done, observer);
        tracing::info!(
            output = %report.final_video.display(),
            slides = report.slides,
            "Slideshow complete"
        );
        Ok(RunOutcome::Completed(report))
    }

    fn dry_run<O: RunObserver>(
        &mut self,
        request: &SlideshowRequest,
        observer: &mut O,
    ) -> SlidecastResult<PlanSummary> {
        // Duration is always recomputed from the source files here, never
        // taken from a previously merged track.
        let found = self.discover(request, observer)?;
        let plan = self.plan(request, &found, observer)?;

        let summary = PlanSummary::new(
            &request.directory,
            request.mode,
            &request.range,
            &found.audio_files,
            found.audio_duration_secs,
            found.catalog.len(),
            &plan,
            request.output_dir().join(&self.settings.outputs.final_video),
        );
        self.enter(Stage::Done, observer);
        Ok(summary)
    }

    fn discover<O: RunObserver>(
        &mut self,
        request: &SlideshowRequest,
        observer: &mut O,
    ) -> SlidecastResult<Discovered> {
        self.enter(Stage::Discovery, observer);

        let audio_files = self.backend.find_audio_files(&request.directory)?;
        if audio_files.is_empty() {
            return Err(SlidecastError::no_audio(&request.directory));
        }
        let audio_duration_secs = self.backend.total_duration(&audio_files)?;
        tracing::info!(
            files = audio_files.len(),
            duration_secs = audio_duration_secs,
            "Audio discovered"
        );
        observer.audio_found(&audio_files, audio_duration_secs);

        let catalog = discover_images(&request.directory, &self.settings.image_extensions)?;
        if catalog.is_empty() {
            tracing::warn!(directory = %request.directory.display(), "No images found");
        }
        observer.images_found(catalog.len());

        Ok(Discovered {
            audio_files,
            audio_duration_secs,
            catalog,
        })
    }

    fn plan<O: RunObserver>(
        &mut self,
        request: &SlideshowRequest,
        found: &Discovered,
        observer: &mut O,
    ) -> SlidecastResult<SlidePlan> {
        self.enter(Stage::Planning, observer);
        let target = request.mode.target(Some(found.audio_duration_secs));
        DurationPlanner::new(self.settings.max_slides).plan(target, &request.range, observer)
    }

    fn delegate<O: RunObserver>(
        &mut self,
        request: &SlideshowRequest,
        found: &Discovered,
        plan: SlidePlan,
        sequence: &SlideSequence,
        observer: &mut O,
    ) -> SlidecastResult<RunReport> {
        self.enter(Stage::Delegation, observer);
        let outputs = &self.settings.outputs;
        let out_dir = request.output_dir();
        std::fs::create_dir_all(out_dir)?;

        let merged_audio = out_dir.join(&outputs.merged_audio);
        let video_only = out_dir.join(&outputs.video_only);
        let final_video = out_dir.join(&outputs.final_video);

        let audio_reused = merged_audio.exists();
        if audio_reused {
            tracing::info!(path = %merged_audio.display(), "Reusing existing merged audio");
            observer.merged_audio_reused(&merged_audio);
        } else {
            self.backend.merge_audio(&found.audio_files, &merged_audio)?;
        }

        self.backend
            .render_slideshow(sequence, &video_only, &request.range)?;
        self.backend
            .combine(&video_only, &merged_audio, &final_video)?;

        self.enter(Stage::Cleanup, observer);
        remove_intermediate(&video_only);

        let unique_images = sequence.len().min(found.catalog.len());
        Ok(RunReport {
            file_size_bytes: std::fs::metadata(&final_video).ok().map(|m| m.len()),
            final_video,
            merged_audio,
            audio_reused,
            plan,
            slides: sequence.len(),
            unique_images,
            repeats: sequence.len() - unique_images,
        })
    }

    fn enter<O: RunObserver>(&mut self, stage: Stage, observer: &mut O) {
        self.stage = stage;
        tracing::info!(?stage, "Entering stage");
        observer.stage_entered(stage);
    }
}

/// Best-effort removal of the video-only file. Never touches merged audio.
fn remove_intermediate(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed intermediate video"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Intermediate video already gone");
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove intermediate video");
        }
    }
}
