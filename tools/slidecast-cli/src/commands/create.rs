//! Plan and render a slideshow.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use slidecast_common::config::AppConfig;
use slidecast_media::FfmpegBackend;
use slidecast_orchestrator::{
    Orchestrator, OrchestratorSettings, PlanSummary, RunObserver, RunOutcome, RunReport,
    SlideshowRequest, Stage,
};
use slidecast_planner::{
    DurationRange, ImagePath, PlanObserver, PlanningMode, SlidePlan, SlideSequence,
    TracingObserver,
};

pub struct CreateArgs {
    pub directory: PathBuf,
    pub test: bool,
    pub dry_run: bool,
    pub json: bool,
    pub min_duration: Option<f64>,
    pub max_duration: Option<f64>,
    pub max_slides: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub seed: Option<u64>,
}

pub fn run(mut config: AppConfig, args: CreateArgs) -> anyhow::Result<()> {
    if let Some(min) = args.min_duration {
        config.slideshow.min_slide_secs = min;
    }
    if let Some(max) = args.max_duration {
        config.slideshow.max_slide_secs = max;
    }
    if let Some(cap) = args.max_slides {
        config.slideshow.max_slides = cap;
    }
    config.validate().context("validating configuration")?;

    let range = DurationRange::new(
        config.slideshow.min_slide_secs,
        config.slideshow.max_slide_secs,
    )?;
    let mode = if args.test {
        PlanningMode::Test
    } else {
        PlanningMode::Full
    };

    let request = SlideshowRequest {
        directory: args.directory,
        output_dir: args.output_dir,
        mode,
        range,
        dry_run: args.dry_run,
        seed: args.seed,
    };

    let backend = FfmpegBackend::new(&config, args.seed);
    let mut orchestrator = Orchestrator::new(backend, OrchestratorSettings::from(&config));

    let result = if args.json {
        orchestrator.run(&request, &mut TracingObserver)
    } else {
        print_header(&request);
        orchestrator.run(&request, &mut ConsoleObserver::default())
    };
    let outcome = result
        .with_context(|| format!("slideshow for {} failed", request.directory.display()))?;

    match outcome {
        RunOutcome::DryRun(summary) if args.json => println!("{}", summary.to_json_pretty()?),
        RunOutcome::DryRun(summary) => print_summary(&summary),
        RunOutcome::Completed(report) => print_report(&report),
    }
    Ok(())
}

fn print_header(request: &SlideshowRequest) {
    println!("Slidecast");
    println!("  Directory: {}", request.directory.display());
    println!(
        "  Mode: {}",
        match request.mode {
            PlanningMode::Test => "test (1-minute video)",
            PlanningMode::Full => "full (matches audio length)",
        }
    );
    println!(
        "  Slide duration: {}-{} seconds",
        request.range.min(),
        request.range.max()
    );
    if request.dry_run {
        println!("\nDRY RUN - nothing will be rendered or written");
        println!("{}", "=".repeat(60));
    }
}

fn print_summary(summary: &PlanSummary) {
    println!("\nSummary:");
    println!("  Directory: {}", summary.directory.display());
    println!(
        "  Slide duration: {}-{} seconds",
        summary.min_slide_secs, summary.max_slide_secs
    );
    println!("  Audio files: {}", summary.audio_files.join(", "));
    println!("  Audio duration: {:.1} seconds", summary.audio_duration_secs);
    println!("  Images found: {}", summary.image_count);
    println!("  Total slides: {}", summary.slide_count);
    if summary.capped {
        println!("  (limited from {})", summary.requested_slides);
    }
    println!(
        "  Estimated video duration: {:.1} minutes ({:.1} seconds)",
        summary.estimated_minutes(),
        summary.estimated_duration_secs
    );
    println!("  Output: {}", summary.output.display());
    println!("{}", "=".repeat(60));
    println!("Dry run complete. Run again without --dry-run to render.");
}

fn print_report(report: &RunReport) {
    println!("\nSuccess!");
    println!("  Final video: {}", report.final_video.display());
    println!(
        "  Slides: {} ({} unique + {} repeats)",
        report.slides, report.unique_images, report.repeats
    );
    if report.audio_reused {
        println!("  Audio: reused {}", report.merged_audio.display());
    } else {
        println!("  Audio: {}", report.merged_audio.display());
    }
    match report.file_size_bytes {
        Some(bytes) => println!("  File size: {:.1} MB", bytes as f64 / (1024.0 * 1024.0)),
        None => println!("  File size: (not on disk)"),
    }
}

/// Prints run progress for a human at the terminal.
#[derive(Default)]
struct ConsoleObserver {
    progress_open: bool,
}

impl ConsoleObserver {
    fn end_progress_line(&mut self) {
        if self.progress_open {
            println!();
            self.progress_open = false;
        }
    }
}

impl PlanObserver for ConsoleObserver {
    fn plan_computed(&mut self, plan: &SlidePlan) {
        println!(
            "  Slides needed: {} (avg {:.1}s per slide, target {:.1}s)",
            plan.count, plan.average_secs, plan.target_secs
        );
        println!(
            "  Final video will be ~{:.1} minutes",
            plan.estimated_runtime_secs() / 60.0
        );
    }

    fn slide_cap_applied(&mut self, requested: usize, cap: usize) {
        println!("  [WARN] Limiting slides from {requested} to max {cap}");
    }

    fn repeat_progress(&mut self, filled: usize, target: usize, image: &ImagePath) {
        let pct = if target == 0 {
            100.0
        } else {
            filled as f64 / target as f64 * 100.0
        };
        print!(
            "\r  Filling: {filled}/{target} ({pct:.0}%) {}          ",
            image.display_name()
        );
        std::io::stdout().flush().ok();
        self.progress_open = true;
    }

    fn selection_complete(&mut self, sequence: &SlideSequence, unique: usize, repeats: usize) {
        self.end_progress_line();
        println!(
            "  Selected {} images ({unique} unique + {repeats} repeats)",
            sequence.len()
        );
    }
}

impl RunObserver for ConsoleObserver {
    fn stage_entered(&mut self, stage: Stage) {
        self.end_progress_line();
        let label = match stage {
            Stage::Discovery => "Discovering media...",
            Stage::Planning => "Planning slides...",
            Stage::Selection => "Selecting images...",
            Stage::Delegation => "Rendering (audio merge, slideshow, combine)...",
            Stage::Cleanup => "Cleaning up intermediate files...",
            Stage::Failed => "Run failed.",
            Stage::Init | Stage::DryRunCheck | Stage::Done => return,
        };
        println!("\n{label}");
    }

    fn audio_found(&mut self, files: &[PathBuf], duration_secs: f64) {
        let names: Vec<_> = files.iter().map(|p| file_name(p)).collect();
        println!("  Found {} audio files: {}", files.len(), names.join(", "));
        println!("  Audio duration: {duration_secs:.1} seconds");
    }

    fn images_found(&mut self, count: usize) {
        println!("  Found {count} images");
    }

    fn merged_audio_reused(&mut self, path: &Path) {
        println!("  Using existing merged audio: {}", path.display());
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
