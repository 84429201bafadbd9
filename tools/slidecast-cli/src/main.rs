//! Slidecast CLI — build slideshow videos from a folder of images and music.
//!
//! Usage:
//!   slidecast create <DIR> [OPTIONS]   Plan and render a slideshow
//!   slidecast check                    Check for ffmpeg/ffprobe
//!   slidecast config [--write]         Show or save the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "slidecast",
    about = "Turn a folder of images and audio into a slideshow video",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan and render a slideshow from a directory
    Create {
        /// Directory holding the images and audio files
        directory: PathBuf,

        /// Test mode: a short 1-minute video from the first images
        #[arg(long)]
        test: bool,

        /// Only plan and print a summary; write nothing
        #[arg(long)]
        dry_run: bool,

        /// Print the dry-run summary as JSON
        #[arg(long, requires = "dry_run")]
        json: bool,

        /// Minimum seconds per slide
        #[arg(long)]
        min_duration: Option<f64>,

        /// Maximum seconds per slide
        #[arg(long)]
        max_duration: Option<f64>,

        /// Maximum number of slides in full mode
        #[arg(long)]
        max_slides: Option<usize>,

        /// Where to write outputs (defaults to the input directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Seed for image repeats and slide durations
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check that the external media tools are installed
    Check,

    /// Show the effective configuration
    Config {
        /// Save the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = slidecast_common::config::AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    slidecast_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Create {
            directory,
            test,
            dry_run,
            json,
            min_duration,
            max_duration,
            max_slides,
            output_dir,
            seed,
        } => commands::create::run(
            config,
            commands::create::CreateArgs {
                directory,
                test,
                dry_run,
                json,
                min_duration,
                max_duration,
                max_slides,
                output_dir,
                seed,
            },
        ),
        Commands::Check => commands::check::run(),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
