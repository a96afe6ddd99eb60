//! # CoVidA CLI (`covida`)
//!
//! Search, inspect, and edit the annotation corpus of a CoVidA
//! installation.
//!
//! ## Usage
//!
//! ```bash
//! covida --config ./config/covida.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `covida search <candidate>...` | Find annotations matching recognized handwriting candidates |
//! | `covida videos` | List annotated videos |
//! | `covida get <uuid>` | Show one annotation |
//! | `covida add ...` | Annotate a video segment |
//! | `covida remove <uuid>` | Delete an annotation |
//! | `covida export <video>` | Write Anvil XML for one video |
//!
//! ## Examples
//!
//! ```bash
//! # Candidates in recognizer rank order
//! covida search DFKI DFK1 OFKI
//!
//! # Machine-readable output
//! covida search Video --format json
//!
//! # Annotate 1.0s to 4.5s of a video
//! covida add --video lecture.mp4 --description "DFKI Demo Video" --start 1000 --end 4500
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use covida::annotate::{self, NewAnnotation};
use covida::config::{self, Config};
use covida::models::Point;
use covida::{export, get, logging, search, videos};

const DEFAULT_CONFIG: &str = "./config/covida.toml";

/// CoVidA CLI: annotation search for collaborative video annotation.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the default file does not exist, the corpus is read from
/// `./annotations`.
#[derive(Parser)]
#[command(
    name = "covida",
    about = "CoVidA: search annotated video segments with handwriting-recognition candidates",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Search annotations.
    ///
    /// Each candidate is run through the exact, case-insensitive,
    /// substring, and edit-distance passes against every video. Matches
    /// are grouped by video in stored order.
    Search {
        /// Recognized candidate strings, best first.
        #[arg(required = true)]
        candidates: Vec<String>,

        /// Output format: `text` or `json`. Defaults to `[output].format`.
        #[arg(long)]
        format: Option<String>,
    },

    /// List annotated videos.
    Videos,

    /// Show one annotation by UUID.
    Get {
        /// Annotation UUID.
        id: String,

        /// Output format: `text` or `json`. Defaults to `[output].format`.
        #[arg(long)]
        format: Option<String>,
    },

    /// Annotate a segment of a video.
    ///
    /// Creates the video's annotation file on first use.
    Add {
        /// Video source identifier (file name or URL).
        #[arg(long)]
        video: String,

        /// Video title, used only when the video is new.
        #[arg(long)]
        title: Option<String>,

        /// Annotation text.
        #[arg(long)]
        description: String,

        /// Segment start in milliseconds.
        #[arg(long)]
        start: i64,

        /// Segment end in milliseconds.
        #[arg(long)]
        end: i64,

        /// Shape outline point as `x,y`. Repeat for each point.
        #[arg(long = "point")]
        points: Vec<Point>,

        /// User login of the annotator.
        #[arg(long)]
        creator: Option<String>,
    },

    /// Delete an annotation by UUID.
    Remove {
        /// Annotation UUID.
        id: String,
    },

    /// Export one video's annotations as Anvil XML.
    ///
    /// Writes `<name>_spec.xml` and `<name>.anvil` into the output directory.
    Export {
        /// Video source or data UUID.
        video: String,

        /// Output directory.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

fn resolve_config(path: &Path) -> Result<Config> {
    if path == Path::new(DEFAULT_CONFIG) && !path.exists() {
        return Ok(Config::minimal());
    }
    config::load_config(path)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = resolve_config(&cli.config)?;

    let filter = if cli.verbose {
        "debug"
    } else {
        cfg.logging.filter.as_str()
    };
    logging::init(filter)?;

    match cli.command {
        Commands::Search { candidates, format } => {
            search::run_search(&cfg, &candidates, format.as_deref())?;
        }
        Commands::Videos => {
            videos::list_videos(&cfg)?;
        }
        Commands::Get { id, format } => {
            get::run_get(&cfg, &id, format.as_deref())?;
        }
        Commands::Add {
            video,
            title,
            description,
            start,
            end,
            points,
            creator,
        } => {
            annotate::run_add(
                &cfg,
                NewAnnotation {
                    video_source: video,
                    title,
                    description,
                    time_start: start,
                    time_end: end,
                    shape: points,
                    creator,
                },
            )?;
        }
        Commands::Remove { id } => {
            annotate::run_remove(&cfg, &id)?;
        }
        Commands::Export { video, out } => {
            export::run_export(&cfg, &video, &out)?;
        }
    }

    Ok(())
}
