//! CLI definitions for somark.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use somark_config::Config;

/// somark CLI.
#[derive(Parser)]
#[command(name = "somark")]
#[command(about = "Set-of-Marks annotation of rendered webpages")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.somark/config.toml when present)
    #[arg(short, long, global = true, env = "SOMARK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Mark every URL of a list and save screenshots and annotations
    Batch {
        /// Newline-delimited URL list, or a directory of .html files
        #[arg(long)]
        urls_path: PathBuf,

        /// Directory receiving anno/, marked/, som/ and raw/
        #[arg(long)]
        save_dir: PathBuf,

        /// Documents processed at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// Index of the first URL to process
        #[arg(long)]
        start: Option<usize>,

        /// Number of URLs to process (-1 for all)
        #[arg(long, allow_negative_numbers = true)]
        total: Option<i64>,

        /// Run Chrome headless (true|false)
        #[arg(long)]
        headless: Option<bool>,

        /// Use 1920x1080 for every document
        #[arg(long)]
        fixed_viewport: bool,

        /// Selection depth
        #[arg(long)]
        depth: Option<i64>,
    },

    /// Mark one live page and print its annotations as JSON
    Mark {
        /// Page URL
        #[arg(long)]
        url: String,

        /// Selection depth
        #[arg(long)]
        depth: Option<i64>,

        /// Also save a screenshot with the marks drawn
        #[arg(long)]
        screenshot: Option<PathBuf>,
    },

    /// Run the analysis on a saved snapshot and print its annotations as JSON
    Analyze {
        /// Snapshot JSON written by `capture`
        #[arg(long)]
        snapshot: PathBuf,

        /// Selection depth
        #[arg(long)]
        depth: Option<i64>,
    },

    /// Save the snapshot of one live page for offline analysis
    Capture {
        /// Page URL
        #[arg(long)]
        url: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

impl Commands {
    /// Fold command-line overrides into the loaded configuration.
    pub(crate) fn apply_overrides(&self, config: &mut Config) {
        match self {
            Commands::Batch {
                concurrency,
                start,
                total,
                headless,
                fixed_viewport,
                depth,
                ..
            } => {
                if let Some(concurrency) = concurrency {
                    config.batch.concurrency = *concurrency;
                }
                if let Some(start) = start {
                    config.batch.start = *start;
                }
                if let Some(total) = total {
                    config.batch.total = *total;
                }
                if let Some(headless) = headless {
                    config.browser.headless = *headless;
                }
                if *fixed_viewport {
                    config.batch.fixed_viewport = true;
                }
                if let Some(depth) = depth {
                    config.marking.depth = *depth;
                }
            }
            Commands::Mark { depth, .. } | Commands::Analyze { depth, .. } => {
                if let Some(depth) = depth {
                    config.marking.depth = *depth;
                }
            }
            Commands::Capture { .. } => {}
        }
    }
}
