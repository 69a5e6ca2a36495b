use std::path::PathBuf;

use clap::{Parser, Subcommand};
use intake_logging::LogDestination;

#[derive(Debug, Parser)]
#[command(
    name = "intake",
    version,
    about = "Stage local images and submit them for classification or labeling"
)]
pub(crate) struct Cli {
    /// Settings file (RON). Created with defaults when missing.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base origin of the service, overriding the settings file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Where logs go: file, terminal or both.
    #[arg(long, global = true, value_parser = parse_destination, default_value = "terminal")]
    pub log: LogDestination,

    /// Log debug output, including the rendered panel.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Drop the staged file at this index before submitting (repeatable, applied in order).
    #[arg(long = "remove", global = true, value_name = "INDEX")]
    pub remove: Vec<usize>,

    /// Show this staged file full-size.
    #[arg(long, global = true, value_name = "INDEX")]
    pub show: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Ask the service whether the image is recyclable.
    Classify {
        /// Send the files under `files` instead of `file`.
        #[arg(long)]
        multiple: bool,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Teach the service new labels for a category.
    Label {
        #[arg(long, default_value = "")]
        category: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn parse_destination(raw: &str) -> Result<LogDestination, String> {
    LogDestination::parse(raw).ok_or_else(|| format!("unknown log destination '{raw}'"))
}
