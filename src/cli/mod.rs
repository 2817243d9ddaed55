use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use crate::review::{PresetReason, SubmissionStatus};

pub mod commands;

#[derive(Parser)]
#[command(name = "terraprice")]
#[command(about = "Review floorplan submissions for TerraPrice")]
#[command(long_about = "TerraPrice keeps uploaded floorplans in a review queue. Reviewers approve or deny \
                       pending submissions and can undo a decision, which sends it back to pending. \
                       Get started with 'terraprice list --status pending'.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, help = "Configuration file (defaults to ./terraprice.toml)")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List submissions, newest first
    List {
        /// Only show submissions in this status
        #[arg(long, help = "Filter by status: pending, approved, denied")]
        status: Option<SubmissionStatus>,
    },
    /// Show a single submission
    Show {
        /// Submission id
        id: String,
    },
    /// Approve a pending submission
    Approve {
        /// Submission id
        id: String,
    },
    /// Deny a pending submission with a reason
    #[command(group(ArgGroup::new("denial").required(true).args(["reason", "preset"])))]
    Deny {
        /// Submission id
        id: String,
        /// Free-text reason shown to the uploader
        #[arg(long, help = "Reason for the denial (at least 10 characters)")]
        reason: Option<String>,
        /// One of the standard denial reasons
        #[arg(long, help = "poor-image-quality, incomplete-floorplan, not-a-floorplan, missing-dimensions, duplicate-submission")]
        preset: Option<PresetReason>,
    },
    /// Send an approved or denied submission back to pending
    Undo {
        /// Submission id
        id: String,
    },
    /// Count submissions per status
    Summary,
    /// Print the configuration in effect, API key masked
    Config,
    /// Write a configuration template
    InitConfig {
        /// Where to write the file
        #[arg(long, default_value = "terraprice.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
