//! CLI module for stepdoc
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{InitConfigArgs, JobArgs, RunArgs, StepsArgs, TuningArgs};

/// stepdoc
///
/// Turns a screen recording and its SRT captions into an ordered list of
/// instructional steps and renders them as documents.
#[derive(Parser, Debug)]
#[command(name = "stepdoc")]
#[command(about = "Turn screen recordings and their captions into step-by-step guides")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./stepdoc.toml when present)
    #[arg(long, global = true, env = "STEPDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process every job directory under the input root
    Run(RunArgs),
    /// Process a single video and caption pair
    Job(JobArgs),
    /// Compute the steps of a video and print them
    Steps(StepsArgs),
    /// Write the default configuration as TOML
    InitConfig(InitConfigArgs),
}
