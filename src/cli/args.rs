//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Core tuning flags shared by the processing commands
#[derive(Args, Debug, Default, Clone)]
pub struct TuningArgs {
    /// Seconds between sampled frames
    #[arg(long)]
    pub interval: Option<f64>,

    /// Captions shorter than this many characters are folded into the current step
    #[arg(long)]
    pub min_text_length: Option<usize>,

    /// Maximum fingerprint distance treated as the same screen
    #[arg(long)]
    pub similarity_threshold: Option<u32>,

    /// Keep going when the caption file is missing or empty
    #[arg(long)]
    pub allow_missing_captions: bool,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory holding one sub-directory per job
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving one sub-directory per job
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Content provider (MOCK, GEMINI)
    #[arg(long)]
    pub provider: Option<String>,

    /// Document builders, comma separated (MARKDOWN, HTML, JSON)
    #[arg(long, value_delimiter = ',')]
    pub builders: Option<Vec<String>>,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

/// Arguments for the job command
#[derive(Args, Debug)]
pub struct JobArgs {
    /// Input video file
    #[arg(long)]
    pub video: PathBuf,

    /// SRT caption file
    #[arg(long)]
    pub captions: PathBuf,

    /// Output directory for this job
    #[arg(short, long)]
    pub output: PathBuf,

    /// Job name used as document title (default: output directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Content provider (MOCK, GEMINI)
    #[arg(long)]
    pub provider: Option<String>,

    /// Document builders, comma separated (MARKDOWN, HTML, JSON)
    #[arg(long, value_delimiter = ',')]
    pub builders: Option<Vec<String>>,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

/// Arguments for the steps command
#[derive(Args, Debug)]
pub struct StepsArgs {
    /// Input video file
    #[arg(long)]
    pub video: PathBuf,

    /// SRT caption file
    #[arg(long)]
    pub captions: PathBuf,

    /// Directory receiving the sampled frames
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

/// Arguments for the init-config command
#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Destination file
    #[arg(default_value = "stepdoc.toml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
