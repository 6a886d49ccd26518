//! Command implementations

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::TomlConfigAdapter;
use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::{JobOutcome, StepOutcome, StepSettings};
use crate::cli::args::{InitConfigArgs, JobArgs, RunArgs, StepsArgs};
use crate::domain::config::AppConfig;
use crate::domain::model::JobSpec;
use crate::utils::time::TimecodeParser;

/// Execute the run command
pub async fn run(_args: RunArgs, config: AppConfig) -> Result<()> {
    info!("Starting run over {}", config.paths.input_dir.display());

    let container = DefaultAppContainer::new(&config).context("Failed to initialize adapters")?;
    let summary = container
        .job_runner()
        .run_all()
        .await
        .context("Job run aborted")?;

    println!(
        "{} jobs: {} completed, {} skipped, {} failed",
        summary.total(),
        summary.completed.len(),
        summary.skipped.len(),
        summary.failed.len()
    );
    for (name, message) in &summary.failed {
        println!("  FAILED {}: {}", name, message);
    }

    if !summary.failed.is_empty() {
        anyhow::bail!("{} of {} jobs failed", summary.failed.len(), summary.total());
    }
    Ok(())
}

/// Execute the job command
pub async fn job(args: JobArgs, config: AppConfig) -> Result<()> {
    let name = match args.name {
        Some(name) => name,
        None => args
            .output
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "job".to_string()),
    };
    let spec = JobSpec::new(name, args.video, args.captions, args.output)
        .map_err(|e| anyhow::anyhow!("Invalid job: {}", e))?;

    info!("Starting job {}", spec.name);
    let container = DefaultAppContainer::new(&config).context("Failed to initialize adapters")?;
    let outcome = container
        .job_runner()
        .run_job(&spec)
        .await
        .context("Job run aborted")?;

    match outcome {
        JobOutcome::Completed { steps, documents } => {
            println!("{}: {} steps", spec.name, steps);
            for document in documents {
                println!("  {}", document.display());
            }
            Ok(())
        }
        JobOutcome::Skipped => {
            println!(
                "{}: already completed (remove {} to run again)",
                spec.name,
                spec.status_file().display()
            );
            Ok(())
        }
        JobOutcome::Failed(message) => Err(anyhow::anyhow!("Job {} failed: {}", spec.name, message)),
    }
}

/// Execute the steps command
pub async fn steps(args: StepsArgs, config: AppConfig) -> Result<()> {
    info!("Computing steps for {}", args.video.display());

    let container = DefaultAppContainer::new(&config).context("Failed to initialize adapters")?;
    let outcome = container
        .step_interactor()
        .extract(
            &args.video,
            &args.captions,
            &args.output,
            &StepSettings::from(&config),
        )
        .context("Failed to extract steps")?;

    for skipped in &outcome.transcript.skipped {
        warn!(
            "Caption block {} (line {}) skipped: {}",
            skipped.block, skipped.line, skipped.reason
        );
    }

    if args.json {
        let json = serde_json::to_string_pretty(&outcome)
            .context("Failed to serialize steps to JSON")?;
        println!("{}", json);
    } else {
        display_steps(&outcome);
    }
    Ok(())
}

/// Execute the init-config command
pub fn init_config(args: InitConfigArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }

    TomlConfigAdapter::save(&args.path, &AppConfig::default())
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    println!("Wrote default configuration to {}", args.path.display());
    Ok(())
}

fn display_steps(outcome: &StepOutcome) {
    let clock = TimecodeParser::new();
    let sampling = &outcome.sampling;

    println!(
        "Sampled {} frames ({} dropped) at {:.3} fps, every {} frames",
        sampling.frames.len(),
        sampling.dropped.len(),
        sampling.frame_rate,
        sampling.stride
    );
    if let Some(reason) = &sampling.truncated {
        println!(
            "Decoding stopped early after {} frames: {}",
            sampling.decoded_frames, reason
        );
    }
    println!(
        "Parsed {} captions ({} blocks skipped)",
        outcome.transcript.intervals.len(),
        outcome.transcript.skipped.len()
    );
    println!("{} steps:", outcome.steps().len());

    for (i, step) in outcome.steps().iter().enumerate() {
        println!(
            "\nStep {} [{} - {}] frames {}..{}",
            i + 1,
            clock.format_clock(step.start_sec),
            clock.format_clock(step.end_sec),
            step.frame_range.start,
            step.frame_range.end
        );
        println!("  image: {}", step.representative_image.display());
        if step.combined_text.is_empty() {
            println!("  (no captions)");
        } else {
            println!("  {}", step.combined_text);
        }
    }

    if !outcome.merge.unfingerprinted.is_empty() {
        println!(
            "\n{} images could not be fingerprinted",
            outcome.merge.unfingerprinted.len()
        );
    }
}
