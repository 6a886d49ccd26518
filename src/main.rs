//! stepdoc
//!
//! Turns screen recordings and their SRT captions into step-by-step guides.
//!
//! # Usage
//!
//! ```bash
//! stepdoc run --input-dir input --output-dir output
//! stepdoc job --video demo/video.mp4 --captions demo/transkript.srt --output out/demo
//! stepdoc steps --video demo/video.mp4 --captions demo/transkript.srt --output shots --json
//! stepdoc init-config stepdoc.toml
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use stepdoc::cli::{commands, Cli, Commands};
use stepdoc::config_initialization::resolve_configuration;
use stepdoc::utils::logging::LoggingSystem;

/// Main entry point for the stepdoc CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = resolve_configuration(&cli)?;

    let logging = LoggingSystem::new(&config.logging)?;
    logging.initialize()?;
    logging.log_system_info();

    if !matches!(cli.command, Commands::InitConfig(_)) {
        stepdoc::init()?;
    }

    match cli.command {
        Commands::Run(args) => {
            info!("Executing run command");
            commands::run(args, config).await?;
        }
        Commands::Job(args) => {
            info!("Executing job command");
            commands::job(args, config).await?;
        }
        Commands::Steps(args) => {
            info!("Executing steps command");
            commands::steps(args, config).await?;
        }
        Commands::InitConfig(args) => {
            info!("Executing init-config command");
            commands::init_config(args)?;
        }
    }

    Ok(())
}
