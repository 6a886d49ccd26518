//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::adapters::TomlConfigAdapter;
use crate::cli::{Cli, Commands, TuningArgs};
use crate::domain::config::AppConfig;
use crate::error::{StepDocError, StepDocResult};

/// Resolve configuration following precedence: CLI > Env > File > Defaults
pub fn resolve_configuration(cli: &Cli) -> StepDocResult<AppConfig> {
    let mut config = load_config_file(cli.config.as_deref())?;

    let env_overrides = apply_environment_overrides(&mut config, |key| std::env::var(key).ok())?;
    let cli_overrides = apply_cli_overrides(&mut config, cli);
    debug!(
        "Applied {} environment and {} CLI configuration overrides",
        env_overrides, cli_overrides
    );

    config.validate().map_err(|e| StepDocError::ConfigError {
        message: e.to_string(),
    })?;
    Ok(config)
}

/// Defaults merged with the configuration file, when one is found
pub fn load_config_file(explicit: Option<&Path>) -> StepDocResult<AppConfig> {
    TomlConfigAdapter::discover(explicit)
        .map(Option::unwrap_or_default)
        .map_err(|e| StepDocError::ConfigError {
            message: e.to_string(),
        })
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> StepDocResult<T> {
    value.trim().parse().map_err(|_| StepDocError::ConfigError {
        message: format!("Invalid value for {}: '{}'", key, value),
    })
}

fn parse_bool(key: &str, value: &str) -> StepDocResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(StepDocError::ConfigError {
            message: format!("Invalid value for {}: '{}'", key, value),
        }),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Apply environment variables through `lookup`; returns the number applied
pub fn apply_environment_overrides(
    config: &mut AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> StepDocResult<usize> {
    let mut applied = 0;
    let mut get = |key: &str| {
        let value = lookup(key).filter(|v| !v.trim().is_empty());
        if value.is_some() {
            debug!("Found environment override: {}", key);
            applied += 1;
        }
        value
    };

    if let Some(v) = get("STEPDOC_INPUT_DIR") {
        config.paths.input_dir = PathBuf::from(v);
    }
    if let Some(v) = get("STEPDOC_OUTPUT_DIR") {
        config.paths.output_dir = PathBuf::from(v);
    }
    if let Some(v) = get("STEPDOC_INTERVAL_SEC") {
        config.sampling.interval_sec = parse_env("STEPDOC_INTERVAL_SEC", &v)?;
    }
    if let Some(v) = get("STEPDOC_MIN_TEXT_LENGTH") {
        config.grouping.min_text_length = parse_env("STEPDOC_MIN_TEXT_LENGTH", &v)?;
    }
    if let Some(v) = get("STEPDOC_SIMILARITY_THRESHOLD") {
        config.grouping.similarity_threshold = parse_env("STEPDOC_SIMILARITY_THRESHOLD", &v)?;
    }
    if let Some(v) = get("STEPDOC_REQUIRE_CAPTIONS") {
        config.grouping.require_captions = parse_bool("STEPDOC_REQUIRE_CAPTIONS", &v)?;
    }
    if let Some(v) = get("AI_PROVIDER_TYPE") {
        config.content.provider = v;
    }
    if let Some(v) = get("STEPDOC_PROVIDER") {
        config.content.provider = v;
    }
    if let Some(v) = get("STEPDOC_MODEL") {
        config.content.model = v;
    }
    if let Some(v) = get("GOOGLE_API_KEY") {
        config.content.api_key = Some(v);
    }
    if let Some(v) = get("STEPDOC_API_KEY") {
        config.content.api_key = Some(v);
    }
    if let Some(v) = get("STEPDOC_BUILDERS") {
        config.output.builders = split_list(&v);
    }
    if let Some(v) = get("STEPDOC_LOG_LEVEL") {
        config.logging.level = v;
    }
    if let Some(v) = get("STEPDOC_LOG_FORMAT") {
        config.logging.format = v;
    }

    Ok(applied)
}

fn apply_tuning(config: &mut AppConfig, tuning: &TuningArgs) -> usize {
    let mut applied = 0;
    if let Some(interval) = tuning.interval {
        config.sampling.interval_sec = interval;
        applied += 1;
    }
    if let Some(min) = tuning.min_text_length {
        config.grouping.min_text_length = min;
        applied += 1;
    }
    if let Some(threshold) = tuning.similarity_threshold {
        config.grouping.similarity_threshold = threshold;
        applied += 1;
    }
    if tuning.allow_missing_captions {
        config.grouping.require_captions = false;
        applied += 1;
    }
    applied
}

/// Apply CLI argument overrides; returns the number applied
pub fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) -> usize {
    let mut applied = 0;

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
        applied += 1;
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
        applied += 1;
    }

    match &cli.command {
        Commands::Run(args) => {
            if let Some(dir) = &args.input_dir {
                config.paths.input_dir = dir.clone();
                applied += 1;
            }
            if let Some(dir) = &args.output_dir {
                config.paths.output_dir = dir.clone();
                applied += 1;
            }
            if let Some(provider) = &args.provider {
                config.content.provider = provider.clone();
                applied += 1;
            }
            if let Some(builders) = &args.builders {
                config.output.builders = builders.clone();
                applied += 1;
            }
            applied += apply_tuning(config, &args.tuning);
        }
        Commands::Job(args) => {
            if let Some(provider) = &args.provider {
                config.content.provider = provider.clone();
                applied += 1;
            }
            if let Some(builders) = &args.builders {
                config.output.builders = builders.clone();
                applied += 1;
            }
            applied += apply_tuning(config, &args.tuning);
        }
        Commands::Steps(args) => {
            applied += apply_tuning(config, &args.tuning);
        }
        Commands::InitConfig(_) => {}
    }

    applied
}
