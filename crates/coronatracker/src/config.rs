//! CLI-facing configuration: loads the shared `Config` and applies flag
//! overrides on top.

use clap::ValueEnum;

use coronatracker_config::Config;
use coronatracker_core::TrackerConfig;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Load file + environment config, then apply CLI flags.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = coronatracker_config::load_config()?;
    apply_overrides(&mut cfg, global);
    Ok(cfg)
}

pub fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref url) = global.api_url {
        cfg.api_url.clone_from(url);
    }
    if let Some(ref country) = global.country {
        cfg.country.clone_from(country);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
}

pub fn tracker_config(cfg: &Config) -> Result<TrackerConfig, CliError> {
    Ok(cfg.to_tracker_config()?)
}

/// `--output` wins, then the configured default.
pub fn output_format(cfg: &Config, global: &GlobalOpts) -> Result<OutputFormat, CliError> {
    if let Some(format) = global.output {
        return Ok(format);
    }
    OutputFormat::from_str(&cfg.output, true).map_err(|_| CliError::Validation {
        field: "output".into(),
        reason: format!("expected 'table', 'json', or 'plain', got '{}'", cfg.output),
    })
}
