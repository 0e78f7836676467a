//! Config subcommand handlers.

use coronatracker_config::{self as settings, Config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { overwrite } => {
            let path = settings::config_path();
            if path.exists() && !overwrite {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let mut cfg = Config::default();
            config::apply_overrides(&mut cfg, global);
            cfg.to_tracker_config()?;
            settings::save_config_to(&cfg, &path)?;

            if !global.quiet {
                eprintln!("Wrote {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let format = config::output_format(&cfg, global)?;
            output::print_output(&render_config(format, &cfg), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&settings::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let path = settings::config_path();
            let mut cfg = settings::load_file_config(&path)?;
            cfg.set(&key, &value)?;
            cfg.to_tracker_config()?;
            settings::save_config_to(&cfg, &path)?;

            if !global.quiet {
                eprintln!("Set {key} = {value}");
            }
            Ok(())
        }
    }
}

fn render_config(format: OutputFormat, cfg: &Config) -> String {
    let rows = [
        ("api_url", cfg.api_url.clone()),
        ("country", cfg.country.clone()),
        ("timeout", cfg.timeout.to_string()),
        ("refresh_threshold", cfg.refresh_threshold.to_string()),
        ("output", cfg.output.clone()),
    ];

    match format {
        OutputFormat::Json => output::render_json(cfg),
        OutputFormat::Table | OutputFormat::Plain => rows
            .iter()
            .map(|(key, value)| format!("{key} = {value}"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
