//! Config subcommand handlers. None of these touch the NVR.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

const MASK: &str = "********";

/// Replace plaintext secrets so the config can be shown safely.
fn redact(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.api_key.is_some() {
            profile.api_key = Some(MASK.into());
        }
        if profile.password.is_some() {
            profile.password = Some(MASK.into());
        }
    }
    cfg
}

fn profile_lines(cfg: &Config, active: &str) -> Vec<String> {
    cfg.profiles
        .iter()
        .map(|(name, profile)| {
            let marker = if name == active { "*" } else { " " };
            format!("{marker} {name}\t{}://{}", profile.schema, profile.address)
        })
        .collect()
}

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redact(config::load_config_or_default());
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| format!("{c:#?}"),
                |_| config::config_path().display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() {
                return Err(CliError::NoConfig {
                    path: config::config_path().display().to_string(),
                });
            }
            let active = config::active_profile_name(global, &cfg);
            output::print_output(&profile_lines(&cfg, &active).join("\n"), global.quiet);
            Ok(())
        }
    }
}
