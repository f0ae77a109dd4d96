use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use env_logger::{Builder, Target};
use log::{debug, LevelFilter};
use nix::unistd::geteuid;
use ptui_cli::app;
use ptui_cli::cli_args::Args;
use ptui_core::config::{self, Settings};
use ptui_core::error::{Error, Result};
use ptui_core::file_handling;

/// Sends log output to `log_file`. Without one, logging stays off so nothing
/// is written over the interface.
fn init_logging(log_file: Option<&str>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .map_err(|e| Error::io_error("log".to_string(), path.to_string(), e))?;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}

fn load_settings(args: &Args) -> Result<Settings> {
    let config_path = config::get_config_path(&args.config_path);
    debug!("Config path: `{}`", config_path);

    let settings = file_handling::get_settings(&config_path)?;
    Ok(args.apply(settings))
}

fn check_root(settings: &Settings) -> Result<()> {
    if !settings.require_root {
        return Ok(());
    }

    if geteuid().is_root() {
        Ok(())
    } else {
        Err(Error::Misc(
            "ptui must be run as root (pass --allow-non-root to skip this check)".to_string(),
        ))
    }
}

fn execute() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let settings = load_settings(&args)?;
    check_root(&settings)?;

    app::run(&settings)
}

fn main() -> ExitCode {
    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
