mod assets;
mod catalog;
mod cmd;
mod config;
mod git;
mod prompt;

use clap::Parser;
use cmd::{Cli, Session};
use config::Settings;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(settings: &Settings) {
    let fallback = settings.log_level.as_deref().unwrap_or("warn");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&settings);

    if let Some(root) = cli.root {
        settings.root = Some(root);
    }
    let root = match settings.project_root() {
        Ok(root) => root,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(root = %root.display(), "opening project");

    let mut session = Session::open(&root, &settings);

    let succeeded = match cli.command {
        Some(command) => cmd::handle(&mut session, command),
        None => {
            cmd::menu::run(&mut session);
            true
        }
    };

    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
