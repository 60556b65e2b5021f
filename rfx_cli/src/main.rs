#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::cast_possible_truncation)]

mod cli;
mod commands;
mod error_fmt;
mod logging;
mod serve;

use clap::Parser;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn run(cli: Cli) -> eyre::Result<()> {
    let cfg = rfx_config::load_file(&cli.config)?;

    let level = cli
        .log_level
        .clone()
        .or_else(|| cfg.logging.level.clone())
        .unwrap_or_else(|| "info".to_string());
    logging::init_tracing(cli.json, &level, &cfg.logging)?;

    cfg.validate()?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    match cli.cmd {
        Commands::Check => commands::check(&cfg, cli.json),
        Commands::Plan { device, from, to } => commands::plan(&cfg, &device, from, to, cli.json),
        Commands::Simulate {
            device,
            targets,
            step_ms,
        } => commands::simulate(&cfg, &device, &targets, step_ms, cli.json),
        Commands::Run => serve::serve(&cfg, cli.json),
    }
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;
    let _ = JSON_MODE.set(json);
    let _ = color_eyre::install();

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "command failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}
