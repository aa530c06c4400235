mod cli;
mod commands;
mod config;
mod credentials;
mod progress;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use config::{FileConfig, Settings};
use glurest::{Client, ConsoleConfig, Order, StatusQuery};
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub client: Client,
    pub debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Progress lines are logged at info level, so that is the floor.
    env_logger::Builder::new()
        .filter_level(if cli.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            ui::report_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Run the requested action; returns whether the last step succeeded.
fn run(cli: &Cli) -> Result<bool> {
    let settings =
        Settings::resolve(cli, FileConfig::load()?).unwrap_or_else(|msg| cli::usage_error(msg));
    let filter = commands::resolve_filter(&cli.selection)?;
    if let Err(msg) = cli.check_request(filter.as_ref()) {
        cli::usage_error(msg);
    }

    let password = credentials::resolve_password(
        &settings.user,
        cli.password.as_deref(),
        settings.password_file.as_deref(),
    )?;

    log::info!(
        "Will run action '{}' on fabric '{}'",
        cli.command,
        settings.fabric
    );

    let config = ConsoleConfig::new(settings.console, settings.fabric, settings.user, password)
        .api_version(settings.api_version)
        .user_agent(concat!("console-cli/", env!("CARGO_PKG_VERSION")));
    let ctx = Context {
        client: Client::new(&config)?,
        debug: cli.debug,
    };

    let mut succeeded = true;

    if let Some(source) = cli.model_source() {
        succeeded = commands::model::load(&ctx, &source)?;
    }

    match cli.command {
        Command::Plan(action) => {
            succeeded = commands::plan::run(
                &ctx,
                action,
                filter,
                Order::from_parallel(cli.parallel),
                cli.dry_run,
            )?;
        }
        Command::Status => {
            let query = StatusQuery {
                live: cli.live,
                beautify: cli.beautify,
                filter,
            };
            succeeded = commands::model::status(&ctx, &query)?;
        }
        Command::Load => {}
    }

    Ok(succeeded)
}
