// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! keel - schema migrations and deploy readiness

mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod logging;
mod output;
mod table;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{backup, deploy, history, migrate, reconcile, status, Context};
use config::{Config, Overrides};
use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "keel",
    version,
    about = "Keel - schema migrations with deploy readiness checks"
)]
struct Cli {
    /// Database file (overrides KEEL_DATABASE and keel.toml)
    #[arg(long = "db", global = true, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Config file (default: KEEL_CONFIG, then ./keel.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Back up, apply pending migrations, and verify readiness
    Deploy(deploy::DeployArgs),
    /// Apply pending migrations only
    Migrate,
    /// Show how far the database is behind the registry
    Status(status::StatusArgs),
    /// List every recorded migration attempt
    History,
    /// Resync an id counter with its table's maximum id
    Reconcile(reconcile::ReconcileArgs),
    /// Take a backup of the database now
    Backup,
}

fn cli_command() -> clap::Command {
    use clap::CommandFactory;
    Cli::command()
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, we skip
/// the "Caused by" chain to avoid noisy duplicate output.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        cli_command().print_help()?;
        println!();
        return Ok(());
    };

    let cwd = std::env::current_dir()?;
    let explicit = cli.config.or_else(env::config_path);
    let overrides = Overrides::from_env().with_database(cli.database);
    let config = Config::load(explicit.as_deref(), &cwd, &overrides)?;
    let _log_guard = logging::init(&config.log)?;
    tracing::debug!(database = %config.database.display(), source = ?config.source, "loaded config");

    let ctx = Context {
        config,
        format: cli.output,
        paint: color::Paint::detect(),
    };

    // SQLite work is synchronous; keep it off the async workers.
    tokio::task::spawn_blocking(move || match command {
        Commands::Deploy(args) => deploy::handle(args, &ctx),
        Commands::Migrate => migrate::handle(&ctx),
        Commands::Status(args) => status::handle(args, &ctx),
        Commands::History => history::handle(&ctx),
        Commands::Reconcile(args) => reconcile::handle(args, &ctx),
        Commands::Backup => backup::handle(&ctx),
    })
    .await?
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
