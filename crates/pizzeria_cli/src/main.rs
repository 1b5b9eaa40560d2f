//! `pizzeria` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Open the record store and run one topping or pizza command.

mod app;
mod commands;

use anyhow::{anyhow, Context, Result};
use app::Cli;
use clap::Parser;
use log::info;
use pizzeria_core::db::open_db;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        pizzeria_core::init_logging(cli.log_level(), log_dir).map_err(|err| anyhow!(err))?;
    }

    let db_path = cli.db_path();
    info!(
        "event=cli_start module=cli status=start version={} db_path={}",
        pizzeria_core::core_version(),
        db_path.display()
    );
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open database `{}`", db_path.display()))?;

    let mut stdout = std::io::stdout().lock();
    commands::execute(cli.command, &conn, cli.json, &mut stdout)
}
