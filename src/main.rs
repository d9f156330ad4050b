// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use rasid::config::{self, Config};
use rasid::migration::FileLegacyStore;
use rasid::{Finance, Store, cli, commands, schema};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::from_env()?;
    config::init_logging(&config)?;

    let db_path = config.db_path()?;
    let store = Store::open(&db_path)
        .await
        .with_context(|| format!("Open store at {}", db_path.display()))?;
    let mut legacy = FileLegacyStore::load(config.legacy_path())?;
    let (mut finance, _report) = Finance::start(store, &mut legacy)
        .await
        .context("Load finance data")?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!(
                "Store ready at {} (schema v{})",
                db_path.display(),
                schema::SCHEMA_VERSION
            );
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut finance, sub).await?,
        Some(("budget", sub)) => commands::budgets::handle(&mut finance, sub).await?,
        Some(("goal", sub)) => commands::goals::handle(&mut finance, sub).await?,
        Some(("report", sub)) => commands::reports::handle(&finance, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&mut finance, sub).await?,
        Some(("export", sub)) => commands::exporter::handle(&finance, sub).await?,
        Some(("import", sub)) => commands::importer::handle(&mut finance, sub).await?,
        Some(("stats", sub)) => commands::reports::stats(&finance, sub).await?,
        Some(("clear", _)) => {
            finance.clear_all_data().await?;
            println!("All transactions, budgets and goals deleted");
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
