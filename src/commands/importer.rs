// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::backup::read_backup;
use crate::finance::Finance;
use anyhow::{Context, Result};
use std::path::Path;

pub async fn handle(finance: &mut Finance, m: &clap::ArgMatches) -> Result<()> {
    let path = m.get_one::<String>("path").unwrap().trim();
    let clear = m.get_flag("clear");
    let doc = read_backup(Path::new(path))
        .await
        .with_context(|| format!("Read backup {}", path))?;
    let summary = finance
        .import(&doc, clear)
        .await
        .with_context(|| format!("Import {}", path))?;
    println!(
        "Imported {} transactions, {} budgets, {} goals and {} settings from {}",
        summary.transactions, summary.budgets, summary.goals, summary.settings, path
    );
    Ok(())
}
