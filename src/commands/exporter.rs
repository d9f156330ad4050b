// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::backup::{export_transactions_csv, write_backup};
use crate::finance::Finance;
use anyhow::{Context, Result};
use std::path::Path;

pub async fn handle(finance: &Finance, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("json", sub)) => {
            let dir = sub.get_one::<String>("dir").unwrap().trim();
            let path = write_backup(finance.store(), Path::new(dir))
                .await
                .with_context(|| format!("Write backup into {}", dir))?;
            println!("Exported data to {}", path.display());
        }
        Some(("csv", sub)) => {
            let out = sub.get_one::<String>("out").unwrap().trim();
            let n = export_transactions_csv(finance.transactions(), Path::new(out))
                .with_context(|| format!("Write CSV {}", out))?;
            println!("Exported {} transactions to {}", n, out);
        }
        _ => {}
    }
    Ok(())
}
