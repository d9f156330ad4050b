// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::finance::Finance;
use crate::models::Language;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};
use serde_json::json;

pub async fn handle(finance: &mut Finance, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(finance, sub)?,
        Some(("language", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            let language =
                Language::from_code(code).ok_or_else(|| anyhow!("Unknown language '{}'", code))?;
            finance.settings_mut().set_language(language).await?;
            println!("Language set to {}", language.code());
        }
        Some(("toggle-language", _)) => {
            let language = finance.settings_mut().toggle_language().await?;
            println!("Language set to {}", language.code());
        }
        Some(("toggle-theme", _)) => {
            let theme = finance.settings_mut().toggle_theme().await?;
            println!("Theme set to {}", theme.name());
        }
        Some(("unset", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            finance.settings_mut().remove(key).await?;
            println!("Removed setting {}", key);
        }
        Some(("reset", _)) => {
            finance.settings_mut().reset().await?;
            let settings = finance.settings();
            println!(
                "Settings reset: language={} theme={}",
                settings.language().code(),
                settings.theme().name()
            );
        }
        _ => {}
    }
    Ok(())
}

fn show(finance: &Finance, sub: &clap::ArgMatches) -> Result<()> {
    let settings = finance.settings();
    let language = settings.language();
    let doc = json!({
        "language": language.code(),
        "direction": if language.is_rtl() { "rtl" } else { "ltr" },
        "theme": settings.theme().name(),
    });
    if !maybe_print_json(sub.get_flag("json"), &doc)? {
        let rows = settings
            .all()
            .map(|(k, v)| vec![k.clone(), v.to_string()])
            .collect();
        println!("{}", pretty_table(&["Key", "Value"], rows));
        println!(
            "Active: language={} theme={}",
            language.code(),
            settings.theme().name()
        );
    }
    Ok(())
}
