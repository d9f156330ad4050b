// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::finance::Finance;
use crate::models::BudgetPatch;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, pretty_table};
use anyhow::Result;
use serde_json::json;

pub async fn handle(finance: &mut Finance, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(finance, sub).await?,
        Some(("set-limit", sub)) => set_limit(finance, sub).await?,
        Some(("list", sub)) => list(finance, sub)?,
        Some(("delete", sub)) => delete(finance, sub).await?,
        _ => {}
    }
    Ok(())
}

async fn add(finance: &mut Finance, sub: &clap::ArgMatches) -> Result<()> {
    let category = sub.get_one::<String>("category").unwrap();
    let limit = parse_amount("limit", sub.get_one::<String>("limit").unwrap())?;
    let budget = finance.add_budget(category, limit).await?;
    println!(
        "Budget set for {} = {} (id: {})",
        budget.category,
        fmt_money(&budget.limit),
        budget.id
    );
    Ok(())
}

async fn set_limit(finance: &mut Finance, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let limit = parse_amount("limit", sub.get_one::<String>("limit").unwrap())?;
    let budget = finance
        .update_budget(
            id,
            BudgetPatch {
                limit: Some(limit),
                ..BudgetPatch::default()
            },
        )
        .await?;
    println!("Budget for {} is now {}", budget.category, fmt_money(&budget.limit));
    Ok(())
}

fn list(finance: &Finance, sub: &clap::ArgMatches) -> Result<()> {
    let statuses = finance.budget_statuses();
    let json_rows: Vec<_> = statuses
        .iter()
        .map(|(b, s)| {
            json!({
                "id": b.id,
                "category": b.category,
                "limit": b.limit,
                "spent": s.spent,
                "percentage": s.percentage.round_dp(1),
                "overBudget": s.over_budget,
            })
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), &json_rows)? {
        let rows = statuses
            .iter()
            .map(|(b, s)| {
                vec![
                    b.category.clone(),
                    fmt_money(&b.limit),
                    fmt_money(&s.spent),
                    format!("{:.1}%", s.percentage),
                    if s.over_budget { "over budget".into() } else { String::new() },
                    b.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Limit", "Spent", "Used", "Status", "Id"], rows)
        );
    }
    Ok(())
}

async fn delete(finance: &mut Finance, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    if finance.delete_budget(id).await? {
        println!("Deleted budget {}", id);
    } else {
        println!("No budget with id {}", id);
    }
    Ok(())
}
