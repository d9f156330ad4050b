// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::finance::Finance;
use crate::models::{Goal, NewGoal};
use crate::utils::{fmt_money, maybe_print_json, parse_amount, pretty_table};
use anyhow::Result;
use serde_json::json;

pub async fn handle(finance: &mut Finance, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(finance, sub).await?,
        Some(("deposit", sub)) => {
            let (id, amount) = id_and_amount(sub)?;
            let goal = finance.deposit_to_goal(id, amount).await?;
            report_balance(&goal);
        }
        Some(("withdraw", sub)) => {
            let (id, amount) = id_and_amount(sub)?;
            let goal = finance.withdraw_from_goal(id, amount).await?;
            report_balance(&goal);
        }
        Some(("list", sub)) => list(finance, sub)?,
        Some(("delete", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            if finance.delete_goal(id).await? {
                println!("Deleted goal {}", id);
            } else {
                println!("No goal with id {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn id_and_amount(sub: &clap::ArgMatches) -> Result<(&str, rust_decimal::Decimal)> {
    let id = sub.get_one::<String>("id").unwrap();
    let amount = parse_amount("amount", sub.get_one::<String>("amount").unwrap())?;
    Ok((id.as_str(), amount))
}

fn report_balance(goal: &Goal) {
    println!(
        "{}: {} of {}",
        goal.name,
        fmt_money(&goal.current_amount),
        fmt_money(&goal.target_amount)
    );
}

async fn add(finance: &mut Finance, sub: &clap::ArgMatches) -> Result<()> {
    let goal = finance
        .add_goal(NewGoal {
            name: sub.get_one::<String>("name").unwrap().clone(),
            target_amount: parse_amount("target", sub.get_one::<String>("target").unwrap())?,
            target_date: sub.get_one::<String>("date").cloned(),
        })
        .await?;
    println!("Created goal '{}' (id: {})", goal.name, goal.id);
    Ok(())
}

fn list(finance: &Finance, sub: &clap::ArgMatches) -> Result<()> {
    let progress = finance.goal_progress();
    let json_rows: Vec<_> = progress
        .iter()
        .map(|(g, p)| {
            json!({
                "id": g.id,
                "name": g.name,
                "targetAmount": g.target_amount,
                "currentAmount": g.current_amount,
                "targetDate": g.target_date,
                "percentage": p.percentage.round_dp(1),
                "remaining": p.remaining,
                "reached": p.reached,
            })
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), &json_rows)? {
        let rows = progress
            .iter()
            .map(|(g, p)| {
                vec![
                    g.name.clone(),
                    fmt_money(&g.current_amount),
                    fmt_money(&g.target_amount),
                    format!("{:.1}%", p.percentage),
                    if p.reached {
                        "reached".to_string()
                    } else {
                        fmt_money(&p.remaining)
                    },
                    g.target_date.clone().unwrap_or_default(),
                    g.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Goal", "Saved", "Target", "Progress", "Remaining", "By", "Id"],
                rows
            )
        );
    }
    Ok(())
}
