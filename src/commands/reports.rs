// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::backup::database_stats;
use crate::finance::Finance;
use crate::models::parse_timestamp;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};

pub fn handle(finance: &Finance, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(finance, sub)?,
        Some(("monthly", sub)) => monthly(finance, sub)?,
        Some(("budgets", sub)) => budgets(finance, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(finance: &Finance, sub: &clap::ArgMatches) -> Result<()> {
    let s = finance.summary();
    if !maybe_print_json(sub.get_flag("json"), &s)? {
        println!(
            "{}",
            pretty_table(
                &["Income", "Expenses", "Balance"],
                vec![vec![
                    fmt_money(&s.income),
                    fmt_money(&s.expenses),
                    fmt_money(&s.balance)
                ]],
            )
        );
    }
    Ok(())
}

fn reference_date(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("reference") {
        Some(raw) => parse_timestamp(raw.trim())
            .map(|ts| ts.date())
            .ok_or_else(|| anyhow!("Invalid date '{}', expected YYYY-MM-DD", raw)),
        None => Ok(Local::now().date_naive()),
    }
}

fn monthly(finance: &Finance, sub: &clap::ArgMatches) -> Result<()> {
    let months = *sub.get_one::<u32>("months").context("months missing")?;
    let series = finance.monthly_series(months, reference_date(sub)?);
    if !maybe_print_json(sub.get_flag("json"), &series)? {
        let rows = series
            .iter()
            .map(|b| {
                vec![
                    format!("{} ({})", b.label, b.month),
                    fmt_money(&b.income),
                    fmt_money(&b.expense),
                    fmt_money(&b.savings),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Savings"], rows)
        );
    }
    Ok(())
}

fn budgets(finance: &Finance, sub: &clap::ArgMatches) -> Result<()> {
    let shares = finance.budget_breakdown();
    if !maybe_print_json(sub.get_flag("json"), &shares)? {
        if shares.is_empty() {
            println!("No spending in budgeted categories yet");
            return Ok(());
        }
        let rows = shares
            .iter()
            .map(|s| {
                vec![
                    s.category.clone(),
                    fmt_money(&s.spent),
                    fmt_money(&s.limit),
                    format!("{:.1}%", s.share),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Spent", "Limit", "Share"], rows)
        );
    }
    Ok(())
}

pub async fn stats(finance: &Finance, sub: &clap::ArgMatches) -> Result<()> {
    let stats = database_stats(finance.store()).await?;
    if !maybe_print_json(sub.get_flag("json"), &stats)? {
        let rows = vec![
            vec!["Transactions".into(), stats.transaction_count.to_string()],
            vec!["Budgets".into(), stats.budget_count.to_string()],
            vec!["Goals".into(), stats.goal_count.to_string()],
            vec!["Total income".into(), fmt_money(&stats.total_income)],
            vec!["Total expenses".into(), fmt_money(&stats.total_expenses)],
            vec!["Balance".into(), fmt_money(&stats.balance)],
            vec![
                "Oldest transaction".into(),
                stats.oldest_transaction.clone().unwrap_or_default(),
            ],
            vec![
                "Newest transaction".into(),
                stats.newest_transaction.clone().unwrap_or_default(),
            ],
        ];
        println!("{}", pretty_table(&["Stat", "Value"], rows));
    }
    Ok(())
}
