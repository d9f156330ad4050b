// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{SortOrder, filter_by_type, sorted};
use crate::finance::Finance;
use crate::models::{NewTransaction, TransactionType};
use crate::utils::{fmt_money, maybe_print_json, parse_amount, pretty_table};
use anyhow::{Context, Result};
use serde::Serialize;

pub async fn handle(finance: &mut Finance, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(finance, sub).await?,
        Some(("list", sub)) => list(finance, sub)?,
        Some(("delete", sub)) => delete(finance, sub).await?,
        _ => {}
    }
    Ok(())
}

async fn add(finance: &mut Finance, sub: &clap::ArgMatches) -> Result<()> {
    let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let amount = parse_amount("amount", sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap();

    let mut input = NewTransaction::new(kind, amount, category.as_str());
    if let Some(date) = sub.get_one::<String>("date") {
        input = input.on(date.as_str());
    }
    if let Some(note) = sub.get_one::<String>("note") {
        input = input.with_description(note.as_str());
    }

    let txn = finance
        .add_transaction(input)
        .await
        .context("Failed to record transaction")?;
    println!(
        "Recorded {} {} in '{}' on {} (id: {})",
        txn.r#type,
        fmt_money(&txn.amount),
        txn.category,
        txn.date,
        txn.id
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub r#type: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

/// Rows for `tx list`, filtered and sorted without touching the cache.
pub fn query_rows(finance: &Finance, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TransactionType>())
        .transpose()?;
    let order = sub
        .get_one::<String>("sort")
        .map(|s| s.parse::<SortOrder>())
        .transpose()?
        .unwrap_or_default();

    let mut rows: Vec<TransactionRow> = sorted(filter_by_type(finance.transactions(), kind), order)
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.clone(),
            r#type: t.r#type.to_string(),
            category: t.category.clone(),
            amount: fmt_money(&t.amount),
            description: t.description.clone().unwrap_or_default(),
        })
        .collect();
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}

fn list(finance: &Finance, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(finance, sub)?;
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| vec![r.date, r.r#type, r.category, r.amount, r.description, r.id])
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Type", "Category", "Amount", "Note", "Id"], rows)
        );
    }
    Ok(())
}

async fn delete(finance: &mut Finance, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    if finance.delete_transaction(id).await? {
        println!("Deleted transaction {}", id);
    } else {
        println!("No transaction with id {}", id);
    }
    Ok(())
}
