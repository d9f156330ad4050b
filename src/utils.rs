// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, SecondsFormat, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::parse_timestamp;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current instant as an RFC 3339 UTC string with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a form-entered amount; it must be a positive number.
pub fn parse_amount(field: &'static str, s: &str) -> Result<Decimal, StoreError> {
    let d = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_| StoreError::invalid(field, format!("'{}' is not a number", s.trim())))?;
    require_positive(field, d)
}

pub fn require_positive(field: &'static str, d: Decimal) -> Result<Decimal, StoreError> {
    if d <= Decimal::ZERO {
        return Err(StoreError::invalid(
            field,
            format!("must be greater than zero, got {}", d),
        ));
    }
    Ok(d)
}

pub fn require_text(field: &'static str, s: &str) -> Result<String, StoreError> {
    let t = s.trim();
    if t.is_empty() {
        return Err(StoreError::invalid(field, "must not be empty"));
    }
    Ok(t.to_string())
}

/// Accepts the formats of [`parse_timestamp`] as long as the calendar date
/// is written `YYYY-MM-DD` with zero padding, so the month prefix of the
/// stored string is always `YYYY-MM`.
pub fn require_date(field: &'static str, s: &str) -> Result<String, StoreError> {
    let t = s.trim();
    let padded = t.get(..10).is_some_and(|day| {
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .is_ok_and(|d| d.format("%Y-%m-%d").to_string() == day)
    });
    if !padded || parse_timestamp(t).is_none() {
        return Err(StoreError::invalid(
            field,
            format!("'{}' is not an ISO-8601 date (YYYY-MM-DD)", t),
        ));
    }
    Ok(t.to_string())
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> anyhow::Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}
