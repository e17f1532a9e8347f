// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use regex::Regex;
use rust_decimal::Decimal;

use crate::models::Transaction;

const UA: &str = concat!(
    "pocketbook/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/pocketbook)"
);

pub fn http_client(timeout: std::time::Duration) -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(UA)
        .build()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_id(s: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid transaction id '{}'", s))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{:.2} {}", d.round_dp(2), ccy)
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

pub fn transaction_rows(items: &[Transaction]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.kind.clone(),
                format!("{:.2}", t.amount),
                t.category.clone(),
                t.description.clone(),
            ]
        })
        .collect()
}

pub const TRANSACTION_HEADERS: [&str; 6] =
    ["ID", "Date", "Type", "Amount", "Category", "Description"];

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Keeps transactions whose type, category or description matches `pattern`.
pub fn filter_matching(items: Vec<Transaction>, pattern: &str) -> Result<Vec<Transaction>> {
    let re = Regex::new(pattern).with_context(|| format!("Invalid pattern '{}'", pattern))?;
    Ok(items
        .into_iter()
        .filter(|t| {
            re.is_match(&t.description) || re.is_match(&t.category) || re.is_match(&t.kind)
        })
        .collect())
}
