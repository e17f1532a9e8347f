// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::connectivity::Connectivity;
use crate::remote::TransactionApi;
use crate::report::{INSIGHT_LIMIT, monthly_spending, top_categories};
use crate::sync::SynchronizedRepository;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    cfg: &Config,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("monthly", sub)) => monthly(repo, cfg, sub)?,
        Some(("insights", sub)) => insights(repo, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize, PartialEq)]
pub struct GroupRow {
    pub group: String,
    pub total: Decimal,
}

fn to_rows(groups: Vec<(String, Decimal)>) -> Vec<GroupRow> {
    groups
        .into_iter()
        .map(|(group, total)| GroupRow { group, total })
        .collect()
}

pub fn monthly_rows<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
) -> Result<Vec<GroupRow>> {
    Ok(to_rows(monthly_spending(&repo.all()?)))
}

pub fn insight_rows<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
) -> Result<Vec<GroupRow>> {
    Ok(to_rows(top_categories(&repo.all()?, INSIGHT_LIMIT)))
}

fn print_rows(header: &str, cfg: &Config, data: &[GroupRow]) {
    let rows = data
        .iter()
        .map(|r| vec![r.group.clone(), format!("{:.2}", r.total)])
        .collect();
    let spent = format!("Spent ({})", cfg.currency);
    println!("{}", pretty_table(&[header, &spent], rows));
}

fn monthly<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    cfg: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let data = monthly_rows(repo)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        if data.is_empty() {
            println!("No expenses recorded yet.");
        } else {
            print_rows("Month", cfg, &data);
        }
    }
    Ok(())
}

/// Also used by `listen --report` to redraw after pushed changes.
pub fn print_insights<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    cfg: &Config,
) -> Result<()> {
    let data = insight_rows(repo)?;
    if data.is_empty() {
        println!("No expenses recorded yet.");
    } else {
        print_rows("Category", cfg, &data);
    }
    Ok(())
}

fn insights<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    cfg: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    if json_flag || jsonl_flag {
        maybe_print_json(json_flag, jsonl_flag, &insight_rows(repo)?)?;
        return Ok(());
    }
    print_insights(repo, cfg)
}
