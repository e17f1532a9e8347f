// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::connectivity::Connectivity;
use crate::models::{INVALID_ID, Transaction};
use crate::remote::TransactionApi;
use crate::report::totals_by_kind;
use crate::sync::SynchronizedRepository;
use crate::utils::{
    TRANSACTION_HEADERS, filter_matching, fmt_money, maybe_print_json, parse_date,
    parse_decimal, parse_id, pretty_table, transaction_rows,
};
use anyhow::{Context, Result, anyhow};

pub fn handle<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    cfg: &Config,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(repo, cfg, sub)?,
        Some(("list", sub)) => list(repo, cfg, sub)?,
        Some(("show", sub)) => show(repo, sub)?,
        Some(("edit", sub)) => edit(repo, cfg, sub)?,
        Some(("rm", sub)) => remove(repo, sub)?,
        _ => {}
    }
    Ok(())
}

fn required<'a>(sub: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    sub.get_one::<String>(name)
        .ok_or_else(|| anyhow!("missing --{}", name))
}

/// Builds the record described by the form fields in `sub`, starting from
/// `base` when editing. A fresh record gets a random id unless `--id` is given.
pub fn transaction_from_matches(
    sub: &clap::ArgMatches,
    base: Option<&Transaction>,
) -> Result<Transaction> {
    let mut t = match base {
        Some(existing) => existing.clone(),
        None => {
            let mut fresh = Transaction::new(
                required(sub, "type")?,
                parse_decimal(required(sub, "amount")?)?,
                "",
                "",
            );
            fresh.id = sub
                .try_get_one::<i64>("id")
                .ok()
                .flatten()
                .copied()
                .unwrap_or(INVALID_ID);
            fresh.ensure_id()
        }
    };
    if let Some(kind) = sub.get_one::<String>("type") {
        t.kind = kind.trim().to_string();
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        t.amount = parse_decimal(amount)?;
    }
    if let Some(category) = sub.get_one::<String>("category") {
        t.category = category.trim().to_string();
    }
    if let Some(description) = sub.get_one::<String>("description") {
        t.description = description.trim().to_string();
    }
    if let Some(date) = sub.get_one::<String>("date") {
        t.date = parse_date(date)?;
    }
    for (field, value) in [
        ("type", &t.kind),
        ("category", &t.category),
        ("description", &t.description),
    ] {
        if value.is_empty() {
            return Err(anyhow!("Transaction {} must not be empty", field));
        }
    }
    Ok(t)
}

fn add<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    cfg: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let t = transaction_from_matches(sub, None)?;
    let stored = repo
        .insert(&t)
        .with_context(|| format!("Could not record transaction {}", t.id))?;
    println!(
        "Recorded #{} {} {} on {} ({})",
        stored.id,
        stored.kind,
        fmt_money(&stored.amount, &cfg.currency),
        stored.date,
        stored.category
    );
    Ok(())
}

/// Transactions the list screen shows for `sub`.
pub fn query_rows<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    sub: &clap::ArgMatches,
) -> Result<Vec<Transaction>> {
    let mut data = if sub.get_flag("remote") {
        repo.remote()
            .transactions()
            .context("Could not retrieve the list of transactions")?
    } else {
        repo.all()?
    };
    if let Some(pattern) = sub.get_one::<String>("match") {
        data = filter_matching(data, pattern)?;
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}

fn list<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    cfg: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(repo, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&TRANSACTION_HEADERS, transaction_rows(&data)));
        let totals = totals_by_kind(&data);
        println!(
            "Income {}  Expense {}  Net {}",
            fmt_money(&totals.income, &cfg.currency),
            fmt_money(&totals.expense, &cfg.currency),
            fmt_money(&totals.net(), &cfg.currency)
        );
    }
    Ok(())
}

fn show<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = parse_id(required(sub, "id")?)?;
    let t = repo
        .get(id)?
        .with_context(|| format!("Transaction {} not found", id))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        let rows = vec![
            vec!["ID".to_string(), t.id.to_string()],
            vec!["Date".to_string(), t.date.to_string()],
            vec!["Type".to_string(), t.kind.clone()],
            vec!["Amount".to_string(), format!("{:.2}", t.amount)],
            vec!["Category".to_string(), t.category.clone()],
            vec!["Description".to_string(), t.description.clone()],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}

/// An edit is a new submission under the same id.
fn edit<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    cfg: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = parse_id(required(sub, "id")?)?;
    let existing = repo
        .get(id)?
        .with_context(|| format!("Transaction {} not found", id))?;
    let updated = transaction_from_matches(sub, Some(&existing))?;
    let stored = repo
        .insert(&updated)
        .with_context(|| format!("Could not update transaction {}", id))?;
    println!(
        "Updated #{} {} {}",
        stored.id,
        stored.kind,
        fmt_money(&stored.amount, &cfg.currency)
    );
    Ok(())
}

fn remove<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = parse_id(required(sub, "id")?)?;
    repo.delete(id)
        .with_context(|| format!("Could not delete transaction {}", id))?;
    println!("Deleted transaction {}", id);
    Ok(())
}
