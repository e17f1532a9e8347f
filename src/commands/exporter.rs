// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::LocalStore;
use anyhow::{Context, Result, bail};
use std::path::Path;

pub fn handle(store: &LocalStore, m: &clap::ArgMatches) -> Result<()> {
    let fmt = m
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let out = m
        .get_one::<String>("out")
        .context("missing --out")?;
    let n = export_transactions(store, &fmt, Path::new(out))?;
    println!("Exported {} transactions to {}", n, out);
    Ok(())
}

/// Writes the local snapshot, oldest first. Returns the number of records.
pub fn export_transactions(store: &LocalStore, fmt: &str, out: &Path) -> Result<usize> {
    let mut items = store.all()?;
    items.reverse();

    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            wtr.write_record(["id", "date", "type", "amount", "category", "description"])?;
            for t in &items {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.clone(),
                    t.amount.to_string(),
                    t.category.clone(),
                    t.description.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(items.len())
}
