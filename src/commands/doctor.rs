// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::connectivity::Connectivity;
use crate::remote::TransactionApi;
use crate::sync::SynchronizedRepository;
use crate::utils::pretty_table;
use anyhow::Result;

/// Problems worth reporting, as `[issue, detail]` rows.
pub fn issues<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    cfg: &Config,
) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Server reachability
    if !repo.is_online() {
        rows.push(vec!["offline".into(), cfg.api_url.clone()]);
    }

    // 2) Records whose type the reports cannot classify
    for t in repo.local().all()? {
        if !t.is_expense() && !t.is_income() {
            rows.push(vec![
                "unknown_type".into(),
                format!("#{} '{}'", t.id, t.kind),
            ]);
        }
    }

    // 3) Push and API pointing at different hosts usually means a stale setting
    let api_host = reqwest::Url::parse(&cfg.api_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string));
    let push_host = reqwest::Url::parse(&cfg.push_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string));
    if api_host != push_host {
        rows.push(vec![
            "host_mismatch".into(),
            format!("{} vs {}", cfg.api_url, cfg.push_url),
        ]);
    }

    Ok(rows)
}

pub fn handle<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    cfg: &Config,
) -> Result<()> {
    println!(
        "Local copy holds {} transactions",
        repo.local().count()?
    );
    let rows = issues(repo, cfg)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
