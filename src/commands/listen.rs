// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};

use crate::commands::reports::print_insights;
use crate::config::Config;
use crate::connectivity::{Connectivity, wait_until_online};
use crate::models::Transaction;
use crate::push::PushListener;
use crate::remote::TransactionApi;
use crate::sync::SynchronizedRepository;
use crate::utils::fmt_money;

const TICK: Duration = Duration::from_millis(500);

/// The line shown when the server pushes a new transaction.
pub fn notice(t: &Transaction, currency: &str) -> String {
    format!(
        "New transaction received: {} - {}",
        t.kind,
        fmt_money(&t.amount, currency)
    )
}

pub fn handle<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    cfg: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    if let Some(secs) = sub.get_one::<u64>("wait") {
        if !wait_until_online(repo.network(), TICK, Duration::from_secs(*secs)) {
            bail!("Network did not come up within {} seconds", secs);
        }
    }
    let changes = sub.get_flag("report").then(|| repo.local().subscribe());
    let deadline = sub
        .get_one::<u64>("seconds")
        .map(|s| Instant::now() + Duration::from_secs(*s));

    let (tx, rx) = mpsc::channel();
    let listener = PushListener::connect(&cfg.push_url, repo.local().clone(), tx)
        .with_context(|| format!("Could not connect to {}", cfg.push_url))?;
    println!("Listening for transactions on {}", cfg.push_url);

    loop {
        let wait = match deadline {
            Some(d) => {
                let now = Instant::now();
                if now >= d {
                    break;
                }
                (d - now).min(TICK)
            }
            None => TICK,
        };
        match rx.recv_timeout(wait) {
            Ok(t) => {
                println!("{}", notice(&t, &cfg.currency));
                if let Some(changes) = &changes {
                    if changes.try_iter().count() > 0 {
                        print_insights(repo, cfg)?;
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            // The reader hung up: the server closed the channel or a frame was bad.
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    listener.disconnect().context("Push channel failed")?;
    println!("Stopped listening");
    Ok(())
}
