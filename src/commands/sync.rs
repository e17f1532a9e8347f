// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::connectivity::Connectivity;
use crate::remote::TransactionApi;
use crate::sync::SynchronizedRepository;
use anyhow::{Context, Result};

pub fn handle<A: TransactionApi, C: Connectivity>(
    repo: &SynchronizedRepository<A, C>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("refresh", _)) => {
            let n = repo
                .refresh()
                .context("Could not refresh from the server")?;
            println!("Refreshed {} transactions from the server", n);
        }
        Some(("clear", _)) => {
            let n = repo.clear_local()?;
            println!("Removed {} transactions from the local copy", n);
        }
        _ => {}
    }
    Ok(())
}
