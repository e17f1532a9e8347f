// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{self, Config, KEYS};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").context("missing key")?;
            println!("{}", cfg.value(key)?);
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").context("missing key")?;
            let value = sub.get_one::<String>("value").context("missing value")?;
            config::set_setting(conn, key, value)?;
            println!("Set {} = {}", key, value.trim());
        }
        Some(("unset", sub)) => {
            let key = sub.get_one::<String>("key").context("missing key")?;
            if config::unset_setting(conn, key)? {
                println!("Reset {} to its default", key);
            } else {
                println!("{} was not set", key);
            }
        }
        Some(("show", sub)) => {
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), cfg)? {
                let mut rows = Vec::new();
                for key in KEYS {
                    rows.push(vec![key.to_string(), cfg.value(key)?]);
                }
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
