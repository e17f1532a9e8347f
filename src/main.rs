// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use pocketbook::commands::{self, Repository};
use pocketbook::config::Config;
use pocketbook::connectivity::{NetworkProbe, TcpProbe};
use pocketbook::remote::HttpApi;
use pocketbook::store::LocalStore;
use pocketbook::sync::SynchronizedRepository;
use pocketbook::{cli, db};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("POCKETBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Wires the store, the service client and the probe together.
fn build_repository(
    conn: rusqlite::Connection,
    cfg: &Config,
    offline: bool,
) -> Result<Repository> {
    let store = LocalStore::from_connection(conn)?;
    let api = HttpApi::new(&cfg.api_url, cfg.http_timeout())?;
    let probe = if offline {
        NetworkProbe::Fixed(false)
    } else {
        TcpProbe::for_url(&cfg.api_url, cfg.probe_timeout())
            .map(NetworkProbe::Tcp)
            .unwrap_or(NetworkProbe::Fixed(false))
    };
    Ok(SynchronizedRepository::new(store, api, probe))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let cfg = Config::load(&conn)?;
    let repo = build_repository(conn, &cfg, matches.get_flag("offline"))?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&repo, &cfg, sub)?,
        Some(("report", sub)) => commands::reports::handle(&repo, &cfg, sub)?,
        Some(("sync", sub)) => commands::sync::handle(&repo, sub)?,
        Some(("listen", sub)) => commands::listen::handle(&repo, &cfg, sub)?,
        Some(("export", sub)) => commands::exporter::handle(repo.local(), sub)?,
        Some(("config", sub)) => repo
            .local()
            .with_connection(|conn| commands::settings::handle(conn, &cfg, sub))?,
        Some(("doctor", _)) => commands::doctor::handle(&repo, &cfg)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
