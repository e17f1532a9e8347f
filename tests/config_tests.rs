// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketbook::config::{self, Config};
use pocketbook::db::init_schema;
use pocketbook::error::ConfigError;
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

#[test]
fn defaults_point_at_local_server() {
    let cfg = Config::default();
    assert_eq!(cfg.api_url, "http://localhost:2528/");
    assert_eq!(cfg.push_url, "ws://localhost:2528/ws");
    assert_eq!(cfg.currency, "RON");
    assert_eq!(cfg.http_timeout().as_secs(), 15);
}

#[test]
fn stored_settings_override_defaults() {
    let conn = setup();
    config::set_setting(&conn, "currency", "eur").unwrap();
    config::set_setting(&conn, "probe_timeout_ms", "250").unwrap();

    let cfg = Config::load(&conn).unwrap();
    assert_eq!(cfg.currency, "EUR");
    assert_eq!(cfg.probe_timeout().as_millis(), 250);
    assert_eq!(
        config::get_setting(&conn, "currency").unwrap().as_deref(),
        Some("EUR")
    );
}

#[test]
fn urls_are_checked_for_scheme() {
    let conn = setup();
    assert!(config::set_setting(&conn, "api_url", "https://money.example.com/api/").is_ok());
    assert!(matches!(
        config::set_setting(&conn, "api_url", "ws://money.example.com/"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        config::set_setting(&conn, "push_url", "not a url"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(config::get_setting(&conn, "push_url").unwrap().is_none());
}

#[test]
fn push_url_must_be_plain_websocket() {
    let conn = setup();
    assert!(config::set_setting(&conn, "push_url", "ws://money.example.com/ws").is_ok());
    assert!(matches!(
        config::set_setting(&conn, "push_url", "wss://money.example.com/ws"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert_eq!(
        config::get_setting(&conn, "push_url").unwrap().as_deref(),
        Some("ws://money.example.com/ws")
    );
}

#[test]
fn unknown_keys_and_bad_numbers_are_rejected() {
    let conn = setup();
    assert!(matches!(
        config::set_setting(&conn, "colour", "blue"),
        Err(ConfigError::UnknownKey(_))
    ));
    assert!(matches!(
        config::set_setting(&conn, "http_timeout_secs", "0"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        config::unset_setting(&conn, "colour"),
        Err(ConfigError::UnknownKey(_))
    ));
}

#[test]
fn unset_restores_default() {
    let conn = setup();
    config::set_setting(&conn, "currency", "USD").unwrap();
    assert!(config::unset_setting(&conn, "currency").unwrap());
    assert!(!config::unset_setting(&conn, "currency").unwrap());
    assert_eq!(Config::load(&conn).unwrap().currency, "RON");
}
