// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Settings kept in the `settings` table, with environment overrides.
//!
//! Keys:
//! - `api_url`: base URL of the transaction service
//! - `push_url`: WebSocket endpoint for pushed transactions
//! - `currency`: label shown next to amounts
//! - `http_timeout_secs`: per-request timeout for the service
//! - `probe_timeout_ms`: how long the connectivity probe waits for the host

use std::time::Duration;

use reqwest::Url;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::error::ConfigError;

pub const KEYS: [&str; 5] = [
    "api_url",
    "push_url",
    "currency",
    "http_timeout_secs",
    "probe_timeout_ms",
];

pub const API_URL_ENV: &str = "POCKETBOOK_API_URL";
pub const PUSH_URL_ENV: &str = "POCKETBOOK_PUSH_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub api_url: String,
    pub push_url: String,
    pub currency: String,
    pub http_timeout_secs: u64,
    pub probe_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: "http://localhost:2528/".to_string(),
            push_url: "ws://localhost:2528/ws".to_string(),
            currency: "RON".to_string(),
            http_timeout_secs: 15,
            probe_timeout_ms: 1500,
        }
    }
}

impl Config {
    /// Defaults, then stored settings, then environment overrides.
    pub fn load(conn: &Connection) -> Result<Self, ConfigError> {
        let mut cfg = Config::default();
        for key in KEYS {
            if let Some(value) = get_setting(conn, key)? {
                cfg.apply(key, &value)?;
            }
        }
        for (key, var) in [("api_url", API_URL_ENV), ("push_url", PUSH_URL_ENV)] {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    cfg.apply(key, &value)?;
                }
            }
        }
        Ok(cfg)
    }

    /// Validates and assigns one setting.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "api_url" => self.api_url = validate_url(key, value, &["http", "https"])?,
            // Built without TLS, so only plain WebSocket endpoints can be reached.
            "push_url" => self.push_url = validate_url(key, value, &["ws"])?,
            "currency" => {
                if value.is_empty() {
                    return Err(invalid(key, "must not be empty"));
                }
                self.currency = value.to_uppercase();
            }
            "http_timeout_secs" => self.http_timeout_secs = parse_positive(key, value)?,
            "probe_timeout_ms" => self.probe_timeout_ms = parse_positive(key, value)?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn value(&self, key: &str) -> Result<String, ConfigError> {
        Ok(match key {
            "api_url" => self.api_url.clone(),
            "push_url" => self.push_url.clone(),
            "currency" => self.currency.clone(),
            "http_timeout_secs" => self.http_timeout_secs.to_string(),
            "probe_timeout_ms" => self.probe_timeout_ms.to_string(),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_url(key: &str, value: &str, schemes: &[&str]) -> Result<String, ConfigError> {
    let url = Url::parse(value).map_err(|e| invalid(key, &e.to_string()))?;
    if !schemes.contains(&url.scheme()) {
        return Err(invalid(
            key,
            &format!("scheme must be one of {}", schemes.join(", ")),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid(key, "missing host"));
    }
    Ok(value.to_string())
}

fn parse_positive(key: &str, value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(key, "expected a positive integer")),
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>, ConfigError> {
    Ok(conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?)
}

/// Validates `value` and persists it.
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<(), ConfigError> {
    let mut checked = Config::default();
    checked.apply(key, value)?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, checked.value(key)?],
    )?;
    Ok(())
}

pub fn unset_setting(conn: &Connection, key: &str) -> Result<bool, ConfigError> {
    if !KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }
    Ok(conn.execute("DELETE FROM settings WHERE key=?1", params![key])? > 0)
}
