// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Local, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Placeholder id for a record that has not been assigned one yet.
pub const INVALID_ID: i64 = -1;

/// A single financial event. The only entity the app persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default = "invalid_id")]
    pub id: i64,
    #[serde(default = "today")]
    pub date: NaiveDate,
    // The server speaks JSON numbers; strings are still accepted on the way in.
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub amount: Decimal,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

fn invalid_id() -> i64 {
    INVALID_ID
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Client-side id for records created without one. Positive and 31-bit so it
/// survives servers that store ids as 32-bit integers.
pub fn random_id() -> i64 {
    rand::thread_rng().gen_range(1..=i64::from(i32::MAX))
}

impl Transaction {
    pub fn new(kind: &str, amount: Decimal, category: &str, description: &str) -> Self {
        Transaction {
            id: random_id(),
            date: today(),
            amount,
            kind: kind.to_string(),
            category: category.to_string(),
            description: description.to_string(),
        }
    }

    pub fn ensure_id(mut self) -> Self {
        if self.id == INVALID_ID {
            self.id = random_id();
        }
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind.eq_ignore_ascii_case("expense")
    }

    pub fn is_income(&self) -> bool {
        self.kind.eq_ignore_ascii_case("income")
    }

    /// `YYYY-MM` bucket used by the monthly report.
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}
