// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use pocketbook::connectivity::Connectivity;
use pocketbook::error::RemoteError;
use pocketbook::models::Transaction;
use pocketbook::remote::TransactionApi;
use pocketbook::store::LocalStore;
use pocketbook::sync::SynchronizedRepository;
use rust_decimal::Decimal;

#[derive(Default)]
pub struct ServerState {
    pub records: BTreeMap<i64, Transaction>,
    /// Every call fails with a 500 while set.
    pub failing: bool,
    /// Only deletes fail while set.
    pub failing_delete: bool,
    /// The server rewrites descriptions on insert when set.
    pub stamp: Option<String>,
    pub calls: Vec<String>,
}

/// In-process stand-in for the transaction service.
#[derive(Clone, Default)]
pub struct FakeApi {
    pub state: Arc<Mutex<ServerState>>,
}

impl FakeApi {
    pub fn with(records: &[Transaction]) -> Self {
        let api = FakeApi::default();
        {
            let mut s = api.state.lock().unwrap();
            for t in records {
                s.records.insert(t.id, t.clone());
            }
        }
        api
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn record(&self, id: i64) -> Option<Transaction> {
        self.state.lock().unwrap().records.get(&id).cloned()
    }
}

fn server_error(endpoint: &str) -> RemoteError {
    RemoteError::Status {
        endpoint: endpoint.to_string(),
        status: 500,
        body: "boom".to_string(),
    }
}

impl TransactionApi for FakeApi {
    fn add(&self, t: &Transaction) -> Result<Transaction, RemoteError> {
        let mut s = self.state.lock().unwrap();
        s.calls.push(format!("add {}", t.id));
        if s.failing {
            return Err(server_error("POST transaction/"));
        }
        let mut stored = t.clone();
        if let Some(stamp) = &s.stamp {
            stored.description = stamp.clone();
        }
        s.records.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn transactions(&self) -> Result<Vec<Transaction>, RemoteError> {
        let mut s = self.state.lock().unwrap();
        s.calls.push("transactions".to_string());
        if s.failing {
            return Err(server_error("GET transactions/"));
        }
        Ok(s.records.values().cloned().collect())
    }

    fn get(&self, id: i64) -> Result<Option<Transaction>, RemoteError> {
        let mut s = self.state.lock().unwrap();
        s.calls.push(format!("get {}", id));
        if s.failing {
            return Err(server_error("GET transaction/{id}"));
        }
        Ok(s.records.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Transaction>, RemoteError> {
        let mut s = self.state.lock().unwrap();
        s.calls.push("all".to_string());
        if s.failing {
            return Err(server_error("GET allTransactions/"));
        }
        Ok(s.records.values().cloned().collect())
    }

    fn delete(&self, id: i64) -> Result<(), RemoteError> {
        let mut s = self.state.lock().unwrap();
        s.calls.push(format!("delete {}", id));
        if s.failing || s.failing_delete {
            return Err(server_error("DELETE transaction/{id}"));
        }
        s.records.remove(&id);
        Ok(())
    }
}

/// Connectivity that tests flip by hand.
#[derive(Clone)]
pub struct Switch(pub Arc<AtomicBool>);

impl Switch {
    pub fn new(online: bool) -> Self {
        Switch(Arc::new(AtomicBool::new(online)))
    }

    pub fn set(&self, online: bool) {
        self.0.store(online, Ordering::SeqCst);
    }
}

impl Connectivity for Switch {
    fn is_online(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub type TestRepo = SynchronizedRepository<FakeApi, Switch>;

pub fn repo(
    local: &[Transaction],
    remote: &[Transaction],
    online: bool,
) -> (TestRepo, FakeApi, Switch) {
    let store = LocalStore::in_memory().unwrap();
    for t in local {
        store.insert(t).unwrap();
    }
    let api = FakeApi::with(remote);
    let switch = Switch::new(online);
    (
        SynchronizedRepository::new(store, api.clone(), switch.clone()),
        api,
        switch,
    )
}

pub fn tx(id: i64, date: &str, kind: &str, amount: &str, category: &str) -> Transaction {
    Transaction {
        id,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        amount: amount.parse::<Decimal>().unwrap(),
        kind: kind.to_string(),
        category: category.to_string(),
        description: String::new(),
    }
}
