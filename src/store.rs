// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Durable local copy of the transaction collection.
//!
//! The store serializes its own writes behind a mutex. Readers that want to
//! follow changes call [`LocalStore::subscribe`] and re-query on each event.

use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::db;
use crate::models::Transaction;

/// Change notification published after every successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A single record was written (insert or replace).
    Upserted(i64),
    /// A batch write stored this many new records.
    Inserted(usize),
    Deleted(i64),
    Cleared,
}

#[derive(Clone)]
pub struct LocalStore {
    conn: Arc<Mutex<Connection>>,
    subscribers: Arc<Mutex<Vec<Sender<StoreEvent>>>>,
}

const SELECT_COLUMNS: &str =
    "SELECT id, date, amount, type, category, description FROM transactions";

impl LocalStore {
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> rusqlite::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wraps an already opened connection, creating the schema if needed.
    pub fn from_connection(conn: Connection) -> rusqlite::Result<Self> {
        db::init_schema(&conn)?;
        Ok(LocalStore {
            conn: Arc::new(Mutex::new(conn)),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Runs `f` against the underlying connection (settings live in the same file).
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> T) -> T {
        let conn = self.conn.lock();
        f(&conn)
    }

    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.lock().push(tx);
        rx
    }

    fn publish(&self, event: StoreEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Insert, keeping the existing row if the id is already present.
    pub fn insert(&self, t: &Transaction) -> rusqlite::Result<bool> {
        info!(id = t.id, "local insert");
        let written = self.conn.lock().execute(
            "INSERT OR IGNORE INTO transactions(id, date, amount, type, category, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                t.id,
                t.date,
                t.amount.to_string(),
                t.kind,
                t.category,
                t.description
            ],
        )?;
        if written > 0 {
            self.publish(StoreEvent::Upserted(t.id));
        }
        Ok(written > 0)
    }

    pub fn insert_many(&self, items: &[Transaction]) -> rusqlite::Result<usize> {
        info!(count = items.len(), "local batch insert");
        let mut written = 0;
        {
            let mut conn = self.conn.lock();
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR IGNORE INTO transactions
                         (id, date, amount, type, category, description)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for t in items {
                    written += stmt.execute(params![
                        t.id,
                        t.date,
                        t.amount.to_string(),
                        t.kind,
                        t.category,
                        t.description
                    ])?;
                }
            }
            tx.commit()?;
        }
        if written > 0 {
            self.publish(StoreEvent::Inserted(written));
        }
        Ok(written)
    }

    /// Insert or replace. Last writer wins.
    pub fn upsert(&self, t: &Transaction) -> rusqlite::Result<()> {
        info!(id = t.id, "local upsert");
        self.conn.lock().execute(
            "INSERT INTO transactions(id, date, amount, type, category, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                date=excluded.date,
                amount=excluded.amount,
                type=excluded.type,
                category=excluded.category,
                description=excluded.description",
            params![
                t.id,
                t.date,
                t.amount.to_string(),
                t.kind,
                t.category,
                t.description
            ],
        )?;
        self.publish(StoreEvent::Upserted(t.id));
        Ok(())
    }

    pub fn delete(&self, id: i64) -> rusqlite::Result<bool> {
        info!(id, "local delete");
        let n = self
            .conn
            .lock()
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        if n > 0 {
            self.publish(StoreEvent::Deleted(id));
        }
        Ok(n > 0)
    }

    pub fn clear(&self) -> rusqlite::Result<usize> {
        info!("local clear");
        let n = self.conn.lock().execute("DELETE FROM transactions", [])?;
        self.publish(StoreEvent::Cleared);
        Ok(n)
    }

    pub fn get(&self, id: i64) -> rusqlite::Result<Option<Transaction>> {
        debug!(id, "local get");
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id=?1"))?;
        stmt.query_row(params![id], row_to_transaction).optional()
    }

    /// Newest first.
    pub fn all(&self) -> rusqlite::Result<Vec<Transaction>> {
        debug!("local get all");
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY date DESC, id DESC"))?;
        let rows = stmt.query_map([], row_to_transaction)?;
        rows.collect()
    }

    pub fn count(&self) -> rusqlite::Result<usize> {
        let n: i64 = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))?;
        Ok(n as usize)
    }
}

fn row_to_transaction(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let amount: String = r.get(2)?;
    let amount = amount
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(Transaction {
        id: r.get(0)?,
        date: r.get(1)?,
        amount,
        kind: r.get(3)?,
        category: r.get(4)?,
        description: r.get(5)?,
    })
}
