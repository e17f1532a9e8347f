// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Combines the local store with the transaction service.
//!
//! Reads favour availability: they always answer from the local store, using
//! the server only to fill or refresh it. Writes need the server and mirror
//! its answer locally afterwards.

use tracing::{info, warn};

use crate::connectivity::Connectivity;
use crate::error::SyncError;
use crate::models::Transaction;
use crate::remote::TransactionApi;
use crate::store::LocalStore;

pub struct SynchronizedRepository<A, C> {
    local: LocalStore,
    remote: A,
    network: C,
}

impl<A: TransactionApi, C: Connectivity> SynchronizedRepository<A, C> {
    pub fn new(local: LocalStore, remote: A, network: C) -> Self {
        SynchronizedRepository {
            local,
            remote,
            network,
        }
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    pub fn remote(&self) -> &A {
        &self.remote
    }

    pub fn network(&self) -> &C {
        &self.network
    }

    pub fn is_online(&self) -> bool {
        self.network.is_online()
    }

    /// Every transaction, newest first.
    ///
    /// A non-empty local store is returned as is, even if the server has
    /// moved on; use [`refresh`](Self::refresh) to pull newer data.
    pub fn all(&self) -> Result<Vec<Transaction>, SyncError> {
        let cached = self.local.all()?;
        if !cached.is_empty() || !self.network.is_online() {
            return Ok(cached);
        }
        match self.remote.all() {
            Ok(fetched) => {
                info!(count = fetched.len(), "seeding empty local store from server");
                self.local.insert_many(&fetched)?;
                Ok(self.local.all()?)
            }
            Err(e) => {
                warn!(error = %e, "could not fetch transactions; showing local copy");
                Ok(cached)
            }
        }
    }

    /// The local record for `id`, refreshed from the server first when online.
    pub fn get(&self, id: i64) -> Result<Option<Transaction>, SyncError> {
        if self.network.is_online() {
            match self.remote.get(id) {
                Ok(Some(t)) => self.local.upsert(&t)?,
                Ok(None) => info!(id, "server has no such transaction"),
                Err(e) => warn!(id, error = %e, "could not fetch transaction; using local copy"),
            }
        }
        Ok(self.local.get(id)?)
    }

    /// Sends `t` to the server and mirrors the server's copy locally.
    /// Nothing is written locally while offline.
    pub fn insert(&self, t: &Transaction) -> Result<Transaction, SyncError> {
        if !self.network.is_online() {
            warn!(id = t.id, "insert refused while offline");
            return Err(SyncError::Offline);
        }
        let stored = self.remote.add(t)?;
        self.local.upsert(&stored)?;
        Ok(stored)
    }

    /// Deletes on the server, then locally. Succeeds only if both do.
    pub fn delete(&self, id: i64) -> Result<(), SyncError> {
        if !self.network.is_online() {
            warn!(id, "delete refused while offline");
            return Err(SyncError::Offline);
        }
        self.remote.delete(id)?;
        if !self.local.delete(id)? {
            warn!(id, "deleted on server but missing locally");
            return Err(SyncError::LocalDeleteMissed { id });
        }
        Ok(())
    }

    /// Pulls the full server collection and overwrites matching local records.
    /// Returns how many records were written.
    pub fn refresh(&self) -> Result<usize, SyncError> {
        if !self.network.is_online() {
            return Err(SyncError::Offline);
        }
        let fetched = self.remote.all()?;
        for t in &fetched {
            self.local.upsert(t)?;
        }
        info!(count = fetched.len(), "refreshed local store from server");
        Ok(fetched.len())
    }

    pub fn clear_local(&self) -> Result<usize, SyncError> {
        Ok(self.local.clear()?)
    }
}
