// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed client for the transaction service.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::error::RemoteError;
use crate::models::Transaction;
use crate::utils::http_client;

/// Operations the transaction service offers.
pub trait TransactionApi {
    /// `POST transaction/`. Returns the record as the server stored it.
    fn add(&self, t: &Transaction) -> Result<Transaction, RemoteError>;

    /// `GET transactions/`.
    fn transactions(&self) -> Result<Vec<Transaction>, RemoteError>;

    /// `GET transaction/{id}`. A 404 is `Ok(None)`.
    fn get(&self, id: i64) -> Result<Option<Transaction>, RemoteError>;

    /// `GET allTransactions/`.
    fn all(&self) -> Result<Vec<Transaction>, RemoteError>;

    /// `DELETE transaction/{id}`.
    fn delete(&self, id: i64) -> Result<(), RemoteError>;
}

pub struct HttpApi {
    base: String,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(HttpApi {
            base,
            client: http_client(timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

/// Turns non-2xx answers into [`RemoteError::Status`], logging the body.
fn check(endpoint: &str, resp: Response) -> Result<Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    error!(endpoint, status = status.as_u16(), %body, "remote call failed");
    Err(RemoteError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    })
}

/// Decodes a JSON body; empty and `null` bodies come back as `None`.
fn decode<T: DeserializeOwned>(resp: Response) -> Result<Option<T>, RemoteError> {
    let text = resp.text()?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_str::<Option<T>>(text)?)
}

impl TransactionApi for HttpApi {
    fn add(&self, t: &Transaction) -> Result<Transaction, RemoteError> {
        let endpoint = "POST transaction/";
        info!(id = t.id, "remote insert");
        let resp = self.client.post(self.url("transaction/")).json(t).send()?;
        decode(check(endpoint, resp)?)?.ok_or_else(|| RemoteError::EmptyBody {
            endpoint: endpoint.to_string(),
        })
    }

    fn transactions(&self) -> Result<Vec<Transaction>, RemoteError> {
        info!("remote get transactions");
        let resp = self.client.get(self.url("transactions/")).send()?;
        Ok(decode(check("GET transactions/", resp)?)?.unwrap_or_default())
    }

    fn get(&self, id: i64) -> Result<Option<Transaction>, RemoteError> {
        info!(id, "remote get");
        let resp = self
            .client
            .get(self.url(&format!("transaction/{id}")))
            .send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(check("GET transaction/{id}", resp)?)
    }

    fn all(&self) -> Result<Vec<Transaction>, RemoteError> {
        info!("remote get all");
        let resp = self.client.get(self.url("allTransactions/")).send()?;
        Ok(decode(check("GET allTransactions/", resp)?)?.unwrap_or_default())
    }

    fn delete(&self, id: i64) -> Result<(), RemoteError> {
        info!(id, "remote delete");
        let resp = self
            .client
            .delete(self.url(&format!("transaction/{id}")))
            .send()?;
        check("DELETE transaction/{id}", resp)?;
        Ok(())
    }
}
