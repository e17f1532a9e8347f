// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failure of a call against the transaction service.
///
/// The reconciliation layer treats every variant the same way; the kind is
/// kept so callers and logs can still tell them apart.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} answered {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("{endpoint} answered without a body")]
    EmptyBody { endpoint: String },

    #[error("could not decode server payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Outcome kinds of a reconciliation step.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(
        "no network connection\n  hint: this operation needs the server; try again once online"
    )]
    Offline,

    #[error("server error: {0}")]
    Remote(#[from] RemoteError),

    #[error("local store error: {0}")]
    Local(#[from] rusqlite::Error),

    #[error(
        "transaction {id} was deleted on the server but was not in the local store\n  \
         hint: run 'pocketbook sync refresh' to bring the local copy back in line"
    )]
    LocalDeleteMissed { id: i64 },
}

impl SyncError {
    /// Whether the failure came from the network side (offline or server).
    pub fn is_remote(&self) -> bool {
        matches!(self, SyncError::Offline | SyncError::Remote(_))
    }
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("push channel: {0}")]
    Socket(#[from] Box<tungstenite::Error>),

    #[error("malformed push payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not store pushed transaction: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("push channel I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("push listener thread panicked")]
    ListenerPanicked,
}

impl From<tungstenite::Error> for PushError {
    fn from(e: tungstenite::Error) -> Self {
        PushError::Socket(Box::new(e))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "unknown setting '{0}'\n  hint: valid keys are: {keys}",
        keys = crate::config::KEYS.join(", ")
    )]
    UnknownKey(String),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error(transparent)]
    Store(#[from] rusqlite::Error),
}
