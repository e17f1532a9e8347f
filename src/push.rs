// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Server-initiated "transaction created" events over a WebSocket.
//!
//! The listener connects once and never reconnects. Every text frame is a
//! JSON transaction which is written straight into the local store, with no
//! connectivity check and no ordering against in-flight inserts.

use std::io::ErrorKind;
use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info, warn};
use tungstenite::protocol::CloseFrame;
use tungstenite::protocol::frame::coding::CloseCode;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use crate::error::PushError;
use crate::models::Transaction;
use crate::store::LocalStore;

/// How often the reader wakes up to check for a disconnect request.
const POLL: Duration = Duration::from_millis(200);

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

pub struct PushListener {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<(), PushError>>>,
}

impl PushListener {
    /// Connects to `url` and starts the reader thread. Each stored
    /// transaction is also sent on `notify`.
    pub fn connect(
        url: &str,
        store: LocalStore,
        notify: Sender<Transaction>,
    ) -> Result<Self, PushError> {
        debug!(url, "connecting to push channel");
        let (mut socket, _) = tungstenite::connect(url)?;
        if let MaybeTlsStream::Plain(stream) = socket.get_ref() {
            stream.set_read_timeout(Some(POLL))?;
        }
        info!(url, "connected to push channel");

        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("push-listener".into())
            .spawn(move || {
                let result = read_loop(&mut socket, &store, &notify, &flag);
                if let Err(e) = &result {
                    error!(error = %e, "push listener stopped");
                }
                result
            })?;

        Ok(PushListener {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Closes the socket with a normal close code and waits for the reader.
    pub fn disconnect(mut self) -> Result<(), PushError> {
        debug!("closing push channel");
        self.stop.store(true, Ordering::Release);
        self.join()
    }

    /// Blocks until the server closes the channel or the reader fails.
    pub fn wait(mut self) -> Result<(), PushError> {
        self.join()
    }

    fn join(&mut self) -> Result<(), PushError> {
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(result)) => result,
            Some(Err(_)) => {
                error!("push listener thread panicked");
                Err(PushError::ListenerPanicked)
            }
            None => Ok(()),
        }
    }
}

impl Drop for PushListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        let _ = self.join();
    }
}

/// Decodes one pushed frame and stores it, replacing any record with the same id.
pub fn handle_frame(store: &LocalStore, text: &str) -> Result<Transaction, PushError> {
    info!(payload = text, "push message received");
    let t: Transaction = serde_json::from_str(text)?;
    store.upsert(&t)?;
    Ok(t)
}

fn read_loop(
    socket: &mut Socket,
    store: &LocalStore,
    notify: &Sender<Transaction>,
    stop: &AtomicBool,
) -> Result<(), PushError> {
    loop {
        if stop.load(Ordering::Acquire) {
            return close(socket);
        }
        match socket.read() {
            Ok(Message::Text(text)) => {
                let t = handle_frame(store, text.as_str())?;
                if notify.send(t).is_err() {
                    debug!("nobody is listening for push notices");
                }
            }
            Ok(Message::Close(frame)) => {
                info!(?frame, "server closed push channel");
            }
            Ok(_) => {}
            Err(tungstenite::Error::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn close(socket: &mut Socket) -> Result<(), PushError> {
    let frame = CloseFrame {
        code: CloseCode::Normal,
        reason: "Closing WebSocket".into(),
    };
    match socket.close(Some(frame)) {
        Ok(()) => {}
        Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }
    // Give the server a chance to acknowledge; any error ends the handshake.
    for _ in 0..10 {
        match socket.read() {
            Ok(_) => continue,
            Err(tungstenite::Error::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                continue;
            }
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                break;
            }
            Err(e) => {
                warn!(error = %e, "push channel did not close cleanly");
                break;
            }
        }
    }
    Ok(())
}
