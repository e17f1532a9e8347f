// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use std::net::TcpListener;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use common::{repo, tx};
use pocketbook::cli;
use pocketbook::commands::listen::{self, notice};
use pocketbook::config::Config;
use pocketbook::error::PushError;
use pocketbook::push::{PushListener, handle_frame};
use pocketbook::store::LocalStore;
use tungstenite::Message;

const PUSHED: &str = r#"{"id":11,"date":"2024-05-01","amount":25,"type":"expense","category":"books","description":"pushed"}"#;

/// Sends `frames`, closes, and waits for the client to finish the handshake.
fn push_server(frames: Vec<String>) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("ws://{}/ws", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut ws = tungstenite::accept(stream).unwrap();
        for f in frames {
            let _ = ws.send(Message::Text(f.into()));
        }
        let _ = ws.close(None);
        while ws.read().is_ok() {}
    });
    (url, handle)
}

#[test]
fn frame_is_stored_replacing_older_copy() {
    let store = LocalStore::in_memory().unwrap();
    store.insert(&tx(11, "2024-05-01", "expense", "1", "old")).unwrap();

    let t = handle_frame(&store, PUSHED).unwrap();
    assert_eq!(t.category, "books");
    assert_eq!(store.get(11).unwrap().unwrap(), t);
}

#[test]
fn malformed_frame_is_a_decode_error() {
    let store = LocalStore::in_memory().unwrap();
    assert!(matches!(
        handle_frame(&store, "{\"id\": oops"),
        Err(PushError::Decode(_))
    ));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn listener_stores_pushed_transactions_and_notifies() {
    let gift = r#"{"id":12,"date":"2024-05-02","amount":3.5,"type":"income","category":"gift"}"#;
    let (url, server) = push_server(vec![PUSHED.to_string(), gift.to_string()]);
    let store = LocalStore::in_memory().unwrap();
    let (notify, notices) = mpsc::channel();

    let listener = PushListener::connect(&url, store.clone(), notify).unwrap();
    let first = notices.recv_timeout(Duration::from_secs(5)).unwrap();
    let second = notices.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(first.id, 11);
    assert_eq!(second.id, 12);

    listener.wait().unwrap();
    server.join().unwrap();

    assert_eq!(store.count().unwrap(), 2);
    assert_eq!(
        notice(&store.get(11).unwrap().unwrap(), "RON"),
        "New transaction received: expense - 25.00 RON"
    );
}

#[test]
fn malformed_push_ends_the_listener() {
    let (url, server) = push_server(vec!["not json".to_string()]);
    let store = LocalStore::in_memory().unwrap();
    let (notify, notices) = mpsc::channel();

    let listener = PushListener::connect(&url, store.clone(), notify).unwrap();
    assert!(matches!(listener.wait(), Err(PushError::Decode(_))));
    assert!(notices.try_recv().is_err());
    assert_eq!(store.count().unwrap(), 0);
    server.join().unwrap();
}

#[test]
fn disconnect_sends_normal_close() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("ws://{}/ws", listener.local_addr().unwrap());
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut ws = tungstenite::accept(stream).unwrap();
        let mut code = None;
        loop {
            match ws.read() {
                Ok(Message::Close(Some(frame))) => code = Some(u16::from(frame.code)),
                Ok(_) => {}
                Err(_) => break,
            }
        }
        code
    });

    let (notify, _notices) = mpsc::channel();
    let client = PushListener::connect(&url, LocalStore::in_memory().unwrap(), notify).unwrap();
    assert!(client.is_running());
    client.disconnect().unwrap();
    assert_eq!(server.join().unwrap(), Some(1000));
}

#[test]
fn unreachable_push_endpoint_fails_to_connect() {
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let (notify, _notices) = mpsc::channel();
    let result = PushListener::connect(
        &format!("ws://127.0.0.1:{}/ws", port),
        LocalStore::in_memory().unwrap(),
        notify,
    );
    assert!(matches!(result, Err(PushError::Socket(_))));
}

fn listen_matches(args: &[&str]) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from(args);
    let (_, sub) = matches.subcommand().unwrap();
    sub.clone()
}

#[test]
fn listen_command_stores_pushes_until_server_closes() {
    let (url, server) = push_server(vec![PUSHED.to_string()]);
    let (repo, api, _) = repo(&[], &[], false);
    let cfg = Config {
        push_url: url,
        ..Config::default()
    };
    let sub = listen_matches(&["pocketbook", "listen", "--seconds", "10", "--report"]);

    listen::handle(&repo, &cfg, &sub).unwrap();
    server.join().unwrap();

    assert_eq!(repo.local().get(11).unwrap().unwrap().category, "books");
    // Pushes go straight to the store; the service is never asked.
    assert!(api.calls().is_empty());
}

#[test]
fn listen_command_closes_normally_at_deadline() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("ws://{}/ws", listener.local_addr().unwrap());
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut ws = tungstenite::accept(stream).unwrap();
        let mut code = None;
        loop {
            match ws.read() {
                Ok(Message::Close(Some(frame))) => code = Some(u16::from(frame.code)),
                Ok(_) => {}
                Err(_) => break,
            }
        }
        code
    });
    let (repo, _, _) = repo(&[], &[], false);
    let cfg = Config {
        push_url: url,
        ..Config::default()
    };
    let sub = listen_matches(&["pocketbook", "listen", "--seconds", "1"]);

    listen::handle(&repo, &cfg, &sub).unwrap();
    assert_eq!(server.join().unwrap(), Some(1000));
    assert_eq!(repo.local().count().unwrap(), 0);
}

#[test]
fn listen_command_reports_malformed_push() {
    let (url, server) = push_server(vec!["not json".to_string()]);
    let (repo, _, _) = repo(&[], &[], false);
    let cfg = Config {
        push_url: url,
        ..Config::default()
    };
    let sub = listen_matches(&["pocketbook", "listen", "--seconds", "10"]);

    let err = listen::handle(&repo, &cfg, &sub).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PushError>(),
        Some(PushError::Decode(_))
    ));
    server.join().unwrap();
}
