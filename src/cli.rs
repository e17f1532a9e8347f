// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

/// Fields shared by `tx add` and `tx edit`.
fn transaction_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("type")
            .long("type")
            .short('t')
            .required(required)
            .help("Transaction type, e.g. income or expense"),
    )
    .arg(
        Arg::new("amount")
            .long("amount")
            .short('a')
            .required(required)
            .allow_hyphen_values(true)
            .help("Amount, e.g. 12.50"),
    )
    .arg(Arg::new("category").long("category").short('c'))
    .arg(Arg::new("description").long("description").short('d'))
    .arg(
        Arg::new("date")
            .long("date")
            .help("YYYY-MM-DD (defaults to today)"),
    )
}

pub fn build_cli() -> Command {
    Command::new("pocketbook")
        .about("Offline-first spending tracker with server sync")
        .version(clap::crate_version!())
        .arg(
            Arg::new("offline")
                .long("offline")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Skip the connectivity probe and act as if there is no network"),
        )
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    transaction_fields(Command::new("add").about("Record a transaction"), true)
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .value_parser(value_parser!(i64))
                                .help("Use this id instead of a random one"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(
                            Arg::new("match")
                                .long("match")
                                .short('m')
                                .help("Regex matched against type, category and description"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .short('n')
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("remote")
                                .long("remote")
                                .action(ArgAction::SetTrue)
                                .help("Ask the server directly instead of the local copy"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show one transaction")
                        .arg(Arg::new("id").required(true)),
                ))
                .subcommand(transaction_fields(
                    Command::new("edit")
                        .about("Replace a transaction, keeping its id")
                        .arg(Arg::new("id").required(true)),
                    false,
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Spending summaries")
                .subcommand(json_flags(
                    Command::new("monthly").about("Expenses per month, largest first"),
                ))
                .subcommand(json_flags(
                    Command::new("insights").about("Top expense categories"),
                )),
        )
        .subcommand(
            Command::new("sync")
                .about("Local cache controls")
                .subcommand(
                    Command::new("refresh").about("Pull every transaction from the server"),
                )
                .subcommand(Command::new("clear").about("Drop the local copy")),
        )
        .subcommand(
            Command::new("listen")
                .about("Follow transactions pushed by the server")
                .arg(
                    Arg::new("seconds")
                        .long("seconds")
                        .value_parser(value_parser!(u64))
                        .help("Stop after this many seconds"),
                )
                .arg(
                    Arg::new("wait")
                        .long("wait")
                        .value_parser(value_parser!(u64))
                        .help("Wait up to this many seconds for the network first"),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .action(ArgAction::SetTrue)
                        .help("Print insights again whenever the local copy changes"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write the local copy to a file")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                )
                .arg(Arg::new("out").long("out").short('o').required(true)),
        )
        .subcommand(
            Command::new("config")
                .about("Read and change settings")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("unset").arg(Arg::new("key").required(true)))
                .subcommand(json_flags(Command::new("show"))),
        )
        .subcommand(Command::new("doctor").about("Check database, settings and network"))
}
