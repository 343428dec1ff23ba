// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

use crate::models::{CATEGORIES, canonical_category};

fn parse_category(s: &str) -> Result<String, String> {
    canonical_category(s)
        .map(str::to_string)
        .ok_or_else(|| format!("Unknown category '{}' (use one of: {})", s, CATEGORIES.join(", ")))
}

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    ]
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Transaction id")
}

fn record_field_args(for_edit: bool) -> Vec<Arg> {
    let mut amount = Arg::new("amount").long("amount").short('a').help("Positive amount, e.g. 12.50");
    let mut category = Arg::new("category")
        .long("category")
        .short('c')
        .value_parser(parse_category)
        .help("Salary, Freelance, Investment, Food, Transport, Entertainment, Utilities, Healthcare, Shopping or Other");
    let mut kind = Arg::new("type")
        .long("type")
        .short('t')
        .value_parser(["income", "expense"]);
    if !for_edit {
        amount = amount.required(true);
        category = category.default_value("Food");
        kind = kind.default_value("expense");
    }
    vec![
        amount,
        category,
        kind,
        Arg::new("date").long("date").short('d').help("YYYY-MM-DD (default: today)"),
        Arg::new("note").long("note").short('n').help("Free-text note"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .version(clap::crate_version!())
        .about("Track income and expenses, and see where the money goes")
        .arg(
            Arg::new("db")
                .long("db")
                .env("FINTRACK_DB")
                .global(true)
                .help("Path to the SQLite database file"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .env("FINTRACK_USER")
                .global(true)
                .help("Owner id whose transactions are read and written"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true)
                .help("More log output on stderr (-v info, -vv debug)"),
        )
        .subcommand(
            Command::new("tx")
                .about("Record, edit and list transactions")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .args(record_field_args(false)),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change fields of an existing transaction")
                        .arg(id_arg())
                        .args(record_field_args(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction (cannot be undone)")
                        .arg(id_arg()),
                )
                .subcommand(
                    Command::new("show")
                        .about("Show one transaction")
                        .arg(id_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("list")
                        .about("List transactions with filters")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .short('t')
                                .value_parser(["all", "income", "expense"])
                                .default_value("all"),
                        )
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .short('s')
                                .help("Case-insensitive match on category or notes"),
                        )
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .value_parser(["date", "amount", "category"])
                                .default_value("date"),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboard summaries")
                .subcommand_required(true)
                .subcommand(
                    Command::new("dashboard")
                        .about("Totals, spending by category, daily series and recent activity")
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("profile")
                        .about("Count, average, savings rate and this month's totals")
                        .arg(Arg::new("month").long("month").help("YYYY-MM (default: current month)"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("categories")
                        .about("Expense totals per category")
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("timeseries")
                        .about("Income and expenses per day")
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("recent")
                        .about("Most recent transactions")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize))
                                .default_value("5"),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("month")
                        .about("Income and expenses for one month")
                        .arg(Arg::new("month").long("month").required(true).help("YYYY-MM"))
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Categories offered when recording")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List categories")),
        )
}
