// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use super::current_snapshot;
use crate::aggregate::{
    Dashboard, ProfileStats, category_breakdown, monthly_totals, recent, time_series,
};
use crate::models::UserId;
use crate::store::TransactionStore;
use crate::utils::{
    RECORD_HEADERS, fmt_money, fmt_percent, maybe_print_json, parse_month, pretty_table,
    record_rows, today,
};

pub fn handle<S: TransactionStore>(store: &mut S, owner: &UserId, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("dashboard", sub)) => dashboard(store, owner, sub)?,
        Some(("profile", sub)) => profile(store, owner, sub)?,
        Some(("categories", sub)) => categories(store, owner, sub)?,
        Some(("timeseries", sub)) => timeseries(store, owner, sub)?,
        Some(("recent", sub)) => recent_list(store, owner, sub)?,
        Some(("month", sub)) => month(store, owner, sub)?,
        _ => {}
    }
    Ok(())
}

fn json_flags(sub: &clap::ArgMatches) -> (bool, bool) {
    (sub.get_flag("json"), sub.get_flag("jsonl"))
}

pub fn load_dashboard<S: TransactionStore>(store: &mut S, owner: &UserId) -> Result<Dashboard> {
    let snapshot = current_snapshot(store, owner)?;
    Ok(Dashboard::build(&snapshot))
}

/// Profile figures for the month containing `as_of`.
pub fn load_profile<S: TransactionStore>(
    store: &mut S,
    owner: &UserId,
    as_of: NaiveDate,
) -> Result<ProfileStats> {
    let snapshot = current_snapshot(store, owner)?;
    Ok(ProfileStats::build(&snapshot, as_of))
}

fn dashboard<S: TransactionStore>(store: &mut S, owner: &UserId, sub: &clap::ArgMatches) -> Result<()> {
    let (json, jsonl) = json_flags(sub);
    let d = load_dashboard(store, owner)?;
    if maybe_print_json(json, jsonl, &d)? {
        return Ok(());
    }

    println!(
        "{}",
        pretty_table(
            &["Total Income", "Total Expenses", "Balance"],
            vec![vec![
                fmt_money(&d.summary.income),
                fmt_money(&d.summary.expense),
                fmt_money(&d.summary.balance),
            ]],
        )
    );
    if !d.time_series.is_empty() {
        let rows = d
            .time_series
            .iter()
            .map(|p| vec![p.label.clone(), fmt_money(&p.income), fmt_money(&p.expense)])
            .collect();
        println!("Income vs Expenses");
        println!("{}", pretty_table(&["Day", "Income", "Expenses"], rows));
    }
    if !d.categories.is_empty() {
        let rows = d
            .categories
            .iter()
            .map(|c| vec![c.category.clone(), fmt_money(&c.total)])
            .collect();
        println!("Spending by Category");
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    if !d.recent.is_empty() {
        println!("Recent Transactions");
        println!("{}", pretty_table(&RECORD_HEADERS, record_rows(&d.recent)));
    }
    Ok(())
}

fn profile<S: TransactionStore>(store: &mut S, owner: &UserId, sub: &clap::ArgMatches) -> Result<()> {
    let (json, jsonl) = json_flags(sub);
    let as_of = match sub.get_one::<String>("month") {
        Some(m) => {
            let (y, mo) = parse_month(m)?;
            NaiveDate::from_ymd_opt(y, mo, 1)
                .with_context(|| format!("Invalid month '{}'", m))?
        }
        None => today(),
    };
    let p = load_profile(store, owner, as_of)?;
    if maybe_print_json(json, jsonl, &p)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Owner".to_string(), owner.to_string()],
        vec!["Total Transactions".to_string(), p.count.to_string()],
        vec!["Total Income".to_string(), fmt_money(&p.income)],
        vec!["Total Expenses".to_string(), fmt_money(&p.expense)],
        vec!["Balance".to_string(), fmt_money(&p.balance)],
        vec!["Average Transaction".to_string(), fmt_money(&p.average_amount)],
        vec!["Savings Rate".to_string(), fmt_percent(&p.savings_rate)],
        vec![format!("Income ({})", p.month), fmt_money(&p.this_month.income)],
        vec![format!("Expenses ({})", p.month), fmt_money(&p.this_month.expense)],
    ];
    println!("{}", pretty_table(&["", ""], rows));
    Ok(())
}

fn categories<S: TransactionStore>(store: &mut S, owner: &UserId, sub: &clap::ArgMatches) -> Result<()> {
    let (json, jsonl) = json_flags(sub);
    let snapshot = current_snapshot(store, owner)?;
    let data = category_breakdown(&snapshot);
    if !maybe_print_json(json, jsonl, &data)? {
        let rows = data
            .iter()
            .map(|c| vec![c.category.clone(), fmt_money(&c.total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}

fn timeseries<S: TransactionStore>(store: &mut S, owner: &UserId, sub: &clap::ArgMatches) -> Result<()> {
    let (json, jsonl) = json_flags(sub);
    let snapshot = current_snapshot(store, owner)?;
    let data = time_series(&snapshot);
    if !maybe_print_json(json, jsonl, &data)? {
        let rows = data
            .iter()
            .map(|p| vec![p.label.clone(), fmt_money(&p.income), fmt_money(&p.expense)])
            .collect();
        println!("{}", pretty_table(&["Day", "Income", "Expenses"], rows));
    }
    Ok(())
}

fn recent_list<S: TransactionStore>(store: &mut S, owner: &UserId, sub: &clap::ArgMatches) -> Result<()> {
    let (json, jsonl) = json_flags(sub);
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&crate::aggregate::DEFAULT_RECENT);
    let snapshot = current_snapshot(store, owner)?;
    let data = recent(&snapshot, limit);
    if !maybe_print_json(json, jsonl, &data)? {
        println!("{}", pretty_table(&RECORD_HEADERS, record_rows(&data)));
    }
    Ok(())
}

fn month<S: TransactionStore>(store: &mut S, owner: &UserId, sub: &clap::ArgMatches) -> Result<()> {
    let (json, jsonl) = json_flags(sub);
    let (year, mo) = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => anyhow::bail!("--month is required"),
    };
    let snapshot = current_snapshot(store, owner)?;
    let totals = monthly_totals(&snapshot, year, mo);
    if !maybe_print_json(json, jsonl, &totals)? {
        println!(
            "{}",
            pretty_table(
                &["Month", "Income", "Expenses"],
                vec![vec![
                    format!("{:04}-{:02}", year, mo),
                    fmt_money(&totals.income),
                    fmt_money(&totals.expense),
                ]],
            )
        );
    }
    Ok(())
}
