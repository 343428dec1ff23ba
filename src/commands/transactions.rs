// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};

use super::current_snapshot;
use crate::listing::{ListQuery, SortKey, TransactionView, TypeFilter, build_view};
use crate::models::{
    DEFAULT_CATEGORY, TransactionDraft, TransactionId, TransactionPatch, TransactionType, UserId,
    validate, validate_patch,
};
use crate::store::TransactionStore;
use crate::utils::{RECORD_HEADERS, fmt_money, maybe_print_json, pretty_table, record_rows, today};

pub fn handle<S: TransactionStore>(store: &mut S, owner: &UserId, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, owner, sub)?,
        Some(("edit", sub)) => edit(store, owner, sub)?,
        Some(("rm", sub)) => remove(store, owner, sub)?,
        Some(("show", sub)) => show(store, owner, sub)?,
        Some(("list", sub)) => list(store, owner, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_kind(sub: &clap::ArgMatches) -> Result<Option<TransactionType>> {
    sub.get_one::<String>("type")
        .map(|s| s.parse::<TransactionType>())
        .transpose()
        .map_err(anyhow::Error::msg)
}

fn id_of(sub: &clap::ArgMatches) -> Result<TransactionId> {
    sub.get_one::<i64>("id")
        .map(|id| TransactionId(*id))
        .context("Missing transaction id")
}

/// Read the add form from parsed arguments. Unset date means today.
pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<TransactionDraft> {
    Ok(TransactionDraft {
        amount: sub.get_one::<String>("amount").cloned().unwrap_or_default(),
        category: sub
            .get_one::<String>("category")
            .cloned()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        kind: parse_kind(sub)?.unwrap_or_default(),
        date: sub
            .get_one::<String>("date")
            .cloned()
            .unwrap_or_else(|| today().to_string()),
        notes: sub.get_one::<String>("note").cloned().unwrap_or_default(),
    })
}

pub fn patch_from_args(sub: &clap::ArgMatches) -> Result<TransactionPatch> {
    Ok(TransactionPatch {
        amount: sub.get_one::<String>("amount").cloned(),
        category: sub.get_one::<String>("category").cloned(),
        kind: parse_kind(sub)?,
        date: sub.get_one::<String>("date").cloned(),
        notes: sub.get_one::<String>("note").cloned(),
    })
}

fn add<S: TransactionStore>(store: &mut S, owner: &UserId, sub: &clap::ArgMatches) -> Result<()> {
    let record = validate(&draft_from_args(sub)?)?;
    let summary = format!(
        "{} {} on {} ({})",
        record.kind,
        fmt_money(&record.amount),
        record.date,
        record.category
    );
    let id = store
        .create(owner, record)
        .context("Failed to add transaction")?;
    println!("Recorded #{}: {}", id, summary);
    Ok(())
}

fn edit<S: TransactionStore>(store: &mut S, owner: &UserId, sub: &clap::ArgMatches) -> Result<()> {
    let id = id_of(sub)?;
    let patch = validate_patch(&patch_from_args(sub)?)?;
    if patch.is_empty() {
        bail!("Nothing to change: pass at least one of --amount, --category, --type, --date, --note");
    }
    store
        .update(owner, id, patch)
        .context("Failed to update transaction")?;
    println!("Updated #{}", id);
    Ok(())
}

fn remove<S: TransactionStore>(store: &mut S, owner: &UserId, sub: &clap::ArgMatches) -> Result<()> {
    let id = id_of(sub)?;
    store
        .delete(owner, id)
        .context("Failed to delete transaction")?;
    println!("Deleted #{}", id);
    Ok(())
}

fn show<S: TransactionStore>(store: &mut S, owner: &UserId, sub: &clap::ArgMatches) -> Result<()> {
    let record = store.get(owner, id_of(sub)?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &record)? {
        let rows = record_rows(std::slice::from_ref(&record));
        println!("{}", pretty_table(&RECORD_HEADERS, rows));
    }
    Ok(())
}

pub fn list_query(sub: &clap::ArgMatches) -> Result<ListQuery> {
    let filter = match sub.get_one::<String>("type") {
        Some(s) => s.parse::<TypeFilter>().map_err(anyhow::Error::msg)?,
        None => TypeFilter::All,
    };
    let sort = match sub.get_one::<String>("sort") {
        Some(s) => s.parse::<SortKey>().map_err(anyhow::Error::msg)?,
        None => SortKey::Date,
    };
    Ok(ListQuery {
        filter,
        search: sub.get_one::<String>("search").cloned(),
        sort,
    })
}

pub fn query_view<S: TransactionStore>(
    store: &mut S,
    owner: &UserId,
    sub: &clap::ArgMatches,
) -> Result<TransactionView> {
    let query = list_query(sub)?;
    let snapshot = current_snapshot(store, owner)?;
    Ok(build_view(&snapshot, &query))
}

/// What an empty listing says, given how many records the owner has in total.
pub fn empty_list_message(total: usize) -> &'static str {
    if total == 0 {
        "No transactions yet"
    } else {
        "No transactions match your filters"
    }
}

fn list<S: TransactionStore>(store: &mut S, owner: &UserId, sub: &clap::ArgMatches) -> Result<()> {
    let query = list_query(sub)?;
    let snapshot = current_snapshot(store, owner)?;
    let view = build_view(&snapshot, &query);
    if maybe_print_json(sub.get_flag("json"), false, &view)? {
        return Ok(());
    }
    if maybe_print_json(false, sub.get_flag("jsonl"), &view.rows)? {
        return Ok(());
    }
    if view.rows.is_empty() {
        println!("{}", empty_list_message(snapshot.len()));
        return Ok(());
    }
    println!("{}", pretty_table(&RECORD_HEADERS, record_rows(&view.rows)));
    println!(
        "{} shown: income {}, expenses {}",
        view.summary.count,
        fmt_money(&view.summary.income),
        fmt_money(&view.summary.expense)
    );
    Ok(())
}
