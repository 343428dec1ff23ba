// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Filtered, searched and sorted views of a transaction snapshot for list display.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::aggregate::Summary;
use crate::models::{TransactionRecord, TransactionType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl TypeFilter {
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => record.kind == TransactionType::Income,
            TypeFilter::Expense => record.kind == TransactionType::Expense,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "income" => Ok(TypeFilter::Income),
            "expense" => Ok(TypeFilter::Expense),
            other => Err(format!("Unknown filter '{}' (use all|income|expense)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    Category,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Date => "date",
            SortKey::Amount => "amount",
            SortKey::Category => "category",
        })
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            "category" => Ok(SortKey::Category),
            other => Err(format!("Unknown sort key '{}' (use date|amount|category)", other)),
        }
    }
}

pub fn filter_by_type<'a, I>(records: I, filter: TypeFilter) -> Vec<&'a TransactionRecord>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    records.into_iter().filter(|r| filter.matches(r)).collect()
}

fn matches_query(record: &TransactionRecord, needle: &str) -> bool {
    record.category.to_lowercase().contains(needle) || record.notes.to_lowercase().contains(needle)
}

/// Case-insensitive substring match on category or notes. A blank or absent
/// query keeps everything.
pub fn search<'a, I>(records: I, query: Option<&str>) -> Vec<&'a TransactionRecord>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let needle = query.map(str::to_lowercase).unwrap_or_default();
    if needle.is_empty() {
        return records.into_iter().collect();
    }
    records
        .into_iter()
        .filter(|r| matches_query(r, &needle))
        .collect()
}

fn swap_case(s: &str) -> String {
    s.chars()
        .flat_map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                c.to_uppercase().collect::<Vec<_>>()
            }
        })
        .collect()
}

/// Dictionary-style ordering: letters compare case-insensitively first, and
/// only identical-ignoring-case strings fall back to lower-before-upper.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| swap_case(a).cmp(&swap_case(b)))
}

fn compare(a: &TransactionRecord, b: &TransactionRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => b.date.cmp(&a.date),
        SortKey::Amount => b.amount.cmp(&a.amount),
        SortKey::Category => collate(&a.category, &b.category),
    }
}

/// Stable sort: records with equal keys keep their relative order.
pub fn sort_by(records: &mut [&TransactionRecord], key: SortKey) {
    records.sort_by(|a, b| compare(a, b, key));
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: TypeFilter,
    pub search: Option<String>,
    pub sort: SortKey,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView {
    pub rows: Vec<TransactionRecord>,
    /// Totals over the filtered and searched rows.
    pub summary: Summary,
}

/// Apply type filter, then search, then sort. Subtotals are taken before sorting.
pub fn build_view(records: &[TransactionRecord], query: &ListQuery) -> TransactionView {
    let filtered = filter_by_type(records, query.filter);
    let mut matched = search(filtered, query.search.as_deref());

    let owned: Vec<TransactionRecord> = matched.iter().map(|r| (*r).clone()).collect();
    let summary = Summary::from_records(&owned);

    sort_by(&mut matched, query.sort);
    TransactionView {
        rows: matched.into_iter().cloned().collect(),
        summary,
    }
}
