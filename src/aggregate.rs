// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Summaries derived from a snapshot of one owner's transactions.
//!
//! Every function here is pure and total: it takes whatever collection the
//! store delivered (unordered, possibly empty) and returns a fresh value.
//! Arithmetic saturates at the `Decimal` bounds instead of panicking, so rows
//! stored before amounts were capped still produce a report.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{TransactionRecord, TransactionType};

/// How many rows the dashboard's "recent" list shows.
pub const DEFAULT_RECENT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePoint {
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

pub fn total_by_type(records: &[TransactionRecord], kind: TransactionType) -> Decimal {
    records
        .iter()
        .filter(|r| r.kind == kind)
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.amount))
}

pub fn balance(records: &[TransactionRecord]) -> Decimal {
    total_by_type(records, TransactionType::Income)
        .saturating_sub(total_by_type(records, TransactionType::Expense))
}

/// Expense totals per exact category string, in order of first appearance.
pub fn category_breakdown(records: &[TransactionRecord]) -> Vec<CategoryTotal> {
    let mut out: Vec<CategoryTotal> = Vec::new();
    for r in records.iter().filter(|r| r.is_expense()) {
        match out.iter_mut().find(|c| c.category == r.category) {
            Some(existing) => existing.total = existing.total.saturating_add(r.amount),
            None => out.push(CategoryTotal {
                category: r.category.clone(),
                total: r.amount,
            }),
        }
    }
    out
}

/// Chart label for a day, e.g. `Jan 1`. The year is not part of the label.
pub fn day_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Per-day income and expense sums for the dashboard line chart.
///
/// Records are scanned in ascending date order and bucketed by [`day_label`],
/// so the same month/day in two different years lands in one bucket.
pub fn time_series(records: &[TransactionRecord]) -> Vec<TimePoint> {
    let mut ordered: Vec<&TransactionRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.date);

    let mut out: Vec<TimePoint> = Vec::new();
    for r in ordered {
        let label = day_label(r.date);
        let idx = match out.iter().position(|p| p.label == label) {
            Some(i) => i,
            None => {
                out.push(TimePoint {
                    label,
                    income: Decimal::ZERO,
                    expense: Decimal::ZERO,
                });
                out.len() - 1
            }
        };
        let point = &mut out[idx];
        match r.kind {
            TransactionType::Income => point.income = point.income.saturating_add(r.amount),
            TransactionType::Expense => point.expense = point.expense.saturating_add(r.amount),
        }
    }
    out
}

/// Newest `n` records, most recent date first. Same-date records keep input order.
pub fn recent(records: &[TransactionRecord], n: usize) -> Vec<TransactionRecord> {
    let mut ordered: Vec<&TransactionRecord> = records.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));
    ordered.into_iter().take(n).cloned().collect()
}

pub fn monthly_totals(records: &[TransactionRecord], year: i32, month: u32) -> MonthTotals {
    let in_month: Vec<TransactionRecord> = records
        .iter()
        .filter(|r| r.date.year() == year && r.date.month() == month)
        .cloned()
        .collect();
    MonthTotals {
        income: total_by_type(&in_month, TransactionType::Income),
        expense: total_by_type(&in_month, TransactionType::Expense),
    }
}

/// Mean magnitude over all records, income and expense alike. Zero when empty.
pub fn average_amount(records: &[TransactionRecord]) -> Decimal {
    if records.is_empty() {
        return Decimal::ZERO;
    }
    let gross = total_by_type(records, TransactionType::Income)
        .saturating_add(total_by_type(records, TransactionType::Expense));
    gross
        .checked_div(Decimal::from(records.len()))
        .unwrap_or(Decimal::ZERO)
}

/// Share of income not spent, in percent. Zero when there is no income.
pub fn savings_rate(records: &[TransactionRecord]) -> Decimal {
    let income = total_by_type(records, TransactionType::Income);
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let expense = total_by_type(records, TransactionType::Expense);
    let kept = income.saturating_sub(expense);
    let ratio = kept.checked_div(income).unwrap_or(if kept.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    });
    ratio.saturating_mul(Decimal::ONE_HUNDRED)
}

/// Income, expense, balance and count over a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    pub count: usize,
}

impl Summary {
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let income = total_by_type(records, TransactionType::Income);
        let expense = total_by_type(records, TransactionType::Expense);
        Summary {
            income,
            expense,
            balance: income.saturating_sub(expense),
            count: records.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub summary: Summary,
    pub categories: Vec<CategoryTotal>,
    pub time_series: Vec<TimePoint>,
    pub recent: Vec<TransactionRecord>,
}

impl Dashboard {
    pub fn build(records: &[TransactionRecord]) -> Self {
        Dashboard {
            summary: Summary::from_records(records),
            categories: category_breakdown(records),
            time_series: time_series(records),
            recent: recent(records, DEFAULT_RECENT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileStats {
    pub count: usize,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    pub average_amount: Decimal,
    pub savings_rate: Decimal,
    /// `YYYY-MM` of the month the `this_month` figures cover.
    pub month: String,
    pub this_month: MonthTotals,
}

impl ProfileStats {
    /// `today` picks the calendar month reported under `this_month`.
    pub fn build(records: &[TransactionRecord], today: NaiveDate) -> Self {
        let summary = Summary::from_records(records);
        ProfileStats {
            count: summary.count,
            income: summary.income,
            expense: summary.expense,
            balance: summary.balance,
            average_amount: average_amount(records),
            savings_rate: savings_rate(records),
            month: today.format("%Y-%m").to_string(),
            this_month: monthly_totals(records, today.year(), today.month()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransactionId, UserId};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn rec(id: i64, amount: Decimal, kind: TransactionType, date: &str, category: &str) -> TransactionRecord {
        TransactionRecord {
            id: TransactionId(id),
            user_id: UserId::new("u1"),
            amount,
            category: category.into(),
            kind,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            notes: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn scenario() -> Vec<TransactionRecord> {
        vec![
            rec(1, dec!(100), TransactionType::Income, "2024-01-01", "Salary"),
            rec(2, dec!(40), TransactionType::Expense, "2024-01-01", "Food"),
            rec(3, dec!(10), TransactionType::Expense, "2024-01-02", "Food"),
        ]
    }

    #[test]
    fn dashboard_scenario() {
        let records = scenario();
        assert_eq!(balance(&records), dec!(50));
        assert_eq!(
            category_breakdown(&records),
            vec![CategoryTotal {
                category: "Food".into(),
                total: dec!(50)
            }]
        );
        assert_eq!(
            time_series(&records),
            vec![
                TimePoint {
                    label: "Jan 1".into(),
                    income: dec!(100),
                    expense: dec!(40)
                },
                TimePoint {
                    label: "Jan 2".into(),
                    income: dec!(0),
                    expense: dec!(10)
                },
            ]
        );
    }

    #[test]
    fn empty_collection_yields_zeros() {
        let none: Vec<TransactionRecord> = Vec::new();
        assert_eq!(total_by_type(&none, TransactionType::Income), Decimal::ZERO);
        assert_eq!(total_by_type(&none, TransactionType::Expense), Decimal::ZERO);
        assert_eq!(balance(&none), Decimal::ZERO);
        assert_eq!(average_amount(&none), Decimal::ZERO);
        assert_eq!(savings_rate(&none), Decimal::ZERO);
        assert!(category_breakdown(&none).is_empty());
        assert!(time_series(&none).is_empty());
        assert!(recent(&none, 5).is_empty());
        assert_eq!(Summary::from_records(&none), Summary::default());
    }

    #[test]
    fn breakdown_ignores_income_and_sums_to_expense_total() {
        let mut records = scenario();
        records.push(rec(4, dec!(7.25), TransactionType::Expense, "2024-02-01", "Transport"));
        records.push(rec(5, dec!(500), TransactionType::Income, "2024-02-01", "Freelance"));
        records.push(rec(6, dec!(3), TransactionType::Expense, "2024-02-03", "food"));

        let breakdown = category_breakdown(&records);
        let names: Vec<&str> = breakdown.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Food", "Transport", "food"]);
        let sum: Decimal = breakdown.iter().map(|c| c.total).sum();
        assert_eq!(sum, total_by_type(&records, TransactionType::Expense));
    }

    #[test]
    fn time_series_merges_same_day_across_years() {
        let records = vec![
            rec(1, dec!(5), TransactionType::Expense, "2024-03-10", "Food"),
            rec(2, dec!(20), TransactionType::Income, "2023-03-10", "Salary"),
            rec(3, dec!(1), TransactionType::Expense, "2023-12-31", "Food"),
        ];
        let series = time_series(&records);
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Mar 10", "Dec 31"]);
        assert_eq!(series[0].income, dec!(20));
        assert_eq!(series[0].expense, dec!(5));
    }

    #[test]
    fn recent_is_bounded_descending_and_stable() {
        let records = vec![
            rec(1, dec!(1), TransactionType::Expense, "2024-01-01", "Food"),
            rec(2, dec!(2), TransactionType::Expense, "2024-01-05", "Food"),
            rec(3, dec!(3), TransactionType::Expense, "2024-01-03", "Food"),
            rec(4, dec!(4), TransactionType::Income, "2024-01-05", "Salary"),
        ];
        let top = recent(&records, 3);
        let ids: Vec<i64> = top.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![2, 4, 3]);
        assert_eq!(recent(&records, 10).len(), 4);
        assert!(recent(&records, 0).is_empty());
    }

    #[test]
    fn monthly_totals_respect_year_and_month() {
        let records = vec![
            rec(1, dec!(100), TransactionType::Income, "2024-05-01", "Salary"),
            rec(2, dec!(30), TransactionType::Expense, "2024-05-31", "Food"),
            rec(3, dec!(999), TransactionType::Expense, "2023-05-15", "Food"),
            rec(4, dec!(1), TransactionType::Expense, "2024-06-01", "Food"),
        ];
        assert_eq!(
            monthly_totals(&records, 2024, 5),
            MonthTotals {
                income: dec!(100),
                expense: dec!(30)
            }
        );
        assert_eq!(monthly_totals(&records, 2022, 1), MonthTotals::default());
    }

    #[test]
    fn average_and_savings_rate() {
        let records = scenario();
        assert_eq!(average_amount(&records), dec!(50));
        assert_eq!(savings_rate(&records), dec!(50));

        let spend_only = vec![rec(1, dec!(10), TransactionType::Expense, "2024-01-01", "Food")];
        assert_eq!(savings_rate(&spend_only), Decimal::ZERO);

        let overspent = vec![
            rec(1, dec!(100), TransactionType::Income, "2024-01-01", "Salary"),
            rec(2, dec!(150), TransactionType::Expense, "2024-01-02", "Shopping"),
        ];
        assert_eq!(savings_rate(&overspent), dec!(-50));
    }

    #[test]
    fn decimal_sums_do_not_drift() {
        let records: Vec<TransactionRecord> = (0..10)
            .map(|i| rec(i, dec!(0.1), TransactionType::Expense, "2024-01-01", "Food"))
            .collect();
        assert_eq!(total_by_type(&records, TransactionType::Expense), dec!(1.0));
    }

    #[test]
    fn oversized_rows_saturate_instead_of_panicking() {
        let huge = dec!(50000000000000000000000000000);
        let records = vec![
            rec(1, huge, TransactionType::Expense, "2024-01-01", "Food"),
            rec(2, huge, TransactionType::Expense, "2024-01-01", "Food"),
        ];
        assert_eq!(total_by_type(&records, TransactionType::Expense), Decimal::MAX);
        assert_eq!(balance(&records), -Decimal::MAX);
        assert_eq!(category_breakdown(&records)[0].total, Decimal::MAX);
        assert_eq!(time_series(&records)[0].expense, Decimal::MAX);
        assert_eq!(average_amount(&records), Decimal::MAX / dec!(2));

        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(Dashboard::build(&records).summary.expense, Decimal::MAX);
        assert_eq!(ProfileStats::build(&records, today).this_month.expense, Decimal::MAX);
    }

    #[test]
    fn savings_rate_survives_tiny_income() {
        let records = vec![
            rec(1, dec!(0.01), TransactionType::Income, "2024-01-01", "Salary"),
            rec(2, dec!(1000000000000000000000000000), TransactionType::Expense, "2024-01-02", "Shopping"),
        ];
        assert_eq!(savings_rate(&records), Decimal::MIN);
    }

    #[test]
    fn profile_reports_current_month() {
        let records = scenario();
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let stats = ProfileStats::build(&records, today);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.month, "2024-01");
        assert_eq!(stats.this_month.income, dec!(100));
        assert_eq!(stats.this_month.expense, dec!(50));
        assert_eq!(stats.balance, dec!(50));
    }
}
