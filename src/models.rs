// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Categories offered when recording a transaction. Stored records may carry
/// any category string; only the write path is restricted to this list.
pub const CATEGORIES: [&str; 10] = [
    "Salary",
    "Freelance",
    "Investment",
    "Food",
    "Transport",
    "Entertainment",
    "Utilities",
    "Healthcare",
    "Shopping",
    "Other",
];

pub const DEFAULT_CATEGORY: &str = "Food";

/// Largest amount (one trillion) a single transaction may carry. Keeps every sum over a
/// realistic history well inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Map a user-typed category onto its canonical spelling, ignoring case.
pub fn canonical_category(name: &str) -> Option<&'static str> {
    let name = name.trim();
    CATEGORIES
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub i64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TransactionId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!(
                "Unknown transaction type '{}' (use income|expense)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub user_id: UserId,
    pub amount: Decimal,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Amount with the direction applied: positive for income, negative for expenses.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// A transaction as typed into the add form, before validation.
///
/// Amount and date are kept as raw text; an empty string means the field was
/// left blank.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub amount: String,
    pub category: String,
    pub kind: TransactionType,
    pub date: String,
    pub notes: String,
}

impl Default for TransactionDraft {
    fn default() -> Self {
        TransactionDraft {
            amount: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            kind: TransactionType::Expense,
            date: String::new(),
            notes: String::new(),
        }
    }
}

/// A draft that passed [`validate`]; the only shape the store accepts for creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub category: String,
    pub kind: TransactionType,
    pub date: NaiveDate,
    pub notes: String,
}

/// Partial edit of an existing record. `None` leaves the field untouched.
///
/// Id, owner and creation time are not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub amount: Option<String>,
    pub category: Option<String>,
    pub kind: Option<TransactionType>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidPatch {
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub kind: Option<TransactionType>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl ValidPatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.kind.is_none()
            && self.date.is_none()
            && self.notes.is_none()
    }

    pub fn apply(&self, record: &mut TransactionRecord) {
        if let Some(amount) = self.amount {
            record.amount = amount;
        }
        if let Some(category) = &self.category {
            record.category = category.clone();
        }
        if let Some(kind) = self.kind {
            record.kind = kind;
        }
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(notes) = &self.notes {
            record.notes = notes.clone();
        }
    }
}

fn validate_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let amount = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_| ValidationError::InvalidAmount(raw.to_string()))?;
    if amount <= Decimal::ZERO || amount > MAX_AMOUNT {
        return Err(ValidationError::InvalidAmount(raw.to_string()));
    }
    Ok(amount)
}

fn validate_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Check a draft before it is submitted. Amount is checked first, then date.
/// Category and notes pass through as-is.
pub fn validate(candidate: &TransactionDraft) -> Result<NewTransaction, ValidationError> {
    let amount = validate_amount(&candidate.amount)?;
    let date = validate_date(&candidate.date)?;
    Ok(NewTransaction {
        amount,
        category: candidate.category.clone(),
        kind: candidate.kind,
        date,
        notes: candidate.notes.clone(),
    })
}

pub fn validate_patch(patch: &TransactionPatch) -> Result<ValidPatch, ValidationError> {
    let amount = patch.amount.as_deref().map(validate_amount).transpose()?;
    let date = patch.date.as_deref().map(validate_date).transpose()?;
    Ok(ValidPatch {
        amount,
        category: patch.category.clone(),
        kind: patch.kind,
        date,
        notes: patch.notes.clone(),
    })
}
