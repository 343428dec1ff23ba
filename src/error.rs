// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::models::TransactionId;

/// Rejections raised before a candidate record ever reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Amount missing, not a number, or not strictly positive.
    #[error("Please enter a valid amount (got '{0}')")]
    InvalidAmount(String),

    /// Date missing or not in YYYY-MM-DD form.
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Failures reported by a [`crate::store::TransactionStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected or failed the operation. Not retried.
    #[error("store operation failed: {0}")]
    RemoteOperationFailed(String),

    /// No record with this id is visible to the owner.
    #[error("transaction {0} not found")]
    RecordNotFound(TransactionId),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::RemoteOperationFailed(e.to_string())
    }
}
