// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::models::UserId;
use crate::store::{Snapshot, TransactionStore};

pub mod categories;
pub mod reports;
pub mod transactions;

/// Subscribe, take the snapshot delivered on subscription, and let go.
pub fn current_snapshot<S: TransactionStore>(store: &mut S, owner: &UserId) -> Result<Snapshot> {
    let sub = store
        .subscribe(owner)
        .with_context(|| format!("Could not load transactions for '{}'", owner))?;
    let snapshot = sub.try_latest().unwrap_or_default();
    store.unsubscribe(sub);
    Ok(snapshot)
}
