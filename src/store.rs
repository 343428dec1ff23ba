// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The transaction store: single source of truth for every owner's records.
//!
//! Readers never poll. They [`subscribe`](TransactionStore::subscribe) and get
//! the owner's full collection once up front and again after every write that
//! touches it. What they do with a snapshot (aggregate, list, render) is up to
//! them; the store only guarantees each snapshot is complete and owner-scoped.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use anyhow::Result as AnyResult;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::db;
use crate::error::StoreError;
use crate::models::{NewTransaction, TransactionId, TransactionRecord, TransactionType, UserId, ValidPatch};

/// Everything one owner has, as of one moment.
pub type Snapshot = Vec<TransactionRecord>;

pub trait TransactionStore {
    /// Register for snapshots of `owner`'s collection. The current snapshot is
    /// queued on the returned subscription before this returns.
    fn subscribe(&mut self, owner: &UserId) -> Result<Subscription, StoreError>;

    /// Stop deliveries and release the subscription's channel.
    fn unsubscribe(&mut self, subscription: Subscription);

    fn create(&mut self, owner: &UserId, record: NewTransaction) -> Result<TransactionId, StoreError>;

    fn update(&mut self, owner: &UserId, id: TransactionId, patch: ValidPatch) -> Result<(), StoreError>;

    fn delete(&mut self, owner: &UserId, id: TransactionId) -> Result<(), StoreError>;

    fn get(&self, owner: &UserId, id: TransactionId) -> Result<TransactionRecord, StoreError>;

    fn snapshot(&self, owner: &UserId) -> Result<Snapshot, StoreError>;
}

/// Receiving end of a live snapshot feed.
pub struct Subscription {
    id: u64,
    owner: UserId,
    rx: Receiver<Snapshot>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Block until the next snapshot arrives. `None` once the store side is gone.
    pub fn recv(&self) -> Option<Snapshot> {
        self.rx.recv().ok()
    }

    /// Next queued snapshot, if any. Never blocks.
    pub fn try_recv(&self) -> Option<Snapshot> {
        match self.rx.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drain the queue and keep only the newest snapshot. Older ones are stale
    /// by definition since each snapshot is the full collection.
    pub fn try_latest(&self) -> Option<Snapshot> {
        self.rx.try_iter().last()
    }
}

struct Subscriber {
    id: u64,
    owner: UserId,
    tx: Sender<Snapshot>,
}

pub struct SqliteStore {
    conn: Connection,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, amount, category, type, date, notes, created_at FROM transactions";

fn map_row(r: &Row<'_>) -> rusqlite::Result<TransactionRecord> {
    let amount: String = r.get(2)?;
    let amount = amount
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    let user_id: String = r.get(1)?;
    let date: NaiveDate = r.get(5)?;
    let created_at: DateTime<Utc> = r.get(7)?;
    Ok(TransactionRecord {
        id: TransactionId(r.get(0)?),
        user_id: UserId::new(user_id),
        amount,
        category: r.get(3)?,
        kind: r.get(4)?,
        date,
        notes: r.get(6)?,
        created_at,
    })
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self, StoreError> {
        db::init_schema(&conn)?;
        Ok(SqliteStore {
            conn,
            subscribers: Vec::new(),
            next_subscription: 1,
        })
    }

    pub fn open(path: &Path) -> AnyResult<Self> {
        let conn = db::open_or_init(path)?;
        Ok(SqliteStore::new(conn)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        SqliteStore::new(Connection::open_in_memory()?)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Push a fresh snapshot to every live subscriber of `owner`, dropping
    /// subscribers whose receiving end has gone away.
    fn publish(&mut self, owner: &UserId) {
        if !self.subscribers.iter().any(|s| &s.owner == owner) {
            return;
        }
        let snapshot = match self.snapshot(owner) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(%owner, error = %e, "could not read snapshot for subscribers");
                return;
            }
        };
        self.subscribers.retain(|s| {
            if &s.owner != owner {
                return true;
            }
            if s.tx.send(snapshot.clone()).is_ok() {
                true
            } else {
                tracing::debug!(subscription = s.id, %owner, "pruning closed subscription");
                false
            }
        });
    }
}

impl TransactionStore for SqliteStore {
    fn subscribe(&mut self, owner: &UserId) -> Result<Subscription, StoreError> {
        let (tx, rx) = mpsc::channel();
        let initial = self.snapshot(owner)?;
        // Receiver is alive, so this cannot fail.
        let _ = tx.send(initial);

        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            owner: owner.clone(),
            tx,
        });
        tracing::debug!(subscription = id, %owner, "subscribed");
        Ok(Subscription {
            id,
            owner: owner.clone(),
            rx,
        })
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscribers.retain(|s| s.id != subscription.id);
        tracing::debug!(subscription = subscription.id, "unsubscribed");
    }

    fn create(&mut self, owner: &UserId, record: NewTransaction) -> Result<TransactionId, StoreError> {
        self.conn.execute(
            "INSERT INTO transactions(user_id, amount, category, type, date, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                owner.as_str(),
                record.amount.to_string(),
                record.category,
                record.kind,
                record.date,
                record.notes,
                Utc::now(),
            ],
        )?;
        let id = TransactionId(self.conn.last_insert_rowid());
        tracing::info!(%id, %owner, amount = %record.amount, kind = %record.kind, "created transaction");
        self.publish(owner);
        Ok(id)
    }

    fn update(&mut self, owner: &UserId, id: TransactionId, patch: ValidPatch) -> Result<(), StoreError> {
        let mut current = self.get(owner, id)?;
        if patch.is_empty() {
            return Ok(());
        }
        patch.apply(&mut current);
        let changed = self.conn.execute(
            "UPDATE transactions SET amount=?1, category=?2, type=?3, date=?4, notes=?5
             WHERE id=?6 AND user_id=?7",
            params![
                current.amount.to_string(),
                current.category,
                current.kind,
                current.date,
                current.notes,
                id.0,
                owner.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::RecordNotFound(id));
        }
        tracing::info!(%id, %owner, "updated transaction");
        self.publish(owner);
        Ok(())
    }

    fn delete(&mut self, owner: &UserId, id: TransactionId) -> Result<(), StoreError> {
        let removed = self.conn.execute(
            "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
            params![id.0, owner.as_str()],
        )?;
        if removed == 0 {
            return Err(StoreError::RecordNotFound(id));
        }
        tracing::info!(%id, %owner, "deleted transaction");
        self.publish(owner);
        Ok(())
    }

    fn get(&self, owner: &UserId, id: TransactionId) -> Result<TransactionRecord, StoreError> {
        let sql = format!("{} WHERE id=?1 AND user_id=?2", SELECT_COLUMNS);
        self.conn
            .query_row(&sql, params![id.0, owner.as_str()], map_row)
            .optional()?
            .ok_or(StoreError::RecordNotFound(id))
    }

    fn snapshot(&self, owner: &UserId) -> Result<Snapshot, StoreError> {
        let sql = format!("{} WHERE user_id=?1 ORDER BY id", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![owner.as_str()], map_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        tracing::debug!(%owner, count = out.len(), "read snapshot");
        Ok(out)
    }
}
