//! Canonical in-memory transaction collection
//!
//! Records are kept most-recent-first: `create` inserts at the head, and that
//! order is the tie-break for every sort.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::models::{Transaction, TransactionFormData, TransactionPatch};
use crate::observer::{Listeners, SubscriptionId};

/// Committed change to the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum StoreEvent {
    Replaced { count: usize },
    Created { id: String },
    Updated { id: String },
    Deleted { id: String },
}

/// Owns the transactions; all writes go through here
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Transaction>,
    listeners: Listeners<StoreEvent>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in collection order
    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.records.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Overwrite the collection wholesale, keeping the given order
    pub fn replace_all(&mut self, records: Vec<Transaction>) {
        info!("Replacing transaction collection with {} records", records.len());
        self.records = records;
        let count = self.records.len();
        self.listeners.notify(&StoreEvent::Replaced { count });
    }

    /// Validate and insert a new record at the head of the collection
    pub fn create(
        &mut self,
        form: TransactionFormData,
        id: String,
        now: DateTime<Utc>,
    ) -> CoreResult<&Transaction> {
        if self.contains(&id) {
            warn!("Rejected transaction with duplicate id {}", id);
            return Err(CoreError::DuplicateEntry { id });
        }

        let tx = Transaction::from_form(form, id, now).map_err(|e| {
            warn!("Rejected transaction: {}", e);
            e
        })?;
        debug!("Created transaction {}", tx.summary());

        let id = tx.id.clone();
        self.records.insert(0, tx);
        self.listeners.notify(&StoreEvent::Created { id });
        Ok(&self.records[0])
    }

    /// Merge `patch` into the record with `id`.
    ///
    /// Returns `Ok(false)` without touching anything when the id is absent.
    pub fn update(
        &mut self,
        id: &str,
        patch: TransactionPatch,
        now: DateTime<Utc>,
    ) -> CoreResult<bool> {
        let Some(pos) = self.position(id) else {
            debug!("Update ignored, no transaction with id {}", id);
            return Ok(false);
        };
        patch.validate()?;

        patch.apply(&mut self.records[pos], now);
        self.listeners.notify(&StoreEvent::Updated { id: id.to_string() });
        Ok(true)
    }

    /// Remove the record with `id`, returning it; `None` if absent
    pub fn delete(&mut self, id: &str) -> Option<Transaction> {
        let Some(pos) = self.position(id) else {
            debug!("Delete ignored, no transaction with id {}", id);
            return None;
        };

        let removed = self.records.remove(pos);
        self.listeners.notify(&StoreEvent::Deleted { id: removed.id.clone() });
        Some(removed)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|t| t.id == id)
    }
}
