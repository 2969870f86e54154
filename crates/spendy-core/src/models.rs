//! Core data models for the transaction store

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::TransactionType;

/// Transaction record held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier, generated by the caller
    pub id: String,
    /// Display label, never empty
    pub name: String,
    /// Non-negative magnitude; the sign lives in `kind`
    pub amount: Decimal,
    /// Counterparty or account label
    #[serde(default)]
    pub account: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Free-text category
    pub category: String,
    /// Day the money moved
    pub transaction_date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    /// Distinct labels in insertion order
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Build a record from validated form data.
    ///
    /// `created_at` and `updated_at` are both set to `now`.
    pub fn from_form(
        form: TransactionFormData,
        id: String,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        if id.trim().is_empty() {
            return Err(CoreError::validation("id", "Transaction id is required"));
        }
        form.validate()?;

        Ok(Self {
            id,
            name: form.name,
            amount: form.amount,
            account: form.account,
            kind: form.kind,
            category: form.category,
            transaction_date: form.transaction_date,
            notes: form.notes,
            tags: normalize_tags(form.tags),
            created_at: now,
            updated_at: now,
        })
    }

    /// Amount with the sign implied by the transaction type
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Case-insensitive match against name, category and tags.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        format!("{} - {} ({})", self.transaction_date, self.name, self.kind)
    }
}

/// Form submission for a new transaction: every field except id and
/// bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFormData {
    pub name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub account: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub transaction_date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TransactionFormData {
    /// Check the invariants a stored record must satisfy
    pub fn validate(&self) -> CoreResult<()> {
        validate_name(&self.name)?;
        validate_amount(self.amount)?;
        Ok(())
    }
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == TransactionPatch::default()
    }

    /// Validate only the fields this patch sets
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(ref name) = self.name {
            validate_name(name)?;
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        Ok(())
    }

    /// Merge the set fields into `tx` and stamp `updated_at`.
    ///
    /// `updated_at` becomes `max(now, updated_at)`: it advances to `now`
    /// whenever the caller's clock has moved past the last stamp, and stays
    /// put for a `now` equal to or earlier than it. It never moves backwards.
    pub fn apply(self, tx: &mut Transaction, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            tx.name = name;
        }
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        if let Some(account) = self.account {
            tx.account = account;
        }
        if let Some(kind) = self.kind {
            tx.kind = kind;
        }
        if let Some(category) = self.category {
            tx.category = category;
        }
        if let Some(date) = self.transaction_date {
            tx.transaction_date = date;
        }
        if let Some(notes) = self.notes {
            tx.notes = notes;
        }
        if let Some(tags) = self.tags {
            tx.tags = normalize_tags(tags);
        }
        tx.updated_at = now.max(tx.updated_at);
    }
}

fn validate_name(name: &str) -> CoreResult<()> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("name", "Name is required"));
    }
    Ok(())
}

fn validate_amount(amount: Decimal) -> CoreResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CoreError::validation(
            "amount",
            format!("Amount must not be negative (got {})", amount),
        ));
    }
    Ok(())
}

/// Trim tags, drop blanks and keep the first occurrence of each label
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}
