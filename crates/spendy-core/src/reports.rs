//! Totals over the current view

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::matching;
use crate::models::Transaction;
use crate::query::QueryState;
use crate::types::TransactionType;

/// Income and expense totals of every matched record, ignoring pagination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSummary {
    pub matched: usize,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// income - expense
    pub net: Decimal,
}

pub fn summarize(records: &[Transaction], query: &QueryState) -> ViewSummary {
    let mut summary = ViewSummary::default();
    for tx in matching(records, query) {
        summary.matched += 1;
        match tx.kind {
            TransactionType::Income => summary.total_income += tx.amount,
            TransactionType::Expense => summary.total_expense += tx.amount,
        }
    }
    summary.net = summary.total_income - summary.total_expense;
    summary
}
