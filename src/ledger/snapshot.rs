use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::{FlowError, Result};

use super::transaction::{CandidateTransaction, Transaction, TransactionDraft, TransactionStatus};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// The in-memory ledger: a reference balance plus every known movement.
///
/// Transactions keep insertion order; the projector's day walk turns that
/// into date-ascending processing with insertion-order ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub current_balance: f64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default = "LedgerSnapshot::schema_version_default")]
    pub schema_version: u8,
}

impl Default for LedgerSnapshot {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl LedgerSnapshot {
    pub fn new(current_balance: f64) -> Self {
        Self {
            current_balance,
            transactions: Vec::new(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Validates the draft, assigns a fresh id, and appends the entry.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction> {
        let txn = Transaction::try_new(draft)?;
        self.transactions.push(txn.clone());
        Ok(txn)
    }

    /// Replaces the whole record identified by `id`, keeping its id and
    /// insertion position.
    pub fn edit_transaction(&mut self, id: Uuid, draft: TransactionDraft) -> Result<Transaction> {
        let replacement = Transaction::from_draft(id, draft)?;
        let slot = self
            .transactions
            .iter_mut()
            .find(|txn| txn.id == id)
            .ok_or(FlowError::NotFound(id))?;
        *slot = replacement.clone();
        Ok(replacement)
    }

    /// Removes and returns the entry identified by `id`. Deleting an unknown
    /// id is an error, so a repeated delete fails.
    pub fn delete_transaction(&mut self, id: Uuid) -> Result<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or(FlowError::NotFound(id))?;
        Ok(self.transactions.remove(index))
    }

    pub fn set_current_balance(&mut self, value: f64) {
        self.current_balance = value;
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Merges ingested candidates with boundary defaults applied. Every
    /// candidate is validated before any is inserted, so a bad batch leaves
    /// the ledger untouched.
    pub fn absorb_candidates(
        &mut self,
        candidates: Vec<CandidateTransaction>,
    ) -> Result<Vec<Uuid>> {
        let mut minted = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            minted.push(Transaction::try_new(candidate.into_draft())?);
        }
        let ids = minted.iter().map(|txn| txn.id).collect();
        self.transactions.extend(minted);
        Ok(ids)
    }

    /// Pending inflows dated before `today`: payments that should have
    /// arrived already.
    pub fn overdue_payments(&self, today: NaiveDate) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| {
                txn.status == TransactionStatus::Pending && txn.amount > 0.0 && txn.date < today
            })
            .collect()
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
