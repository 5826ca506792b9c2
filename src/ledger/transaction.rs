use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::{FlowError, Result};

/// Lifecycle state of a ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Confirmed,
    Pending,
    Projected,
}

/// A single money movement. Positive amounts are inflows, negative amounts
/// are outflows; `category` and `description` are opaque to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: f64,
    pub status: TransactionStatus,
    pub probability: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// Caller-supplied fields for creating or replacing a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub amount: f64,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// Raw candidate supplied by the document-ingestion collaborator. Carries no
/// id or status; those are assigned on insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateTransaction {
    pub date: NaiveDate,
    pub amount: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

impl Transaction {
    /// Validates a draft and mints a new transaction with a fresh id.
    pub fn try_new(draft: TransactionDraft) -> Result<Self> {
        Self::from_draft(Uuid::new_v4(), draft)
    }

    /// Validates a draft against an existing id; used for whole-record edits.
    pub fn from_draft(id: Uuid, draft: TransactionDraft) -> Result<Self> {
        if !draft.amount.is_finite() {
            return Err(FlowError::InvalidTransaction(
                "amount must be a finite number".into(),
            ));
        }
        let probability = resolve_probability(draft.status, draft.probability)?;
        Ok(Self {
            id,
            date: draft.date,
            amount: draft.amount,
            status: draft.status,
            probability,
            category: draft.category,
            description: draft.description,
        })
    }

    /// Probability-weighted value this entry contributes to a projection.
    pub fn expected_amount(&self) -> f64 {
        self.amount * self.probability
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.status, TransactionStatus::Confirmed)
    }
}

impl CandidateTransaction {
    /// Applies the ingestion-boundary defaults: pending status and certain
    /// probability unless the candidate carries overrides.
    pub fn into_draft(self) -> TransactionDraft {
        TransactionDraft {
            date: self.date,
            amount: self.amount,
            status: TransactionStatus::Pending,
            probability: self.probability,
            category: self.category.unwrap_or_default(),
            description: self.description,
        }
    }
}

fn resolve_probability(status: TransactionStatus, supplied: Option<f64>) -> Result<f64> {
    let probability = match (status, supplied) {
        (TransactionStatus::Confirmed, None) => 1.0,
        (TransactionStatus::Confirmed, Some(value)) => {
            if !value.is_finite() || (value - 1.0).abs() > f64::EPSILON {
                return Err(FlowError::InvalidTransaction(
                    "confirmed transactions are fixed at probability 1.0".into(),
                ));
            }
            1.0
        }
        (TransactionStatus::Pending, None) => 1.0,
        (TransactionStatus::Projected, None) => {
            return Err(FlowError::InvalidTransaction(
                "projected transactions require an explicit probability".into(),
            ));
        }
        (_, Some(value)) => value,
    };
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(FlowError::InvalidTransaction(format!(
            "probability {} is outside [0, 1]",
            probability
        )));
    }
    Ok(probability)
}
