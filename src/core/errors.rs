use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the ledger, projection, and scenario layers.
///
/// Arithmetic edge cases (zero or positive burn in the runway computation)
/// are not errors; they resolve to the tagged sentinels in `core::health`.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),
    #[error("Invalid horizon: {0} day(s)")]
    InvalidHorizon(i64),
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = StdResult<T, FlowError>;

impl From<std::io::Error> for FlowError {
    fn from(err: std::io::Error) -> Self {
        FlowError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        FlowError::Storage(err.to_string())
    }
}
