pub mod snapshot;
pub mod transaction;

pub use snapshot::{LedgerSnapshot, CURRENT_SCHEMA_VERSION};
pub use transaction::{CandidateTransaction, Transaction, TransactionDraft, TransactionStatus};
