pub mod json_backend;

use crate::core::errors::Result;
use crate::ledger::LedgerSnapshot;

/// Abstraction over persistence backends capable of storing the ledger
/// snapshot. The engine itself only ever operates on in-memory state.
pub trait StorageBackend: Send + Sync {
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<()>;
    fn load(&self) -> Result<LedgerSnapshot>;
    fn exists(&self) -> bool;
}

pub use json_backend::JsonStorage;
