use thiserror::Error;

use crate::store::CounterId;

pub type Result<T> = std::result::Result<T, CounterError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    /// Stored counter data is missing or cannot be parsed.
    #[error("Failed to read stored counters: {0}")]
    StorageRead(String),

    /// Raw counter data violates the store invariants.
    #[error("Corrupt counter store: {0}")]
    CorruptStore(String),

    /// A form field did not contain a usable integer.
    #[error("Invalid value for '{field}': {value:?}")]
    InvalidInput { field: &'static str, value: String },

    #[error("Counter {0} does not exist")]
    InvalidReference(CounterId),
}
