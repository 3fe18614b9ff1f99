//! Shared error types for the services crate.

use thiserror::Error;

use grammar_core::model::BankError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::config::ConfigError;

/// Non-fatal problems found while loading persisted banks.
///
/// The bank store falls back to the built-in bank and keeps running.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankStoreWarning {
    #[error("saved banks could not be read: {0}")]
    Unreadable(#[source] StorageError),
    #[error("saved banks are malformed: {0}")]
    Malformed(#[source] StorageError),
}

/// Errors emitted by `BankEditor`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditorError {
    #[error("the built-in bank cannot be edited")]
    DefaultBankReadOnly,
    #[error("question index {index} is out of range (draft has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("option slot {slot} is out of range")]
    OptionSlotOutOfRange { slot: usize },
    #[error("a bank must keep at least one question")]
    LastQuestion,
    #[error(transparent)]
    Invalid(#[from] BankError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
