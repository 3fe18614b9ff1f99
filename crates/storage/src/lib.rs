#![forbid(unsafe_code)]

pub mod codec;
pub mod repository;
pub mod sqlite;

pub use repository::{InMemoryStore, PersistentStore, StorageError};
pub use sqlite::{SqliteInitError, SqliteStore};
