#![forbid(unsafe_code)]

pub mod app_services;
pub mod bank_store;
pub mod config;
pub mod editor;
pub mod error;
pub mod sessions;

pub use sessions as session;

pub use app_services::AppServices;
pub use bank_store::{BankStore, StoreMutation};
pub use config::{ConfigError, StoreConfig};
pub use editor::{BankEditor, QuestionPatch};
pub use error::{AppServicesError, BankStoreWarning, EditorError};

pub use sessions::{QuizPhase, QuizSession, Session, SessionBuilder, SessionProgress};
