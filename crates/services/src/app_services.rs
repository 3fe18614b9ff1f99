use std::sync::Arc;

use grammar_core::model::BankId;
use storage::repository::PersistentStore;
use storage::sqlite::SqliteStore;

use crate::bank_store::BankStore;
use crate::config::StoreConfig;
use crate::error::AppServicesError;
use crate::sessions::QuizSession;

/// Assembles the bank store and hands out quiz sessions.
#[derive(Debug)]
pub struct AppServices {
    banks: BankStore,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database file cannot be prepared or
    /// the connection or migrations fail. Unreadable bank data is not an
    /// error; see [`BankStore::load_warning`].
    pub async fn new_sqlite(config: &StoreConfig) -> Result<Self, AppServicesError> {
        config.prepare()?;
        let store = SqliteStore::open(&config.db_url)
            .await?
            .with_key(config.storage_key.clone());
        log::info!(
            "opened bank storage at {} (key {})",
            config.db_url,
            config.storage_key
        );
        Ok(Self::with_store(Arc::new(store)).await)
    }

    /// Build services on top of any persistent store.
    pub async fn with_store(store: Arc<dyn PersistentStore>) -> Self {
        Self {
            banks: BankStore::initialize(store).await,
        }
    }

    #[must_use]
    pub fn bank_store(&self) -> &BankStore {
        &self.banks
    }

    pub fn bank_store_mut(&mut self) -> &mut BankStore {
        &mut self.banks
    }

    /// Starts a freshly shuffled quiz over the given bank.
    #[must_use]
    pub fn start_session(&self, bank_id: &BankId) -> QuizSession {
        QuizSession::start(&self.banks, bank_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryStore;

    #[tokio::test]
    async fn with_store_starts_sessions_on_default_bank() {
        let services = AppServices::with_store(Arc::new(InMemoryStore::new())).await;
        assert_eq!(services.bank_store().list().len(), 1);

        let quiz = services.start_session(&BankId::default_bank());
        assert_eq!(quiz.total(), 5);
        assert!(quiz.bank_id().is_default());
    }

    #[tokio::test]
    async fn new_sqlite_opens_in_memory_database() {
        let config = StoreConfig {
            db_url: "sqlite:file:memdb_app_services?mode=memory&cache=shared".into(),
            storage_key: "app_services_test".into(),
        };
        let services = AppServices::new_sqlite(&config).await.unwrap();
        assert!(services.bank_store().load_warning().is_none());
        assert_eq!(services.bank_store().custom_banks().len(), 0);
    }
}
