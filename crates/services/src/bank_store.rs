use std::fmt;
use std::sync::Arc;

use grammar_core::default_bank;
use grammar_core::model::{BankId, QuestionBank};
use storage::codec::{decode_banks, encode_banks};
use storage::repository::{PersistentStore, StorageError};

use crate::error::BankStoreWarning;

/// Outcome of a bank mutation.
#[derive(Debug)]
#[must_use]
pub enum StoreMutation {
    /// Applied in memory and written to the persistent store.
    Saved,
    /// Applied in memory, but the write failed. In-memory state stays
    /// authoritative for the rest of the process.
    Unsaved(StorageError),
    /// Not applied: the target was the built-in bank or did not exist.
    Rejected,
}

impl StoreMutation {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, StoreMutation::Rejected)
    }

    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, StoreMutation::Saved)
    }

    /// The persistence failure, if the mutation was applied but not saved.
    #[must_use]
    pub fn save_error(&self) -> Option<&StorageError> {
        match self {
            StoreMutation::Unsaved(err) => Some(err),
            _ => None,
        }
    }
}

/// Owns the set of question banks.
///
/// The built-in bank always sits at index 0 and is never replaced or removed.
/// Custom banks follow in insertion order and are written back as a whole on
/// every mutation.
pub struct BankStore {
    banks: Vec<QuestionBank>,
    store: Arc<dyn PersistentStore>,
    load_warning: Option<BankStoreWarning>,
}

impl BankStore {
    /// Build the bank set from the built-in bank plus whatever `store` holds.
    ///
    /// Never fails: unreadable or malformed data is logged, recorded as
    /// [`BankStore::load_warning`], and only the built-in bank is kept.
    pub async fn initialize(store: Arc<dyn PersistentStore>) -> Self {
        let mut banks = vec![default_bank()];
        let mut load_warning = None;

        match store.load().await {
            Ok(None) => log::info!("no saved banks; starting with the built-in bank"),
            Ok(Some(bytes)) => match decode_banks(&bytes) {
                Ok(custom) => {
                    log::info!("loaded {} saved bank(s)", custom.len());
                    banks.extend(custom);
                }
                Err(err) => {
                    log::warn!("ignoring malformed saved banks: {err}");
                    load_warning = Some(BankStoreWarning::Malformed(err));
                }
            },
            Err(err) => {
                log::warn!("could not read saved banks: {err}");
                load_warning = Some(BankStoreWarning::Unreadable(err));
            }
        }

        Self {
            banks,
            store,
            load_warning,
        }
    }

    /// Problem found while loading, if any.
    #[must_use]
    pub fn load_warning(&self) -> Option<&BankStoreWarning> {
        self.load_warning.as_ref()
    }

    /// All banks, built-in first.
    #[must_use]
    pub fn list(&self) -> &[QuestionBank] {
        &self.banks
    }

    /// Banks created by the user, in insertion order.
    #[must_use]
    pub fn custom_banks(&self) -> &[QuestionBank] {
        &self.banks[1..]
    }

    #[must_use]
    pub fn default_bank(&self) -> &QuestionBank {
        &self.banks[0]
    }

    /// Bank with the given id, falling back to the built-in bank.
    #[must_use]
    pub fn get(&self, id: &BankId) -> &QuestionBank {
        self.banks
            .iter()
            .find(|bank| bank.id() == id)
            .unwrap_or_else(|| self.default_bank())
    }

    #[must_use]
    pub fn contains(&self, id: &BankId) -> bool {
        self.banks.iter().any(|bank| bank.id() == id)
    }

    fn position(&self, id: &BankId) -> Option<usize> {
        self.banks.iter().position(|bank| bank.id() == id)
    }

    /// Replace a custom bank in place, or append it if new.
    pub async fn upsert(&mut self, bank: QuestionBank) -> StoreMutation {
        if bank.is_default() {
            log::warn!("refusing to overwrite the built-in bank");
            return StoreMutation::Rejected;
        }

        match self.position(bank.id()) {
            Some(index) => {
                log::debug!("replacing bank {} at position {index}", bank.id());
                self.banks[index] = bank;
            }
            None => {
                log::debug!("adding bank {}", bank.id());
                self.banks.push(bank);
            }
        }
        self.persist().await
    }

    /// Delete a custom bank. The built-in bank and unknown ids are ignored.
    pub async fn remove(&mut self, id: &BankId) -> StoreMutation {
        if id.is_default() {
            log::warn!("refusing to remove the built-in bank");
            return StoreMutation::Rejected;
        }
        let Some(index) = self.position(id) else {
            log::debug!("remove: no bank with id {id}");
            return StoreMutation::Rejected;
        };

        self.banks.remove(index);
        self.persist().await
    }

    async fn persist(&self) -> StoreMutation {
        let result = match encode_banks(self.custom_banks()) {
            Ok(bytes) => self.store.save(&bytes).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => StoreMutation::Saved,
            Err(err) => {
                log::warn!("bank changes kept in memory only: {err}");
                StoreMutation::Unsaved(err)
            }
        }
    }
}

impl fmt::Debug for BankStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BankStore")
            .field("banks_len", &self.banks.len())
            .field("load_warning", &self.load_warning)
            .finish_non_exhaustive()
    }
}
