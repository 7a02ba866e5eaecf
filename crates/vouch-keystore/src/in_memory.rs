use crate::entry::KeyStoreEntry;
use crate::error::{KeyStoreError, KeyStoreResult};
use crate::store::KeyStore;
use std::collections::HashMap;
use std::sync::Mutex;
use subtle::ConstantTimeEq;
use vouch_core::EntityId;

// ---------------------------------------------------------------------------
// MemoryKeyStore — in-memory backing store.
//
// Entries are optionally password-protected; the password check is
// constant-time. Useful for tests and for deployments that load key
// material from elsewhere at startup.
// ---------------------------------------------------------------------------

struct Protected {
    entry: KeyStoreEntry,
    password: Option<String>,
}

pub struct MemoryKeyStore {
    entries: Mutex<HashMap<String, Protected>>,
}

fn lock_entries(
    mutex: &Mutex<HashMap<String, Protected>>,
) -> KeyStoreResult<std::sync::MutexGuard<'_, HashMap<String, Protected>>> {
    mutex
        .lock()
        .map_err(|e| KeyStoreError::Storage(format!("lock poisoned: {}", e)))
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Inserts or replaces the entry for `alias`. A `Some` password
    /// protects the entry; `None` leaves it openly readable.
    pub fn insert(
        &self,
        alias: impl Into<EntityId>,
        entry: KeyStoreEntry,
        password: Option<&str>,
    ) -> KeyStoreResult<()> {
        let mut entries = lock_entries(&self.entries)?;
        entries.insert(
            alias.into().0,
            Protected {
                entry,
                password: password.map(str::to_string),
            },
        );
        Ok(())
    }

    pub fn remove(&self, alias: &EntityId) -> KeyStoreResult<bool> {
        let mut entries = lock_entries(&self.entries)?;
        Ok(entries.remove(alias.as_str()).is_some())
    }
}

impl Default for MemoryKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStore for MemoryKeyStore {
    fn entry(
        &self,
        alias: &EntityId,
        password: Option<&str>,
    ) -> KeyStoreResult<Option<KeyStoreEntry>> {
        let entries = lock_entries(&self.entries)?;
        let Some(protected) = entries.get(alias.as_str()) else {
            return Ok(None);
        };

        match (&protected.password, password) {
            // unprotected entries ignore any supplied password
            (None, _) => Ok(Some(protected.entry.clone())),
            (Some(expected), Some(supplied)) => {
                if bool::from(expected.as_bytes().ct_eq(supplied.as_bytes())) {
                    Ok(Some(protected.entry.clone()))
                } else {
                    Err(KeyStoreError::Access(format!(
                        "wrong password for alias {}",
                        alias
                    )))
                }
            }
            (Some(_), None) => Err(KeyStoreError::Access(format!(
                "password required for alias {}",
                alias
            ))),
        }
    }

    fn contains(&self, alias: &EntityId) -> KeyStoreResult<bool> {
        let entries = lock_entries(&self.entries)?;
        Ok(entries.contains_key(alias.as_str()))
    }

    fn len(&self) -> KeyStoreResult<usize> {
        let entries = lock_entries(&self.entries)?;
        Ok(entries.len())
    }
}
