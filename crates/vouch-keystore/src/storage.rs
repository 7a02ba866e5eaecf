use crate::entry::{EntryRecord, KeyStoreEntry};
use crate::error::{KeyStoreError, KeyStoreResult};
use crate::seal::{self, SealedRecord};
use crate::store::KeyStore;
use rusqlite::{params, Connection};
use std::sync::Mutex;
use vouch_core::EntityId;
use zeroize::Zeroizing;

// ---------------------------------------------------------------------------
// SqliteKeyStore — persistent backing store.
//
// The database holds only sealed blobs: every entry is AES-256-GCM
// encrypted under its password-derived key before it reaches the
// connection. Entries without a password are sealed under the empty
// password, so the on-disk shape is uniform.
// ---------------------------------------------------------------------------

pub struct SqliteKeyStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyStore {
    /// Open or create a key store database at the given path.
    pub fn open(path: &str) -> KeyStoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| KeyStoreError::Storage(format!("failed to open database: {}", e)))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS entries (
                alias TEXT PRIMARY KEY NOT NULL,
                sealed TEXT NOT NULL,
                created_at TEXT DEFAULT (datetime('now'))
            );",
        )
        .map_err(|e| KeyStoreError::Storage(format!("failed to create tables: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> KeyStoreResult<Self> {
        Self::open(":memory:")
    }

    fn lock_conn(&self) -> KeyStoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| KeyStoreError::Storage(format!("lock poisoned: {}", e)))
    }

    /// Inserts or replaces the entry for `alias`, sealed under `password`
    /// (the empty password when `None`).
    pub fn insert(
        &self,
        alias: impl Into<EntityId>,
        entry: KeyStoreEntry,
        password: Option<&str>,
    ) -> KeyStoreResult<()> {
        let record = EntryRecord::from_entry(&entry);
        let plaintext = Zeroizing::new(
            serde_json::to_vec(&record)
                .map_err(|e| KeyStoreError::Serialization(format!("serialize failed: {}", e)))?,
        );
        let sealed = seal::seal(password.unwrap_or(""), &plaintext)?;
        let sealed_json = serde_json::to_string(&sealed)
            .map_err(|e| KeyStoreError::Serialization(format!("serialize failed: {}", e)))?;

        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO entries (alias, sealed) VALUES (?1, ?2)",
            params![alias.into().as_str(), sealed_json],
        )
        .map_err(|e| KeyStoreError::Storage(format!("insert failed: {}", e)))?;
        Ok(())
    }
}

impl KeyStore for SqliteKeyStore {
    fn entry(
        &self,
        alias: &EntityId,
        password: Option<&str>,
    ) -> KeyStoreResult<Option<KeyStoreEntry>> {
        let sealed_json: Option<String> = {
            let conn = self.lock_conn()?;
            match conn.query_row(
                "SELECT sealed FROM entries WHERE alias = ?1",
                params![alias.as_str()],
                |row| row.get(0),
            ) {
                Ok(json) => Some(json),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => {
                    return Err(KeyStoreError::Storage(format!("query failed: {}", e)));
                }
            }
        };

        let Some(sealed_json) = sealed_json else {
            return Ok(None);
        };

        let sealed: SealedRecord = serde_json::from_str(&sealed_json)
            .map_err(|e| KeyStoreError::Serialization(format!("corrupted entry: {}", e)))?;
        let plaintext = seal::open(password.unwrap_or(""), &sealed)?;
        let record: EntryRecord = serde_json::from_slice(&plaintext)
            .map_err(|e| KeyStoreError::Serialization(format!("corrupted entry: {}", e)))?;
        Ok(Some(record.into_entry()))
    }

    fn contains(&self, alias: &EntityId) -> KeyStoreResult<bool> {
        let conn = self.lock_conn()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM entries WHERE alias = ?1",
                params![alias.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| KeyStoreError::Storage(format!("query failed: {}", e)))?;
        Ok(count > 0)
    }

    fn len(&self) -> KeyStoreResult<usize> {
        let conn = self.lock_conn()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .map_err(|e| KeyStoreError::Storage(format!("query failed: {}", e)))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_core::{Certificate, KeyAlgorithm, PrivateKey, PublicKey, Timestamp};

    fn cert(subject: &str) -> Certificate {
        Certificate::new(
            subject,
            "CN=ca",
            PublicKey::new(KeyAlgorithm::Ed25519, vec![1; 32]),
            Timestamp::from_seconds(4_000_000_000),
            vec![0x30],
        )
    }

    fn private_entry() -> KeyStoreEntry {
        KeyStoreEntry::PrivateKey {
            private_key: PrivateKey::new(KeyAlgorithm::Ed25519, vec![2; 32]),
            chain: vec![cert("CN=leaf"), cert("CN=ca")],
        }
    }

    #[test]
    fn test_missing_alias_is_none() {
        let store = SqliteKeyStore::in_memory().unwrap();
        assert!(store.entry(&EntityId::new("ghost"), None).unwrap().is_none());
    }

    #[test]
    fn test_insert_and_read_back() {
        let store = SqliteKeyStore::in_memory().unwrap();
        store.insert("idp1", private_entry(), Some("secret")).unwrap();

        let entry = store
            .entry(&EntityId::new("idp1"), Some("secret"))
            .unwrap()
            .unwrap();
        assert_eq!(entry, private_entry());
        assert_eq!(store.len().unwrap(), 1);
        assert!(store.contains(&EntityId::new("idp1")).unwrap());
    }

    #[test]
    fn test_wrong_password_is_access_fault() {
        let store = SqliteKeyStore::in_memory().unwrap();
        store.insert("idp1", private_entry(), Some("secret")).unwrap();

        assert!(matches!(
            store.entry(&EntityId::new("idp1"), Some("wrong")),
            Err(KeyStoreError::Access(_))
        ));
    }

    #[test]
    fn test_passwordless_entry_reads_without_password() {
        let store = SqliteKeyStore::in_memory().unwrap();
        store
            .insert("ca1", KeyStoreEntry::TrustedCertificate(cert("CN=root")), None)
            .unwrap();

        let entry = store.entry(&EntityId::new("ca1"), None).unwrap().unwrap();
        assert_eq!(entry.shape(), "trusted-certificate");
    }

    #[test]
    fn test_insert_replaces_existing_entry() {
        let store = SqliteKeyStore::in_memory().unwrap();
        let alias = EntityId::new("ca1");
        store
            .insert("ca1", KeyStoreEntry::TrustedCertificate(cert("CN=old")), None)
            .unwrap();
        store
            .insert("ca1", KeyStoreEntry::TrustedCertificate(cert("CN=new")), None)
            .unwrap();

        match store.entry(&alias, None).unwrap().unwrap() {
            KeyStoreEntry::TrustedCertificate(c) => assert_eq!(c.subject, "CN=new"),
            other => panic!("unexpected entry shape {}", other.shape()),
        }
        assert_eq!(store.len().unwrap(), 1);
    }
}
