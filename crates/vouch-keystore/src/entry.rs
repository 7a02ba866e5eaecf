use vouch_core::{Certificate, PrivateKey, SecretKey};

// ---------------------------------------------------------------------------
// KeyStoreEntry — the tagged shapes a backing store can hold.
//
// The resolver switches on the tag exhaustively; secret-key entries are the
// shape it rejects as unsupported.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStoreEntry {
    /// A private key with its leaf-first certificate chain. The leaf
    /// certificate is the entry's accompanying certificate.
    PrivateKey {
        private_key: PrivateKey,
        chain: Vec<Certificate>,
    },
    /// A certificate trusted on its own, without a private key.
    TrustedCertificate(Certificate),
    /// A symmetric key.
    SecretKey(SecretKey),
}

impl KeyStoreEntry {
    pub fn shape(&self) -> &'static str {
        match self {
            KeyStoreEntry::PrivateKey { .. } => "private-key",
            KeyStoreEntry::TrustedCertificate(_) => "trusted-certificate",
            KeyStoreEntry::SecretKey(_) => "secret-key",
        }
    }
}

// ---------------------------------------------------------------------------
// EntryRecord — serializable mirror of KeyStoreEntry for sealed storage.
//
// Sensitive key types deliberately have no serde impls; this record is the
// only form in which their bytes are serialized, it exists only inside a
// sealed envelope, and it zeroizes its buffers on drop.
// ---------------------------------------------------------------------------

#[cfg(any(feature = "sqlite", test))]
#[derive(serde::Serialize, serde::Deserialize)]
pub(crate) enum EntryRecord {
    PrivateKey {
        algorithm: vouch_core::KeyAlgorithm,
        key: Vec<u8>,
        chain: Vec<Certificate>,
    },
    TrustedCertificate(Certificate),
    SecretKey {
        algorithm: vouch_core::KeyAlgorithm,
        key: Vec<u8>,
    },
}

#[cfg(any(feature = "sqlite", test))]
impl EntryRecord {
    pub(crate) fn from_entry(entry: &KeyStoreEntry) -> Self {
        match entry {
            KeyStoreEntry::PrivateKey { private_key, chain } => EntryRecord::PrivateKey {
                algorithm: private_key.algorithm(),
                key: private_key.bytes().to_vec(),
                chain: chain.clone(),
            },
            KeyStoreEntry::TrustedCertificate(cert) => {
                EntryRecord::TrustedCertificate(cert.clone())
            }
            KeyStoreEntry::SecretKey(key) => EntryRecord::SecretKey {
                algorithm: key.algorithm(),
                key: key.bytes().to_vec(),
            },
        }
    }

    pub(crate) fn into_entry(mut self) -> KeyStoreEntry {
        match &mut self {
            EntryRecord::PrivateKey {
                algorithm,
                key,
                chain,
            } => KeyStoreEntry::PrivateKey {
                private_key: PrivateKey::new(*algorithm, std::mem::take(key)),
                chain: std::mem::take(chain),
            },
            // not sensitive, a clone is fine
            EntryRecord::TrustedCertificate(cert) => {
                KeyStoreEntry::TrustedCertificate(cert.clone())
            }
            EntryRecord::SecretKey { algorithm, key } => {
                KeyStoreEntry::SecretKey(SecretKey::new(*algorithm, std::mem::take(key)))
            }
        }
    }
}

#[cfg(any(feature = "sqlite", test))]
impl Drop for EntryRecord {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        match self {
            EntryRecord::PrivateKey { key, .. } | EntryRecord::SecretKey { key, .. } => {
                key.zeroize();
            }
            EntryRecord::TrustedCertificate(_) => {}
        }
    }
}
