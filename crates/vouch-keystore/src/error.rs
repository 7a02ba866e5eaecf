use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("key store is not initialized: {0}")]
    NotInitialized(String),

    #[error("required criterion missing: {0}")]
    MissingCriterion(String),

    #[error("unsupported key store entry: {0}")]
    UnsupportedEntry(String),

    #[error("access denied: {0}")]
    Access(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<KeyStoreError> for vouch_core::VouchError {
    fn from(e: KeyStoreError) -> Self {
        vouch_core::VouchError::KeyStore(e.to_string())
    }
}

pub type KeyStoreResult<T> = Result<T, KeyStoreError>;
