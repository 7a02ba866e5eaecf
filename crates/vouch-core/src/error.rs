use thiserror::Error;

#[derive(Debug, Error)]
pub enum VouchError {
    #[error("credential error: {0}")]
    Credential(String),

    #[error("criteria error: {0}")]
    Criteria(String),

    #[error("resolution error: {0}")]
    Resolution(String),

    #[error("key store error: {0}")]
    KeyStore(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type VouchResult<T> = Result<T, VouchError>;
