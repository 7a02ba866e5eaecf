use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("position {position} out of bounds for length {len}")]
    OutOfBounds { position: usize, len: usize },

    #[error("unsupported view operation: {0}")]
    UnsupportedViewOperation(&'static str),

    #[error("uninterpretable key description: {0}")]
    Uninterpretable(String),
}

impl From<ModelError> for vouch_core::VouchError {
    fn from(e: ModelError) -> Self {
        vouch_core::VouchError::Model(e.to_string())
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
