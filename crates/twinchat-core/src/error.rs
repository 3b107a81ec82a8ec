use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Validation(String),

    #[error("Index load failed: {0}")]
    IndexLoad(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Keyword index failed: {0}")]
    Keyword(String),

    #[error("Generation failed: {0}")]
    Generation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
