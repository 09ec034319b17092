use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadscoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
