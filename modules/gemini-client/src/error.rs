use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeminiError>;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Gemini returned no text content")]
    EmptyResponse,
}

impl GeminiError {
    /// Whether this error is a quota/rate-limit signal. The API usually
    /// answers with HTTP 429, but quota errors also show up embedded in
    /// error bodies as RESOURCE_EXHAUSTED.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            GeminiError::Api { status, message } => {
                *status == 429
                    || message.contains("RESOURCE_EXHAUSTED")
                    || message.contains("429")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        GeminiError::Network(err.to_string())
    }
}
