use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// May be empty: the server still starts so the health endpoint can
    /// report the missing key instead of the process refusing to boot.
    pub gemini_api_key: String,
    pub gemini_model: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default().trim().to_string(),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }

    /// Google API keys have a stable prefix; a key failing this check
    /// is almost certainly pasted wrong. Advisory only.
    pub fn key_looks_plausible(&self) -> bool {
        self.gemini_api_key.starts_with("AIza")
    }
}
