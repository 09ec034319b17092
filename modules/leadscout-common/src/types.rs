use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::LeadscoutError;

/// One extraction request: where to look, what to look for, how many
/// leads to bring back. Immutable once a run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub location: String,
    pub niche: String,
    pub limit: usize,
}

impl SearchQuery {
    pub fn validate(&self) -> Result<(), LeadscoutError> {
        if self.location.trim().is_empty() {
            return Err(LeadscoutError::InvalidQuery(
                "location must not be empty".to_string(),
            ));
        }
        if self.niche.trim().is_empty() {
            return Err(LeadscoutError::InvalidQuery(
                "niche must not be empty".to_string(),
            ));
        }
        if self.limit == 0 {
            return Err(LeadscoutError::InvalidQuery(
                "limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// A fully normalized business lead. Every field is present: strings
/// missing upstream become "N/A", numbers become 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub profile_link: String,
    pub rating: f64,
    pub review_count: u32,
}

/// The untrusted candidate shape as the model emits it. Everything is
/// optional; numbers are decoded as f64 because the model happily
/// writes `123.0` where an integer belongs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBusiness {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub profile_link: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<f64>,
}

/// Location autocomplete entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocationSuggestion {
    pub name: String,
    pub description: String,
}

/// Progress event surfaced to the caller during a run. Percentages are
/// non-decreasing over one run and finish at exactly 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchProgress {
    pub percentage: u8,
    pub message: String,
}
