//! Gemini-backed [`LeadSource`]: grounded extraction calls and
//! schema-constrained autocomplete lookups.

use async_trait::async_trait;
use schemars::schema_for;
use tracing::debug;

use gemini_client::{Gemini, GeminiError};
use leadscout_common::{Config, LocationSuggestion, SearchQuery};

use crate::traits::{LeadSource, SourceError, SourceResult};

/// Upper bound on autocomplete entries per lookup.
const MAX_SUGGESTIONS: usize = 5;

const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are a lead-generation assistant with access to live Google Maps data.

Given a location and a business niche, return real businesses currently listed in that area.

## Output format
Respond with a JSON array and nothing else. Each element:
{"name": string, "address": string, "phone": string, "website": string, "profileLink": string, "rating": number, "reviewCount": number}

## Rules
- Only real, currently operating businesses from the maps data. Never invent entries.
- profileLink is the business's Google Maps listing URL.
- Use "N/A" for string fields you cannot determine; never omit a key.
- rating is the average star rating (0 if unknown), reviewCount the number of reviews (0 if unknown).
- Do not list the same business twice."#;

pub struct GeminiLeadSource {
    gemini: Gemini,
}

impl GeminiLeadSource {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            gemini: Gemini::new(api_key, model),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.gemini_api_key, &config.gemini_model)
    }
}

#[async_trait]
impl LeadSource for GeminiLeadSource {
    async fn fetch_batch(
        &self,
        query: &SearchQuery,
        batch_index: usize,
        target_count: usize,
    ) -> SourceResult<String> {
        let user_prompt = format!(
            "Find exactly {target_count} unique \"{niche}\" businesses in \"{location}\".\n\
             This is request #{n} of a larger search; draw from a different part of the area \
             or a different sub-category than the other requests, so the combined results \
             overlap as little as possible.",
            niche = query.niche,
            location = query.location,
            n = batch_index + 1,
        );

        debug!(batch = batch_index, target_count, "Gemini extraction request");

        self.gemini
            .generate_grounded(EXTRACTION_SYSTEM_PROMPT, user_prompt)
            .await
            .map_err(map_gemini_error)
    }

    async fn suggest_locations(&self, input: &str) -> SourceResult<Vec<LocationSuggestion>> {
        let schema = serde_json::to_value(schema_for!(Vec<LocationSuggestion>))
            .map_err(|e| SourceError::Failed(e.to_string()))?;
        let prompt = format!(
            "Suggest up to {MAX_SUGGESTIONS} real-world locations (cities, districts or regions) \
             whose name starts with or closely matches \"{input}\". \
             name is the short place name; description disambiguates it (region, country)."
        );

        let text = self
            .gemini
            .generate_json(prompt, schema)
            .await
            .map_err(map_gemini_error)?;

        let mut suggestions: Vec<LocationSuggestion> =
            serde_json::from_str(gemini_client::util::strip_code_blocks(&text))
                .map_err(|e| SourceError::Failed(format!("suggestion decode failed: {e}")))?;
        suggestions.truncate(MAX_SUGGESTIONS);
        Ok(suggestions)
    }

    async fn suggest_niches(&self, input: &str) -> SourceResult<Vec<String>> {
        let schema = serde_json::to_value(schema_for!(Vec<String>))
            .map_err(|e| SourceError::Failed(e.to_string()))?;
        let prompt = format!(
            "Suggest up to {MAX_SUGGESTIONS} business niches or categories matching \"{input}\" \
             (e.g. \"Bakery\", \"Dental Clinic\"). Return an array of short strings."
        );

        let text = self
            .gemini
            .generate_json(prompt, schema)
            .await
            .map_err(map_gemini_error)?;

        let mut suggestions: Vec<String> =
            serde_json::from_str(gemini_client::util::strip_code_blocks(&text))
                .map_err(|e| SourceError::Failed(format!("suggestion decode failed: {e}")))?;
        suggestions.truncate(MAX_SUGGESTIONS);
        Ok(suggestions)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

fn map_gemini_error(err: GeminiError) -> SourceError {
    if err.is_rate_limited() {
        SourceError::RateLimited
    } else {
        SourceError::Failed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_api_errors_are_classified() {
        let err = GeminiError::Api {
            status: 429,
            message: "quota".into(),
        };
        assert!(matches!(map_gemini_error(err), SourceError::RateLimited));
    }

    #[test]
    fn other_errors_are_transient_failures() {
        let err = GeminiError::Network("connection reset".into());
        assert!(matches!(map_gemini_error(err), SourceError::Failed(_)));

        let err = GeminiError::EmptyResponse;
        assert!(matches!(map_gemini_error(err), SourceError::Failed(_)));
    }
}
