//! REST + SSE handlers for the UI-facing surface.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

use leadscout_common::{Business, LocationSuggestion, SearchProgress, SearchQuery};
use leadscout_engine::SearchObserver;

use crate::AppState;

// --- Health ---

pub async fn api_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(health_payload(state.has_api_key))
}

fn health_payload(has_api_key: bool) -> serde_json::Value {
    if has_api_key {
        serde_json::json!({ "status": "ok", "message": "Server is ready" })
    } else {
        serde_json::json!({
            "status": "error",
            "message": "GEMINI_API_KEY is missing in server environment."
        })
    }
}

// --- Suggestions ---

#[derive(Deserialize)]
pub struct SuggestRequest {
    input: String,
}

pub async fn api_suggest_locations(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SuggestRequest>,
) -> Json<Vec<LocationSuggestion>> {
    Json(state.finder.suggest_locations(&body.input).await)
}

pub async fn api_suggest_niches(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SuggestRequest>,
) -> Json<Vec<String>> {
    Json(state.finder.suggest_niches(&body.input).await)
}

// --- Search (SSE) ---

#[derive(Deserialize)]
pub struct SearchRequest {
    pub location: String,
    pub niche: String,
    pub limit: usize,
}

/// One wire event of the search stream.
enum SearchEvent {
    Progress(SearchProgress),
    Results(Vec<Business>),
    Complete(Vec<Business>),
    Error { message: String },
}

impl SearchEvent {
    fn into_sse(self) -> Event {
        match self {
            SearchEvent::Progress(progress) => sse_event("progress", &progress),
            SearchEvent::Results(records) => sse_event("results", &records),
            SearchEvent::Complete(leads) => sse_event("complete", &leads),
            SearchEvent::Error { message } => {
                sse_event("error", &serde_json::json!({ "message": message }))
            }
        }
    }
}

fn sse_event(name: &str, payload: &impl Serialize) -> Event {
    match serde_json::to_string(payload) {
        Ok(json) => Event::default().event(name).data(json),
        Err(e) => {
            warn!(error = %e, event = name, "Failed to serialize SSE payload");
            Event::default()
                .event("error")
                .data(r#"{"message":"internal serialization failure"}"#)
        }
    }
}

/// Observer that forwards run callbacks into the SSE channel. Send
/// failures mean the client hung up; the run finishes regardless.
struct ChannelObserver {
    tx: mpsc::UnboundedSender<SearchEvent>,
}

impl SearchObserver for ChannelObserver {
    fn on_progress(&self, progress: &SearchProgress) {
        let _ = self.tx.send(SearchEvent::Progress(progress.clone()));
    }

    fn on_partial_results(&self, records: &[Business]) {
        let _ = self.tx.send(SearchEvent::Results(records.to_vec()));
    }
}

pub async fn api_search(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchRequest>,
) -> Result<
    Sse<impl Stream<Item = Result<Event, Infallible>>>,
    (StatusCode, Json<serde_json::Value>),
> {
    let query = SearchQuery {
        location: body.location,
        niche: body.niche,
        limit: body.limit,
    };
    if let Err(e) = query.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": e.to_string() })),
        ));
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<SearchEvent>();

    tokio::spawn(async move {
        let observer = ChannelObserver { tx: tx.clone() };
        match state.finder.run(&query, &observer).await {
            Ok(leads) => {
                let _ = tx.send(SearchEvent::Complete(leads));
            }
            Err(e) => {
                warn!(error = %e, "Search run failed");
                let _ = tx.send(SearchEvent::Error {
                    message: e.to_string(),
                });
            }
        }
        // tx drops here, ending the stream below.
    });

    let stream = async_stream::stream! {
        while let Some(event) = rx.recv().await {
            yield Ok(event.into_sse());
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use leadscout_engine::{GeminiLeadSource, LeadFinder};

    use super::*;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            finder: LeadFinder::new(Box::new(GeminiLeadSource::new("", "gemini-2.5-flash"))),
            has_api_key: false,
        })
    }

    #[test]
    fn health_payload_reflects_key_presence() {
        assert_eq!(health_payload(true)["status"], "ok");
        let missing = health_payload(false);
        assert_eq!(missing["status"], "error");
        assert!(missing["message"]
            .as_str()
            .unwrap()
            .contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn invalid_search_is_rejected_before_streaming() {
        let result = api_search(
            State(test_state()),
            Json(SearchRequest {
                location: "  ".into(),
                niche: "Bakery".into(),
                limit: 10,
            }),
        )
        .await;
        let Err((status, _)) = result else {
            panic!("blank location was accepted");
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let result = api_search(
            State(test_state()),
            Json(SearchRequest {
                location: "Paris".into(),
                niche: "Bakery".into(),
                limit: 0,
            }),
        )
        .await;
        assert!(result.is_err());
    }
}
