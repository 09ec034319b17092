use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use leadscout_common::Config;
use leadscout_engine::{GeminiLeadSource, LeadFinder};

mod rest;

pub struct AppState {
    pub finder: LeadFinder,
    pub has_api_key: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("leadscout=info".parse()?))
        .init();

    let config = Config::from_env();
    if !config.has_api_key() {
        warn!("GEMINI_API_KEY is not set; searches will fail until it is configured");
    } else if !config.key_looks_plausible() {
        warn!("GEMINI_API_KEY does not start with 'AIza'; it may be invalid");
    }

    let source = GeminiLeadSource::from_config(&config);
    let state = Arc::new(AppState {
        finder: LeadFinder::new(Box::new(source)),
        has_api_key: config.has_api_key(),
    });

    let app = Router::new()
        .route("/api/health", get(rest::api_health))
        .route("/api/suggestions/locations", post(rest::api_suggest_locations))
        .route("/api/suggestions/niches", post(rest::api_suggest_niches))
        .route("/api/search", post(rest::api_search))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path + status + latency only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Leadscout API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
