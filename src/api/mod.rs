//! OpenAI-compatible HTTP boundary.
//!
//! - `GET  /health`
//! - `GET  /v1/models` (optional `?suffixes=-es,-fr`)
//! - `GET  /v1/models/:id`
//! - `POST /v1/audio/speech`
//!
//! Everything under `/v1` requires `Authorization: Bearer <API_KEY>` when a
//! key is configured.

mod error;
mod models;
mod speech;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::i18n::LanguageRegistry;
use crate::model::{ModelCatalog, ModelRegistry};
use crate::resolver::LanguageResolver;
use crate::security::is_authorized;
use crate::synthesis::SynthesisClient;

pub use error::ApiError;
pub use models::{ListModelsQuery, ModelList};
pub use speech::{
    ResponseFormat, SpeechRequest, MODEL_FAMILY_HEADER, RESOLVED_LANGUAGE_HEADER,
};

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub resolver: LanguageResolver<'static>,
    pub catalog: ModelCatalog<'static>,
    pub backend: Option<SynthesisClient>,
    pub api_key: Option<String>,
    pub max_input_chars: usize,
}

impl AppState {
    /// Build state over the global language and model registries.
    pub fn from_config(config: &Config) -> Result<Self> {
        let languages = LanguageRegistry::get();
        let models = ModelRegistry::get();

        let backend = match &config.synthesis_backend_url {
            Some(url) => {
                info!("Forwarding synthesis to {}", url);
                Some(SynthesisClient::new(
                    url.clone(),
                    Duration::from_secs(config.backend_timeout_secs),
                )?)
            }
            None => {
                warn!("SYNTHESIS_BACKEND_URL not set, speech requests will return 503");
                None
            }
        };

        Ok(Self {
            resolver: LanguageResolver::new(languages, models, config.default_language),
            catalog: ModelCatalog::new(languages, models),
            backend,
            api_key: config.api_key.clone(),
            max_input_chars: config.max_input_chars,
        })
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let v1 = Router::new()
        .route("/v1/models", get(models::list_models))
        .route("/v1/models/:id", get(models::get_model))
        .route("/v1/audio/speech", post(speech::create_speech))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/health", get(health))
        .merge(v1)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !is_authorized(request.headers(), state.api_key.as_deref()) {
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(request).await)
}
