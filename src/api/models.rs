use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{ApiError, AppState};
use crate::model::{filter_by_suffixes, ModelEntry};

#[derive(Debug, Default, Deserialize)]
pub struct ListModelsQuery {
    /// Comma separated substrings, e.g. `-es,-fr,-zh`
    pub suffixes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModelList {
    pub object: &'static str,
    pub data: Vec<ModelEntry>,
}

/// `GET /v1/models`
pub async fn list_models(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListModelsQuery>,
) -> Json<ModelList> {
    let mut data = state.catalog.list_models();

    let suffixes = parse_suffixes(query.suffixes.as_deref());
    if !suffixes.is_empty() {
        data = filter_by_suffixes(data, &suffixes);
        debug!("Filtered model list by {:?}: {} entries", suffixes, data.len());
    }

    Json(ModelList {
        object: "list",
        data,
    })
}

/// `GET /v1/models/:id`
pub async fn get_model(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ModelEntry>, ApiError> {
    state
        .catalog
        .find(&id)
        .map(Json)
        .ok_or(ApiError::ModelNotFound(id))
}

fn parse_suffixes(raw: Option<&str>) -> Vec<&str> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
