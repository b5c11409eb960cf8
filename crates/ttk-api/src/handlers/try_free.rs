//! Anonymous try-for-free handler.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use ttk_models::ScriptRecord;

use crate::client::ClientContext;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TryFreeRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct TryFreeResponse {
    pub video_id: String,
    pub scripts: Vec<ScriptRecord>,
}

/// POST /api/try
pub async fn try_for_free(
    State(state): State<AppState>,
    client: ClientContext,
    Json(request): Json<TryFreeRequest>,
) -> ApiResult<Json<TryFreeResponse>> {
    let outcome = state.projects.try_for_free(&client, &request.url).await?;

    Ok(Json(TryFreeResponse {
        video_id: outcome.video_id,
        scripts: outcome.scripts.into_records(),
    }))
}
