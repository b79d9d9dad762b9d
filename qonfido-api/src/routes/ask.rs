use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    domain::qa::{AnswerPayload, SearchMode},
    AppState,
};

use super::ApiError;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(ask))
}

#[derive(Debug, Clone, Deserialize)]
struct AskRequest {
    question: String,
    /// Unknown modes fall back to semantic.
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    top_k: Option<i64>,
}

#[instrument(name = "POST /ask", skip(app_state))]
async fn ask(
    State(app_state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AnswerPayload>, ApiError> {
    let mode = request
        .mode
        .as_deref()
        .map(SearchMode::parse)
        .unwrap_or_default();

    let payload = app_state
        .qa_service()
        .answer(&request.question, request.top_k, mode)
        .await?;

    Ok(Json(payload))
}
