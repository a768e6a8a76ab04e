//! Violation queue handlers.

use crate::api::state::AppState;
use crate::error::ApiResult;
use axum::{extract::State, Json};
use sentinel_core::Violation;
use serde::Serialize;
use serde_json::{Map, Value};

/// The queue of flagged transactions pending review, in arrival order.
pub async fn list_violations(State(state): State<AppState>) -> Json<Vec<Violation>> {
    Json(state.workflow.list_active().await)
}

/// Resolve response.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub status: &'static str,
}

/// Clear a violation from the review queue. Resolving an identifier that is
/// already gone succeeds; only a missing identifier is rejected.
pub async fn resolve_violation(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult<Json<ResolveResponse>> {
    let id = body.get("id").and_then(Value::as_str).unwrap_or_default();
    state.workflow.resolve(id).await?;
    Ok(Json(ResolveResponse { status: "resolved" }))
}
