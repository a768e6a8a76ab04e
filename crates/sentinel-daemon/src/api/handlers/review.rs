//! Operator action handlers: human review and account freezing.

use crate::api::state::AppState;
use crate::error::ApiResult;
use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{Map, Value};

/// Review response.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub status: &'static str,
    pub id: String,
}

/// Queue a violation for human review. Extra body fields ride along as
/// evidence when the record has to be materialized.
pub async fn send_to_review(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult<Json<ReviewResponse>> {
    let id = body.get("id").and_then(Value::as_str).unwrap_or_default();
    let outcome = state.workflow.escalate_to_human(id, &body).await?;
    Ok(Json(ReviewResponse {
        status: "queued_for_review",
        id: outcome.id,
    }))
}

/// Freeze response.
#[derive(Debug, Serialize)]
pub struct FreezeResponse {
    pub status: &'static str,
    pub account_id: String,
}

/// Freeze the account associated with a violation.
pub async fn freeze_account(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult<Json<FreezeResponse>> {
    let id = body.get("id").and_then(Value::as_str).unwrap_or_default();
    let account_id = body.get("account_id").and_then(Value::as_str);
    let outcome = state.workflow.freeze_account(id, account_id, &body).await?;
    Ok(Json(FreezeResponse {
        status: "frozen",
        account_id: outcome.account_id,
    }))
}
