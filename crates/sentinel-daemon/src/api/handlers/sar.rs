//! SAR document handler.

use crate::api::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::body::Body;
use axum::http::{header, HeaderValue};
use axum::response::Response;
use axum::{extract::State, Json};
use sentinel_core::Violation;

/// Generate a formal SAR PDF for a violation record.
///
/// The record comes from the request body (live queue records and
/// client-held copies are both accepted); the response is the rendered
/// document as an attachment. Pipeline failures surface as a 500 with the
/// failing stage in the detail, and never a partial document.
pub async fn generate_sar(
    State(state): State<AppState>,
    Json(violation): Json<Violation>,
) -> ApiResult<Response> {
    let document = state.pipeline.generate(&violation).await?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename={}",
        document.filename()
    ))
    .map_err(|e| ApiError::Internal(format!("invalid attachment name: {e}")))?;

    let mut response = Response::new(Body::from(document.bytes));
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, disposition);

    Ok(response)
}
