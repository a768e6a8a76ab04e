//! API router configuration.

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the gateway router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Scanning
        .route("/scan", get(handlers::scan_stream))
        // Review queue
        .route("/violations", get(handlers::list_violations))
        .route("/resolve", post(handlers::resolve_violation))
        .route("/review", post(handlers::send_to_review))
        .route("/freeze", post(handlers::freeze_account))
        // Reporting
        .route("/sar", post(handlers::generate_sar))
        // Health and status
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::daemon_status))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use sentinel_adapters::{PdfReportRenderer, ReplayScanFeed, TemplateNarrativeGenerator};
    use sentinel_core::{NarrativeGenerator, ReviewWorkflow, SarPipeline};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(ReviewWorkflow::new()),
            Arc::new(SarPipeline::new(
                Arc::new(TemplateNarrativeGenerator),
                Arc::new(PdfReportRenderer::default()),
            )),
            Arc::new(ReplayScanFeed::sample(Duration::ZERO)),
        )
    }

    fn test_router() -> Router {
        create_router(test_state())
    }

    struct FailingNarrative;

    #[async_trait::async_trait]
    impl NarrativeGenerator for FailingNarrative {
        async fn generate(&self, _prompt: &str, _context_label: &str) -> anyhow::Result<String> {
            anyhow::bail!("backend unreachable")
        }
    }

    fn failing_router() -> Router {
        let state = AppState::new(
            Arc::new(ReviewWorkflow::new()),
            Arc::new(SarPipeline::new(
                Arc::new(FailingNarrative),
                Arc::new(PdfReportRenderer::default()),
            )),
            Arc::new(ReplayScanFeed::sample(Duration::ZERO)),
        );
        create_router(state)
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = test_router();
        let (status, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn review_materializes_then_freeze_updates_the_same_record() {
        let app = test_router();

        let (status, body) = post_json(
            &app,
            "/review",
            json!({"id": "TX1", "amount": 50_000, "country": "XX"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "queued_for_review");
        assert_eq!(body["id"], "TX1");

        let (_, violations) = get_json(&app, "/violations").await;
        let list = violations.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["review_status"], "HUMAN_REVIEW");
        assert_eq!(list[0]["amount"], 50_000);

        let (status, body) =
            post_json(&app, "/freeze", json!({"id": "TX1", "account_id": "ACC-9"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "frozen");
        assert_eq!(body["account_id"], "ACC-9");

        let (_, violations) = get_json(&app, "/violations").await;
        let list = violations.as_array().unwrap();
        assert_eq!(list.len(), 1, "freeze must not duplicate the record");
        assert_eq!(list[0]["review_status"], "ACCOUNT_FROZEN");
        assert_eq!(list[0]["frozen_account"], "ACC-9");
        assert!(list[0]["reviewed_at"].is_string());
    }

    #[tokio::test]
    async fn resolve_without_id_is_rejected_and_queue_unchanged() {
        let app = test_router();
        post_json(&app, "/review", json!({"id": "TX1"})).await;

        let (before_status, before) = get_json(&app, "/violations").await;
        assert_eq!(before_status, StatusCode::OK);

        let (status, body) = post_json(&app, "/resolve", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("id"));

        let (_, after) = get_json(&app, "/violations").await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn resolve_is_idempotent_over_the_wire() {
        let app = test_router();
        post_json(&app, "/review", json!({"id": "TX1"})).await;

        let (first, body) = post_json(&app, "/resolve", json!({"id": "TX1"})).await;
        assert_eq!(first, StatusCode::OK);
        assert_eq!(body["status"], "resolved");

        let (second, body) = post_json(&app, "/resolve", json!({"id": "TX1"})).await;
        assert_eq!(second, StatusCode::OK);
        assert_eq!(body["status"], "resolved");

        let (_, violations) = get_json(&app, "/violations").await;
        assert!(violations.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn freeze_without_account_stores_the_sentinel() {
        let app = test_router();
        let (status, body) = post_json(&app, "/freeze", json!({"id": "TX7"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["account_id"], "UNKNOWN");

        let (_, violations) = get_json(&app, "/violations").await;
        assert_eq!(violations[0]["frozen_account"], "UNKNOWN");
    }

    #[tokio::test]
    async fn sar_returns_a_pdf_attachment() {
        let app = test_router();
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/sar")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_string(&json!({
                            "id": "TX1",
                            "transaction_id": "TX1",
                            "verdict": "FLAGGED",
                            "review_status": "HUMAN_REVIEW",
                            "amount": 14_500
                        }))
                        .unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=SAR_TX1.pdf"
        );

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn sar_pipeline_failure_surfaces_as_500_with_detail() {
        let app = failing_router();
        let (status, body) = post_json(&app, "/sar", json!({"id": "TX1"})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("narrative"));
        assert!(detail.contains("backend unreachable"));
    }

    #[tokio::test]
    async fn scan_streams_events_and_fills_the_queue() {
        let app = test_router();
        let resp = app
            .clone()
            .oneshot(Request::builder().uri("/scan").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("data:"));
        assert!(body.contains("TXN-8821"));
        assert!(body.contains("COMPLIANT"));

        let (_, violations) = get_json(&app, "/violations").await;
        let list = violations.as_array().unwrap();
        assert_eq!(list.len(), 4, "only flagged results are queued");
        assert_eq!(list[0]["id"], "TXN-8821");
    }
}
