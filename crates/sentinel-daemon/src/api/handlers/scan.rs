//! Scan streaming handler.

use crate::api::state::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;

/// Stream detector results as server-sent events, one `data: <json>` event
/// per result. Flagged transactions are recorded in the review queue as
/// they pass. The stream ends when the feed completes; dropping the
/// connection drops the feed with it.
pub async fn scan_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let workflow = state.workflow.clone();

    let stream = state.feed.stream().then(move |item| {
        let workflow = workflow.clone();
        async move {
            match item {
                Ok(result) => {
                    if let Err(error) = workflow.admit_scan_result(&result).await {
                        tracing::warn!(%error, "failed to record flagged result");
                    }
                    let json = serde_json::to_string(&result).unwrap_or_default();
                    Ok(Event::default().data(json))
                }
                Err(error) => {
                    tracing::warn!(%error, "scan feed error");
                    Ok(Event::default().comment("feed-error"))
                }
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
