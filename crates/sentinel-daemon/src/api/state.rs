//! Application state for API handlers.

use sentinel_core::{ReviewWorkflow, SarPipeline, ScanFeed};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Review workflow over the shared violation queue
    pub workflow: Arc<ReviewWorkflow>,

    /// SAR document pipeline
    pub pipeline: Arc<SarPipeline>,

    /// Detector result feed
    pub feed: Arc<dyn ScanFeed>,

    /// Daemon version
    pub version: String,

    /// Daemon start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(
        workflow: Arc<ReviewWorkflow>,
        pipeline: Arc<SarPipeline>,
        feed: Arc<dyn ScanFeed>,
    ) -> Self {
        Self {
            workflow,
            pipeline,
            feed,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Uptime as a human-readable string.
    pub fn uptime(&self) -> String {
        let duration = chrono::Utc::now() - self.started_at;
        let secs = duration.num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs < 86400 {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        } else {
            format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
        }
    }
}
