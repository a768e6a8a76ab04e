//! Server setup and lifecycle management.

use crate::api::{create_router, AppState};
use crate::config::{DaemonConfig, FeedSource, NarrativeConfig};
use crate::error::{DaemonError, DaemonResult};
use sentinel_adapters::{
    LlmNarrativeGenerator, NarrativeBackendConfig, PdfReportRenderer, ReplayScanFeed,
    TemplateNarrativeGenerator,
};
use sentinel_core::{NarrativeGenerator, ReviewWorkflow, SarPipeline, ScanFeed};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Sentinel daemon server.
pub struct Server {
    config: DaemonConfig,
    state: AppState,
}

impl Server {
    /// Wire up the workflow, pipeline and feed from configuration.
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let narrative: Arc<dyn NarrativeGenerator> = match &config.narrative {
            NarrativeConfig::Template => Arc::new(TemplateNarrativeGenerator),
            NarrativeConfig::Gemini {
                endpoint,
                api_key,
                model,
            } => {
                let backend = NarrativeBackendConfig {
                    endpoint: endpoint.clone(),
                    api_key: api_key.clone(),
                    model: model.clone(),
                    temperature: None,
                    max_output_tokens: None,
                };
                Arc::new(
                    LlmNarrativeGenerator::new(backend)
                        .map_err(|e| DaemonError::Config(e.to_string()))?,
                )
            }
        };

        let pipeline = SarPipeline::new(narrative, Arc::new(PdfReportRenderer::default()));

        let interval = Duration::from_millis(config.feed.interval_ms);
        let feed: Arc<dyn ScanFeed> = match &config.feed.source {
            FeedSource::Sample => Arc::new(ReplayScanFeed::sample(interval)),
            FeedSource::Jsonl { path } => Arc::new(
                ReplayScanFeed::from_jsonl(path, interval)
                    .map_err(|e| DaemonError::Config(e.to_string()))?,
            ),
        };

        let state = AppState::new(
            Arc::new(ReviewWorkflow::new()),
            Arc::new(pipeline),
            feed,
        );

        Ok(Self { config, state })
    }

    /// Run the server until shutdown is requested.
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;
        let app = create_router(self.state);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("sentinel daemon listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("sentinel daemon shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
