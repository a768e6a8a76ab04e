//! Configuration for sentinel-daemon.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Narrative backend configuration
    #[serde(default)]
    pub narrative: NarrativeConfig,

    /// Scan feed configuration
    #[serde(default)]
    pub feed: FeedConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            narrative: NarrativeConfig::default(),
            feed: FeedConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".parse().unwrap(),
        }
    }
}

/// Narrative backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum NarrativeConfig {
    /// Deterministic local narrative (development/testing)
    Template,

    /// `generateContent`-style LLM backend
    Gemini {
        /// Base URL override; defaults to the public endpoint
        endpoint: Option<String>,

        /// API key
        api_key: String,

        /// Model name
        #[serde(default = "default_model")]
        model: String,
    },
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        NarrativeConfig::Template
    }
}

/// Scan feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Where detector results come from
    #[serde(default)]
    pub source: FeedSource,

    /// Pause between emitted results in milliseconds
    #[serde(default = "default_feed_interval")]
    pub interval_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: FeedSource::default(),
            interval_ms: default_feed_interval(),
        }
    }
}

/// Detector result source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeedSource {
    /// Bundled synthetic batch
    #[default]
    Sample,

    /// Replay from a JSONL file, one result per line
    Jsonl { path: String },
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_feed_interval() -> u64 {
    250
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration: defaults, then an optional file, then
    /// `SENTINEL_`-prefixed environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SENTINEL")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Development configuration: template narrative, fast sample feed.
    pub fn development() -> Self {
        Self {
            feed: FeedConfig {
                interval_ms: 50,
                ..FeedConfig::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_local_and_offline() {
        let config = DaemonConfig::default();
        assert_eq!(config.server.listen_addr.port(), 8080);
        assert!(matches!(config.narrative, NarrativeConfig::Template));
        assert!(matches!(config.feed.source, FeedSource::Sample));
        assert_eq!(config.feed.interval_ms, 250);
    }

    #[test]
    fn narrative_backend_deserializes_by_tag() {
        let parsed: NarrativeConfig = serde_json::from_value(serde_json::json!({
            "backend": "gemini",
            "api_key": "secret",
        }))
        .unwrap();

        match parsed {
            NarrativeConfig::Gemini { model, api_key, .. } => {
                assert_eq!(model, "gemini-1.5-pro");
                assert_eq!(api_key, "secret");
            }
            other => panic!("expected gemini backend, got {other:?}"),
        }
    }
}
