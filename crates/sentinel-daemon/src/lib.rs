//! Sentinel daemon library.
//!
//! Components behind the `sentineld` binary:
//! - HTTP gateway (REST + SSE) over the review workflow and SAR pipeline
//! - Configuration loading and layering
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError};
pub use server::Server;
