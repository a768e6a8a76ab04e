//! Concrete adapters behind the sentinel core's external seams.

#![deny(unsafe_code)]

pub mod feed;
pub mod narrative;
pub mod report;

pub use feed::ReplayScanFeed;
pub use narrative::{LlmNarrativeGenerator, NarrativeBackendConfig, TemplateNarrativeGenerator};
pub use report::PdfReportRenderer;
