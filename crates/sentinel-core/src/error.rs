use std::fmt;
use thiserror::Error;

/// Pipeline stage that failed while producing a SAR document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStage {
    /// The narrative-generation call failed.
    Narrative,
    /// The document-rendering call failed.
    Render,
}

impl fmt::Display for ReportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Narrative => write!(f, "narrative"),
            Self::Render => write!(f, "render"),
        }
    }
}

/// Sentinel core errors.
#[derive(Debug, Error)]
pub enum SentinelError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("SAR generation failed at {stage} stage: {message}")]
    ReportGeneration { stage: ReportStage, message: String },

    #[error("Scan feed error: {0}")]
    Feed(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SentinelError {
    pub fn missing_id() -> Self {
        Self::InvalidRequest("Missing violation id".to_string())
    }

    pub fn report(stage: ReportStage, cause: impl fmt::Display) -> Self {
        Self::ReportGeneration {
            stage,
            message: cause.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_error_names_failed_stage() {
        let narrative = SentinelError::report(ReportStage::Narrative, "backend unreachable");
        assert_eq!(
            narrative.to_string(),
            "SAR generation failed at narrative stage: backend unreachable"
        );

        let render = SentinelError::report(ReportStage::Render, "font missing");
        assert!(render.to_string().contains("render stage"));
    }
}
