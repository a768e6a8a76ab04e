use crate::error::{ReportStage, SentinelError};
use crate::types::Violation;
use async_trait::async_trait;
use std::sync::Arc;

/// Context label sent with every narrative request.
pub const NARRATIVE_CONTEXT_LABEL: &str = "SAR Narrative Generation";

/// Produces the forensic narrative text for a SAR document.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, context_label: &str) -> anyhow::Result<String>;
}

/// Renders a violation record plus narrative into a binary document.
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    async fn render(&self, violation: &Violation, narrative: &str) -> anyhow::Result<Vec<u8>>;
}

/// A finished SAR document ready to hand to the caller.
#[derive(Debug, Clone)]
pub struct SarDocument {
    pub violation_id: String,
    pub bytes: Vec<u8>,
}

impl SarDocument {
    /// Attachment filename for the wire, `SAR_<id>.pdf`.
    pub fn filename(&self) -> String {
        let id = if self.violation_id.is_empty() {
            "UNKNOWN"
        } else {
            self.violation_id.as_str()
        };
        format!("SAR_{id}.pdf")
    }
}

/// Deterministic investigator prompt for a violation record.
///
/// The full record is embedded as structured context; the three numbered
/// sections are part of the narrative contract and must not be reordered.
pub fn forensic_prompt(violation: &Violation) -> Result<String, SentinelError> {
    let details = serde_json::to_string_pretty(violation)
        .map_err(|e| SentinelError::Serialization(e.to_string()))?;
    Ok(format!(
        "Act as a senior AML investigator. Generate a formal chronological narrative \
         for a Suspicious Activity Report (SAR).\n\
         Transaction details: {details}\n\n\
         The narrative should explain:\n\
         1. Why this activity is suspicious (e.g. high value, smurfing, tax haven).\n\
         2. The chronological flow of funds.\n\
         3. Recommended next steps for law enforcement.\n\n\
         Keep it professional, detailed, and forensic."
    ))
}

/// Two-stage document pipeline: narrative generation, then rendering.
///
/// Any failure surfaces as a single [`SentinelError::ReportGeneration`]
/// tagged with the stage that failed. No retries, no partial document.
#[derive(Clone)]
pub struct SarPipeline {
    narrative: Arc<dyn NarrativeGenerator>,
    renderer: Arc<dyn ReportRenderer>,
}

impl SarPipeline {
    pub fn new(narrative: Arc<dyn NarrativeGenerator>, renderer: Arc<dyn ReportRenderer>) -> Self {
        Self {
            narrative,
            renderer,
        }
    }

    pub async fn generate(&self, violation: &Violation) -> Result<SarDocument, SentinelError> {
        let prompt = forensic_prompt(violation)?;

        let narrative = self
            .narrative
            .generate(&prompt, NARRATIVE_CONTEXT_LABEL)
            .await
            .map_err(|e| SentinelError::report(ReportStage::Narrative, e))?;

        let bytes = self
            .renderer
            .render(violation, &narrative)
            .await
            .map_err(|e| SentinelError::report(ReportStage::Render, e))?;

        tracing::info!(
            violation_id = %violation.id,
            size = bytes.len(),
            "SAR document generated"
        );

        Ok(SarDocument {
            violation_id: violation.id.clone(),
            bytes,
        })
    }
}
