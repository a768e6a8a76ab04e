//! PDF rendering for SAR documents.

use async_trait::async_trait;
use chrono::Utc;
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use sentinel_core::{ReportRenderer, Violation};
use uuid::Uuid;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const BODY_WRAP_COLUMNS: usize = 92;

/// Renders the SAR as a single-column PDF: case header, structured
/// transaction evidence, then the generated narrative.
#[derive(Debug, Clone)]
pub struct PdfReportRenderer {
    letterhead: String,
}

impl Default for PdfReportRenderer {
    fn default() -> Self {
        Self {
            letterhead: "Financial Crimes Compliance Unit".to_string(),
        }
    }
}

impl PdfReportRenderer {
    pub fn new(letterhead: impl Into<String>) -> Self {
        Self {
            letterhead: letterhead.into(),
        }
    }
}

#[async_trait]
impl ReportRenderer for PdfReportRenderer {
    async fn render(&self, violation: &Violation, narrative: &str) -> anyhow::Result<Vec<u8>> {
        let (doc, page, layer) = PdfDocument::new(
            "Suspicious Activity Report",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "content",
        );
        let body_font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow::anyhow!("font load failed: {e}"))?;
        let heading_font = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow::anyhow!("font load failed: {e}"))?;

        let mut writer = PageWriter::new(&doc, doc.get_page(page).get_layer(layer));

        writer.line("SUSPICIOUS ACTIVITY REPORT", 16.0, &heading_font);
        writer.line(&self.letterhead, 10.0, &body_font);
        writer.line(
            &format!(
                "Report {}  |  Generated {}",
                Uuid::new_v4(),
                Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            ),
            9.0,
            &body_font,
        );
        writer.gap(4.0);

        writer.line("Subject violation", 12.0, &heading_font);
        writer.line(&format!("Violation ID: {}", violation.id), 10.0, &body_font);
        writer.line(
            &format!("Transaction ID: {}", violation.transaction_id),
            10.0,
            &body_font,
        );
        writer.line(
            &format!("Review status: {}", violation.review_status.as_str()),
            10.0,
            &body_font,
        );
        if let Some(account) = &violation.frozen_account {
            writer.line(&format!("Frozen account: {account}"), 10.0, &body_font);
        }
        if let Some(reviewed_at) = violation.reviewed_at {
            writer.line(
                &format!("Reviewed at: {}", reviewed_at.to_rfc3339()),
                10.0,
                &body_font,
            );
        }
        writer.gap(4.0);

        writer.line("Transaction evidence", 12.0, &heading_font);
        if violation.evidence.is_empty() {
            writer.line("(no additional evidence supplied)", 10.0, &body_font);
        }
        for (key, value) in &violation.evidence {
            let rendered = match value.as_str() {
                Some(text) => text.to_string(),
                None => value.to_string(),
            };
            for line in wrap(&format!("{key}: {rendered}"), BODY_WRAP_COLUMNS) {
                writer.line(&line, 10.0, &body_font);
            }
        }
        writer.gap(4.0);

        writer.line("Forensic narrative", 12.0, &heading_font);
        for paragraph in narrative.split('\n') {
            if paragraph.trim().is_empty() {
                writer.gap(2.0);
                continue;
            }
            for line in wrap(paragraph.trim(), BODY_WRAP_COLUMNS) {
                writer.line(&line, 10.0, &body_font);
            }
        }

        doc.save_to_bytes()
            .map_err(|e| anyhow::anyhow!("pdf serialization failed: {e}"))
    }
}

/// Top-down line cursor with automatic page breaks.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl<'a> PageWriter<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: PdfLayerReference) -> Self {
        Self {
            doc,
            layer,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    fn line(&mut self, text: &str, font_size: f32, font: &IndirectFontRef) {
        let advance = font_size * 0.55;
        if self.y - advance < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        self.layer
            .use_text(text, font_size, Mm(MARGIN_MM), Mm(self.y), font);
        self.y -= advance;
    }

    fn gap(&mut self, millimeters: f32) {
        self.y -= millimeters;
    }
}

/// Greedy word wrap; words longer than the column width get their own line.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > columns {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn render_produces_a_pdf() {
        let mut violation = Violation::flagged("TXN-8821");
        violation.evidence.insert("amount".to_string(), json!(14_500));
        violation
            .evidence
            .insert("country".to_string(), json!("KY"));

        let bytes = PdfReportRenderer::default()
            .render(&violation, "Funds moved through three accounts.")
            .await
            .unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[tokio::test]
    async fn long_narratives_spill_onto_extra_pages() {
        let violation = Violation::flagged("TXN-1");
        let narrative = "Layered transfers between shell entities. ".repeat(400);

        let bytes = PdfReportRenderer::default()
            .render(&violation, &narrative)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn wrap_respects_column_width() {
        let lines = wrap("one two three four five", 9);
        assert_eq!(lines, ["one two", "three", "four five"]);

        let oversized = wrap("antidisestablishmentarianism", 10);
        assert_eq!(oversized.len(), 1);
    }
}
