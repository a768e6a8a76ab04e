//! Narrative backend adapters for SAR generation.

use async_trait::async_trait;
use reqwest::{Client, Url};
use sentinel_core::NarrativeGenerator;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_GENERATIVE_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.5-pro";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the LLM narrative backend.
#[derive(Debug, Clone)]
pub struct NarrativeBackendConfig {
    /// Base URL or full `:generateContent` URL. Defaults to the public
    /// generative endpoint.
    pub endpoint: Option<String>,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl NarrativeBackendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: None,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_output_tokens: None,
        }
    }
}

/// Narrative generator backed by a `generateContent`-style LLM endpoint.
pub struct LlmNarrativeGenerator {
    config: NarrativeBackendConfig,
    client: Client,
}

impl LlmNarrativeGenerator {
    pub fn new(config: NarrativeBackendConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> anyhow::Result<Url> {
        resolve_generate_endpoint(
            self.config.endpoint.as_deref(),
            &self.config.model,
            &self.config.api_key,
        )
    }
}

#[async_trait]
impl NarrativeGenerator for LlmNarrativeGenerator {
    async fn generate(&self, prompt: &str, context_label: &str) -> anyhow::Result<String> {
        let url = self.endpoint()?;

        let mut payload = json!({
            "contents": [
                {
                    "parts": [
                        {
                            "text": prompt
                        }
                    ]
                }
            ],
            "systemInstruction": {
                "parts": [
                    {
                        "text": format!("You are a compliance assistant. Context: {context_label}.")
                    }
                ]
            }
        });

        let mut generation_config = serde_json::Map::new();
        if let Some(temperature) = self.config.temperature {
            generation_config.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(max_tokens) = self.config.max_output_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if !generation_config.is_empty() {
            payload["generationConfig"] = Value::Object(generation_config);
        }

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("narrative request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("narrative backend error {status}: {}", truncate(&body, 320));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("invalid narrative response: {e}"))?;

        let narrative = body["candidates"]
            .as_array()
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate["content"]["parts"].as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if narrative.trim().is_empty() {
            anyhow::bail!("narrative backend returned no text");
        }

        Ok(narrative.trim().to_string())
    }
}

/// Deterministic narrative for offline and test runs. Returns the same
/// three-section structure the pipeline asks the backend for, without
/// calling anything.
#[derive(Debug, Clone, Default)]
pub struct TemplateNarrativeGenerator;

#[async_trait]
impl NarrativeGenerator for TemplateNarrativeGenerator {
    async fn generate(&self, prompt: &str, context_label: &str) -> anyhow::Result<String> {
        let details = prompt
            .split_once("Transaction details: ")
            .map(|(_, rest)| rest)
            .and_then(|rest| rest.split_once("\n\n"))
            .map(|(details, _)| details.trim())
            .unwrap_or("(no structured details supplied)");

        Ok(format!(
            "[{context_label}]\n\n\
             1. Suspicion basis: the attached detector evidence flagged this activity \
             for review. The structured record follows verbatim:\n{details}\n\n\
             2. Flow of funds: the transaction moved between the originator and \
             beneficiary accounts identified in the evidence above; see the \
             detector's evidence summary for the observed path.\n\n\
             3. Recommended next steps: preserve the account records cited above, \
             file this report with the appropriate financial intelligence unit, and \
             review related activity in the surrounding 30-day window."
        ))
    }
}

fn resolve_generate_endpoint(
    endpoint: Option<&str>,
    model: &str,
    api_key: &str,
) -> anyhow::Result<Url> {
    let endpoint = endpoint.unwrap_or(DEFAULT_GENERATIVE_ENDPOINT);
    let mut url = if endpoint.contains(":generateContent") {
        Url::parse(endpoint)
            .map_err(|e| anyhow::anyhow!("invalid narrative endpoint {endpoint}: {e}"))?
    } else {
        let base = endpoint.trim_end_matches('/');
        let generated = format!("{base}/v1beta/models/{model}:generateContent");
        Url::parse(&generated)
            .map_err(|e| anyhow::anyhow!("invalid narrative endpoint {generated}: {e}"))?
    };

    if !url.query_pairs().any(|(k, _)| k == "key") {
        url.query_pairs_mut().append_pair("key", api_key);
    }

    Ok(url)
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{truncated}...")
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::{forensic_prompt, Violation, NARRATIVE_CONTEXT_LABEL};
    use serde_json::json;

    #[test]
    fn endpoint_is_derived_from_model_and_keyed_once() {
        let url = resolve_generate_endpoint(None, "gemini-1.5-pro", "secret").unwrap();
        assert_eq!(
            url.path(),
            "/v1beta/models/gemini-1.5-pro:generateContent"
        );
        assert_eq!(url.query_pairs().filter(|(k, _)| k == "key").count(), 1);
    }

    #[test]
    fn explicit_generate_endpoint_is_kept_verbatim() {
        let url = resolve_generate_endpoint(
            Some("http://localhost:9999/v1beta/models/custom:generateContent?key=abc"),
            "ignored",
            "unused",
        )
        .unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.query(), Some("key=abc"));
    }

    #[test]
    fn truncate_marks_cut_bodies() {
        assert_eq!(truncate("short", 320), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[tokio::test]
    async fn template_narrative_echoes_record_details() {
        let mut violation = Violation::flagged("TX1");
        violation.evidence.insert("amount".to_string(), json!(50_000));
        let prompt = forensic_prompt(&violation).unwrap();

        let narrative = TemplateNarrativeGenerator
            .generate(&prompt, NARRATIVE_CONTEXT_LABEL)
            .await
            .unwrap();

        assert!(narrative.contains(NARRATIVE_CONTEXT_LABEL));
        assert!(narrative.contains("\"id\": \"TX1\""));
        assert!(narrative.contains("Recommended next steps"));
    }
}
