//! Outbound client for the text-completion provider.
//!
//! Provider failures (missing credential, non-200, network error, unknown
//! response shape) are never surfaced as errors to callers: each path yields
//! a best-effort content string so the caller can always render something.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::Serialize;
use serde_json::{Value, json};

use crate::config::AiConfig;

static ROADMAP_SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[Roadmap\](.*?)(?:$|\[|<end>)").unwrap());

/// The provider responded 200 but in none of the known shapes.
#[derive(Debug)]
pub struct UpstreamFormatError(pub Value);

impl std::fmt::Display for UpstreamFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Could not find text field in API response: {}", self.0)
    }
}

impl std::error::Error for UpstreamFormatError {}

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapContent {
    pub content: String,
}

pub struct RoadmapClient {
    http: reqwest::Client,
    config: AiConfig,
}

impl RoadmapClient {
    pub fn new(config: AiConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build reqwest client"),
            config,
        }
    }

    /// Draft a roadmap from a synthesized context prompt.
    pub async fn draft(&self, prompt: &str) -> RoadmapContent {
        self.complete(prompt, 1500, 1.2, false).await
    }

    /// Draft with a fully caller-defined prompt, used verbatim apart from an
    /// appended anti-caching note. A `[Roadmap]`-delimited section, when
    /// present in the response, is extracted; otherwise the whole text is
    /// returned.
    pub async fn draft_custom(&self, custom_prompt: &str) -> RoadmapContent {
        let full_prompt = format!(
            "{custom_prompt}\n\nNote: Generate a completely unique response for this specific \
             request (request ID: {}).",
            chrono::Utc::now().timestamp()
        );
        self.complete(&full_prompt, 2048, 1.1, true).await
    }

    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        repetition_penalty: f64,
        extract_section: bool,
    ) -> RoadmapContent {
        let Some(api_key) = &self.config.api_key else {
            return RoadmapContent {
                content: "API Configuration Error: The TOGETHER_API_KEY environment variable is \
                          not set. Please configure the API key."
                    .to_string(),
            };
        };

        // Randomized sampling is deliberate: it trades determinism for output
        // diversity across repeated calls with identical inputs. The rng is
        // scoped so it is dropped before the await; ThreadRng is not Send and
        // would otherwise make this future unusable from spawned tasks.
        let (temperature, top_p, top_k) = {
            let mut rng = rand::rng();
            (
                (0.5 + rng.random::<f64>() * 0.2).min(0.7),
                (0.7 + rng.random::<f64>() * 0.1).min(0.8),
                rng.random_range(40..=50u32),
            )
        };

        let body = json!({
            "model": self.config.model,
            "prompt": prompt,
            "max_tokens": max_tokens,
            "temperature": temperature,
            "top_p": top_p,
            "top_k": top_k,
            "repetition_penalty": repetition_penalty,
        });

        let resp = match self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("AI provider request failed: {e}");
                return RoadmapContent {
                    content: format!(
                        "API Request Error: Failed to communicate with the AI service: {e}. \
                         Please check your network connection and try again."
                    ),
                };
            }
        };

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("AI provider returned status {status}");
            return RoadmapContent {
                content: format!(
                    "API Error: {}. The AI service returned an error. Please try again.",
                    status.as_u16()
                ),
            };
        }

        let result: Value = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                return RoadmapContent {
                    content: format!("Error processing AI response: {e}"),
                };
            }
        };

        match extract_text(&result) {
            Ok(text) => {
                let content = if extract_section {
                    extract_roadmap_section(&text)
                } else {
                    text
                };
                RoadmapContent { content }
            }
            Err(e) => {
                tracing::warn!("Unexpected AI response shape: {e}");
                RoadmapContent {
                    content: format!("Error processing AI response: {e}"),
                }
            }
        }
    }
}

/// Unwrap the completion text from the provider response, trying each known
/// shape in a fixed order: `choices[0].text`, nested `output.choices[0].text`,
/// a bare top-level `text`, then any nested object carrying a `text` field.
/// Anything else is a typed format error, never a stringified unknown.
pub fn extract_text(result: &Value) -> Result<String, UpstreamFormatError> {
    if let Some(text) = result
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("text"))
        .and_then(Value::as_str)
    {
        return Ok(text.to_string());
    }

    if let Some(text) = result
        .get("output")
        .and_then(|o| o.get("choices"))
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("text"))
        .and_then(Value::as_str)
    {
        return Ok(text.to_string());
    }

    if let Some(text) = result.get("text").and_then(Value::as_str) {
        return Ok(text.to_string());
    }

    if let Some(obj) = result.as_object() {
        for value in obj.values() {
            if let Some(text) = value.get("text").and_then(Value::as_str) {
                return Ok(text.to_string());
            }
        }
    }

    Err(UpstreamFormatError(result.clone()))
}

fn extract_roadmap_section(text: &str) -> String {
    match ROADMAP_SECTION_RE.captures(text) {
        Some(caps) => caps[1].trim().to_string(),
        None => text.to_string(),
    }
}
