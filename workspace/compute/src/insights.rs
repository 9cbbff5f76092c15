//! AI insights over the current stock.
//!
//! The prompt is built locally; the text generation is delegated to an
//! [`InsightGenerator`], normally the Gemini REST API.

use async_trait::async_trait;
use common::StockLevel;
use common::converters::stock_levels_to_table;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument, warn};

use crate::error::{ComputeError, Result};

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Produces free text for a prompt.
#[async_trait]
pub trait InsightGenerator: Send + Sync + fmt::Debug {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Builds the analyst prompt for a stock snapshot.
pub fn build_insights_prompt(levels: &[StockLevel]) -> String {
    format!(
        "You are an AI healthcare analyst.\n\
         Below is the current blood stock data.\n\n\
         {}\n\
         1. Identify blood groups at risk\n\
         2. Predict shortages\n\
         3. Give clear, actionable advice for hospital admins\n",
        stock_levels_to_table(levels)
    )
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Joins the text parts of the first candidate.
fn first_candidate_text(response: GenerateContentResponse) -> Result<String> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ComputeError::Insights(
            "model returned no text".to_string(),
        ));
    }
    Ok(text)
}

/// Client for the Generative Language `generateContent` endpoint.
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String, endpoint: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model,
            endpoint,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl InsightGenerator for GeminiClient {
    #[instrument(skip(prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            warn!("Insights requested but no API key is configured");
            ComputeError::InsightsUnavailable
        })?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!("Requesting insights from {}", self.url());
        let response = self
            .http_client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ComputeError::Insights(format!(
                "model endpoint returned HTTP {}",
                response.status()
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = first_candidate_text(body)?;
        info!("Received {} characters of insights", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::converters::stock_levels_from_rows;
    use model::entities::BloodGroup;

    #[test]
    fn test_prompt_contains_stock_and_asks() {
        let levels = stock_levels_from_rows(
            vec![(BloodGroup::APositive, 12), (BloodGroup::ONegative, 1)],
            5,
        );

        let prompt = build_insights_prompt(&levels);

        assert!(prompt.starts_with("You are an AI healthcare analyst."));
        assert!(prompt.contains("A+          | 12"));
        assert!(prompt.contains("O-          | 1"));
        assert!(prompt.contains("1. Identify blood groups at risk"));
        assert!(prompt.contains("2. Predict shortages"));
        assert!(prompt.contains("3. Give clear, actionable advice for hospital admins"));
    }

    #[test]
    fn test_first_candidate_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"O- is low. "},{"text":"Run a drive."}]}},
                              {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();

        assert_eq!(
            first_candidate_text(response).unwrap(),
            "O- is low. Run a drive."
        );
    }

    #[test]
    fn test_first_candidate_text_rejects_empty_answer() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(matches!(
            first_candidate_text(response),
            Err(ComputeError::Insights(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let client = GeminiClient::new(
            Some("   ".to_string()),
            DEFAULT_GEMINI_MODEL.to_string(),
            DEFAULT_GEMINI_ENDPOINT.to_string(),
        );

        let result = client.generate("prompt").await;
        assert!(matches!(result, Err(ComputeError::InsightsUnavailable)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = GeminiClient::new(
            Some("secret-key".to_string()),
            DEFAULT_GEMINI_MODEL.to_string(),
            format!("{}/", DEFAULT_GEMINI_ENDPOINT),
        );

        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-key"));
        assert_eq!(
            client.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }
}
