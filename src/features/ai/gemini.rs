//! Gemini `generateContent` REST adapter

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::AiGateway;
use crate::core::config::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::features::conversation::{Role, Turn};

#[derive(Clone)]
pub struct GeminiGateway {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGateway {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        GeminiGateway {
            client: Client::new(),
            api_key: api_key.into(),
            model: if model.is_empty() {
                DEFAULT_GEMINI_MODEL.to_string()
            } else {
                model
            },
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl AiGateway for GeminiGateway {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, history: &[Turn], message: &str) -> Result<String> {
        let body = build_request(history, message);
        debug!(
            "Sending {} contents to Gemini model {}",
            body.contents.len(),
            self.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Gemini request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorWrapper>(&text)
                .ok()
                .and_then(|w| w.error.message)
                .unwrap_or(text);
            bail!("Gemini API returned {status}: {detail}");
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse Gemini response: {e}"))?;

        extract_text(parsed)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Model => "model",
    }
}

fn build_request(history: &[Turn], message: &str) -> GenerateContentRequest {
    let contents = history
        .iter()
        .map(|turn| (turn.role, turn.text.as_str()))
        .chain(std::iter::once((Role::User, message)))
        .map(|(role, text)| Content {
            role: role_name(role).to_string(),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        })
        .collect();

    GenerateContentRequest { contents }
}

fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Gemini returned no candidates"))?;

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        bail!(
            "Gemini returned an empty reply (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        );
    }

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_appends_message_after_history() {
        let history = vec![Turn::user("be a pirate"), Turn::model("aye")];
        let body = serde_json::to_value(build_request(&history, "hello")).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "be a pirate" }] },
                    { "role": "model", "parts": [{ "text": "aye" }] },
                    { "role": "user", "parts": [{ "text": "hello" }] }
                ]
            })
        );
    }

    #[test]
    fn test_extract_joins_text_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Ahoy, " }, { "text": "matey!\n" }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        assert_eq!(extract_text(response).unwrap(), "Ahoy, matey!");
    }

    #[test]
    fn test_extract_rejects_missing_candidates() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(extract_text(response).is_err());
    }

    #[test]
    fn test_extract_rejects_blocked_reply() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();

        let err = extract_text(response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_endpoint_uses_model_and_trimmed_base() {
        let gateway = GeminiGateway::new("key", "gemini-test").with_base_url("http://localhost:9/v1/");
        assert_eq!(gateway.endpoint(), "http://localhost:9/v1/gemini-test:generateContent");

        let default_model = GeminiGateway::new("key", "");
        assert!(default_model.endpoint().ends_with("gemini-2.5-flash:generateContent"));
    }
}
