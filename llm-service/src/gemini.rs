//! Thin client for the Generative Language REST API.
//!
//! Two endpoints are used, both non-streaming:
//! - `POST {endpoint}/v1beta/models/{model}:embedContent`   — embeddings
//! - `POST {endpoint}/v1beta/models/{model}:generateContent` — generation
//!
//! The API key travels as the `key` query parameter; it is appended at send
//! time and never stored inside the URLs we log or put into errors.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::GeminiConfig;
use crate::error::{LlmError, Result, validate_http_endpoint};

/// What the embedded text will be used for.
///
/// The backend processes queries and stored passages differently, so the
/// intent must reach it unchanged as the `taskType` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbedIntent {
    /// The text is a user question used to search the index.
    Query,
    /// The text is a stored document passage.
    Document,
}

impl EmbedIntent {
    fn task_type(self) -> &'static str {
        match self {
            EmbedIntent::Query => "RETRIEVAL_QUERY",
            EmbedIntent::Document => "RETRIEVAL_DOCUMENT",
        }
    }
}

/// Thin Gemini client.
///
/// Initialized once from [`GeminiConfig`]; reuses a single HTTP client with
/// the configured timeout. High-level calls:
/// - [`GeminiService::embed_content`] — one text → one vector
/// - [`GeminiService::generate`]      — one prompt → answer text
pub struct GeminiService {
    client: Client,
    cfg: GeminiConfig,
    url_embed: String,
    url_generate: String,
}

impl GeminiService {
    /// Creates a new [`GeminiService`] from the given config.
    ///
    /// # Errors
    /// - [`crate::ConfigError::InvalidFormat`] if the endpoint is invalid
    /// - [`LlmError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: GeminiConfig) -> Result<Self> {
        validate_http_endpoint("GEMINI_ENDPOINT", cfg.endpoint.trim())?;

        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        let base = cfg.endpoint.trim_end_matches('/').to_string();
        let url_embed = format!("{}/v1beta/models/{}:embedContent", base, cfg.embed_model);
        let url_generate = format!("{}/v1beta/models/{}:generateContent", base, cfg.chat_model);

        Ok(Self {
            client,
            cfg,
            url_embed,
            url_generate,
        })
    }

    /// Embeds one text via `embedContent`.
    ///
    /// `intent` is forwarded as `taskType`; `title` is only meaningful for
    /// [`EmbedIntent::Document`] and is dropped otherwise (the API rejects a
    /// title on query embeddings).
    ///
    /// # Errors
    /// - [`LlmError::HttpStatus`] for non-2xx responses (429/5xx retryable)
    /// - [`LlmError::Transport`] for client errors
    /// - [`LlmError::Decode`] if the response cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.embed_model, task = intent.task_type()))]
    pub async fn embed_content(
        &self,
        text: &str,
        intent: EmbedIntent,
        title: Option<&str>,
    ) -> Result<Vec<f32>> {
        let body = EmbedRequest {
            content: ContentParts::single(text),
            task_type: intent.task_type(),
            title: match intent {
                EmbedIntent::Document => title,
                EmbedIntent::Query => None,
            },
        };

        debug!("POST {}", self.url_embed);
        let resp = self
            .client
            .post(&self.url_embed)
            .query(&[("key", self.cfg.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(http_status_error(self.url_embed.clone(), resp).await);
        }

        let out: EmbedResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Decode(format!("embedContent: {e}")))?;

        Ok(out.embedding.values)
    }

    /// Performs a non-streaming generation request via `generateContent`.
    ///
    /// The whole prompt (instructions, context, history, question) goes in as
    /// a single user part; `temperature` is the only sampling knob exposed.
    ///
    /// # Errors
    /// - [`LlmError::HttpStatus`] for non-2xx responses
    /// - [`LlmError::Transport`] for client errors
    /// - [`LlmError::Decode`] if the response carries no candidate text
    #[instrument(skip_all, fields(model = %self.cfg.chat_model))]
    pub async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![TurnContent {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature },
        };

        debug!("POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .query(&[("key", self.cfg.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(http_status_error(self.url_generate.clone(), resp).await);
        }

        let out: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Decode(format!("generateContent: {e}")))?;

        out.first_text()
            .ok_or_else(|| LlmError::Decode("generateContent: no candidate text".into()))
    }
}

/// Builds an [`LlmError::HttpStatus`] from a failed response, preferring the
/// structured `error.message` the API puts in its JSON error bodies.
async fn http_status_error(url: String, resp: reqwest::Response) -> LlmError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let snippet = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.chars().take(240).collect());

    LlmError::HttpStatus {
        status,
        url,
        snippet,
    }
}

/* ==========================
HTTP payloads
========================== */

#[derive(Debug, Serialize)]
struct ContentParts<'a> {
    parts: Vec<Part<'a>>,
}

impl<'a> ContentParts<'a> {
    fn single(text: &'a str) -> Self {
        Self {
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Request body for `embedContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest<'a> {
    content: ContentParts<'a>,
    task_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

/// Response body for `embedContent`.
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

/// Request body for `generateContent` (non-streaming).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<TurnContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct TurnContent<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Response body for `generateContent`; only the first candidate is used.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .next()
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_maps_to_task_type() {
        assert_eq!(EmbedIntent::Query.task_type(), "RETRIEVAL_QUERY");
        assert_eq!(EmbedIntent::Document.task_type(), "RETRIEVAL_DOCUMENT");
    }

    #[test]
    fn embed_request_serializes_title_only_when_present() {
        let with_title = EmbedRequest {
            content: ContentParts::single("passage"),
            task_type: EmbedIntent::Document.task_type(),
            title: Some("Page 3"),
        };
        let json = serde_json::to_string(&with_title).unwrap();
        assert!(json.contains("\"taskType\":\"RETRIEVAL_DOCUMENT\""));
        assert!(json.contains("\"title\":\"Page 3\""));

        let without = EmbedRequest {
            content: ContentParts::single("what is this?"),
            task_type: EmbedIntent::Query.task_type(),
            title: None,
        };
        let json = serde_json::to_string(&without).unwrap();
        assert!(!json.contains("title"));
    }

    #[test]
    fn generate_response_extracts_first_candidate() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"According to page 3..."}]}}]}"#;
        let resp: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.first_text().as_deref(), Some("According to page 3..."));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(empty.first_text().is_none());
    }
}
