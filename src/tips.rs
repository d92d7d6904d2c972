use crate::config::TipConfig;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const FALLBACK_TIP: &str =
    "Every step you take, no matter how small, is a step in the right direction. You've got this!";

const TIP_PROMPT: &str = "Generate a short, motivational, and actionable weight loss tip. Keep it positive and under 200 characters.";

#[derive(Debug, Error)]
enum TipError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned {0}")]
    Status(reqwest::StatusCode),
    #[error("response contained no text")]
    Empty,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Motivational tip source backed by the Gemini `generateContent` API.
pub struct TipClient {
    client: reqwest::Client,
    config: TipConfig,
}

impl TipClient {
    pub fn new(config: TipConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(format!(
            "weight-tracker/{}",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// One attempt; any failure yields [`FALLBACK_TIP`].
    pub async fn fetch_tip(&self) -> String {
        match self.request_tip().await {
            Ok(tip) => tip,
            Err(TipError::MissingApiKey) => {
                debug!("tip service not configured, using fallback");
                FALLBACK_TIP.to_string()
            }
            Err(err) => {
                warn!("error fetching motivational tip: {err}");
                FALLBACK_TIP.to_string()
            }
        }
    }

    async fn request_tip(&self) -> Result<String, TipError> {
        let api_key = self.config.api_key.as_deref().ok_or(TipError::MissingApiKey)?;
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint, self.config.model
        );
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: TIP_PROMPT }],
            }],
        };

        let resp = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(TipError::Status(resp.status()));
        }

        let data: GenerateResponse = resp.json().await?;
        data.into_text().ok_or(TipError::Empty)
    }
}

/// Latest accepted tip. Each fetch takes a sequence number up front and
/// its result is only kept if no newer fetch was started meanwhile.
#[derive(Debug, Default)]
pub struct TipBoard {
    issued: AtomicU64,
    current: Mutex<Option<(u64, String)>>,
}

impl TipBoard {
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns `false` (and drops `tip`) when `sequence` is stale.
    pub async fn complete(&self, sequence: u64, tip: String) -> bool {
        let mut current = self.current.lock().await;
        if sequence != self.issued.load(Ordering::SeqCst) {
            debug!(sequence, "discarding superseded tip");
            return false;
        }
        if (*current).as_ref().is_some_and(|(seen, _)| *seen > sequence) {
            return false;
        }
        *current = Some((sequence, tip));
        true
    }

    pub async fn current(&self) -> Option<(u64, String)> {
        self.current.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_falls_back() {
        let client = TipClient::new(TipConfig::default()).unwrap();
        assert_eq!(client.fetch_tip().await, FALLBACK_TIP);
    }

    #[tokio::test]
    async fn unreachable_service_falls_back() {
        let client = TipClient::new(TipConfig {
            api_key: Some("test".into()),
            endpoint: "http://127.0.0.1:9".into(),
            ..TipConfig::default()
        })
        .unwrap();
        assert_eq!(client.fetch_tip().await, FALLBACK_TIP);
    }

    #[test]
    fn response_text_is_extracted_and_trimmed() {
        let data: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":" Drink water. "},{"text":""}]}}]}"#,
        )
        .unwrap();
        assert_eq!(data.into_text().as_deref(), Some("Drink water."));
    }

    #[test]
    fn empty_response_has_no_text() {
        let data: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(data.into_text(), None);
        let data: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#)
                .unwrap();
        assert_eq!(data.into_text(), None);
    }

    #[test]
    fn request_body_matches_generate_content_shape() {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: "hi" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "contents": [{ "parts": [{ "text": "hi" }] }] })
        );
    }

    #[tokio::test]
    async fn late_response_from_older_fetch_is_discarded() {
        let board = TipBoard::default();
        let first = board.begin();
        let second = board.begin();

        assert!(board.complete(second, "newer".into()).await);
        assert!(!board.complete(first, "older".into()).await);
        assert_eq!(board.current().await, Some((second, "newer".to_string())));
    }

    #[tokio::test]
    async fn in_order_completion_is_kept() {
        let board = TipBoard::default();
        let first = board.begin();
        assert!(board.complete(first, "one".into()).await);
        let second = board.begin();
        assert!(board.complete(second, "two".into()).await);
        assert_eq!(board.current().await.map(|(_, tip)| tip).as_deref(), Some("two"));
    }
}
