use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::RemoteError;

/// Hard cap on audio payload size before base64 encoding
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

const DEFAULT_TRANSCRIPTION_URL: &str =
    "https://api-inference.huggingface.co/models/openai/whisper-large-v3";
const DEFAULT_REASONING_URL: &str =
    "https://api-inference.huggingface.co/models/google/gemma-2-9b-it";

/// Sampling parameters for one reasoning-model call
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

/// The two remote model operations the pipeline depends on.
///
/// Production code uses [`InferenceClient`]; tests substitute deterministic
/// fakes so retry and fallback paths can be exercised offline.
#[allow(async_fn_in_trait)]
pub trait RemoteModel {
    /// Speech-to-text over a raw audio payload
    async fn transcribe(&self, audio: &[u8]) -> Result<String, RemoteError>;

    /// Free-text generation from a reasoning prompt
    async fn generate(&self, prompt: &str, params: &GenerationParams)
    -> Result<String, RemoteError>;
}

/// Configuration for the hosted inference endpoints
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// API token (from HF_API_TOKEN env var)
    pub api_token: String,
    /// Speech-to-text endpoint
    pub transcription_url: String,
    /// Reasoning endpoint (classification and semantic comparison)
    pub reasoning_url: String,
}

impl InferenceConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_token =
            std::env::var("HF_API_TOKEN").context("HF_API_TOKEN environment variable not set")?;

        Ok(Self {
            api_token,
            transcription_url: std::env::var("MAYDAY_TRANSCRIPTION_URL")
                .unwrap_or_else(|_| DEFAULT_TRANSCRIPTION_URL.to_string()),
            reasoning_url: std::env::var("MAYDAY_REASONING_URL")
                .unwrap_or_else(|_| DEFAULT_REASONING_URL.to_string()),
        })
    }
}

/// Client for the hosted inference endpoints
pub struct InferenceClient {
    client: Client,
    config: InferenceConfig,
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn post_json(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, RemoteError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))
    }
}

/// Map an HTTP error status to the retry taxonomy
fn map_status(status: u16, body: &str) -> RemoteError {
    match status {
        429 => RemoteError::RateLimited,
        401 => RemoteError::InvalidToken,
        503 => RemoteError::ModelLoading,
        400 if body.contains("File name too long") || body.contains("filename") => {
            RemoteError::MalformedInput(format!("endpoint rejected request: {}", body))
        }
        _ => RemoteError::Transport(format!("HTTP {}: {}", status, body)),
    }
}

impl RemoteModel for InferenceClient {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, RemoteError> {
        if audio.len() > MAX_AUDIO_BYTES {
            return Err(RemoteError::MalformedInput(format!(
                "audio payload is {:.1}MB, limit is 25MB",
                audio.len() as f64 / 1024.0 / 1024.0
            )));
        }

        let payload = json!({ "inputs": BASE64.encode(audio) });
        let value = self.post_json(&self.config.transcription_url, payload).await?;

        let parsed: TranscriptionResponse =
            serde_json::from_value(value).map_err(|e| RemoteError::Parse(e.to_string()))?;
        parsed
            .text
            .or(parsed.transcription)
            .ok_or_else(|| RemoteError::Parse("no text field in transcription response".to_string()))
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, RemoteError> {
        let payload = json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": params.max_new_tokens,
                "temperature": params.temperature,
                "top_p": params.top_p,
            },
        });
        let value = self.post_json(&self.config.reasoning_url, payload).await?;
        extract_generated_text(&value)
            .ok_or_else(|| RemoteError::Parse("no generated text in response".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    transcription: Option<String>,
}

/// The inference endpoint returns either `[{"generated_text": ...}]`,
/// a bare `{"generated_text": ...}`, or `{"text": ...}`
fn extract_generated_text(value: &serde_json::Value) -> Option<String> {
    let object = match value {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    object
        .get("generated_text")
        .or_else(|| object.get("text"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_status() {
        assert!(matches!(map_status(429, ""), RemoteError::RateLimited));
        assert!(matches!(map_status(401, ""), RemoteError::InvalidToken));
        assert!(matches!(map_status(503, ""), RemoteError::ModelLoading));
        assert!(matches!(
            map_status(400, "File name too long"),
            RemoteError::MalformedInput(_)
        ));
        assert!(matches!(
            map_status(400, "bad filename in request"),
            RemoteError::MalformedInput(_)
        ));
        // a 400 without the filename marker is an ordinary transport failure
        assert!(matches!(map_status(400, "bad audio"), RemoteError::Transport(_)));
        assert!(matches!(map_status(500, "oops"), RemoteError::Transport(_)));
    }

    #[test]
    fn test_extract_generated_text() {
        let array = serde_json::json!([{"generated_text": "hello"}]);
        assert_eq!(extract_generated_text(&array).as_deref(), Some("hello"));

        let object = serde_json::json!({"generated_text": "hi"});
        assert_eq!(extract_generated_text(&object).as_deref(), Some("hi"));

        let text = serde_json::json!({"text": "plain"});
        assert_eq!(extract_generated_text(&text).as_deref(), Some("plain"));

        let none = serde_json::json!({"other": 1});
        assert_eq!(extract_generated_text(&none), None);
    }
}
