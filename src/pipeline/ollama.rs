use serde::{Deserialize, Serialize};

use super::types::LlmBackend;
use super::GenerationError;

/// Request timeout for a single generation call, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Sampling temperature sent with every generation request.
const TEMPERATURE: f32 = 0.7;
/// Nucleus sampling cutoff for the generate endpoint.
const TOP_P: f32 = 0.9;

/// Ollama HTTP backend for local LLM inference (`/api/generate`).
pub struct OllamaBackend {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaBackend {
    /// Create a backend pointing at an Ollama instance.
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl LlmBackend for OllamaBackend {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: TEMPERATURE,
                top_p: TOP_P,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    GenerationError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    GenerationError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    GenerationError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::BackendStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| GenerationError::ResponseEnvelope(e.to_string()))?;

        Ok(parsed.response)
    }
}

/// Mock backend for testing — returns a configurable response or error.
pub struct MockBackend {
    response: Result<String, String>,
}

impl MockBackend {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
        }
    }
}

impl LlmBackend for MockBackend {
    fn generate(&self, _model: &str, _prompt: &str) -> Result<String, GenerationError> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(msg) => Err(GenerationError::HttpClient(msg.clone())),
        }
    }
}
