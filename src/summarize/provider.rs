//! Summary Providers
//!
//! Defines the provider trait and the HTTP backends for remote completion
//! services.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{SummaryError, SummaryProviderKind};

/// Summary provider trait
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> SummaryProviderKind;

    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Submit a prompt and return the generated text
    async fn generate(&self, prompt: &str) -> Result<String, SummaryError>;
}

/// Turn a non-2xx response into an `Api` error carrying the body
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SummaryError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(SummaryError::Api { status, body })
}

// ============================================================================
// Gemini
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Google Gemini provider
pub struct GeminiProvider {
    client: reqwest::Client,
    /// API root, e.g. `https://generativelanguage.googleapis.com/v1beta`
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl SummaryProvider for GeminiProvider {
    fn provider_type(&self) -> SummaryProviderKind {
        SummaryProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummaryError::Request(e.to_string()))?;

        let response: GenerateContentResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| SummaryError::MalformedResponse(e.to_string()))?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(SummaryError::EmptyResponse);
        }

        Ok(text)
    }
}

// ============================================================================
// OpenAI-compatible
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// OpenAI-compatible chat completions provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    /// API root, e.g. `https://api.openai.com/v1`
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl SummaryProvider for OpenAiProvider {
    fn provider_type(&self) -> SummaryProviderKind {
        SummaryProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummaryError::Request(e.to_string()))?;

        let response: ChatResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| SummaryError::MalformedResponse(e.to_string()))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(SummaryError::EmptyResponse);
        }

        Ok(text)
    }
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockProvider {
    pub response: Result<String, String>,
    pub prompts: parking_lot::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            prompts: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            prompts: parking_lot::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl SummaryProvider for MockProvider {
    fn provider_type(&self) -> SummaryProviderKind {
        SummaryProviderKind::Stub
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        self.prompts.lock().push(prompt.to_string());
        self.response.clone().map_err(SummaryError::Request)
    }
}
