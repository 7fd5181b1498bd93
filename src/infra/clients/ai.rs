//! Speech-to-text and the chat-completion assistant.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{ClientError, RetryPolicy};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ChatResponder: Send + Sync {
    async fn respond(&self, prompt: &str) -> Result<String, ClientError>;
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe raw audio; `format` is the file extension (`wav`, `flac`, ...).
    async fn transcribe(&self, audio: &[u8], format: &str) -> Result<String, ClientError>;
}

pub struct UnconfiguredChat;

#[async_trait]
impl ChatResponder for UnconfiguredChat {
    async fn respond(&self, _prompt: &str) -> Result<String, ClientError> {
        Err(ClientError::NotConfigured("ai"))
    }
}

pub struct UnconfiguredTranscriber;

#[async_trait]
impl Transcriber for UnconfiguredTranscriber {
    async fn transcribe(&self, _audio: &[u8], _format: &str) -> Result<String, ClientError> {
        Err(ClientError::NotConfigured("speech-to-text"))
    }
}

/// OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiChatResponder {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl OpenAiChatResponder {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            api_key,
            model: model.into(),
            retry,
        }
    }

    async fn complete(&self, prompt: &str) -> Result<Completion, ClientError> {
        let mut request = self.client.post(&self.url).json(&json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ClientError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChatResponder for OpenAiChatResponder {
    async fn respond(&self, prompt: &str) -> Result<String, ClientError> {
        let completion = self.retry.run("ai", || self.complete(prompt)).await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ClientError::Decode("completion had no choices".into()))
    }
}

/// Speech endpoint taking the raw audio body and answering `{"text": ...}`.
pub struct HttpTranscriber {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct Transcript {
    text: String,
}

impl HttpTranscriber {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        api_key: Option<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            api_key,
            retry,
        }
    }

    async fn post(&self, audio: &[u8], format: &str) -> Result<Transcript, ClientError> {
        let mut request = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, format!("audio/{}", format))
            .body(audio.to_vec());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ClientError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio: &[u8], format: &str) -> Result<String, ClientError> {
        let transcript = self
            .retry
            .run("speech-to-text", || self.post(audio, format))
            .await?;
        Ok(transcript.text)
    }
}
