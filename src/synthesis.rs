//! Client for the upstream synthesis engine.
//!
//! The engine speaks the OpenAI speech API but expects the family name in
//! `model` and an explicit, already resolved `language`.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::retry::{with_retry_if, RetryConfig};

/// Body sent to the engine after resolution.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamSpeechRequest<'a> {
    pub model: &'a str,
    pub input: &'a str,
    pub voice: &'a str,
    pub language: &'a str,
    pub response_format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
}

#[derive(Debug)]
pub struct SynthesizedAudio {
    pub bytes: Vec<u8>,
    /// Content type reported by the engine, if any
    pub content_type: Option<String>,
}

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("synthesis backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("synthesis backend returned {status}: {body}")]
    Upstream { status: u16, body: String },
}

impl SynthesisError {
    /// Connection failures and 5xx responses may succeed on a later attempt.
    /// Timeouts are not retried: the engine may still be working on the
    /// request, and another attempt would wait out the full timeout again.
    pub fn is_retryable(&self) -> bool {
        match self {
            SynthesisError::Transport(e) => !e.is_timeout(),
            SynthesisError::Upstream { status, .. } => *status >= 500,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SynthesisClient {
    http: reqwest::Client,
    url: String,
    retry: RetryConfig,
}

impl SynthesisClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build synthesis HTTP client")?;

        Ok(Self {
            http,
            url: url.into(),
            retry: RetryConfig::synthesis(),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Send a resolved request to the engine and collect the audio.
    pub async fn synthesize(
        &self,
        request: &UpstreamSpeechRequest<'_>,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        info!(
            "Synthesizing {} chars with {} ({})",
            request.input.chars().count(),
            request.model,
            request.language
        );

        with_retry_if(
            &self.retry,
            "Synthesis",
            || self.send_once(request),
            SynthesisError::is_retryable,
        )
        .await
    }

    async fn send_once(
        &self,
        request: &UpstreamSpeechRequest<'_>,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        let response = self.http.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        Ok(SynthesizedAudio {
            bytes,
            content_type,
        })
    }
}
