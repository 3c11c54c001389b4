use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::api::{ApiError, AppState};
use crate::synthesis::UpstreamSpeechRequest;

pub const RESOLVED_LANGUAGE_HEADER: HeaderName = HeaderName::from_static("x-resolved-language");
pub const MODEL_FAMILY_HEADER: HeaderName = HeaderName::from_static("x-model-family");

const DEFAULT_VOICE: &str = "default";
const MIN_SPEED: f32 = 0.25;
const MAX_SPEED: f32 = 4.0;

/// Body of `POST /v1/audio/speech`.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechRequest {
    pub model: String,
    pub input: String,
    #[serde(default)]
    pub voice: Option<String>,
    /// Only honored when `model` does not pin a language
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub response_format: Option<String>,
    #[serde(default)]
    pub speed: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
    Pcm,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Mp3 => "mp3",
            ResponseFormat::Opus => "opus",
            ResponseFormat::Aac => "aac",
            ResponseFormat::Flac => "flac",
            ResponseFormat::Wav => "wav",
            ResponseFormat::Pcm => "pcm",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ResponseFormat::Mp3 => "audio/mpeg",
            ResponseFormat::Opus => "audio/opus",
            ResponseFormat::Aac => "audio/aac",
            ResponseFormat::Flac => "audio/flac",
            ResponseFormat::Wav => "audio/wav",
            ResponseFormat::Pcm => "audio/pcm",
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp3" => Ok(ResponseFormat::Mp3),
            "opus" => Ok(ResponseFormat::Opus),
            "aac" => Ok(ResponseFormat::Aac),
            "flac" => Ok(ResponseFormat::Flac),
            "wav" => Ok(ResponseFormat::Wav),
            "pcm" => Ok(ResponseFormat::Pcm),
            other => Err(ApiError::invalid(
                format!(
                    "Unsupported response_format '{}'. Expected one of mp3, opus, aac, flac, wav, pcm",
                    other
                ),
                "response_format",
            )),
        }
    }
}

/// `POST /v1/audio/speech`
///
/// Resolution runs before anything is sent upstream, so an unknown model or
/// language is rejected without touching the engine.
pub async fn create_speech(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::InvalidRequest {
        message: rejection.body_text(),
        param: None,
    })?;

    let resolved = state
        .resolver
        .resolve(&request.model, request.language.as_deref())?;

    info!(
        "Resolved model '{}' -> family {} language {} (source: {:?}, requested: {:?})",
        request.model,
        resolved.model_family,
        resolved.effective_language,
        resolved.language_source,
        request.language
    );

    validate_input(&request.input, state.max_input_chars)?;
    let format = request
        .response_format
        .as_deref()
        .map(ResponseFormat::from_str)
        .transpose()?
        .unwrap_or_default();
    if let Some(speed) = request.speed {
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return Err(ApiError::invalid(
                format!("speed must be between {} and {}", MIN_SPEED, MAX_SPEED),
                "speed",
            ));
        }
    }

    let backend = state.backend.as_ref().ok_or(ApiError::BackendUnavailable)?;

    let upstream = UpstreamSpeechRequest {
        model: &resolved.model_family,
        input: &request.input,
        voice: request
            .voice
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_VOICE),
        language: resolved.effective_language.code(),
        response_format: format.as_str(),
        speed: request.speed,
    };
    let audio = backend.synthesize(&upstream).await?;

    let content_type = audio
        .content_type
        .unwrap_or_else(|| format.content_type().to_string());

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                RESOLVED_LANGUAGE_HEADER,
                resolved.effective_language.code().to_string(),
            ),
            (MODEL_FAMILY_HEADER, resolved.model_family.clone()),
        ],
        audio.bytes,
    ))
}

fn validate_input(input: &str, max_chars: usize) -> Result<(), ApiError> {
    if input.trim().is_empty() {
        return Err(ApiError::invalid("input must not be empty", "input"));
    }

    let chars = input.chars().count();
    if chars > max_chars {
        return Err(ApiError::invalid(
            format!("input is {} characters, maximum is {}", chars, max_chars),
            "input",
        ));
    }

    Ok(())
}
