//! Live checks against a running speech server.
//!
//! 1. A language-specific variant (`chatterbox-multilingual-es`) must win over
//!    a conflicting `language: "en"` and still produce audio.
//! 2. `GET /v1/models` must publish the language-specific variants.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

pub const VARIANT_MODEL: &str = "chatterbox-multilingual-es";
pub const VARIANT_PREFIX: &str = "chatterbox-multilingual-";
const SAMPLE_SUFFIXES: &[&str] = &["-es", "-fr", "-zh"];
const MAX_SAMPLES: usize = 5;

#[derive(Debug, Clone)]
pub struct SmokeConfig {
    pub server_url: String,
    pub api_key: Option<String>,
    pub output_path: PathBuf,
}

impl SmokeConfig {
    pub fn from_env() -> Self {
        Self {
            server_url: std::env::var("TTS_SERVER_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:59363".to_string()),
            api_key: std::env::var("API_KEY").ok().filter(|k| !k.is_empty()),
            output_path: std::env::var("SMOKE_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("test_spanish_model_variant.mp3")),
        }
    }
}

#[derive(Debug)]
pub struct VariantCheck {
    pub bytes_written: usize,
    /// Language echoed back by the server, when it reports one
    pub resolved_language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListedModel {
    pub id: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct ListedModels {
    data: Vec<ListedModel>,
}

#[derive(Debug)]
pub struct ModelsCheck {
    pub language_specific: usize,
    pub samples: Vec<ListedModel>,
}

fn authorized(request: reqwest::RequestBuilder, config: &SmokeConfig) -> reqwest::RequestBuilder {
    match &config.api_key {
        Some(key) => request.bearer_auth(key),
        None => request,
    }
}

/// Request Spanish audio through the variant model while asking for English.
pub async fn check_language_variant(
    client: &reqwest::Client,
    config: &SmokeConfig,
) -> Result<VariantCheck> {
    let payload = json!({
        "model": VARIANT_MODEL,
        "input": "Hola, ¿cómo estás? Este es una prueba del sistema de texto a voz.",
        "voice": "default",
        "language": "en",
        "response_format": "mp3",
    });

    let response = authorized(
        client.post(format!("{}/v1/audio/speech", config.server_url)),
        config,
    )
    .json(&payload)
    .send()
    .await
    .context("Failed to send speech request")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("Speech request failed ({}): {}", status, body);
    }

    let resolved_language = response
        .headers()
        .get("x-resolved-language")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if let Some(language) = &resolved_language {
        if language != "es" {
            bail!("Server resolved language '{}', expected 'es'", language);
        }
    }

    let audio = response.bytes().await.context("Failed to read audio body")?;
    tokio::fs::write(&config.output_path, &audio)
        .await
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;

    Ok(VariantCheck {
        bytes_written: audio.len(),
        resolved_language,
    })
}

/// Fetch the model listing and count the language-specific variants.
pub async fn check_language_models(
    client: &reqwest::Client,
    config: &SmokeConfig,
) -> Result<ModelsCheck> {
    let response = authorized(client.get(format!("{}/v1/models", config.server_url)), config)
        .send()
        .await
        .context("Failed to send models request")?;

    let status = response.status();
    if !status.is_success() {
        bail!("Models request failed ({})", status);
    }

    let models: ListedModels = response
        .json()
        .await
        .context("Failed to parse models response")?;

    let language_specific = models
        .data
        .iter()
        .filter(|m| m.id.starts_with(VARIANT_PREFIX))
        .count();
    if language_specific == 0 {
        bail!("No {}* models listed", VARIANT_PREFIX);
    }

    let samples = models
        .data
        .into_iter()
        .filter(|m| SAMPLE_SUFFIXES.iter().any(|s| m.id.contains(s)))
        .take(MAX_SAMPLES)
        .collect();

    Ok(ModelsCheck {
        language_specific,
        samples,
    })
}

/// Run both checks, logging the outcome of each. Returns whether all passed.
pub async fn run(config: &SmokeConfig) -> bool {
    let client = reqwest::Client::new();
    let mut passed = true;

    info!("Check 1: {} with conflicting language='en'", VARIANT_MODEL);
    match check_language_variant(&client, config).await {
        Ok(check) => {
            info!(
                "✅ Audio saved to {} ({} bytes)",
                config.output_path.display(),
                check.bytes_written
            );
            match check.resolved_language {
                Some(language) => info!("✅ Server resolved language: {}", language),
                None => info!("Server did not report the resolved language"),
            }
        }
        Err(e) => {
            error!("❌ {:#}", e);
            passed = false;
        }
    }

    info!("Check 2: language-specific models are listed");
    match check_language_models(&client, config).await {
        Ok(check) => {
            info!("✅ Found {} language-specific models", check.language_specific);
            for model in &check.samples {
                info!("  - {}: {}", model.id, model.description);
            }
        }
        Err(e) => {
            error!("❌ {:#}", e);
            passed = false;
        }
    }

    passed
}
