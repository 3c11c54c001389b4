use anyhow::{Context, Result};

use crate::i18n::{Language, LanguageRegistry};

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub api_key: Option<String>,

    // Resolution
    pub default_language: Language,

    // Upstream synthesis engine
    pub synthesis_backend_url: Option<String>,
    pub backend_timeout_secs: u64,

    // Request limits
    pub max_input_chars: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_language_code = std::env::var("DEFAULT_LANGUAGE")
            .unwrap_or_else(|_| LanguageRegistry::get().fallback().code.to_string());
        let default_language = LanguageRegistry::get()
            .language(default_language_code.trim())
            .with_context(|| {
                format!("DEFAULT_LANGUAGE '{}' is not a registered language", default_language_code)
            })?;

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            // Empty string means auth disabled
            api_key: std::env::var("API_KEY").ok().filter(|k| !k.is_empty()),

            default_language,

            synthesis_backend_url: std::env::var("SYNTHESIS_BACKEND_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            backend_timeout_secs: std::env::var("BACKEND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),

            max_input_chars: std::env::var("MAX_INPUT_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4096),
        })
    }
}
