use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-09-2025:generateContent";

/// Fragments of the stock placeholder shipped in sample configs.
/// A key containing one of these is treated as not configured.
const PLACEHOLDER_KEY_MARKERS: &[&str] = &["YOUR_GOOGLE", "enter your api key"];

/// Application configuration loaded from environment variables.
/// Every value has a default; a missing credential switches the service to fallback mode.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub recommendation_timeout: Duration,
    pub fallback_record_path: Option<PathBuf>,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = optional_env("RECOMMENDATION_TIMEOUT_SECS")
            .unwrap_or_else(|| "60".to_string())
            .parse::<u64>()
            .context("RECOMMENDATION_TIMEOUT_SECS must be a whole number of seconds")?;
        if timeout_secs == 0 {
            bail!("RECOMMENDATION_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            port: optional_env("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            gemini_api_key: usable_api_key(optional_env("GEMINI_API_KEY")),
            gemini_api_url: optional_env("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
            recommendation_timeout: Duration::from_secs(timeout_secs),
            fallback_record_path: optional_env("FALLBACK_RECORD_PATH").map(PathBuf::from),
            static_dir: optional_env("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("gemini_api_url", &self.gemini_api_url)
            .field("recommendation_timeout", &self.recommendation_timeout)
            .field("fallback_record_path", &self.fallback_record_path)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

/// Reads an env var, treating an empty or whitespace-only value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn usable_api_key(raw: Option<String>) -> Option<String> {
    raw.filter(|key| {
        let lower = key.to_lowercase();
        !PLACEHOLDER_KEY_MARKERS
            .iter()
            .any(|marker| lower.contains(&marker.to_lowercase()))
    })
}
