//! Recommender — pluggable, trait-based source of career recommendations.
//!
//! `LlmRecommender` asks the configured model for a structured record.
//! `FallbackRecommender` returns the configured fallback record ("demo mode")
//! and is selected at startup when no credential is available.
//!
//! `AppState` holds an `Arc<dyn Recommender>`, swapped at startup via config.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{LlmClient, LlmError};
use crate::models::profile::Profile;
use crate::recommendation::fallback::FallbackRecord;
use crate::recommendation::models::RecommendationRecord;
use crate::recommendation::prompts::{
    ASSESSMENT_PROMPT_TEMPLATE, CAREER_COUNSELOR_SYSTEM, KNOWN_FIELDS,
    MISSING_FIELD_PLACEHOLDER, MISSING_MESSAGE_PLACEHOLDER, UNNAMED_STUDENT,
};
use crate::recommendation::schema::recommendation_schema;

#[derive(Debug, Error)]
pub enum RecommendError {
    /// Network failure, timeout, or non-success status from the model service.
    #[error("recommendation service unavailable: {0}")]
    Upstream(String),

    /// The model answered, but not with a record of the required shape.
    #[error("recommendation response violated the schema: {0}")]
    Schema(String),
}

impl From<LlmError> for RecommendError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(e) => RecommendError::Upstream(e.to_string()),
            LlmError::Api { status, message } => {
                RecommendError::Upstream(format!("status {status}: {message}"))
            }
            LlmError::Parse(e) => RecommendError::Schema(e.to_string()),
            LlmError::EmptyContent => RecommendError::Schema("empty model output".to_string()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap recommendation backends without touching the
/// session flow or the HTTP handlers.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(&self, profile: &Profile) -> Result<RecommendationRecord, RecommendError>;

    /// Short backend name for health output and logs.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// Fallback backend
// ────────────────────────────────────────────────────────────────────────────

pub struct FallbackRecommender {
    fallback: Arc<FallbackRecord>,
}

impl FallbackRecommender {
    pub fn new(fallback: FallbackRecord) -> Self {
        Self {
            fallback: Arc::new(fallback),
        }
    }
}

#[async_trait]
impl Recommender for FallbackRecommender {
    async fn recommend(&self, profile: &Profile) -> Result<RecommendationRecord, RecommendError> {
        info!(
            "Serving fallback record '{}' for {}",
            self.fallback.version,
            student_name(profile)
        );
        Ok(self.fallback.record.clone())
    }

    fn backend(&self) -> &'static str {
        "fallback"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LLM backend
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmRecommender {
    llm: LlmClient,
    schema: Value,
}

impl LlmRecommender {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            schema: recommendation_schema(),
        }
    }
}

#[async_trait]
impl Recommender for LlmRecommender {
    async fn recommend(&self, profile: &Profile) -> Result<RecommendationRecord, RecommendError> {
        let prompt = build_assessment_prompt(profile);
        info!("Requesting career path for {}", student_name(profile));

        let record: RecommendationRecord = self
            .llm
            .call_json(&prompt, CAREER_COUNSELOR_SYSTEM, &self.schema)
            .await
            .map_err(|e| {
                warn!("Recommendation call failed: {e}");
                RecommendError::from(e)
            })?;

        record.validate().map_err(RecommendError::Schema)?;
        Ok(record)
    }

    fn backend(&self) -> &'static str {
        "gemini"
    }
}

/// Picks the backend for the configured credential.
pub fn select_recommender(llm: Option<LlmClient>, fallback: FallbackRecord) -> Arc<dyn Recommender> {
    match llm {
        Some(llm) => {
            info!("Recommender backend: gemini");
            Arc::new(LlmRecommender::new(llm))
        }
        None => {
            warn!(
                "No model API key configured; serving fallback record '{}'",
                fallback.version
            );
            Arc::new(FallbackRecommender::new(fallback))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt construction
// ────────────────────────────────────────────────────────────────────────────

fn student_name(profile: &Profile) -> &str {
    profile
        .get("fullName")
        .map(String::as_str)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(UNNAMED_STUDENT)
}

/// Renders every profile field into a deterministic block: known fields first
/// in their fixed order, then any remaining fields in key order.
pub fn build_assessment_prompt(profile: &Profile) -> String {
    let mut lines = Vec::with_capacity(profile.len() + KNOWN_FIELDS.len());

    for (key, label) in KNOWN_FIELDS {
        let placeholder = if *key == "message" {
            MISSING_MESSAGE_PLACEHOLDER
        } else {
            MISSING_FIELD_PLACEHOLDER
        };
        let value = profile
            .get(*key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(placeholder);
        lines.push(format!("- {label}: {value}"));
    }

    for (key, value) in profile {
        if KNOWN_FIELDS.iter().any(|(known, _)| *known == key.as_str()) {
            continue;
        }
        let value = if value.trim().is_empty() {
            MISSING_FIELD_PLACEHOLDER
        } else {
            value.as_str()
        };
        lines.push(format!("- {key}: {value}"));
    }

    ASSESSMENT_PROMPT_TEMPLATE
        .replace("{name}", student_name(profile))
        .replace("{profile_block}", &lines.join("\n"))
}
