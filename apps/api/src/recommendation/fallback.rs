//! Fallback recommendation used when no model credential is configured.
//!
//! The built-in record ships with the binary; `FALLBACK_RECORD_PATH` may point
//! at a `{ "version": ..., "record": ... }` file that replaces it. Either way
//! the record is validated once at startup.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::recommendation::models::RecommendationRecord;

pub const BUILTIN_FALLBACK_VERSION: &str = "builtin-v1";

const BUILTIN_FALLBACK_RECORD: &str = r#"{
    "topCareers": [
        { "title": "Strategic Consultant", "matchScore": "95%", "reasoning": "High aptitude for logical breaking down of complex tasks and focus on influential outcomes." },
        { "title": "User Experience Researcher", "matchScore": "88%", "reasoning": "Strong interest in human behavior combined with visual communication preferences." },
        { "title": "Organizational Psychologist", "matchScore": "82%", "reasoning": "Ideal for those who value societal impact and helping individuals within systems." }
    ],
    "bestCareerRoadmap": {
        "careerTitle": "Strategic Consultant",
        "description": "A path focused on solving high-level business and social organizational challenges.",
        "phases": [
            { "title": "Phase 1: Analytical Foundations", "details": ["Master critical thinking frameworks.", "Learn basic market research methods."] },
            { "title": "Phase 2: Industry Expertise", "details": ["Focus on a specific sector (e.g., Tech or Law).", "Develop case-study presentation skills."] },
            { "title": "Phase 3: Client Portfolio", "details": ["Work on live internship projects.", "Build a portfolio of problem-solving reports."] },
            { "title": "Phase 4: Advanced Leadership", "details": ["Get certified in Project Management.", "Apply for junior analyst roles at top firms."] }
        ]
    }
}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackRecord {
    pub version: String,
    pub record: RecommendationRecord,
}

impl FallbackRecord {
    pub fn builtin() -> Result<Self> {
        let record: RecommendationRecord = serde_json::from_str(BUILTIN_FALLBACK_RECORD)
            .context("built-in fallback record is not valid JSON for the recommendation shape")?;
        Self::checked(BUILTIN_FALLBACK_VERSION.to_string(), record)
    }

    /// Loads the configured fallback, or the built-in one when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Self::builtin();
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fallback record {}", path.display()))?;
        let parsed: FallbackRecord = serde_json::from_str(&raw)
            .with_context(|| format!("fallback record {} has the wrong shape", path.display()))?;
        Self::checked(parsed.version, parsed.record)
    }

    fn checked(version: String, record: RecommendationRecord) -> Result<Self> {
        record
            .validate()
            .map_err(|reason| anyhow!("fallback record '{version}' is invalid: {reason}"))?;
        Ok(Self { version, record })
    }
}
