use serde::{Deserialize, Serialize};

/// One suggested career with the model's match label and rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerMatch {
    pub title: String,
    /// Display label such as "92%". Never parsed as a number.
    pub match_score: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub title: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRoadmap {
    pub career_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub phases: Vec<RoadmapPhase>,
}

/// Structured recommendation returned by the model (or the fallback).
///
/// Required fields are enforced by deserialization; `validate` adds the
/// non-emptiness checks that serde cannot express.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRecord {
    pub top_careers: Vec<CareerMatch>,
    pub best_career_roadmap: CareerRoadmap,
}

impl RecommendationRecord {
    /// Returns a description of the first structural problem, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.top_careers.is_empty() {
            return Err("topCareers must contain at least one career".to_string());
        }
        if self.best_career_roadmap.phases.is_empty() {
            return Err("bestCareerRoadmap.phases must contain at least one phase".to_string());
        }
        Ok(())
    }
}
