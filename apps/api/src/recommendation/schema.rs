//! Response schema sent as `generationConfig.responseSchema`.
//!
//! Mirrors `RecommendationRecord` field for field. Uses the upper-case type
//! names of the Gemini OpenAPI subset.

use serde_json::{json, Value};

pub fn recommendation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "topCareers": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "matchScore": { "type": "STRING" },
                        "reasoning": { "type": "STRING" }
                    },
                    "required": ["title", "matchScore", "reasoning"]
                }
            },
            "bestCareerRoadmap": {
                "type": "OBJECT",
                "properties": {
                    "careerTitle": { "type": "STRING" },
                    "description": { "type": "STRING" },
                    "phases": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "title": { "type": "STRING" },
                                "details": { "type": "ARRAY", "items": { "type": "STRING" } }
                            },
                            "required": ["title", "details"]
                        }
                    }
                },
                "required": ["careerTitle", "phases"]
            }
        },
        "required": ["topCareers", "bestCareerRoadmap"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_both_top_level_fields() {
        let schema = recommendation_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(required, vec!["topCareers", "bestCareerRoadmap"]);
    }

    #[test]
    fn test_schema_nests_phase_details_as_string_array() {
        let schema = recommendation_schema();
        let details = &schema["properties"]["bestCareerRoadmap"]["properties"]["phases"]["items"]
            ["properties"]["details"];
        assert_eq!(details["type"], "ARRAY");
        assert_eq!(details["items"]["type"], "STRING");
    }
}
