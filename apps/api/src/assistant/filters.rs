//! Filter Extractor: turns a search/filter request into a null-free `FilterDelta`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::assistant::prompts::{EXTRACTION_TEMPERATURE, FILTER_PROMPT_TEMPLATE};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{
    complete_within, parse_json_object, CompletionRequest, CompletionService, LlmError,
};

/// Partial set of job-search constraints. Absent fields are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    /// "24h" | "week" | "month" | "any"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<String>,
    /// "full-time" | "part-time" | "contract" | "internship"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    /// "remote" | "hybrid" | "on-site"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// "high" | "medium" | "all"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<String>,
}

impl FilterDelta {
    pub fn is_empty(&self) -> bool {
        *self == FilterDelta::default()
    }

    /// Shallow merge: every field present in `newer` overwrites this one.
    pub fn merge(&mut self, newer: FilterDelta) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.role, newer.role);
        take(&mut self.skills, newer.skills);
        take(&mut self.date_posted, newer.date_posted);
        take(&mut self.job_type, newer.job_type);
        take(&mut self.work_mode, newer.work_mode);
        take(&mut self.location, newer.location);
        take(&mut self.match_score, newer.match_score);
    }

    /// Builds a delta from a model-produced JSON object.
    ///
    /// Nulls, unknown keys and values of the wrong JSON type are dropped field
    /// by field, so one bad field never discards the rest.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let text = |key: &str| -> Option<String> {
            match object.get(key)? {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Null | Value::String(_) => None,
                other => {
                    debug!("Dropping filter field '{key}' with non-string value {other}");
                    None
                }
            }
        };

        let skills = match object.get("skills") {
            Some(Value::Array(items)) => {
                let skills: Vec<String> = items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                (!skills.is_empty()).then_some(skills)
            }
            Some(Value::String(s)) if !s.trim().is_empty() => Some(vec![s.trim().to_string()]),
            _ => None,
        };

        FilterDelta {
            role: text("role"),
            skills,
            date_posted: text("datePosted"),
            job_type: text("jobType"),
            work_mode: text("workMode"),
            location: text("location"),
            match_score: text("matchScore"),
        }
    }
}

/// Extracts filters from a message. Never fails: call errors, missing JSON
/// and malformed JSON all yield an empty delta.
pub async fn extract_filters(
    message: &str,
    llm: &dyn CompletionService,
    call_timeout: Duration,
) -> FilterDelta {
    match request_filters(message, llm, call_timeout).await {
        Ok(delta) => delta,
        Err(e) => {
            warn!("Filter extraction failed, applying no filters: {e}");
            FilterDelta::default()
        }
    }
}

async fn request_filters(
    message: &str,
    llm: &dyn CompletionService,
    call_timeout: Duration,
) -> Result<FilterDelta, LlmError> {
    let prompt = FILTER_PROMPT_TEMPLATE.replace("{message}", message);
    let request = CompletionRequest::prompt(JSON_ONLY_SYSTEM, prompt, EXTRACTION_TEMPERATURE);
    let raw = complete_within(llm, &request, call_timeout).await?;

    let object: Map<String, Value> = parse_json_object(&raw)?;
    let delta = FilterDelta::from_json_object(&object);
    debug!("Extracted filters: {delta:?}");
    Ok(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedCompletion;
    use serde_json::json;

    const TIMEOUT: Duration = Duration::from_secs(5);

    const FILTER_FIELDS: [&str; 7] = [
        "role",
        "skills",
        "datePosted",
        "jobType",
        "workMode",
        "location",
        "matchScore",
    ];

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn test_empty_delta_serializes_to_empty_object() {
        let json = serde_json::to_value(FilterDelta::default()).unwrap();
        assert_eq!(json, json!({}));
    }

    #[test]
    fn test_from_json_object_drops_nulls() {
        let delta = FilterDelta::from_json_object(&object(json!({
            "role": null,
            "skills": null,
            "datePosted": null,
            "jobType": "full-time",
            "workMode": null,
            "location": "Bangalore",
            "matchScore": null
        })));

        assert_eq!(
            serde_json::to_value(&delta).unwrap(),
            json!({"jobType": "full-time", "location": "Bangalore"})
        );
    }

    #[test]
    fn test_from_json_object_ignores_unknown_keys() {
        let delta = FilterDelta::from_json_object(&object(json!({
            "role": "frontend",
            "salary": "200k",
            "seniority": "senior"
        })));

        let json = serde_json::to_value(&delta).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["role"]);
    }

    #[test]
    fn test_from_json_object_drops_mistyped_field_only() {
        let delta = FilterDelta::from_json_object(&object(json!({
            "role": 42,
            "workMode": "remote"
        })));
        assert_eq!(delta.role, None);
        assert_eq!(delta.work_mode.as_deref(), Some("remote"));
    }

    #[test]
    fn test_from_json_object_accepts_single_skill_string() {
        let delta = FilterDelta::from_json_object(&object(json!({"skills": "Rust"})));
        assert_eq!(delta.skills, Some(vec!["Rust".to_string()]));
    }

    #[test]
    fn test_from_json_object_drops_empty_skill_list() {
        let delta = FilterDelta::from_json_object(&object(json!({"skills": ["", "  "]})));
        assert!(delta.is_empty());
    }

    #[test]
    fn test_merge_overwrites_present_fields_and_keeps_others() {
        let mut current = FilterDelta {
            role: Some("backend".to_string()),
            location: Some("Pune".to_string()),
            ..Default::default()
        };
        current.merge(FilterDelta {
            role: Some("frontend".to_string()),
            work_mode: Some("remote".to_string()),
            ..Default::default()
        });

        assert_eq!(current.role.as_deref(), Some("frontend"));
        assert_eq!(current.location.as_deref(), Some("Pune"));
        assert_eq!(current.work_mode.as_deref(), Some("remote"));
    }

    #[test]
    fn test_serialized_keys_are_subset_of_filter_fields() {
        let delta = FilterDelta {
            role: Some("a".to_string()),
            skills: Some(vec!["b".to_string()]),
            date_posted: Some("week".to_string()),
            job_type: Some("contract".to_string()),
            work_mode: Some("hybrid".to_string()),
            location: Some("Delhi".to_string()),
            match_score: Some("high".to_string()),
        };
        let json = serde_json::to_value(&delta).unwrap();
        for key in json.as_object().unwrap().keys() {
            assert!(FILTER_FIELDS.contains(&key.as_str()), "unexpected key {key}");
        }
        assert_eq!(json.as_object().unwrap().len(), FILTER_FIELDS.len());
    }

    #[tokio::test]
    async fn test_extract_react_developer_scenario() {
        let reply = r#"{"role": "React developer", "skills": ["React"], "datePosted": null, "jobType": null, "workMode": null, "location": null, "matchScore": null}"#;
        let llm = ScriptedCompletion::new(vec![Ok(reply.to_string())]);

        let delta = extract_filters("Show me React developer jobs", &llm, TIMEOUT).await;

        assert_eq!(
            serde_json::to_value(&delta).unwrap(),
            json!({"role": "React developer", "skills": ["React"]})
        );
    }

    #[tokio::test]
    async fn test_extract_tolerates_prose_around_json() {
        let reply = "Sure! Here are the filters:\n{\"workMode\": \"remote\", \"role\": \"frontend\"}\nLet me know.";
        let llm = ScriptedCompletion::new(vec![Ok(reply.to_string())]);

        let delta = extract_filters("Remote frontend jobs", &llm, TIMEOUT).await;
        assert_eq!(delta.work_mode.as_deref(), Some("remote"));
        assert_eq!(delta.role.as_deref(), Some("frontend"));
    }

    #[tokio::test]
    async fn test_extract_without_json_is_empty() {
        let llm = ScriptedCompletion::new(vec![Ok("I'm not sure what you mean.".to_string())]);
        assert!(extract_filters("???", &llm, TIMEOUT).await.is_empty());
    }

    #[tokio::test]
    async fn test_extract_malformed_json_is_empty() {
        let llm = ScriptedCompletion::new(vec![Ok("{\"role\": \"frontend\",}".to_string())]);
        assert!(extract_filters("frontend", &llm, TIMEOUT).await.is_empty());
    }

    #[tokio::test]
    async fn test_extract_service_failure_is_empty() {
        let llm = ScriptedCompletion::failing();
        assert!(extract_filters("remote jobs", &llm, TIMEOUT).await.is_empty());
        assert_eq!(llm.call_count(), 1);
    }
}
