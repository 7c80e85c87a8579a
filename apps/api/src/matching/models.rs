use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A job posting as supplied by the catalog. Fields the matcher does not use
/// (apply URL, salary, ...) ride along in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outcome of scoring one (job, résumé) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchResult {
    /// 0 – 100
    pub score: u32,
    pub matching_skills: Vec<String>,
    pub relevant_experience: Vec<String>,
    pub keyword_alignment: Vec<String>,
    pub reasoning: String,
}

/// Explanation half of a `JobMatchResult`, as attached to a ranked job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetails {
    pub matching_skills: Vec<String>,
    pub relevant_experience: Vec<String>,
    pub keyword_alignment: Vec<String>,
    pub reasoning: String,
}

/// A job merged with its match result. Built fresh; the input job is not modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedJob {
    #[serde(flatten)]
    pub job: Job,
    pub match_score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_details: Option<MatchDetails>,
}

impl RankedJob {
    pub fn new(job: Job, result: JobMatchResult) -> Self {
        Self {
            job: without_match_keys(job),
            match_score: result.score,
            match_details: Some(MatchDetails {
                matching_skills: result.matching_skills,
                relevant_experience: result.relevant_experience,
                keyword_alignment: result.keyword_alignment,
                reasoning: result.reasoning,
            }),
        }
    }

    /// A job listed without scoring, e.g. when the user has no résumé.
    pub fn unscored(job: Job) -> Self {
        Self {
            job: without_match_keys(job),
            match_score: 0,
            match_details: None,
        }
    }
}

// Stale match keys in the pass-through fields would collide with ours when flattened.
fn without_match_keys(mut job: Job) -> Job {
    job.extra.remove("matchScore");
    job.extra.remove("matchDetails");
    job
}
