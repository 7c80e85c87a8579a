//! Job Match Scoring: pluggable, trait-based scorer for one (job, résumé) pair.
//!
//! `LlmMatchScorer` asks the completion service for a structured verdict and
//! degrades to `keyword_match` on any failure. `KeywordMatchScorer` is the
//! deterministic rule on its own.
//!
//! Scorers never fail: a result always comes back, clamped to 0 – 100.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::llm_client::prompts::{fill_template, JSON_ONLY_SYSTEM, NOT_SPECIFIED};
use crate::llm_client::{
    complete_within, parse_json_object, CompletionRequest, CompletionService, LlmError,
};
use crate::matching::models::{Job, JobMatchResult};
use crate::matching::prompts::{FALLBACK_REASONING, MATCH_PROMPT_TEMPLATE, MATCH_TEMPERATURE};

const SKILL_POINTS: u32 = 15;
const TITLE_POINTS: u32 = 20;
const MAX_SCORE: u32 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The match scorer trait. Implement this to swap backends without touching
/// the ranking engine or handlers.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(&self, job: &Job, resume_text: &str) -> JobMatchResult;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordMatchScorer
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic keyword-overlap scorer. No completion call.
pub struct KeywordMatchScorer;

#[async_trait]
impl MatchScorer for KeywordMatchScorer {
    async fn score(&self, job: &Job, resume_text: &str) -> JobMatchResult {
        keyword_match(job, resume_text)
    }
}

/// Fallback rule:
/// 1. +15 for every job skill found (case-insensitive substring) in the résumé,
///    recorded in `matching_skills` in job order
/// 2. +20 when the job title itself appears in the résumé
/// 3. capped at 100
pub fn keyword_match(job: &Job, resume_text: &str) -> JobMatchResult {
    let resume_lower = resume_text.to_lowercase();

    let matching_skills: Vec<String> = job
        .skills
        .iter()
        .filter(|skill| !skill.trim().is_empty())
        .filter(|skill| resume_lower.contains(&skill.to_lowercase()))
        .cloned()
        .collect();

    let mut score = SKILL_POINTS * matching_skills.len() as u32;

    let title = job.title.trim();
    if !title.is_empty() && resume_lower.contains(&title.to_lowercase()) {
        score += TITLE_POINTS;
    }

    JobMatchResult {
        score: score.min(MAX_SCORE),
        matching_skills,
        relevant_experience: vec![],
        keyword_alignment: vec![],
        reasoning: FALLBACK_REASONING.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmMatchScorer
// ────────────────────────────────────────────────────────────────────────────

/// Semantic scorer via the completion service, one call per pair.
pub struct LlmMatchScorer {
    llm: Arc<dyn CompletionService>,
    call_timeout: Duration,
}

impl LlmMatchScorer {
    pub fn new(llm: Arc<dyn CompletionService>, call_timeout: Duration) -> Self {
        Self { llm, call_timeout }
    }

    async fn request_match(&self, job: &Job, resume_text: &str) -> Result<JobMatchResult, LlmError> {
        let request = CompletionRequest::prompt(
            JSON_ONLY_SYSTEM,
            build_match_prompt(job, resume_text),
            MATCH_TEMPERATURE,
        );
        let raw = complete_within(self.llm.as_ref(), &request, self.call_timeout).await?;
        let verdict: RawVerdict = parse_json_object(&raw)?;
        verdict.into_result()
    }
}

#[async_trait]
impl MatchScorer for LlmMatchScorer {
    async fn score(&self, job: &Job, resume_text: &str) -> JobMatchResult {
        match self.request_match(job, resume_text).await {
            Ok(result) => {
                debug!("Scored job '{}' at {}", job.id, result.score);
                result
            }
            Err(e) => {
                warn!("Match scoring failed for job '{}', using keyword fallback: {e}", job.id);
                keyword_match(job, resume_text)
            }
        }
    }
}

fn build_match_prompt(job: &Job, resume_text: &str) -> String {
    let or_unspecified = |value: Option<&str>| -> String {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => NOT_SPECIFIED.to_string(),
        }
    };
    let skills = if job.skills.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        job.skills.join(", ")
    };

    let company = or_unspecified(Some(job.company.as_str()));
    let description = or_unspecified(job.description.as_deref());
    let location = or_unspecified(job.location.as_deref());
    let job_type = or_unspecified(job.job_type.as_deref());

    fill_template(
        MATCH_PROMPT_TEMPLATE,
        &[
            ("resume", resume_text),
            ("title", job.title.as_str()),
            ("company", company.as_str()),
            ("description", description.as_str()),
            ("skills", skills.as_str()),
            ("location", location.as_str()),
            ("job_type", job_type.as_str()),
        ],
    )
}

/// Model verdict before validation. The score arrives as loose JSON so a
/// non-numeric value can be rejected explicitly.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVerdict {
    #[serde(default)]
    score: Value,
    #[serde(default)]
    matching_skills: Option<Vec<String>>,
    #[serde(default)]
    relevant_experience: Option<Vec<String>>,
    #[serde(default)]
    keyword_alignment: Option<Vec<String>>,
    #[serde(default)]
    reasoning: Option<String>,
}

impl RawVerdict {
    fn into_result(self) -> Result<JobMatchResult, LlmError> {
        let score = match &self.score {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|s| s.is_finite())
        .ok_or_else(|| LlmError::InvalidOutput(format!("non-numeric score {}", self.score)))?;

        Ok(JobMatchResult {
            score: score.round().clamp(0.0, MAX_SCORE as f64) as u32,
            matching_skills: self.matching_skills.unwrap_or_default(),
            relevant_experience: self.relevant_experience.unwrap_or_default(),
            keyword_alignment: self.keyword_alignment.unwrap_or_default(),
            reasoning: self.reasoning.unwrap_or_default(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
