//! Axum route handlers for job ranking.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assistant::filters::FilterDelta;
use crate::errors::AppError;
use crate::matching::models::{Job, RankedJob};
use crate::matching::selection::{
    best_matches, filter_by_match_score, filter_jobs, sort_by_score_desc,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankJobsRequest {
    pub jobs: Vec<Job>,
    /// Already-extracted résumé text. Without it jobs are listed unscored.
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub filters: FilterDelta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankJobsResponse {
    pub jobs: Vec<RankedJob>,
    pub total: usize,
    pub best_matches: Vec<RankedJob>,
}

/// POST /api/jobs/rank
///
/// Filter → score every remaining job against the résumé → sort by score →
/// pick best matches. Scoring failures degrade per job and never fail the request.
pub async fn handle_rank_jobs(
    State(state): State<AppState>,
    Json(request): Json<RankJobsRequest>,
) -> Result<Json<RankJobsResponse>, AppError> {
    let RankJobsRequest {
        jobs,
        resume_text,
        filters,
    } = request;

    let jobs = filter_jobs(jobs, &filters, Utc::now());

    let ranked = match resume_text.as_deref().map(str::trim) {
        Some(resume) if !resume.is_empty() => state.ranker.rank_all(&jobs, resume).await,
        _ => jobs.into_iter().map(RankedJob::unscored).collect(),
    };

    let mut ranked = filter_by_match_score(ranked, &filters);
    sort_by_score_desc(&mut ranked);
    let best = best_matches(&ranked);
    info!(
        "Ranked {} jobs, {} best matches",
        ranked.len(),
        best.len()
    );

    Ok(Json(RankJobsResponse {
        total: ranked.len(),
        jobs: ranked,
        best_matches: best,
    }))
}
