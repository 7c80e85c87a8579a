//! Job-list shaping around the ranking engine: filtering by a `FilterDelta`,
//! ordering by score and picking best matches.

use chrono::{DateTime, TimeDelta, Utc};

use crate::assistant::filters::FilterDelta;
use crate::matching::models::{Job, RankedJob};

/// Best matches must score strictly above this.
pub const BEST_MATCH_THRESHOLD: u32 = 70;
pub const BEST_MATCH_LIMIT: usize = 8;

const HIGH_MATCH_MIN: u32 = 70;
const MEDIUM_MATCH_MIN: u32 = 40;

/// Applies every catalog-level filter (all but `matchScore`, which needs
/// scores and is applied by `filter_by_match_score`).
pub fn filter_jobs(jobs: Vec<Job>, filters: &FilterDelta, now: DateTime<Utc>) -> Vec<Job> {
    jobs.into_iter()
        .filter(|job| job_passes(job, filters, now))
        .collect()
}

fn job_passes(job: &Job, filters: &FilterDelta, now: DateTime<Utc>) -> bool {
    let contains = |haystack: &str, needle: &str| {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    };
    let equals = |value: Option<&str>, wanted: &str| {
        value.is_some_and(|v| v.eq_ignore_ascii_case(wanted))
    };

    if let Some(role) = &filters.role {
        if !contains(&job.title, role) {
            return false;
        }
    }

    if let Some(skills) = filters.skills.as_ref().filter(|s| !s.is_empty()) {
        let any_skill = skills
            .iter()
            .any(|wanted| job.skills.iter().any(|have| contains(have, wanted)));
        if !any_skill {
            return false;
        }
    }

    if let Some(max_age) = filters.date_posted.as_deref().and_then(max_age_hours) {
        // Jobs without a posting date cannot prove they are recent enough.
        let Some(posted) = job.posted_date else {
            return false;
        };
        // Full precision: a job 24h30m old is outside the "24h" window.
        if now - posted > TimeDelta::hours(max_age) {
            return false;
        }
    }

    if let Some(job_type) = &filters.job_type {
        if !equals(job.job_type.as_deref(), job_type) {
            return false;
        }
    }

    if let Some(work_mode) = &filters.work_mode {
        if !equals(job.work_mode.as_deref(), work_mode) {
            return false;
        }
    }

    if let Some(location) = &filters.location {
        if !job.location.as_deref().is_some_and(|l| contains(l, location)) {
            return false;
        }
    }

    true
}

/// "24h" / "week" / "month" windows in hours. "any" and unknown values do not filter.
fn max_age_hours(window: &str) -> Option<i64> {
    match window.to_lowercase().as_str() {
        "24h" => Some(24),
        "week" => Some(168),
        "month" => Some(720),
        _ => None,
    }
}

/// "high" keeps scores ≥ 70, "medium" keeps 40 – 69; anything else keeps all.
pub fn filter_by_match_score(ranked: Vec<RankedJob>, filters: &FilterDelta) -> Vec<RankedJob> {
    let band: Option<(u32, u32)> = match filters.match_score.as_deref().map(str::to_lowercase) {
        Some(level) if level == "high" => Some((HIGH_MATCH_MIN, u32::MAX)),
        Some(level) if level == "medium" => Some((MEDIUM_MATCH_MIN, HIGH_MATCH_MIN)),
        _ => None,
    };

    match band {
        Some((min, max)) => ranked
            .into_iter()
            .filter(|r| r.match_score >= min && r.match_score < max)
            .collect(),
        None => ranked,
    }
}

/// Highest score first. Stable, so equal scores keep catalog order.
pub fn sort_by_score_desc(ranked: &mut [RankedJob]) {
    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
}

/// Top jobs above the best-match threshold. Expects a list already sorted by score.
pub fn best_matches(sorted: &[RankedJob]) -> Vec<RankedJob> {
    sorted
        .iter()
        .filter(|r| r.match_score > BEST_MATCH_THRESHOLD)
        .take(BEST_MATCH_LIMIT)
        .cloned()
        .collect()
}
