//! Batch Ranking Engine: scores every job in a set against one résumé.
//!
//! Scorer calls run concurrently, bounded by a semaphore shared across all
//! batches. Output keeps the input length and order; sorting and best-match
//! selection are left to the caller (see `selection`).

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::matching::models::{Job, JobMatchResult, RankedJob};
use crate::matching::scorer::{keyword_match, MatchScorer};

pub struct BatchRanker {
    scorer: Arc<dyn MatchScorer>,
    permits: Arc<Semaphore>,
    shutdown: CancellationToken,
}

impl BatchRanker {
    /// `max_in_flight` caps concurrent scorer calls; values below 1 are raised to 1.
    pub fn new(scorer: Arc<dyn MatchScorer>, max_in_flight: usize) -> Self {
        Self {
            scorer,
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
            shutdown: CancellationToken::new(),
        }
    }

    /// Batches started through `rank_all` are cut short when `shutdown` fires.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Scores every job. Element `i` of the output is `jobs[i]` merged with its result.
    pub async fn rank_all(&self, jobs: &[Job], resume_text: &str) -> Vec<RankedJob> {
        self.rank_all_until(jobs, resume_text, &self.shutdown).await
    }

    /// Like `rank_all`, but once `cancel` fires every job still waiting or in
    /// flight gets the keyword fallback instead, so the batch returns promptly
    /// with its shape intact.
    pub async fn rank_all_until(
        &self,
        jobs: &[Job],
        resume_text: &str,
        cancel: &CancellationToken,
    ) -> Vec<RankedJob> {
        info!("Ranking {} jobs", jobs.len());

        let results = join_all(
            jobs.iter()
                .map(|job| self.score_one(job, resume_text, cancel)),
        )
        .await;

        jobs.iter()
            .cloned()
            .zip(results)
            .map(|(job, result)| RankedJob::new(job, result))
            .collect()
    }

    async fn score_one(
        &self,
        job: &Job,
        resume_text: &str,
        cancel: &CancellationToken,
    ) -> JobMatchResult {
        let scored = async {
            // The semaphore is never closed, so acquire only fails if that changes.
            let Ok(_permit) = self.permits.acquire().await else {
                return keyword_match(job, resume_text);
            };
            self.scorer.score(job, resume_text).await
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Ranking cancelled before job '{}' was scored", job.id);
                keyword_match(job, resume_text)
            }
            result = scored => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::Map;

    use crate::llm_client::testing::ScriptedCompletion;
    use crate::matching::prompts::FALLBACK_REASONING;
    use crate::matching::scorer::LlmMatchScorer;

    fn make_job(id: &str, title: &str, skills: &[&str]) -> Job {
        Job {
            id: id.to_string(),
            title: title.to_string(),
            company: "Acme".to_string(),
            description: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            location: None,
            job_type: None,
            work_mode: None,
            posted_date: None,
            extra: Map::new(),
        }
    }

    /// Records peak concurrency; scores each job by its position in the id.
    struct SlowScorer {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SlowScorer {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MatchScorer for SlowScorer {
        async fn score(&self, job: &Job, _resume_text: &str) -> JobMatchResult {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let n: u32 = job.id.trim_start_matches("job-").parse().unwrap_or(0);
            JobMatchResult {
                score: n * 10,
                ..Default::default()
            }
        }
    }

    fn jobs(n: usize) -> Vec<Job> {
        (0..n)
            .map(|i| make_job(&format!("job-{i}"), "Engineer", &["Rust"]))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_rank_all_preserves_length_and_order() {
        let ranker = BatchRanker::new(Arc::new(SlowScorer::new()), 3);
        let input = jobs(7);

        let ranked = ranker.rank_all(&input, "resume").await;

        assert_eq!(ranked.len(), input.len());
        for (i, (ranked, original)) in ranked.iter().zip(&input).enumerate() {
            assert_eq!(&ranked.job, original);
            assert_eq!(ranked.match_score, i as u32 * 10);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rank_all_respects_concurrency_limit() {
        let scorer = Arc::new(SlowScorer::new());
        let ranker = BatchRanker::new(scorer.clone(), 2);

        ranker.rank_all(&jobs(6), "resume").await;

        assert_eq!(scorer.peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rank_all_runs_jobs_concurrently() {
        let scorer = Arc::new(SlowScorer::new());
        let ranker = BatchRanker::new(scorer.clone(), 8);

        let started = tokio::time::Instant::now();
        ranker.rank_all(&jobs(8), "resume").await;

        assert_eq!(scorer.peak.load(Ordering::SeqCst), 8);
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_rank_all_isolates_individual_failures() {
        // The completion service fails only for the ML job.
        let llm = ScriptedCompletion::responding(|request| {
            let prompt = &request.messages[0].content;
            if prompt.contains("Title: ML Engineer") {
                Err(crate::llm_client::testing::unavailable())
            } else {
                Ok(r#"{"score": 88, "matchingSkills": ["React"], "reasoning": "good"}"#.to_string())
            }
        });
        let scorer = LlmMatchScorer::new(Arc::new(llm), Duration::from_secs(5));
        let ranker = BatchRanker::new(Arc::new(scorer), 4);

        let input = vec![
            make_job("job-a", "Frontend Developer", &["React"]),
            make_job("job-b", "ML Engineer", &["Python", "React"]),
            make_job("job-c", "Full Stack Developer", &["React"]),
        ];
        let ranked = ranker.rank_all(&input, "React developer").await;

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].match_score, 88);
        assert_eq!(ranked[1].job.id, "job-b");
        assert_eq!(ranked[1].match_score, 15);
        let details = ranked[1].match_details.as_ref().unwrap();
        assert_eq!(details.reasoning, FALLBACK_REASONING);
        assert_eq!(ranked[2].match_score, 88);
    }

    #[tokio::test]
    async fn test_rank_all_empty_batch() {
        let ranker = BatchRanker::new(Arc::new(SlowScorer::new()), 2);
        assert!(ranker.rank_all(&[], "resume").await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_batch_falls_back_and_keeps_shape() {
        let scorer = LlmMatchScorer::new(
            Arc::new(ScriptedCompletion::hanging()),
            Duration::from_secs(3600),
        );
        let ranker = BatchRanker::new(Arc::new(scorer), 2);
        let input = vec![
            make_job("job-a", "Rust Engineer", &["Rust"]),
            make_job("job-b", "Go Engineer", &["Go"]),
            make_job("job-c", "Rust Engineer", &["Rust", "Tokio"]),
        ];

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let ranked = ranker
            .rank_all_until(&input, "Rust Engineer who loves Tokio", &cancel)
            .await;

        let scores: Vec<u32> = ranked.iter().map(|r| r.match_score).collect();
        assert_eq!(scores, vec![35, 0, 50]);
    }

    #[tokio::test]
    async fn test_shutdown_token_applies_to_rank_all() {
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let scorer = LlmMatchScorer::new(
            Arc::new(ScriptedCompletion::hanging()),
            Duration::from_secs(3600),
        );
        let ranker = BatchRanker::new(Arc::new(scorer), 2).with_shutdown(shutdown);

        let ranked = ranker
            .rank_all(&[make_job("job-a", "Rust Engineer", &["Rust"])], "Rust")
            .await;
        assert_eq!(ranked[0].match_score, 15);
    }

    #[tokio::test]
    async fn test_zero_limit_is_raised_to_one() {
        let ranker = BatchRanker::new(Arc::new(SlowScorer::new()), 0);
        let ranked = ranker.rank_all(&jobs(2), "resume").await;
        assert_eq!(ranked.len(), 2);
    }
}
