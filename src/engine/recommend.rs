use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::job::Job;
use crate::models::score::{FactorScores, ScoreResult};
use crate::models::worker::Worker;
use crate::store::{CompletionStats, SchedulingStore};

use super::explain::explain;
use super::scoring::{self, Weights};

pub const DEFAULT_LIMIT: usize = 5;
const PERFORMANCE_WINDOW_DAYS: i64 = 30;

/// Scores one worker against a candidate job. `day_jobs` are the worker's
/// other jobs on the job's day; pure over its inputs.
pub fn score_worker(
    weights: &Weights,
    job: &Job,
    worker: &Worker,
    day_jobs: &[Job],
    stats: CompletionStats,
) -> ScoreResult {
    let skill = scoring::skill_match(job, worker);
    let factors = FactorScores {
        skill: skill.score,
        availability: scoring::availability(job, day_jobs),
        capacity: scoring::capacity(day_jobs),
        proximity: scoring::proximity(job, day_jobs),
        performance: scoring::performance(stats),
    };
    let total_score = scoring::weighted_total(weights, &factors);
    let day_load = scoring::day_load_percent(day_jobs);
    let (reasoning, warnings) =
        explain(&job.service_type, &factors, skill.matched.as_ref(), day_load);

    ScoreResult {
        worker_id: worker.id,
        worker_name: worker.name.clone(),
        factors,
        total_score,
        match_quality: scoring::match_quality(total_score),
        reasoning,
        warnings,
        current_capacity: day_load.round() as u32,
        jobs_today: day_jobs.len(),
    }
}

/// Ranks the provider's active workers for the job, best first. Ties keep
/// the store's deterministic worker order; two calls against unchanged
/// data return identical results.
pub fn recommend(
    store: &dyn SchedulingStore,
    weights: &Weights,
    job_id: Uuid,
    limit: usize,
) -> Result<Vec<ScoreResult>, AppError> {
    let job = store
        .job(job_id)
        .ok_or_else(|| AppError::NotFound(format!("job {job_id} not found")))?;

    let workers = store.active_workers(job.provider_id);
    if workers.is_empty() {
        return Err(AppError::NotFound(format!(
            "no active workers for provider {}",
            job.provider_id
        )));
    }

    let day_jobs = store.active_jobs_on_date(job.provider_id, job.date());
    let since = Utc::now() - Duration::days(PERFORMANCE_WINDOW_DAYS);

    let mut results: Vec<ScoreResult> = workers
        .iter()
        .map(|worker| {
            let worker_day_jobs: Vec<Job> = day_jobs
                .iter()
                .filter(|other| other.id != job.id && other.is_assigned_to(worker.id))
                .cloned()
                .collect();
            let stats = store.completion_stats(worker.id, since);
            score_worker(weights, &job, worker, &worker_day_jobs, stats)
        })
        .collect();

    // Stable sort: equal totals keep input order.
    results.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    results.truncate(limit);
    Ok(results)
}
