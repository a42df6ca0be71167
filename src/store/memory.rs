use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::job::{Job, JobStatus};
use crate::models::window::BlockedWindow;
use crate::models::worker::{Worker, WorkerStatus};
use crate::store::{CompletionStats, SchedulingStore};

/// DashMap-backed store. List methods sort before returning because
/// DashMap iteration order is not deterministic and the engine needs a
/// stable input order for tie-breaking.
#[derive(Default)]
pub struct MemoryStore {
    jobs: DashMap<Uuid, Job>,
    workers: DashMap<Uuid, Worker>,
    windows: DashMap<Uuid, BlockedWindow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }
}

impl SchedulingStore for MemoryStore {
    fn job(&self, id: Uuid) -> Option<Job> {
        self.jobs.get(&id).map(|entry| entry.value().clone())
    }

    fn insert_job(&self, job: Job) {
        self.jobs.insert(job.id, job);
    }

    fn update_job_status(&self, id: Uuid, status: JobStatus) -> Option<Job> {
        let mut job = self.jobs.get_mut(&id)?;
        job.status = status;
        Some(job.clone())
    }

    fn assign_worker(&self, job_id: Uuid, worker_id: Uuid) -> Option<Job> {
        let mut job = self.jobs.get_mut(&job_id)?;
        if !job.assigned_worker_ids.contains(&worker_id) {
            job.assigned_worker_ids.push(worker_id);
        }
        Some(job.clone())
    }

    fn active_jobs_on_date(&self, provider_id: Uuid, date: NaiveDate) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .jobs
            .iter()
            .filter(|entry| {
                let job = entry.value();
                job.provider_id == provider_id
                    && job.date() == date
                    && job.status != JobStatus::Cancelled
            })
            .map(|entry| entry.value().clone())
            .collect();
        jobs.sort_by(|a, b| (a.start, a.id).cmp(&(b.start, b.id)));
        jobs
    }

    fn overlapping_assigned_jobs(&self, job: &Job) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .jobs
            .iter()
            .filter(|entry| {
                let other = entry.value();
                other.id != job.id
                    && other.provider_id == job.provider_id
                    && other.status.occupies_schedule()
                    && other
                        .assigned_worker_ids
                        .iter()
                        .any(|id| job.assigned_worker_ids.contains(id))
                    && other.overlaps(job)
            })
            .map(|entry| entry.value().clone())
            .collect();
        jobs.sort_by(|a, b| (a.start, a.id).cmp(&(b.start, b.id)));
        jobs
    }

    fn worker(&self, id: Uuid) -> Option<Worker> {
        self.workers.get(&id).map(|entry| entry.value().clone())
    }

    fn insert_worker(&self, worker: Worker) {
        self.workers.insert(worker.id, worker);
    }

    fn update_worker_status(&self, id: Uuid, status: WorkerStatus) -> Option<Worker> {
        let mut worker = self.workers.get_mut(&id)?;
        worker.status = status;
        Some(worker.clone())
    }

    fn active_workers(&self, provider_id: Uuid) -> Vec<Worker> {
        let mut workers: Vec<Worker> = self
            .workers
            .iter()
            .filter(|entry| {
                let worker = entry.value();
                worker.provider_id == provider_id && worker.status == WorkerStatus::Active
            })
            .map(|entry| entry.value().clone())
            .collect();
        workers.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        workers
    }

    fn list_workers(&self) -> Vec<Worker> {
        let mut workers: Vec<Worker> = self
            .workers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        workers.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        workers
    }

    fn insert_window(&self, window: BlockedWindow) {
        self.windows.insert(window.id, window);
    }

    fn list_windows(&self) -> Vec<BlockedWindow> {
        let mut windows: Vec<BlockedWindow> = self
            .windows
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        windows.sort_by(|a, b| (a.from_date, a.id).cmp(&(b.from_date, b.id)));
        windows
    }

    fn windows_covering(&self, provider_id: Uuid, date: NaiveDate) -> Vec<BlockedWindow> {
        let mut windows: Vec<BlockedWindow> = self
            .windows
            .iter()
            .filter(|entry| {
                let window = entry.value();
                window.provider_id == provider_id && window.covers_date(date)
            })
            .map(|entry| entry.value().clone())
            .collect();
        windows.sort_by(|a, b| (a.from_date, a.id).cmp(&(b.from_date, b.id)));
        windows
    }

    fn completion_stats(&self, worker_id: Uuid, since: DateTime<Utc>) -> CompletionStats {
        let mut stats = CompletionStats::default();
        for entry in self.jobs.iter() {
            let job = entry.value();
            if job.start < since
                || !job.is_assigned_to(worker_id)
                || job.status == JobStatus::Cancelled
            {
                continue;
            }
            stats.assigned += 1;
            if job.status == JobStatus::Completed {
                stats.completed += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::MemoryStore;
    use crate::models::address::Address;
    use crate::models::job::{Job, JobStatus};
    use crate::store::SchedulingStore;

    fn job_for(provider_id: Uuid, worker_id: Uuid, status: JobStatus, days_ago: i64) -> Job {
        let start = Utc.with_ymd_and_hms(2025, 6, 6, 9, 0, 0).unwrap() - Duration::days(days_ago);
        Job {
            id: Uuid::new_v4(),
            provider_id,
            service_type: "plumbing".to_string(),
            start,
            end: start + Duration::hours(2),
            address: Address::parse("1 Elm St, Springfield, IL 62704"),
            estimated_value: 200.0,
            assigned_worker_ids: vec![worker_id],
            status,
            created_at: start,
        }
    }

    #[test]
    fn completion_stats_exclude_cancelled_from_denominator() {
        let store = MemoryStore::new();
        let provider = Uuid::new_v4();
        let worker = Uuid::new_v4();

        store.insert_job(job_for(provider, worker, JobStatus::Completed, 1));
        store.insert_job(job_for(provider, worker, JobStatus::Completed, 2));
        store.insert_job(job_for(provider, worker, JobStatus::NoShow, 3));
        store.insert_job(job_for(provider, worker, JobStatus::Cancelled, 4));

        let since = Utc.with_ymd_and_hms(2025, 5, 7, 0, 0, 0).unwrap();
        let stats = store.completion_stats(worker, since);
        assert_eq!(stats.assigned, 3);
        assert_eq!(stats.completed, 2);
    }

    #[test]
    fn completion_stats_ignore_jobs_before_window() {
        let store = MemoryStore::new();
        let provider = Uuid::new_v4();
        let worker = Uuid::new_v4();

        store.insert_job(job_for(provider, worker, JobStatus::Completed, 60));

        let since = Utc.with_ymd_and_hms(2025, 5, 7, 0, 0, 0).unwrap();
        let stats = store.completion_stats(worker, since);
        assert_eq!(stats.assigned, 0);
        assert!(stats.completion_rate().is_none());
    }

    #[test]
    fn active_jobs_on_date_excludes_cancelled() {
        let store = MemoryStore::new();
        let provider = Uuid::new_v4();
        let worker = Uuid::new_v4();

        store.insert_job(job_for(provider, worker, JobStatus::Scheduled, 0));
        store.insert_job(job_for(provider, worker, JobStatus::Cancelled, 0));

        let jobs = store.active_jobs_on_date(provider, chrono::NaiveDate::from_ymd_opt(2025, 6, 6).unwrap());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].status, JobStatus::Scheduled);
    }
}
