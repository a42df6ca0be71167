use serde::{Deserialize, Serialize};

use crate::models::job::Job;
use crate::models::score::{FactorScores, MatchQuality};
use crate::models::worker::{Capabilities, Skill, SkillLevel, Worker, WorkerRole};
use crate::store::CompletionStats;

/// Factor weights. Replaceable configuration; the defaults are the tuned
/// production values and must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weights {
    pub skill: f64,
    pub availability: f64,
    pub capacity: f64,
    pub proximity: f64,
    pub performance: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            skill: 0.30,
            availability: 0.25,
            capacity: 0.20,
            proximity: 0.15,
            performance: 0.10,
        }
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.skill + self.availability + self.capacity + self.proximity + self.performance
    }
}

// Bucket boundaries shared with the explanation generator; keeping them
// here is what stops the explanations drifting from the calculators.
pub(crate) const SKILL_STRONG: u8 = 90;
pub(crate) const SKILL_BASIC_ONLY: u8 = 75;
pub(crate) const SKILL_MISSING: u8 = 40;
pub(crate) const AVAILABILITY_FULL: u8 = 100;
pub(crate) const AVAILABILITY_MINOR: u8 = 70;
pub(crate) const AVAILABILITY_CONFLICT: u8 = 50;
pub(crate) const CAPACITY_LIGHT: u8 = 85;
pub(crate) const CAPACITY_HEAVY: u8 = 30;
pub(crate) const PROXIMITY_CLOSE: u8 = 80;
pub(crate) const PROXIMITY_FAR: u8 = 40;
pub(crate) const PERFORMANCE_TOP: u8 = 90;
pub(crate) const PERFORMANCE_LOW: u8 = 50;

const WORK_DAY_HOURS: f64 = 8.0;

/// Related-skill lookup, keyed by canonical service names. A worker whose
/// skills only neighbor the requested service still scores, just lower
/// than a direct match.
static RELATED_SKILLS: &[(&str, &[&str])] = &[
    ("lawn mowing", &["lawn care", "landscaping", "yard maintenance", "gardening"]),
    ("landscaping", &["lawn care", "lawn mowing", "gardening", "tree trimming"]),
    ("house cleaning", &["cleaning", "janitorial", "housekeeping", "maid service"]),
    ("deep cleaning", &["cleaning", "housekeeping", "carpet cleaning"]),
    ("plumbing", &["pipe repair", "drain cleaning", "water heater"]),
    ("electrical", &["wiring", "lighting", "electrician"]),
    ("hvac", &["heating", "cooling", "air conditioning", "ventilation"]),
    ("pest control", &["exterminator", "fumigation"]),
    ("painting", &["drywall", "wall repair"]),
    ("snow removal", &["plowing", "de-icing"]),
    ("pressure washing", &["power washing", "exterior cleaning"]),
];

#[derive(Debug, Clone)]
pub struct MatchedSkill {
    pub name: String,
    pub level: Option<SkillLevel>,
}

#[derive(Debug, Clone)]
pub struct SkillMatch {
    pub score: u8,
    pub matched: Option<MatchedSkill>,
}

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn related_keywords(service: &str) -> Vec<&'static str> {
    let mut keywords = Vec::new();
    for (canonical, related) in RELATED_SKILLS {
        if contains_either(service, canonical) {
            keywords.extend_from_slice(related);
        }
    }
    keywords
}

fn service_tokens(service: &str) -> Vec<&str> {
    service
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| token.len() > 3)
        .collect()
}

fn leveled(level: SkillLevel, expert: u8, intermediate: u8, basic: u8) -> u8 {
    match level {
        SkillLevel::Expert => expert,
        SkillLevel::Intermediate => intermediate,
        SkillLevel::Basic => basic,
    }
}

fn best_of<'a>(
    skills: impl Iterator<Item = (u8, &'a Skill)>,
) -> Option<SkillMatch> {
    skills
        .max_by_key(|(score, _)| *score)
        .map(|(score, skill)| SkillMatch {
            score,
            matched: Some(MatchedSkill {
                name: skill.name.clone(),
                level: Some(skill.level),
            }),
        })
}

fn legacy_hit(score: u8, name: &str) -> SkillMatch {
    SkillMatch {
        score,
        matched: Some(MatchedSkill {
            name: name.to_string(),
            level: None,
        }),
    }
}

/// How well the worker's skills cover the job's service type, in [10, 100].
/// A direct name match short-circuits; then the related-skill table; then
/// raw keyword overlap. Never returns 0: an unskilled field worker bottoms
/// out at 30 and anyone else at 10, so recommendation lists are never empty.
pub fn skill_match(job: &Job, worker: &Worker) -> SkillMatch {
    let service = job.service_type.to_lowercase();

    match &worker.capabilities {
        Capabilities::Leveled(skills) => {
            let direct = best_of(
                skills
                    .iter()
                    .filter(|skill| contains_either(&service, &skill.name.to_lowercase()))
                    .map(|skill| (leveled(skill.level, 100, 90, 75), skill)),
            );
            if let Some(hit) = direct {
                return hit;
            }

            let keywords = related_keywords(&service);
            let related = best_of(
                skills
                    .iter()
                    .filter(|skill| {
                        let name = skill.name.to_lowercase();
                        keywords.iter().any(|kw| contains_either(&name, kw))
                    })
                    .map(|skill| (leveled(skill.level, 70, 55, 45), skill)),
            );
            if let Some(hit) = related {
                return hit;
            }

            let tokens = service_tokens(&service);
            let keyword = best_of(
                skills
                    .iter()
                    .filter(|skill| {
                        let name = skill.name.to_lowercase();
                        tokens.iter().any(|token| name.contains(token))
                    })
                    .map(|skill| (leveled(skill.level, 50, 40, 30), skill)),
            );
            if let Some(hit) = keyword {
                return hit;
            }

            SkillMatch {
                score: baseline(worker.role),
                matched: None,
            }
        }
        Capabilities::Legacy(names) => {
            if let Some(name) = names
                .iter()
                .find(|name| contains_either(&service, &name.to_lowercase()))
            {
                return legacy_hit(100, name);
            }

            let keywords = related_keywords(&service);
            if let Some(name) = names.iter().find(|name| {
                let lower = name.to_lowercase();
                keywords.iter().any(|kw| contains_either(&lower, kw))
            }) {
                return legacy_hit(60, name);
            }

            let tokens = service_tokens(&service);
            if let Some(name) = names.iter().find(|name| {
                let lower = name.to_lowercase();
                tokens.iter().any(|token| lower.contains(token))
            }) {
                return legacy_hit(40, name);
            }

            SkillMatch {
                score: baseline(worker.role),
                matched: None,
            }
        }
    }
}

fn baseline(role: WorkerRole) -> u8 {
    if role == WorkerRole::FieldWorker { 30 } else { 10 }
}

/// Scores the worst schedule collision against the candidate job.
/// `day_jobs` are the worker's other jobs on the same day. Up to 15
/// minutes of overlap is treated as an acceptable buffer; past an hour
/// the factor vetoes the worker through the weighted average.
pub fn availability(candidate: &Job, day_jobs: &[Job]) -> u8 {
    if day_jobs.is_empty() {
        return 100;
    }

    let worst_overlap = day_jobs
        .iter()
        .map(|job| candidate.overlap_minutes(job))
        .max()
        .unwrap_or(0);

    match worst_overlap {
        0 => 100,
        1..=15 => 70,
        16..=30 => 50,
        31..=60 => 25,
        _ => 0,
    }
}

/// Share of an assumed 8-hour day already booked, as a percentage.
pub fn day_load_percent(day_jobs: &[Job]) -> f64 {
    let minutes: i64 = day_jobs.iter().map(Job::duration_minutes).sum();
    let hours = minutes as f64 / 60.0;
    hours / WORK_DAY_HOURS * 100.0
}

/// Rewards lighter same-day load.
pub fn capacity(day_jobs: &[Job]) -> u8 {
    let percent = day_load_percent(day_jobs);
    if percent <= 40.0 {
        100
    } else if percent <= 60.0 {
        85
    } else if percent <= 75.0 {
        70
    } else if percent <= 90.0 {
        40
    } else {
        10
    }
}

/// Address-heuristic closeness to the worker's last stop before the
/// candidate job. Precedence is fixed: exact zip, then exact city, then
/// 3-digit zip prefix; with no address signal on both sides the
/// scheduling gap decides. Neutral 70 when there is no prior stop.
pub fn proximity(candidate: &Job, day_jobs: &[Job]) -> u8 {
    let Some(prior) = day_jobs
        .iter()
        .filter(|job| job.end <= candidate.start)
        .max_by_key(|job| (job.end, job.id))
    else {
        return 70;
    };

    let a = &prior.address;
    let b = &candidate.address;

    if let (Some(zip_a), Some(zip_b)) = (&a.zip, &b.zip) {
        if zip_a == zip_b {
            return 100;
        }
    }
    if let (Some(city_a), Some(city_b)) = (&a.city, &b.city) {
        if city_a == city_b {
            return 90;
        }
    }
    if let (Some(pre_a), Some(pre_b)) = (a.zip_prefix(), b.zip_prefix()) {
        if pre_a == pre_b {
            return 80;
        }
    }

    let gap_minutes = (candidate.start - prior.end).num_minutes();
    if gap_minutes >= 60 {
        70
    } else if gap_minutes >= 30 {
        50
    } else {
        30
    }
}

/// Trailing-30-day completion rate, neutral 70 with no history.
pub fn performance(stats: CompletionStats) -> u8 {
    match stats.completion_rate() {
        None => 70,
        Some(rate) if rate >= 0.95 => 100,
        Some(rate) if rate >= 0.85 => 85,
        Some(rate) if rate >= 0.75 => 70,
        Some(rate) if rate >= 0.60 => 50,
        Some(_) => 30,
    }
}

pub fn weighted_total(weights: &Weights, factors: &FactorScores) -> u8 {
    let total = factors.skill as f64 * weights.skill
        + factors.availability as f64 * weights.availability
        + factors.capacity as f64 * weights.capacity
        + factors.proximity as f64 * weights.proximity
        + factors.performance as f64 * weights.performance;
    total.round() as u8
}

pub fn match_quality(total_score: u8) -> MatchQuality {
    if total_score >= 80 {
        MatchQuality::Excellent
    } else if total_score >= 60 {
        MatchQuality::Good
    } else if total_score >= 40 {
        MatchQuality::Fair
    } else {
        MatchQuality::Poor
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::models::address::Address;
    use crate::models::job::JobStatus;
    use crate::models::worker::{Skill, WorkerStatus};

    fn job_at(start_hm: (u32, u32), end_hm: (u32, u32), address: &str) -> Job {
        Job {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            service_type: "lawn mowing".to_string(),
            start: Utc
                .with_ymd_and_hms(2025, 6, 6, start_hm.0, start_hm.1, 0)
                .unwrap(),
            end: Utc
                .with_ymd_and_hms(2025, 6, 6, end_hm.0, end_hm.1, 0)
                .unwrap(),
            address: Address::parse(address),
            estimated_value: 90.0,
            assigned_worker_ids: vec![],
            status: JobStatus::Scheduled,
            created_at: Utc::now(),
        }
    }

    fn leveled_worker(skills: Vec<(&str, SkillLevel)>) -> Worker {
        Worker {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            name: "test".to_string(),
            role: WorkerRole::FieldWorker,
            status: WorkerStatus::Active,
            capabilities: Capabilities::Leveled(
                skills
                    .into_iter()
                    .map(|(name, level)| Skill {
                        name: name.to_string(),
                        category: None,
                        level,
                    })
                    .collect(),
            ),
            created_at: Utc::now(),
        }
    }

    fn legacy_worker(skills: Vec<&str>, role: WorkerRole) -> Worker {
        Worker {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            name: "legacy".to_string(),
            role,
            status: WorkerStatus::Active,
            capabilities: Capabilities::Legacy(skills.into_iter().map(str::to_string).collect()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn default_weights_sum_to_one() {
        let weights = Weights::default();
        assert!((weights.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn direct_skill_match_scales_with_level() {
        let job = job_at((9, 0), (10, 0), "1 Elm St");
        for (level, expected) in [
            (SkillLevel::Expert, 100),
            (SkillLevel::Intermediate, 90),
            (SkillLevel::Basic, 75),
        ] {
            let worker = leveled_worker(vec![("Lawn Mowing", level)]);
            let result = skill_match(&job, &worker);
            assert_eq!(result.score, expected);
            let matched = result.matched.unwrap();
            assert_eq!(matched.name, "Lawn Mowing");
            assert_eq!(matched.level, Some(level));
        }
    }

    #[test]
    fn related_skill_scores_below_direct() {
        let job = job_at((9, 0), (10, 0), "1 Elm St");
        let worker = leveled_worker(vec![("Landscaping", SkillLevel::Expert)]);
        assert_eq!(skill_match(&job, &worker).score, 70);

        let worker = leveled_worker(vec![("Landscaping", SkillLevel::Basic)]);
        assert_eq!(skill_match(&job, &worker).score, 45);
    }

    #[test]
    fn keyword_fallback_uses_long_tokens_only() {
        let mut job = job_at((9, 0), (10, 0), "1 Elm St");
        job.service_type = "roof inspection".to_string();
        // "roof" is only 4 characters so it survives tokenization and
        // substring-hits "roofing".
        let worker = leveled_worker(vec![("roofing", SkillLevel::Intermediate)]);
        assert_eq!(skill_match(&job, &worker).score, 40);
    }

    #[test]
    fn best_match_within_tier_wins() {
        let job = job_at((9, 0), (10, 0), "1 Elm St");
        let worker = leveled_worker(vec![
            ("Lawn Mowing", SkillLevel::Basic),
            ("Mowing", SkillLevel::Expert),
        ]);
        // Both direct-match; the expert one scores higher.
        assert_eq!(skill_match(&job, &worker).score, 100);
    }

    #[test]
    fn unskilled_field_worker_keeps_baseline() {
        let job = job_at((9, 0), (10, 0), "1 Elm St");
        let worker = legacy_worker(vec![], WorkerRole::FieldWorker);
        assert_eq!(skill_match(&job, &worker).score, 30);

        let office = legacy_worker(vec![], WorkerRole::Dispatcher);
        assert_eq!(skill_match(&job, &office).score, 10);
    }

    #[test]
    fn legacy_skill_list_matches_flat() {
        let job = job_at((9, 0), (10, 0), "1 Elm St");
        assert_eq!(
            skill_match(&job, &legacy_worker(vec!["lawn mowing"], WorkerRole::FieldWorker)).score,
            100
        );
        assert_eq!(
            skill_match(&job, &legacy_worker(vec!["lawn care"], WorkerRole::FieldWorker)).score,
            60
        );
        assert_eq!(
            skill_match(&job, &legacy_worker(vec!["mowing machines"], WorkerRole::FieldWorker))
                .score,
            40
        );
    }

    #[test]
    fn availability_is_full_with_no_day_jobs() {
        let candidate = job_at((9, 0), (10, 0), "1 Elm St");
        assert_eq!(availability(&candidate, &[]), 100);
    }

    #[test]
    fn back_to_back_jobs_keep_full_availability() {
        let candidate = job_at((10, 0), (11, 0), "1 Elm St");
        let existing = job_at((9, 0), (10, 0), "2 Oak St");
        assert_eq!(availability(&candidate, &[existing]), 100);
    }

    #[test]
    fn thirty_minute_overlap_scores_fifty() {
        let candidate = job_at((10, 0), (11, 0), "1 Elm St");
        let existing = job_at((9, 0), (10, 30), "2 Oak St");
        assert_eq!(availability(&candidate, &[existing]), 50);
    }

    #[test]
    fn availability_buckets_by_worst_overlap() {
        let candidate = job_at((10, 0), (12, 0), "1 Elm St");
        let ten_min = job_at((9, 0), (10, 10), "2 Oak St");
        let ninety_min = job_at((11, 30), (14, 0), "3 Ash St");
        assert_eq!(availability(&candidate, std::slice::from_ref(&ten_min)), 70);
        assert_eq!(availability(&candidate, &[ten_min, ninety_min]), 0);
    }

    #[test]
    fn one_hour_overlap_scores_twenty_five() {
        let candidate = job_at((10, 0), (12, 0), "1 Elm St");
        let existing = job_at((11, 0), (13, 0), "2 Oak St");
        assert_eq!(availability(&candidate, &[existing]), 25);
    }

    #[test]
    fn empty_day_is_full_capacity() {
        assert_eq!(capacity(&[]), 100);
    }

    #[test]
    fn fully_booked_day_hits_bottom_bucket() {
        let eight_hours = job_at((8, 0), (16, 0), "1 Elm St");
        assert_eq!(capacity(&[eight_hours]), 10);
    }

    #[test]
    fn capacity_buckets() {
        // 3h of an 8h day = 37.5%
        assert_eq!(capacity(&[job_at((8, 0), (11, 0), "a")]), 100);
        // 4h = 50%
        assert_eq!(capacity(&[job_at((8, 0), (12, 0), "a")]), 85);
        // 5h = 62.5%
        assert_eq!(capacity(&[job_at((8, 0), (13, 0), "a")]), 70);
        // 7h = 87.5%
        assert_eq!(capacity(&[job_at((8, 0), (15, 0), "a")]), 40);
    }

    #[test]
    fn proximity_neutral_without_prior_stop() {
        let candidate = job_at((9, 0), (10, 0), "1 Elm St, Springfield, IL 62704");
        assert_eq!(proximity(&candidate, &[]), 70);

        // A later job is not a prior stop.
        let later = job_at((11, 0), (12, 0), "9 Oak St, Springfield, IL 62704");
        assert_eq!(proximity(&candidate, &[later]), 70);
    }

    #[test]
    fn proximity_prefers_zip_then_city_then_prefix() {
        let candidate = job_at((11, 0), (12, 0), "1 Elm St, Springfield, IL 62704");

        let same_zip = job_at((9, 0), (10, 0), "9 Oak St, Springfield, IL 62704");
        assert_eq!(proximity(&candidate, &[same_zip]), 100);

        // Zips share only the 627 prefix; the exact city match wins first.
        let same_city = job_at((9, 0), (10, 0), "9 Oak St, Springfield, IL 62799");
        assert_eq!(proximity(&candidate, &[same_city]), 90);

        let same_prefix = job_at((9, 0), (10, 0), "9 Oak St, Chatham, IL 62712");
        assert_eq!(proximity(&candidate, &[same_prefix]), 80);
    }

    #[test]
    fn proximity_falls_back_to_gap_without_address_signal() {
        let candidate = job_at((11, 0), (12, 0), "unit 7");

        let wide_gap = job_at((9, 0), (10, 0), "unit 3");
        assert_eq!(proximity(&candidate, &[wide_gap]), 70);

        let medium_gap = job_at((9, 0), (10, 30), "unit 3");
        assert_eq!(proximity(&candidate, &[medium_gap]), 50);

        let tight_gap = job_at((9, 0), (10, 45), "unit 3");
        assert_eq!(proximity(&candidate, &[tight_gap]), 30);
    }

    #[test]
    fn performance_neutral_without_history() {
        assert_eq!(performance(CompletionStats::default()), 70);
    }

    #[test]
    fn performance_buckets_by_completion_rate() {
        let stats = |completed, assigned| CompletionStats { completed, assigned };
        assert_eq!(performance(stats(19, 20)), 100);
        assert_eq!(performance(stats(9, 10)), 85);
        assert_eq!(performance(stats(3, 4)), 70);
        assert_eq!(performance(stats(7, 10)), 50);
        assert_eq!(performance(stats(1, 10)), 30);
    }

    #[test]
    fn weighted_total_rounds() {
        let weights = Weights::default();
        let factors = FactorScores {
            skill: 100,
            availability: 100,
            capacity: 100,
            proximity: 100,
            performance: 100,
        };
        assert_eq!(weighted_total(&weights, &factors), 100);

        let factors = FactorScores {
            skill: 90,
            availability: 80,
            capacity: 70,
            proximity: 60,
            performance: 50,
        };
        // 27 + 20 + 14 + 9 + 5 = 75
        assert_eq!(weighted_total(&weights, &factors), 75);
    }

    #[test]
    fn match_quality_boundaries() {
        assert_eq!(match_quality(80), MatchQuality::Excellent);
        assert_eq!(match_quality(79), MatchQuality::Good);
        assert_eq!(match_quality(60), MatchQuality::Good);
        assert_eq!(match_quality(59), MatchQuality::Fair);
        assert_eq!(match_quality(40), MatchQuality::Fair);
        assert_eq!(match_quality(39), MatchQuality::Poor);
    }
}
