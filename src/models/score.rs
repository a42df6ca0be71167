use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FactorScores {
    pub skill: u8,
    pub availability: u8,
    pub capacity: u8,
    pub proximity: u8,
    pub performance: u8,
}

/// One worker's ranked match for a candidate job. Computed fresh per
/// request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    pub worker_id: Uuid,
    pub worker_name: String,
    pub factors: FactorScores,
    pub total_score: u8,
    pub match_quality: MatchQuality,
    pub reasoning: Vec<String>,
    pub warnings: Vec<String>,
    /// Share of an 8-hour day already booked, as a percentage.
    pub current_capacity: u32,
    pub jobs_today: usize,
}
