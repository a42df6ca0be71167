use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlockScope {
    Company,
    Workers,
}

/// Intraday bounds in fractional hour-of-day space, parsed fail-closed
/// from "HH:MM" strings when the window is created. Malformed input never
/// reaches storage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HourRange {
    pub start: f64,
    pub end: f64,
}

impl HourRange {
    pub fn parse(start: &str, end: &str) -> Result<Self, String> {
        let start = parse_hhmm(start)?;
        let end = parse_hhmm(end)?;
        if start >= end {
            return Err(format!("start time {start:.2} is not before end time {end:.2}"));
        }
        Ok(Self { start, end })
    }

    /// Half-open overlap against a job's hour-of-day span; dates are
    /// ignored on purpose, recurrence handles them.
    pub fn overlaps(&self, job_start: &DateTime<Utc>, job_end: &DateTime<Utc>) -> bool {
        let job_start = hour_of_day(job_start);
        let job_end = hour_of_day(job_end);
        !(job_end <= self.start || job_start >= self.end)
    }
}

fn parse_hhmm(raw: &str) -> Result<f64, String> {
    let (hours, minutes) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid time {raw:?}: expected HH:MM"))?;
    let hours: u32 = hours
        .parse()
        .map_err(|_| format!("invalid hour in {raw:?}"))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| format!("invalid minute in {raw:?}"))?;
    if hours > 23 || minutes > 59 {
        return Err(format!("time {raw:?} out of range"));
    }
    Ok(hours as f64 + minutes as f64 / 60.0)
}

fn hour_of_day(at: &DateTime<Utc>) -> f64 {
    at.hour() as f64 + at.minute() as f64 / 60.0
}

/// A provider- or worker-scoped blackout range during which jobs may not
/// be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedWindow {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub scope: BlockScope,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    /// Weekdays the window recurs on, 0 = Sunday through 6 = Saturday.
    /// `None` means the window applies to every day in the date range.
    pub recurring_days: Option<Vec<u8>>,
    pub hours: Option<HourRange>,
    pub blocked_worker_ids: Vec<Uuid>,
    pub reason: Option<String>,
}

impl BlockedWindow {
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        date >= self.from_date && date <= self.to_date
    }

    /// Whether this window applies to the given job interval: the date
    /// must be in range, the weekday must match any recurrence, and any
    /// intraday bounds must actually intersect the job's hours.
    pub fn applies_to(&self, start: &DateTime<Utc>, end: &DateTime<Utc>) -> bool {
        let date = start.date_naive();
        if !self.covers_date(date) {
            return false;
        }

        if let Some(days) = &self.recurring_days {
            let weekday = date.weekday().num_days_from_sunday() as u8;
            if !days.contains(&weekday) {
                return false;
            }
        }

        match &self.hours {
            Some(hours) => hours.overlaps(start, end),
            None => true,
        }
    }
}
