//! Mental-health check-ins and the trailing-window insights over them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How many of the most recent check-ins ride along with insights.
pub const RECENT_CHECKIN_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkin {
    pub id: i64,
    pub user: String,
    /// 1-10, validated at the input boundary.
    pub stress_level: Option<i32>,
    pub mood: Option<String>,
    pub notes: Option<String>,
    pub created_at_utc: DateTime<Utc>,
}

/// Aggregates over a trailing window of check-ins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckinInsights {
    pub avg_stress: Option<f64>,
    pub checkin_count: usize,
    pub first_checkin: Option<DateTime<Utc>>,
    pub last_checkin: Option<DateTime<Utc>>,
    pub recent: Vec<Checkin>,
}

impl CheckinInsights {
    /// Compute insights in Rust over all of a user's check-ins.
    ///
    /// The SQLite store computes the same aggregate in SQL; the two paths
    /// must agree.
    pub fn compute(checkins: &[Checkin], window_days: i64, now: DateTime<Utc>) -> Self {
        let since = now - Duration::days(window_days);
        let windowed: Vec<&Checkin> = checkins
            .iter()
            .filter(|c| c.created_at_utc >= since)
            .collect();

        let stress: Vec<i32> = windowed.iter().filter_map(|c| c.stress_level).collect();
        let avg_stress = if stress.is_empty() {
            None
        } else {
            Some(stress.iter().sum::<i32>() as f64 / stress.len() as f64)
        };

        let mut recent: Vec<Checkin> = checkins.to_vec();
        recent.sort_by(|a, b| b.created_at_utc.cmp(&a.created_at_utc));
        recent.truncate(RECENT_CHECKIN_LIMIT);

        Self {
            avg_stress,
            checkin_count: windowed.len(),
            first_checkin: windowed.iter().map(|c| c.created_at_utc).min(),
            last_checkin: windowed.iter().map(|c| c.created_at_utc).max(),
            recent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkin(id: i64, stress: Option<i32>, days_ago: i64, now: DateTime<Utc>) -> Checkin {
        Checkin {
            id,
            user: "sam".to_string(),
            stress_level: stress,
            mood: None,
            notes: None,
            created_at_utc: now - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_empty_insights() {
        let out = CheckinInsights::compute(&[], 30, Utc::now());
        assert_eq!(out.checkin_count, 0);
        assert_eq!(out.avg_stress, None);
        assert!(out.recent.is_empty());
    }

    #[test]
    fn test_window_excludes_old_checkins() {
        let now = Utc::now();
        let all = vec![
            checkin(1, Some(4), 1, now),
            checkin(2, Some(8), 5, now),
            checkin(3, Some(10), 45, now), // outside the 30-day window
        ];
        let out = CheckinInsights::compute(&all, 30, now);
        assert_eq!(out.checkin_count, 2);
        assert_eq!(out.avg_stress, Some(6.0));
        // Recent list is not windowed; it's the latest check-ins overall.
        assert_eq!(out.recent.len(), 3);
        assert_eq!(out.recent[0].id, 1);
    }

    #[test]
    fn test_missing_stress_levels_skipped_in_average() {
        let now = Utc::now();
        let all = vec![
            checkin(1, Some(6), 1, now),
            checkin(2, None, 2, now),
        ];
        let out = CheckinInsights::compute(&all, 30, now);
        assert_eq!(out.checkin_count, 2);
        assert_eq!(out.avg_stress, Some(6.0));
    }
}
