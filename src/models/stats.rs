//! Dashboard statistics returned by `GET /api/tickets/stats`

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Days covered by the creation trend
pub const TREND_DAYS: i64 = 30;

/// Ticket counts per lifecycle state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusOverview {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub open: u64,
    #[serde(default)]
    pub processing: u64,
    #[serde(default)]
    pub completed: u64,
}

/// Tickets created on one calendar day (UTC)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub value: u64,
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,
}

impl TrendPoint {
    /// Empty trend for the `TREND_DAYS` days ending on `now`, oldest first.
    ///
    /// Every day but the last two is labelled `MM-DD`.
    pub fn window(now: DateTime<Utc>) -> Vec<TrendPoint> {
        let today = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| Utc.from_utc_datetime(&midnight))
            .unwrap_or(now);

        (0..TREND_DAYS)
            .rev()
            .map(|days_ago| {
                let day_start = today - Duration::days(days_ago);
                let date = match days_ago {
                    0 => "Today".to_string(),
                    1 => "Yesterday".to_string(),
                    _ => day_start.format("%m-%d").to_string(),
                };
                TrendPoint {
                    date,
                    value: 0,
                    datetime: Some(day_start),
                }
            })
            .collect()
    }
}

/// Aggregate ticket statistics for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatistics {
    pub overview: StatusOverview,
    #[serde(default)]
    pub by_category: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_status: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_priority: BTreeMap<String, u64>,
    #[serde(default)]
    pub trend: Vec<TrendPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_window_labels() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 13, 45, 0).unwrap();
        let window = TrendPoint::window(now);

        assert_eq!(window.len(), TREND_DAYS as usize);
        assert_eq!(window[0].date, "02-15");
        assert_eq!(window[28].date, "Yesterday");
        assert_eq!(window[29].date, "Today");
        assert_eq!(
            window[29].datetime,
            Some(Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap())
        );
        assert!(window.iter().all(|p| p.value == 0));
    }

    #[test]
    fn test_statistics_camel_case() {
        let json = r#"{
            "overview": {"total": 3, "open": 1, "processing": 1, "completed": 1},
            "byCategory": {"SYSTEM_FAILURE": 3},
            "byStatus": {},
            "byPriority": {},
            "trend": []
        }"#;
        let stats: TicketStatistics = serde_json::from_str(json).unwrap();
        assert_eq!(stats.overview.total, 3);
        assert_eq!(stats.by_category.get("SYSTEM_FAILURE"), Some(&3));
    }
}
