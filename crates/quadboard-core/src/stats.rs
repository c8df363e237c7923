//! Weekly completion statistics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Aggregate weekly numbers as served by `/stats/weekly`.
///
/// The week bounds and update time are opaque display strings; the backend
/// owns their formatting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub week_start: String,
    pub week_end: String,
    pub total_created: i64,
    pub total_completed: i64,
    pub completion_rate: Option<f64>,
    pub avg_lifetime_days: Option<f64>,
    pub updated_at: String,
    pub adoption_rate: Option<f64>,
}

impl WeeklyStats {
    /// Tolerant decode: accepts `{stats: {...}}` or a bare object, counters
    /// as numbers or numeric strings, and absent rates as `None`. Returns
    /// `None` when the payload holds no stats object at all.
    pub fn from_wire(payload: &Value) -> Option<Self> {
        let stats = match payload.get("stats") {
            Some(Value::Null) | None => payload,
            Some(inner) => inner,
        };
        if !stats.is_object() {
            return None;
        }
        Some(Self {
            week_start: text(stats, "week_start"),
            week_end: text(stats, "week_end"),
            total_created: count(stats, "total_created"),
            total_completed: count(stats, "total_completed"),
            completion_rate: rate(stats, "completion_rate"),
            avg_lifetime_days: rate(stats, "avg_lifetime_days"),
            updated_at: text(stats, "updated_at"),
            adoption_rate: rate(stats, "adoption_rate"),
        })
    }
}

fn text(stats: &Value, key: &str) -> String {
    stats
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn numeric(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn count(stats: &Value, key: &str) -> i64 {
    stats
        .get(key)
        .and_then(numeric)
        .map(|n| n as i64)
        .unwrap_or(0)
}

fn rate(stats: &Value, key: &str) -> Option<f64> {
    match stats.get(key) {
        Some(Value::Null) | None => None,
        Some(value) => numeric(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_wrapped_stats_object() {
        let stats = WeeklyStats::from_wire(&json!({
            "stats": {
                "week_start": "2025-03-03",
                "week_end": "2025-03-09",
                "total_created": 12,
                "total_completed": 7,
                "completion_rate": 58.3,
                "avg_lifetime_days": 1.4,
                "updated_at": "2025-03-09T20:00:00Z",
                "adoption_rate": 0.9
            }
        }))
        .unwrap();

        assert_eq!(stats.total_created, 12);
        assert_eq!(stats.completion_rate, Some(58.3));
        assert_eq!(stats.week_start, "2025-03-03");
    }

    #[test]
    fn decodes_bare_object_with_string_numbers() {
        let stats = WeeklyStats::from_wire(&json!({
            "total_created": "5",
            "total_completed": "2",
            "completion_rate": "40"
        }))
        .unwrap();

        assert_eq!(stats.total_created, 5);
        assert_eq!(stats.total_completed, 2);
        assert_eq!(stats.completion_rate, Some(40.0));
        assert_eq!(stats.adoption_rate, None);
        assert_eq!(stats.week_start, "");
    }

    #[test]
    fn missing_counters_default_to_zero() {
        let stats = WeeklyStats::from_wire(&json!({ "week_start": "2025-03-03" })).unwrap();
        assert_eq!(stats.total_created, 0);
        assert_eq!(stats.total_completed, 0);
    }

    #[test]
    fn non_object_payload_is_none() {
        assert!(WeeklyStats::from_wire(&json!(null)).is_none());
        assert!(WeeklyStats::from_wire(&json!("no stats")).is_none());
    }

    #[test]
    fn null_stats_field_falls_back_to_outer_object() {
        let stats = WeeklyStats::from_wire(&json!({ "stats": null, "total_created": 3 })).unwrap();
        assert_eq!(stats.total_created, 3);
    }
}
