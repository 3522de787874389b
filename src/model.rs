//! Data model for the cached calendar dataset.
//!
//! Field names mirror the upstream 311 API payload so the stored snapshot
//! round-trips the fetched document exactly. Fields this daemon does not
//! interpret are preserved through the flattened `extra` maps.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// The complete cached dataset as of its last successful fetch.
///
/// Replaced wholesale on each refresh, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,

    pub results: Vec<CalendarRecord>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CacheSnapshot {
    /// Look up a calendar by its upstream name (e.g. "Alternate Side Parking").
    pub fn record(&self, name: &str) -> Option<&CalendarRecord> {
        self.results.iter().find(|r| r.name == name)
    }
}

/// One named calendar's status entry.
///
/// Carries a default status/message pair per weekday class plus an optional
/// override pair that takes precedence when the upstream has posted a
/// day-specific notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRecord {
    #[serde(rename = "CalendarName")]
    pub name: String,

    #[serde(rename = "WeekDayRecordName", skip_serializing_if = "Option::is_none")]
    pub weekday_status: Option<String>,
    #[serde(rename = "WeekDayContentFormat", skip_serializing_if = "Option::is_none")]
    pub weekday_message: Option<String>,

    #[serde(rename = "SaturdayRecordName", skip_serializing_if = "Option::is_none")]
    pub saturday_status: Option<String>,
    #[serde(rename = "SaturdayContentFormat", skip_serializing_if = "Option::is_none")]
    pub saturday_message: Option<String>,

    #[serde(rename = "SundayRecordName", skip_serializing_if = "Option::is_none")]
    pub sunday_status: Option<String>,
    #[serde(rename = "SundayContentFormat", skip_serializing_if = "Option::is_none")]
    pub sunday_message: Option<String>,

    #[serde(rename = "CalendarDetailStatus", skip_serializing_if = "Option::is_none")]
    pub override_status: Option<String>,
    #[serde(rename = "CalendarDetailMessage", skip_serializing_if = "Option::is_none")]
    pub override_message: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The effective status/message pair for one calendar on one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusEntry<'a> {
    pub status: &'a str,
    pub message: Option<&'a str>,
}

impl CalendarRecord {
    /// Resolve the effective status for a weekday.
    ///
    /// The override pair wins when present; otherwise the Saturday, Sunday, or
    /// general weekday default applies. Returns `None` when the record carries
    /// no status for that day at all.
    pub fn status_for(&self, weekday: Weekday) -> Option<StatusEntry<'_>> {
        if let Some(status) = self.override_status.as_deref() {
            return Some(StatusEntry {
                status,
                message: self.override_message.as_deref(),
            });
        }

        let (status, message) = match weekday {
            Weekday::Sat => (&self.saturday_status, &self.saturday_message),
            Weekday::Sun => (&self.sunday_status, &self.sunday_message),
            _ => (&self.weekday_status, &self.weekday_message),
        };

        status.as_deref().map(|status| StatusEntry {
            status,
            message: message.as_deref(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> serde_json::Value {
        json!({
            "lastUpdated": "2024-06-01T06:00:00Z",
            "results": [
                {
                    "CalendarName": "Alternate Side Parking",
                    "WeekDayRecordName": "IN EFFECT",
                    "WeekDayContentFormat": "Alternate side parking is in effect.",
                    "SaturdayRecordName": "NOT IN EFFECT",
                    "SaturdayContentFormat": "Rules suspended on Saturday.",
                    "SundayRecordName": "NOT IN EFFECT",
                    "SundayContentFormat": "Rules suspended on Sunday.",
                    "CalendarTypeID": 1
                },
                {
                    "CalendarName": "Collections",
                    "WeekDayRecordName": "ON SCHEDULE",
                    "WeekDayContentFormat": "Trash and recycling on schedule.",
                    "CalendarDetailStatus": "SUSPENDED",
                    "CalendarDetailMessage": "Collections suspended for the holiday."
                }
            ],
            "source": "311"
        })
    }

    #[test]
    fn deserializes_upstream_payload() {
        let snapshot: CacheSnapshot = serde_json::from_value(sample_payload()).unwrap();

        assert_eq!(snapshot.last_updated, "2024-06-01T06:00:00Z");
        assert_eq!(snapshot.results.len(), 2);

        let parking = snapshot.record("Alternate Side Parking").unwrap();
        assert_eq!(parking.weekday_status.as_deref(), Some("IN EFFECT"));
        assert_eq!(parking.override_status, None);
        // Uninterpreted fields survive into the flattened map.
        assert_eq!(parking.extra["CalendarTypeID"], json!(1));
        assert_eq!(snapshot.extra["source"], json!("311"));
    }

    #[test]
    fn serialization_round_trips_unknown_fields() {
        let payload = sample_payload();
        let snapshot: CacheSnapshot = serde_json::from_value(payload.clone()).unwrap();
        let round_tripped = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(round_tripped, payload);
    }

    #[test]
    fn record_lookup_misses_unknown_names() {
        let snapshot: CacheSnapshot = serde_json::from_value(sample_payload()).unwrap();
        assert!(snapshot.record("Schools").is_none());
    }

    #[test]
    fn status_for_prefers_override() {
        let snapshot: CacheSnapshot = serde_json::from_value(sample_payload()).unwrap();
        let collections = snapshot.record("Collections").unwrap();

        let entry = collections.status_for(Weekday::Wed).unwrap();
        assert_eq!(entry.status, "SUSPENDED");
        assert_eq!(entry.message, Some("Collections suspended for the holiday."));
    }

    #[test]
    fn status_for_falls_back_per_weekday() {
        let snapshot: CacheSnapshot = serde_json::from_value(sample_payload()).unwrap();
        let parking = snapshot.record("Alternate Side Parking").unwrap();

        assert_eq!(parking.status_for(Weekday::Mon).unwrap().status, "IN EFFECT");
        assert_eq!(
            parking.status_for(Weekday::Sat).unwrap().status,
            "NOT IN EFFECT"
        );
        assert_eq!(
            parking.status_for(Weekday::Sun).unwrap().message,
            Some("Rules suspended on Sunday.")
        );
    }

    #[test]
    fn status_for_missing_day_is_none() {
        let record = CalendarRecord {
            name: "Schools".to_string(),
            weekday_status: None,
            weekday_message: None,
            saturday_status: None,
            saturday_message: None,
            sunday_status: None,
            sunday_message: None,
            override_status: None,
            override_message: None,
            extra: serde_json::Map::new(),
        };
        assert!(record.status_for(Weekday::Mon).is_none());
    }
}
