use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a release has already come out or is only announced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStatus {
    Released,
    Scheduled,
}

impl ReleaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseStatus::Released => "released",
            ReleaseStatus::Scheduled => "scheduled",
        }
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One album or EP row taken from a discography table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub title: String,
    pub status: ReleaseStatus,
    pub release_date: Option<NaiveDate>, // None renders as TBD
}

impl ReleaseRecord {
    /// Release date as `YYYY-MM-DD`, or `TBD` when unknown.
    pub fn display_date(&self) -> String {
        self.release_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "TBD".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ReleaseStatus::Scheduled).unwrap();
        assert_eq!(json, "\"scheduled\"");

        let deserialized: ReleaseStatus = serde_json::from_str("\"released\"").unwrap();
        assert_eq!(deserialized, ReleaseStatus::Released);
    }

    #[test]
    fn test_display_date() {
        let mut record = ReleaseRecord {
            title: "Album One".to_string(),
            status: ReleaseStatus::Released,
            release_date: NaiveDate::from_ymd_opt(2020, 5, 5),
        };
        assert_eq!(record.display_date(), "2020-05-05");

        record.release_date = None;
        assert_eq!(record.display_date(), "TBD");
    }

    #[test]
    fn test_record_serialization() {
        let record = ReleaseRecord {
            title: "Second Album".to_string(),
            status: ReleaseStatus::Scheduled,
            release_date: NaiveDate::from_ymd_opt(2025, 1, 1),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Second Album","status":"scheduled","release_date":"2025-01-01"}"#
        );
    }
}
