use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

// ---------------------------------------------------------------------------
// Review status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    /// Reviewer accepted the work.
    Approved,
    /// Work is in the reviewer's queue.
    Reviewing,
    /// Reviewer returned the work with comments.
    Rejected,
}

impl HomeworkStatus {
    /// Verdict text shown to the student.
    pub fn verdict(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => {
                "The work has been reviewed: the reviewer liked everything. Hooray!"
            }
            HomeworkStatus::Reviewing => "The work has been taken for review.",
            HomeworkStatus::Rejected => "The work has been reviewed: the reviewer has comments.",
        }
    }
}

impl std::str::FromStr for HomeworkStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_value(Value::String(s.to_string()))
            .map_err(|_| AppError::UnknownStatus(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Homework record
// ---------------------------------------------------------------------------

/// One submission's review metadata as returned by the API. Other fields in
/// the payload (id, reviewer_comment, date_updated, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRecord {
    pub homework_name: String,
    pub status: HomeworkStatus,
}

impl HomeworkRecord {
    /// Missing or non-string keys are `MissingKey`; a status outside the
    /// verdict table is `UnknownStatus`.
    pub fn from_value(v: &Value) -> Result<Self> {
        let homework_name = v
            .get("homework_name")
            .and_then(|n| n.as_str())
            .ok_or(AppError::MissingKey("homework_name"))?
            .to_string();
        let status = v
            .get("status")
            .and_then(|s| s.as_str())
            .ok_or(AppError::MissingKey("status"))?
            .parse()?;
        Ok(Self { homework_name, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_statuses_parse() {
        assert_eq!("approved".parse::<HomeworkStatus>().unwrap(), HomeworkStatus::Approved);
        assert_eq!("reviewing".parse::<HomeworkStatus>().unwrap(), HomeworkStatus::Reviewing);
        assert_eq!("rejected".parse::<HomeworkStatus>().unwrap(), HomeworkStatus::Rejected);
    }

    #[test]
    fn status_serializes_as_api_code() {
        assert_eq!(serde_json::to_value(HomeworkStatus::Reviewing).unwrap(), json!("reviewing"));
    }

    #[test]
    fn status_parsing_is_case_sensitive() {
        let err = "Approved".parse::<HomeworkStatus>().unwrap_err();
        assert!(matches!(err, AppError::UnknownStatus(s) if s == "Approved"));
    }

    #[test]
    fn record_ignores_extra_fields() {
        let rec = HomeworkRecord::from_value(&json!({
            "id": 123,
            "homework_name": "user__proj1.zip",
            "status": "rejected",
            "reviewer_comment": "see notes",
        }))
        .unwrap();
        assert_eq!(rec.homework_name, "user__proj1.zip");
        assert_eq!(rec.status, HomeworkStatus::Rejected);
    }

    #[test]
    fn non_string_status_is_missing_key() {
        let err = HomeworkRecord::from_value(&json!({"homework_name": "p", "status": 3})).unwrap_err();
        assert!(matches!(err, AppError::MissingKey("status")));
    }
}
