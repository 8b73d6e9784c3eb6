use serde_json::Value;

use crate::error::Result;
use crate::types::HomeworkRecord;

/// A validated homework entry together with its notification text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub record: HomeworkRecord,
    pub message: String,
}

/// Build the notification text for one homework entry.
pub fn parse_status(homework: &Value) -> Result<StatusUpdate> {
    let record = HomeworkRecord::from_value(homework)?;
    let message = format_message(&record);
    Ok(StatusUpdate { record, message })
}

pub fn format_message(record: &HomeworkRecord) -> String {
    format!(
        "Changed review status of \"{}\". {}",
        record.homework_name,
        record.status.verdict()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::types::HomeworkStatus;
    use serde_json::json;

    #[test]
    fn message_contains_name_and_verdict() {
        for status in [
            HomeworkStatus::Approved,
            HomeworkStatus::Reviewing,
            HomeworkStatus::Rejected,
        ] {
            let hw = json!({"homework_name": "proj1", "status": status});
            let update = parse_status(&hw).unwrap();
            assert_eq!(update.record.homework_name, "proj1");
            assert_eq!(update.record.status, status);
            assert_eq!(
                update.message,
                format!("Changed review status of \"proj1\". {}", status.verdict())
            );
        }
    }

    #[test]
    fn missing_name_is_key_error() {
        let err = parse_status(&json!({"status": "approved"})).unwrap_err();
        assert!(matches!(err, AppError::MissingKey("homework_name")));
    }

    #[test]
    fn missing_status_is_key_error() {
        let err = parse_status(&json!({"homework_name": "proj1"})).unwrap_err();
        assert!(matches!(err, AppError::MissingKey("status")));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = parse_status(&json!({"homework_name": "proj1", "status": "bogus"})).unwrap_err();
        match err {
            AppError::UnknownStatus(s) => assert_eq!(s, "bogus"),
            other => panic!("expected UnknownStatus, got {other:?}"),
        }
    }
}
