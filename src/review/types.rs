// Core types for the submission review workflow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review status of a floorplan submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Waiting for an administrator decision
    Pending,
    /// Accepted for cost estimation
    Approved,
    /// Rejected with a review comment
    Denied,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Denied => "denied",
        }
    }

    /// Approved and denied are final until undone
    pub fn is_decided(&self) -> bool {
        !matches!(self, SubmissionStatus::Pending)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(SubmissionStatus::Pending),
            "approved" => Ok(SubmissionStatus::Approved),
            "denied" => Ok(SubmissionStatus::Denied),
            other => Err(format!("unknown submission status: {other}")),
        }
    }
}

/// A single uploaded floorplan under review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub status: SubmissionStatus,
    pub file_name: String,
    pub file_size: u64,
    pub file_path: String,
    #[serde(rename = "user_id")]
    pub owner_user_id: String,
    #[serde(default)]
    pub review_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    /// Build a freshly uploaded submission. New records always start out pending.
    pub fn new(id: impl Into<String>, upload: NewSubmission, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            status: SubmissionStatus::Pending,
            file_name: upload.file_name,
            file_size: upload.file_size,
            file_path: upload.file_path,
            owner_user_id: upload.owner_user_id,
            review_comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The fields a review transition is allowed to touch
    pub fn review_fields(&self) -> ReviewFields {
        ReviewFields {
            status: self.status,
            review_comment: self.review_comment.clone(),
            updated_at: self.updated_at,
        }
    }

    pub(crate) fn apply_review_fields(&mut self, fields: &ReviewFields) {
        self.status = fields.status;
        self.review_comment = fields.review_comment.clone();
        self.updated_at = fields.updated_at;
    }
}

/// Metadata supplied by the intake flow when a floorplan is uploaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub file_name: String,
    pub file_size: u64,
    pub file_path: String,
    #[serde(rename = "user_id")]
    pub owner_user_id: String,
}

/// Mutable review state of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFields {
    pub status: SubmissionStatus,
    pub review_comment: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Payload sent to the remote gateway for a status change.
///
/// `review_comment` is always serialized so that clearing it reaches the
/// remote copy as an explicit `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionUpdate {
    pub status: SubmissionStatus,
    pub review_comment: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ReviewFields> for SubmissionUpdate {
    fn from(fields: &ReviewFields) -> Self {
        Self {
            status: fields.status,
            review_comment: fields.review_comment.clone(),
            updated_at: fields.updated_at,
        }
    }
}

/// Optional narrowing of a remote listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub status: Option<SubmissionStatus>,
}

impl SubmissionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: SubmissionStatus) -> Self {
        Self {
            status: Some(status),
        }
    }

    pub fn matches(&self, submission: &Submission) -> bool {
        self.status.map_or(true, |status| submission.status == status)
    }
}

/// Entry in the recent-actions buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAction {
    pub submission_id: String,
    pub previous_status: SubmissionStatus,
    pub new_status: SubmissionStatus,
    pub timestamp: DateTime<Utc>,
    pub can_undo: bool,
}

impl ReviewAction {
    pub fn new(
        submission_id: impl Into<String>,
        previous_status: SubmissionStatus,
        new_status: SubmissionStatus,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            submission_id: submission_id.into(),
            previous_status,
            new_status,
            timestamp,
            // Undo entries themselves cannot be undone
            can_undo: new_status.is_decided(),
        }
    }
}

/// Status counters shown on the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub denied: usize,
}

impl ReviewSummary {
    pub fn from_submissions<'a>(submissions: impl IntoIterator<Item = &'a Submission>) -> Self {
        submissions
            .into_iter()
            .fold(Self::default(), |mut summary, submission| {
                summary.total += 1;
                match submission.status {
                    SubmissionStatus::Pending => summary.pending += 1,
                    SubmissionStatus::Approved => summary.approved += 1,
                    SubmissionStatus::Denied => summary.denied += 1,
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn upload() -> NewSubmission {
        NewSubmission {
            file_name: "ground-floor.png".to_string(),
            file_size: 482_113,
            file_path: "user-7/ground-floor.png".to_string(),
            owner_user_id: "user-7".to_string(),
        }
    }

    #[test]
    fn test_new_submission_starts_pending() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let submission = Submission::new("s-1", upload(), now);

        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(submission.review_comment, None);
        assert_eq!(submission.created_at, submission.updated_at);
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!("Approved".parse::<SubmissionStatus>(), Ok(SubmissionStatus::Approved));
        assert_eq!(" denied ".parse::<SubmissionStatus>(), Ok(SubmissionStatus::Denied));
        assert!("archived".parse::<SubmissionStatus>().is_err());
    }

    #[test]
    fn test_submission_wire_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let submission = Submission::new("s-1", upload(), now);
        let json = serde_json::to_value(&submission).unwrap();

        assert_eq!(json["status"], "pending");
        assert_eq!(json["user_id"], "user-7");
        assert!(json["review_comment"].is_null());
    }

    #[test]
    fn test_cleared_comment_serializes_as_null() {
        let update = SubmissionUpdate {
            status: SubmissionStatus::Pending,
            review_comment: None,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.as_object().unwrap().contains_key("review_comment"));
        assert!(json["review_comment"].is_null());
    }

    #[test]
    fn test_undo_actions_are_not_undoable() {
        let now = Utc::now();
        let deny = ReviewAction::new("s-1", SubmissionStatus::Pending, SubmissionStatus::Denied, now);
        let undo = ReviewAction::new("s-1", SubmissionStatus::Denied, SubmissionStatus::Pending, now);
        assert!(deny.can_undo);
        assert!(!undo.can_undo);
    }

    #[test]
    fn test_summary_counts_statuses() {
        let now = Utc::now();
        let mut approved = Submission::new("a", upload(), now);
        approved.status = SubmissionStatus::Approved;
        let mut denied = Submission::new("d", upload(), now);
        denied.status = SubmissionStatus::Denied;
        let pending = Submission::new("p", upload(), now);

        let summary = ReviewSummary::from_submissions(&[approved, denied, pending]);
        assert_eq!(
            summary,
            ReviewSummary {
                total: 3,
                pending: 1,
                approved: 1,
                denied: 1
            }
        );
    }
}
