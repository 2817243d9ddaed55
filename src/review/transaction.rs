// Snapshot / attempt-remote / commit-or-discard for one review transition

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::review::state_machine::TransitionPlan;
use crate::review::types::{ReviewAction, ReviewFields, Submission, SubmissionUpdate};

/// One in-flight review transition.
///
/// The local record is not touched while the remote call is outstanding, so
/// rolling back a failed attempt means dropping the transaction unapplied.
#[derive(Debug, Clone)]
pub struct ReviewTransaction {
    pub id: Uuid,
    pub submission_id: String,
    pub snapshot: ReviewFields,
    pub target: ReviewFields,
}

impl ReviewTransaction {
    pub fn begin(submission: &Submission, plan: TransitionPlan, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            submission_id: submission.id.clone(),
            snapshot: submission.review_fields(),
            target: ReviewFields {
                status: plan.to,
                review_comment: plan.review_comment,
                updated_at: now,
            },
        }
    }

    /// Payload for the remote gateway
    pub fn update(&self) -> SubmissionUpdate {
        SubmissionUpdate::from(&self.target)
    }

    /// Apply the target fields after the remote side accepted them
    pub fn commit(&self, submission: &mut Submission) -> ReviewAction {
        submission.apply_review_fields(&self.target);
        self.action()
    }

    /// History entry describing this transition
    pub fn action(&self) -> ReviewAction {
        ReviewAction::new(
            self.submission_id.clone(),
            self.snapshot.status,
            self.target.status,
            self.target.updated_at,
        )
    }

    /// Whether the record still carries the fields captured at `begin`
    pub fn is_unchanged(&self, submission: &Submission) -> bool {
        submission.review_fields() == self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::types::{NewSubmission, SubmissionStatus};
    use chrono::Duration;

    fn submission() -> Submission {
        Submission::new(
            "s-1",
            NewSubmission {
                file_name: "loft.pdf".to_string(),
                file_size: 1024,
                file_path: "user-1/loft.pdf".to_string(),
                owner_user_id: "user-1".to_string(),
            },
            Utc::now() - Duration::hours(1),
        )
    }

    #[test]
    fn test_commit_applies_target_fields() {
        let mut record = submission();
        let tx = ReviewTransaction::begin(
            &record,
            TransitionPlan {
                from: SubmissionStatus::Pending,
                to: SubmissionStatus::Denied,
                review_comment: Some("Incomplete floorplan".to_string()),
            },
            Utc::now(),
        );

        let action = tx.commit(&mut record);
        assert_eq!(record.status, SubmissionStatus::Denied);
        assert_eq!(action.previous_status, SubmissionStatus::Pending);
        assert_eq!(action.new_status, SubmissionStatus::Denied);

        assert!(!tx.is_unchanged(&record));
        assert_eq!(record.review_comment.as_deref(), Some("Incomplete floorplan"));
    }

    #[test]
    fn test_update_mirrors_target() {
        let record = submission();
        let now = Utc::now();
        let tx = ReviewTransaction::begin(
            &record,
            TransitionPlan {
                from: SubmissionStatus::Pending,
                to: SubmissionStatus::Approved,
                review_comment: None,
            },
            now,
        );

        assert!(tx.is_unchanged(&record));
        let update = tx.update();
        assert_eq!(update.status, SubmissionStatus::Approved);
        assert_eq!(update.review_comment, None);
        assert_eq!(update.updated_at, now);
    }
}
