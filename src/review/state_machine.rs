// Review transitions for floorplan submissions
//
// pending -> approved   approve
// pending -> denied     deny (reason required)
// approved -> pending   undo
// denied -> pending     undo
//
// Anything else is rejected before the gateway is contacted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::review::errors::ReviewError;
use crate::review::history::ReviewHistory;
use crate::review::types::SubmissionStatus;

/// Minimum length of a free-text denial reason
pub const DEFAULT_MIN_REASON_LENGTH: usize = 10;

/// Predefined denial reasons offered by the review dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetReason {
    PoorImageQuality,
    IncompleteFloorplan,
    NotAFloorplan,
    MissingDimensions,
    DuplicateSubmission,
}

impl PresetReason {
    pub const ALL: [PresetReason; 5] = [
        PresetReason::PoorImageQuality,
        PresetReason::IncompleteFloorplan,
        PresetReason::NotAFloorplan,
        PresetReason::MissingDimensions,
        PresetReason::DuplicateSubmission,
    ];

    pub fn text(&self) -> &'static str {
        match self {
            PresetReason::PoorImageQuality => "Poor image quality",
            PresetReason::IncompleteFloorplan => "Incomplete floorplan",
            PresetReason::NotAFloorplan => "Not a floorplan",
            PresetReason::MissingDimensions => "Missing dimensions or scale",
            PresetReason::DuplicateSubmission => "Duplicate submission",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            PresetReason::PoorImageQuality => "poor-image-quality",
            PresetReason::IncompleteFloorplan => "incomplete-floorplan",
            PresetReason::NotAFloorplan => "not-a-floorplan",
            PresetReason::MissingDimensions => "missing-dimensions",
            PresetReason::DuplicateSubmission => "duplicate-submission",
        }
    }
}

impl std::str::FromStr for PresetReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PresetReason::ALL
            .into_iter()
            .find(|preset| preset.slug() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = PresetReason::ALL.iter().map(|p| p.slug()).collect();
                format!("unknown preset reason '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// Why a submission is being denied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    Preset(PresetReason),
    Custom(String),
}

impl DenialReason {
    pub fn text(&self) -> &str {
        match self {
            DenialReason::Preset(preset) => preset.text(),
            DenialReason::Custom(text) => text,
        }
    }

    /// Presets are always acceptable; free text has to be non-blank and long enough.
    pub fn validate(&self, min_length: usize) -> Result<(), ReviewError> {
        let DenialReason::Custom(text) = self else {
            return Ok(());
        };
        if text.trim().is_empty() {
            return Err(ReviewError::Validation(
                "a reason is required to deny a submission".to_string(),
            ));
        }
        let length = text.chars().count();
        if length < min_length {
            return Err(ReviewError::Validation(format!(
                "denial reason must be at least {min_length} characters (got {length})"
            )));
        }
        Ok(())
    }
}

impl From<&str> for DenialReason {
    fn from(text: &str) -> Self {
        DenialReason::Custom(text.to_string())
    }
}

impl From<String> for DenialReason {
    fn from(text: String) -> Self {
        DenialReason::Custom(text)
    }
}

impl From<PresetReason> for DenialReason {
    fn from(preset: PresetReason) -> Self {
        DenialReason::Preset(preset)
    }
}

/// A requested review transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewCommand {
    Approve,
    Deny(DenialReason),
    Undo,
}

impl ReviewCommand {
    pub fn kind(&self) -> ReviewCommandKind {
        match self {
            ReviewCommand::Approve => ReviewCommandKind::Approve,
            ReviewCommand::Deny(_) => ReviewCommandKind::Deny,
            ReviewCommand::Undo => ReviewCommandKind::Undo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewCommandKind {
    Approve,
    Deny,
    Undo,
}

impl fmt::Display for ReviewCommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            ReviewCommandKind::Approve => "approve",
            ReviewCommandKind::Deny => "deny",
            ReviewCommandKind::Undo => "undo",
        };
        f.write_str(verb)
    }
}

/// Where `undo` sends a decided submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoTarget {
    /// Always back to pending
    #[default]
    Pending,
    /// The previous status recorded in the history buffer, pending if nothing is recorded.
    /// Every decision currently starts from pending, so this resolves to pending too.
    PreviousStatus,
}

/// Tunables of the review workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPolicy {
    pub min_reason_length: usize,
    pub history_capacity: usize,
    pub undo_target: UndoTarget,
    /// Reject a second transition on a record whose first one has not resolved yet
    pub serialize_per_record: bool,
    pub remote_timeout: Option<Duration>,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            min_reason_length: DEFAULT_MIN_REASON_LENGTH,
            history_capacity: ReviewHistory::DEFAULT_CAPACITY,
            undo_target: UndoTarget::Pending,
            serialize_per_record: false,
            remote_timeout: None,
        }
    }
}

/// Validated outcome of a review command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
    pub review_comment: Option<String>,
}

/// Check `command` against the current status and work out the resulting review state.
///
/// Transition validity is checked before the denial reason, so denying an
/// approved submission reports `InvalidTransition` whatever the reason.
pub fn plan_transition(
    id: &str,
    current: SubmissionStatus,
    command: &ReviewCommand,
    policy: &ReviewPolicy,
    history: &ReviewHistory,
) -> Result<TransitionPlan, ReviewError> {
    let invalid = || ReviewError::InvalidTransition {
        id: id.to_string(),
        from: current,
        command: command.kind(),
    };

    match (current, command) {
        (SubmissionStatus::Pending, ReviewCommand::Approve) => Ok(TransitionPlan {
            from: current,
            to: SubmissionStatus::Approved,
            review_comment: None,
        }),
        (SubmissionStatus::Pending, ReviewCommand::Deny(reason)) => {
            reason.validate(policy.min_reason_length)?;
            Ok(TransitionPlan {
                from: current,
                to: SubmissionStatus::Denied,
                review_comment: Some(reason.text().to_string()),
            })
        }
        (SubmissionStatus::Approved | SubmissionStatus::Denied, ReviewCommand::Undo) => {
            Ok(TransitionPlan {
                from: current,
                to: undo_destination(id, current, policy.undo_target, history),
                review_comment: None,
            })
        }
        _ => Err(invalid()),
    }
}

fn undo_destination(
    id: &str,
    current: SubmissionStatus,
    target: UndoTarget,
    history: &ReviewHistory,
) -> SubmissionStatus {
    match target {
        UndoTarget::Pending => SubmissionStatus::Pending,
        UndoTarget::PreviousStatus => history
            .latest_for(id)
            .filter(|action| action.can_undo && action.new_status == current)
            .map(|action| action.previous_status)
            .unwrap_or(SubmissionStatus::Pending),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::types::ReviewAction;
    use chrono::Utc;

    fn plan(current: SubmissionStatus, command: ReviewCommand) -> Result<TransitionPlan, ReviewError> {
        plan_transition("s-1", current, &command, &ReviewPolicy::default(), &ReviewHistory::default())
    }

    #[test]
    fn test_approve_from_pending_clears_comment() {
        let plan = plan(SubmissionStatus::Pending, ReviewCommand::Approve).unwrap();
        assert_eq!(plan.to, SubmissionStatus::Approved);
        assert_eq!(plan.review_comment, None);
    }

    #[test]
    fn test_deny_from_pending_records_reason() {
        let plan = plan(
            SubmissionStatus::Pending,
            ReviewCommand::Deny("Poor image quality".into()),
        )
        .unwrap();
        assert_eq!(plan.to, SubmissionStatus::Denied);
        assert_eq!(plan.review_comment.as_deref(), Some("Poor image quality"));
    }

    #[test]
    fn test_short_custom_reason_is_rejected() {
        let err = plan(SubmissionStatus::Pending, ReviewCommand::Deny("blurry".into())).unwrap_err();
        assert!(matches!(err, ReviewError::Validation(_)));

        let err = plan(SubmissionStatus::Pending, ReviewCommand::Deny("   ".into())).unwrap_err();
        assert!(matches!(err, ReviewError::Validation(_)));
    }

    #[test]
    fn test_preset_reason_skips_length_check() {
        let plan = plan(
            SubmissionStatus::Pending,
            ReviewCommand::Deny(PresetReason::NotAFloorplan.into()),
        )
        .unwrap();
        assert_eq!(plan.review_comment.as_deref(), Some("Not a floorplan"));
    }

    #[test]
    fn test_transition_checked_before_reason() {
        let err = plan(SubmissionStatus::Approved, ReviewCommand::Deny("too late".into())).unwrap_err();
        assert!(matches!(
            err,
            ReviewError::InvalidTransition {
                from: SubmissionStatus::Approved,
                command: ReviewCommandKind::Deny,
                ..
            }
        ));
    }

    #[test]
    fn test_decided_submissions_reject_approve_and_deny() {
        for status in [SubmissionStatus::Approved, SubmissionStatus::Denied] {
            assert!(plan(status, ReviewCommand::Approve).is_err());
            assert!(plan(status, ReviewCommand::Deny("Missing the second floor".into())).is_err());
        }
    }

    #[test]
    fn test_undo_requires_decided_submission() {
        let err = plan(SubmissionStatus::Pending, ReviewCommand::Undo).unwrap_err();
        assert!(matches!(err, ReviewError::InvalidTransition { .. }));

        for status in [SubmissionStatus::Approved, SubmissionStatus::Denied] {
            let plan = plan(status, ReviewCommand::Undo).unwrap();
            assert_eq!(plan.to, SubmissionStatus::Pending);
            assert_eq!(plan.review_comment, None);
        }
    }

    #[test]
    fn test_previous_status_undo_consults_history() {
        let policy = ReviewPolicy {
            undo_target: UndoTarget::PreviousStatus,
            ..ReviewPolicy::default()
        };
        let mut history = ReviewHistory::default();
        history.record(ReviewAction::new(
            "s-1",
            SubmissionStatus::Pending,
            SubmissionStatus::Denied,
            Utc::now(),
        ));

        let plan = plan_transition("s-1", SubmissionStatus::Denied, &ReviewCommand::Undo, &policy, &history)
            .unwrap();
        assert_eq!(plan.to, SubmissionStatus::Pending);

        // Nothing recorded for this record: falls back to pending
        let plan = plan_transition("s-2", SubmissionStatus::Approved, &ReviewCommand::Undo, &policy, &history)
            .unwrap();
        assert_eq!(plan.to, SubmissionStatus::Pending);
    }

    #[test]
    fn test_preset_reason_parsing() {
        assert_eq!(
            "poor-image-quality".parse::<PresetReason>(),
            Ok(PresetReason::PoorImageQuality)
        );
        assert!("blurry".parse::<PresetReason>().is_err());
    }
}
