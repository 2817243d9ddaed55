//! Property tests for the review state machine and store
//!
//! Random command sequences are replayed against a store backed by the
//! in-memory gateway and checked against a small reference model.

use chrono::Utc;
use proptest::prelude::*;
use std::sync::Arc;

use terraprice_review::review::{
    DenialReason, NewSubmission, PresetReason, ReviewCommand, ReviewError, Submission,
    SubmissionStatus, SubmissionStore,
};
use terraprice_review::MemoryUploadGateway;

fn preset_strategy() -> impl Strategy<Value = PresetReason> {
    prop::sample::select(PresetReason::ALL.to_vec())
}

fn reason_strategy() -> impl Strategy<Value = DenialReason> {
    prop_oneof![
        preset_strategy().prop_map(DenialReason::Preset),
        "[a-zA-Z ]{0,24}".prop_map(DenialReason::Custom),
    ]
}

fn command_strategy() -> impl Strategy<Value = ReviewCommand> {
    prop_oneof![
        Just(ReviewCommand::Approve),
        reason_strategy().prop_map(ReviewCommand::Deny),
        Just(ReviewCommand::Undo),
    ]
}

fn reason_is_acceptable(reason: &DenialReason) -> bool {
    match reason {
        DenialReason::Preset(_) => true,
        DenialReason::Custom(text) => !text.trim().is_empty() && text.chars().count() >= 10,
    }
}

/// Status the reference model expects, or `None` when the command must be rejected
fn expected_status(current: SubmissionStatus, command: &ReviewCommand) -> Option<SubmissionStatus> {
    match (current, command) {
        (SubmissionStatus::Pending, ReviewCommand::Approve) => Some(SubmissionStatus::Approved),
        (SubmissionStatus::Pending, ReviewCommand::Deny(reason)) if reason_is_acceptable(reason) => {
            Some(SubmissionStatus::Denied)
        }
        (SubmissionStatus::Approved | SubmissionStatus::Denied, ReviewCommand::Undo) => {
            Some(SubmissionStatus::Pending)
        }
        _ => None,
    }
}

fn fresh_submission() -> Submission {
    Submission::new(
        "prop-1",
        NewSubmission {
            file_name: "plan.png".to_string(),
            file_size: 1024,
            file_path: "user-1/plan.png".to_string(),
            owner_user_id: "user-1".to_string(),
        },
        Utc::now(),
    )
}

proptest! {
    #[test]
    fn prop_command_sequences_follow_reference_model(
        commands in prop::collection::vec(command_strategy(), 1..30)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();

        runtime.block_on(async {
            let gateway = Arc::new(MemoryUploadGateway::with_submissions(vec![fresh_submission()]));
            let store = SubmissionStore::new(gateway.clone());
            store.fetch_all().await.unwrap();

            let mut model = SubmissionStatus::Pending;
            let mut committed = 0usize;

            for command in commands {
                let result = match &command {
                    ReviewCommand::Approve => store.approve("prop-1").await,
                    ReviewCommand::Deny(reason) => store.deny("prop-1", reason.clone()).await,
                    ReviewCommand::Undo => store.undo("prop-1").await,
                };

                match expected_status(model, &command) {
                    Some(next) => {
                        let action = result.unwrap();
                        assert_eq!(action.previous_status, model);
                        assert_eq!(action.new_status, next);
                        assert_eq!(action.can_undo, next.is_decided());
                        model = next;
                        committed += 1;
                    }
                    None => {
                        let err = result.unwrap_err();
                        assert!(matches!(
                            err,
                            ReviewError::InvalidTransition { .. } | ReviewError::Validation(_)
                        ));
                        assert!(err.is_local());
                    }
                }

                let local = store.get("prop-1").await.unwrap();
                let remote = gateway.stored("prop-1").await.unwrap();
                assert_eq!(local.status, model);
                assert_eq!(remote.status, model);
                assert_eq!(local.review_comment, remote.review_comment);
                // Only denied records carry a comment
                assert_eq!(local.review_comment.is_some(), model == SubmissionStatus::Denied);
            }

            assert_eq!(store.history().await.len(), committed.min(10));
            assert_eq!(gateway.update_calls(), committed);
        });
    }

    #[test]
    fn prop_custom_reason_validation_counts_characters(text in "\\PC{0,20}") {
        let reason = DenialReason::Custom(text.clone());
        let accepted = reason.validate(10).is_ok();
        prop_assert_eq!(accepted, !text.trim().is_empty() && text.chars().count() >= 10);
    }

    #[test]
    fn prop_presets_always_validate(preset in preset_strategy(), min in 0usize..64) {
        prop_assert!(DenialReason::Preset(preset).validate(min).is_ok());
    }
}
