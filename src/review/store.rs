// Submission store - local cache of the remote submissions table
//
// Mutations follow snapshot, attempt-remote, commit-or-discard: the cached
// record is only written once the gateway has accepted the change.

use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex as SyncMutex, MutexGuard, PoisonError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::gateway::{GatewayError, UploadGateway};
use crate::observability::{gateway_metrics, OperationTimer};
use crate::review::errors::ReviewError;
use crate::review::history::ReviewHistory;
use crate::review::state_machine::{plan_transition, DenialReason, ReviewCommand, ReviewPolicy};
use crate::review::transaction::ReviewTransaction;
use crate::review::types::{
    NewSubmission, ReviewAction, ReviewSummary, Submission, SubmissionFilter, SubmissionStatus,
};
use crate::telemetry::{create_review_span, generate_correlation_id};

#[derive(Debug, Default)]
struct StoreState {
    /// Newest first
    submissions: Vec<Submission>,
    selected: Option<String>,
    history: ReviewHistory,
}

impl StoreState {
    fn find(&self, id: &str) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.id == id)
    }

    /// Insert or replace a record, keeping newest-first order
    fn upsert(&mut self, submission: Submission) {
        self.submissions.retain(|s| s.id != submission.id);
        let position = self
            .submissions
            .iter()
            .position(|s| s.created_at < submission.created_at)
            .unwrap_or(self.submissions.len());
        self.submissions.insert(position, submission);
    }

    fn remove(&mut self, id: &str) {
        self.submissions.retain(|s| s.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
    }
}

/// Transactions waiting on the gateway, keyed by transaction id.
///
/// Kept outside the async state lock so a registration can be released from `Drop`.
#[derive(Debug, Default)]
struct InFlightRegistry {
    entries: SyncMutex<HashMap<Uuid, String>>,
}

impl InFlightRegistry {
    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn contains(&self, submission_id: &str) -> bool {
        self.entries().values().any(|id| id == submission_id)
    }

    fn register(&self, tx: &ReviewTransaction) -> InFlight<'_> {
        self.entries().insert(tx.id, tx.submission_id.clone());
        InFlight {
            registry: self,
            tx_id: tx.id,
        }
    }
}

/// Marks one transaction as in flight until dropped, including when the
/// caller abandons the mutation future mid-await.
struct InFlight<'a> {
    registry: &'a InFlightRegistry,
    tx_id: Uuid,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.registry.entries().remove(&self.tx_id).is_some() {
            debug!(transaction_id = %self.tx_id, "Released in-flight review transaction");
        }
    }
}

/// Owns the cached submissions, the current selection and the recent-actions buffer.
pub struct SubmissionStore<G> {
    gateway: G,
    policy: ReviewPolicy,
    state: Mutex<StoreState>,
    in_flight: InFlightRegistry,
}

impl<G: UploadGateway> SubmissionStore<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_policy(gateway, ReviewPolicy::default())
    }

    pub fn with_policy(gateway: G, policy: ReviewPolicy) -> Self {
        let state = StoreState {
            history: ReviewHistory::with_capacity(policy.history_capacity),
            ..StoreState::default()
        };
        Self {
            gateway,
            policy,
            state: Mutex::new(state),
            in_flight: InFlightRegistry::default(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn policy(&self) -> &ReviewPolicy {
        &self.policy
    }

    /// Replace the whole cache with the remote listing, newest first
    pub async fn fetch_all(&self) -> Result<Vec<Submission>, ReviewError> {
        let timer = OperationTimer::new("fetch_all");
        let mut fetched = self
            .remote("list", self.gateway.list(&SubmissionFilter::all()))
            .await
            .map_err(ReviewError::RemoteFetchFailed)?;
        fetched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut state = self.state.lock().await;
        state.submissions = fetched.clone();
        if let Some(selected) = state.selected.clone() {
            if state.find(&selected).is_none() {
                debug!(submission_id = %selected, "Selected submission no longer exists, clearing selection");
                state.selected = None;
            }
        }
        info!(count = fetched.len(), "Fetched submissions");
        timer.finish();
        Ok(fetched)
    }

    /// Re-read a single record from the gateway into the cache.
    ///
    /// A record the gateway no longer knows is dropped locally and `None` is returned.
    pub async fn reload(&self, id: &str) -> Result<Option<Submission>, ReviewError> {
        match self.remote("get_by_id", self.gateway.get_by_id(id)).await {
            Ok(submission) => {
                self.state.lock().await.upsert(submission.clone());
                Ok(Some(submission))
            }
            Err(err) if err.is_not_found() => {
                self.state.lock().await.remove(id);
                Ok(None)
            }
            Err(err) => Err(ReviewError::RemoteFetchFailed(err)),
        }
    }

    /// Persist a freshly uploaded floorplan as a pending submission
    pub async fn submit(&self, upload: NewSubmission) -> Result<Submission, ReviewError> {
        if upload.file_name.trim().is_empty() || upload.file_path.trim().is_empty() {
            return Err(ReviewError::Validation(
                "an upload needs a file name and a storage path".to_string(),
            ));
        }
        let submission = Submission::new(Uuid::new_v4().to_string(), upload, Utc::now());
        let id = submission.id.clone();

        let stored = self
            .remote("insert", self.gateway.insert(&submission))
            .await
            .map_err(|source| ReviewError::RemoteUpdateFailed {
                id: id.clone(),
                source,
            })?;

        self.state.lock().await.upsert(stored.clone());
        info!(submission_id = %id, file_name = %stored.file_name, "Submission received");
        Ok(stored)
    }

    pub async fn submissions(&self) -> Vec<Submission> {
        self.state.lock().await.submissions.clone()
    }

    /// Cached submissions in the given status, newest first
    pub async fn with_status(&self, status: SubmissionStatus) -> Vec<Submission> {
        let filter = SubmissionFilter::with_status(status);
        self.state
            .lock()
            .await
            .submissions
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect()
    }

    /// Look up a cached record; no remote round-trip
    pub async fn get(&self, id: &str) -> Option<Submission> {
        self.state.lock().await.find(id).cloned()
    }

    /// Mark a cached record as selected. Selecting an unknown id clears the selection.
    pub async fn select(&self, id: &str) -> Option<Submission> {
        let mut state = self.state.lock().await;
        let found = state.find(id).cloned();
        state.selected = found.as_ref().map(|s| s.id.clone());
        found
    }

    pub async fn selected(&self) -> Option<Submission> {
        let state = self.state.lock().await;
        state.selected.as_deref().and_then(|id| state.find(id)).cloned()
    }

    pub async fn clear_selection(&self) {
        self.state.lock().await.selected = None;
    }

    /// Recent actions, newest first
    pub async fn history(&self) -> Vec<ReviewAction> {
        self.state.lock().await.history.to_vec()
    }

    pub async fn summary(&self) -> ReviewSummary {
        ReviewSummary::from_submissions(&self.state.lock().await.submissions)
    }

    /// Whether a transition for this record is waiting on the gateway
    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    pub async fn approve(&self, id: &str) -> Result<ReviewAction, ReviewError> {
        self.transition(id, ReviewCommand::Approve).await
    }

    pub async fn deny(
        &self,
        id: &str,
        reason: impl Into<DenialReason>,
    ) -> Result<ReviewAction, ReviewError> {
        self.transition(id, ReviewCommand::Deny(reason.into())).await
    }

    pub async fn undo(&self, id: &str) -> Result<ReviewAction, ReviewError> {
        self.transition(id, ReviewCommand::Undo).await
    }

    async fn transition(
        &self,
        id: &str,
        command: ReviewCommand,
    ) -> Result<ReviewAction, ReviewError> {
        let correlation_id = generate_correlation_id();
        let span = create_review_span(&command.kind().to_string(), Some(id), &correlation_id);

        async move {
            let timer = OperationTimer::new(&format!("review_{}", command.kind()));
            let (tx, registration) = match self.begin(id, &command).await {
                Ok(started) => started,
                Err(err) => {
                    gateway_metrics().record_rejected_transition();
                    info!(submission_id = %id, error = %err, "Review transition rejected");
                    return Err(err);
                }
            };

            let result = self
                .remote("update", self.gateway.update(id, &tx.update()))
                .await;
            let outcome = self.finish(tx, registration, result).await;
            timer.finish();
            outcome
        }
        .instrument(span)
        .await
    }

    /// Validate against the cached status and register the transaction as in flight
    async fn begin(
        &self,
        id: &str,
        command: &ReviewCommand,
    ) -> Result<(ReviewTransaction, InFlight<'_>), ReviewError> {
        let state = self.state.lock().await;

        let current = state
            .find(id)
            .ok_or_else(|| ReviewError::NotFound(id.to_string()))?;
        let plan = plan_transition(id, current.status, command, &self.policy, &state.history)?;

        if self.policy.serialize_per_record && self.in_flight.contains(id) {
            return Err(ReviewError::TransitionInFlight(id.to_string()));
        }

        let tx = ReviewTransaction::begin(current, plan, Utc::now());
        debug!(
            submission_id = %id,
            from = %tx.snapshot.status,
            to = %tx.target.status,
            "Starting review transition"
        );
        let registration = self.in_flight.register(&tx);
        Ok((tx, registration))
    }

    /// Commit the target fields on remote success; otherwise drop the transaction unapplied
    async fn finish(
        &self,
        tx: ReviewTransaction,
        registration: InFlight<'_>,
        result: Result<(), GatewayError>,
    ) -> Result<ReviewAction, ReviewError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        drop(registration);

        if let Err(source) = result {
            gateway_metrics().record_rollback();
            warn!(
                submission_id = %tx.submission_id,
                error = %source,
                "Remote update failed, local submission left unchanged"
            );
            return Err(ReviewError::RemoteUpdateFailed {
                id: tx.submission_id,
                source,
            });
        }

        let action = match state
            .submissions
            .iter_mut()
            .find(|s| s.id == tx.submission_id)
        {
            Some(record) => {
                if !tx.is_unchanged(record) {
                    warn!(
                        submission_id = %tx.submission_id,
                        "Submission changed while the update was in flight, last write wins"
                    );
                }
                tx.commit(record)
            }
            None => {
                // Dropped by a refresh while in flight; the remote copy already has the change
                warn!(submission_id = %tx.submission_id, "Submission left the cache before the update resolved");
                tx.action()
            }
        };

        state.history.record(action.clone());
        info!(
            submission_id = %action.submission_id,
            previous_status = %action.previous_status,
            new_status = %action.new_status,
            "Review transition committed"
        );
        Ok(action)
    }

    /// Run a gateway call, bounded by the policy's remote timeout when one is set
    async fn remote<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, GatewayError> {
        match self.policy.remote_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(GatewayError::timeout(operation, limit))),
            None => call.await,
        }
    }
}
