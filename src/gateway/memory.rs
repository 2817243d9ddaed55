use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::gateway::{GatewayError, UploadGateway};
use crate::review::types::{Submission, SubmissionFilter, SubmissionUpdate};

/// In-process gateway holding submissions in memory.
///
/// Used for local demos and tests. Failures and latency can be injected to
/// exercise the store's rollback and race behavior.
#[derive(Debug, Default)]
pub struct MemoryUploadGateway {
    submissions: RwLock<Vec<Submission>>,
    offline: AtomicBool,
    failing_updates: AtomicUsize,
    latency_ms: AtomicU64,
    update_calls: AtomicUsize,
}

impl MemoryUploadGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_submissions(submissions: Vec<Submission>) -> Self {
        Self {
            submissions: RwLock::new(submissions),
            ..Self::default()
        }
    }

    /// Every call fails with `Unavailable` while offline
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fail the next `count` update calls
    pub fn fail_next_updates(&self, count: usize) {
        self.failing_updates.store(count, Ordering::SeqCst);
    }

    /// Sleep this long before answering each call
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(millis, Ordering::SeqCst);
    }

    /// Number of update calls received, including failed ones
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Current durable copy of a record
    pub async fn stored(&self, id: &str) -> Option<Submission> {
        self.submissions
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    async fn simulate_network(&self) -> Result<(), GatewayError> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable(
                "memory gateway is offline".to_string(),
            ));
        }
        Ok(())
    }

    fn take_injected_failure(&self) -> bool {
        self.failing_updates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl UploadGateway for MemoryUploadGateway {
    async fn list(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>, GatewayError> {
        self.simulate_network().await?;
        let mut matching: Vec<Submission> = self
            .submissions
            .read()
            .await
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = matching.len(), "Listed submissions from memory gateway");
        Ok(matching)
    }

    async fn get_by_id(&self, id: &str) -> Result<Submission, GatewayError> {
        self.simulate_network().await?;
        self.stored(id)
            .await
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, update: &SubmissionUpdate) -> Result<(), GatewayError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_network().await?;
        if self.take_injected_failure() {
            return Err(GatewayError::Unavailable(format!(
                "injected failure updating submission {id}"
            )));
        }

        let mut submissions = self.submissions.write().await;
        let record = submissions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;
        record.status = update.status;
        record.review_comment = update.review_comment.clone();
        record.updated_at = update.updated_at;
        debug!(submission_id = %id, status = %update.status, "Updated submission in memory gateway");
        Ok(())
    }

    async fn insert(&self, submission: &Submission) -> Result<Submission, GatewayError> {
        self.simulate_network().await?;
        let mut submissions = self.submissions.write().await;
        if submissions.iter().any(|s| s.id == submission.id) {
            return Err(GatewayError::Api {
                status: 409,
                message: format!("submission {} already exists", submission.id),
            });
        }
        submissions.push(submission.clone());
        Ok(submission.clone())
    }
}
