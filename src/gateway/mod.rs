// Remote persistence boundary for floorplan submissions.
// The store treats every implementation as opaque, asynchronous and fallible.

pub mod errors;
pub mod memory;
pub mod rest;

use async_trait::async_trait;

use crate::review::types::{Submission, SubmissionFilter, SubmissionUpdate};

pub use errors::GatewayError;
pub use memory::MemoryUploadGateway;
pub use rest::RestUploadGateway;

/// Query/update interface of the hosted submissions table
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UploadGateway: Send + Sync {
    /// All matching submissions, newest first
    async fn list(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>, GatewayError>;

    async fn get_by_id(&self, id: &str) -> Result<Submission, GatewayError>;

    async fn update(&self, id: &str, update: &SubmissionUpdate) -> Result<(), GatewayError>;

    /// Persist a newly uploaded submission and return the stored copy
    async fn insert(&self, submission: &Submission) -> Result<Submission, GatewayError>;
}

#[async_trait]
impl<G> UploadGateway for std::sync::Arc<G>
where
    G: UploadGateway + ?Sized,
{
    async fn list(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>, GatewayError> {
        (**self).list(filter).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Submission, GatewayError> {
        (**self).get_by_id(id).await
    }

    async fn update(&self, id: &str, update: &SubmissionUpdate) -> Result<(), GatewayError> {
        (**self).update(id, update).await
    }

    async fn insert(&self, submission: &Submission) -> Result<Submission, GatewayError> {
        (**self).insert(submission).await
    }
}
