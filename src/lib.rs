// TerraPrice Review Library - floorplan submission review workflow
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod gateway;
pub mod http;
pub mod observability;
pub mod review;
pub mod telemetry;

// Re-export key types for easy access
pub use config::TerraPriceConfig;
pub use gateway::{GatewayError, MemoryUploadGateway, RestUploadGateway, UploadGateway};
pub use http::RateLimitedHttpClient;
pub use observability::{gateway_metrics, GatewayMetrics, OperationTimer};
pub use review::{
    DenialReason, NewSubmission, PresetReason, ReviewAction, ReviewError, ReviewHistory,
    ReviewPolicy, ReviewSummary, Submission, SubmissionStatus, SubmissionStore, UndoTarget,
};
pub use telemetry::{create_review_span, generate_correlation_id, init_telemetry};
