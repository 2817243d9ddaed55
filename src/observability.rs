use tracing::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Backend API usage metrics
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    pub total_requests: AtomicU64,
    pub errors: AtomicU64,
    pub rejected_transitions: AtomicU64,
    pub rolled_back_transitions: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_transition(&self) {
        self.rejected_transitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rollback(&self) {
        self.rolled_back_transitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> GatewayStats {
        GatewayStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            rejected_transitions: self.rejected_transitions.load(Ordering::Relaxed),
            rolled_back_transitions: self.rolled_back_transitions.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Backend metrics: requests={}, errors={}, rejected_transitions={}, rollbacks={}",
            stats.total_requests,
            stats.errors,
            stats.rejected_transitions,
            stats.rolled_back_transitions
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayStats {
    pub total_requests: u64,
    pub errors: u64,
    pub rejected_transitions: u64,
    pub rolled_back_transitions: u64,
}

/// Global metrics instance
static GATEWAY_METRICS: std::sync::LazyLock<GatewayMetrics> =
    std::sync::LazyLock::new(GatewayMetrics::new);

pub fn gateway_metrics() -> &'static GatewayMetrics {
    &GATEWAY_METRICS
}

/// Time an operation and log its duration when finished
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}
