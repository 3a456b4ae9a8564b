use super::client::QuarantineApi;
use crate::domain::{DispatchOutcome, FieldMap, QuarantineRequest};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct DispatchStats {
    attempted: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStatsSnapshot {
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl DispatchStats {
    pub fn snapshot(&self) -> DispatchStatsSnapshot {
        DispatchStatsSnapshot {
            attempted: self.attempted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// Validates extracted fields and issues at most one quarantine call per line.
///
/// Delivery failures of any kind become a failed [`DispatchOutcome`]; nothing
/// propagates to the caller and nothing is retried.
#[derive(Debug)]
pub struct Dispatcher<C> {
    api: C,
    stats: Arc<DispatchStats>,
}

impl<C: QuarantineApi> Dispatcher<C> {
    pub fn new(api: C) -> Self {
        Self {
            api,
            stats: Arc::new(DispatchStats::default()),
        }
    }

    pub fn api(&self) -> &C {
        &self.api
    }

    pub fn stats(&self) -> DispatchStatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns `None` when the fields do not form a complete request.
    pub async fn dispatch(&self, fields: &FieldMap) -> Option<DispatchOutcome> {
        let Some(request) = QuarantineRequest::from_fields(fields) else {
            self.stats.skipped.fetch_add(1, Ordering::Relaxed);
            debug!(fields = fields.len(), "alert segment without quarantine fields");
            return None;
        };

        Some(self.send(request).await)
    }

    pub async fn send(&self, request: QuarantineRequest) -> DispatchOutcome {
        self.stats.attempted.fetch_add(1, Ordering::Relaxed);

        let outcome = match self.api.quarantine(&request).await {
            Ok(status) => DispatchOutcome::succeeded(request, format!("HTTP {status}")),
            Err(e) => DispatchOutcome::failed(request, e.to_string()),
        };

        if outcome.success {
            self.stats.succeeded.fetch_add(1, Ordering::Relaxed);
            info!("{outcome}");
        } else {
            self.stats.failed.fetch_add(1, Ordering::Relaxed);
            warn!(endpoint = self.api.endpoint(), "{outcome}");
        }

        outcome
    }
}
