//! Scoped request tracking.

use std::sync::Arc;
use std::time::Duration;

use super::{MetricsRegistry, TimerHandle, RESPONSE_TIME};

/// Holds one active-request slot for as long as it lives.
///
/// Creating the guard records a request start and starts the response-time
/// timer. Dropping it, on any exit path including `?` returns and unwinding,
/// stops the timer into `system.response.time` and records the request end.
#[must_use = "dropping the guard immediately ends the request"]
pub struct RequestGuard {
    registry: Arc<MetricsRegistry>,
    timer: Option<TimerHandle>,
}

impl RequestGuard {
    pub(crate) fn new(registry: Arc<MetricsRegistry>) -> Self {
        registry.record_request_start();
        let timer = Some(registry.start_timer());
        Self { registry, timer }
    }

    /// Time spent since the guard was acquired.
    pub fn elapsed(&self) -> Duration {
        self.timer
            .as_ref()
            .map(|t| t.started_at().elapsed())
            .unwrap_or_default()
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.registry.stop_timer(timer, RESPONSE_TIME);
        }
        self.registry.record_request_end();
    }
}
