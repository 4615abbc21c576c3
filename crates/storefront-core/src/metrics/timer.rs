//! Opaque timer handles.

use std::time::Instant;

/// Start timestamp issued by [`MetricsRegistry::start_timer`].
///
/// The handle remembers which registry issued it; stopping it on a different
/// registry is rejected. It is consumed by `stop_timer`, so one handle yields
/// at most one sample.
///
/// [`MetricsRegistry::start_timer`]: crate::metrics::MetricsRegistry::start_timer
#[derive(Debug)]
#[must_use = "a timer records nothing unless it is stopped"]
pub struct TimerHandle {
    registry_id: u64,
    started: Instant,
}

impl TimerHandle {
    pub(crate) fn new(registry_id: u64, started: Instant) -> Self {
        Self { registry_id, started }
    }

    pub(crate) fn registry_id(&self) -> u64 {
        self.registry_id
    }

    pub fn started_at(&self) -> Instant {
        self.started
    }
}
