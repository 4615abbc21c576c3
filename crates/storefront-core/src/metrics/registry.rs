//! Process-wide metrics registry.
//!
//! Counters, gauges, and distributions live in separate `DashMap`s keyed by
//! name. The hot path takes a shard read lock to find an existing slot and
//! only falls back to `entry` (write lock) the first time a name is seen.
//! Every mutation is a single atomic operation on the slot, so concurrent
//! writers never lose updates.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::MetricsError;

use super::histogram::{AtomicHistogram, DistributionSummary};
use super::resources::{self, ResourceUtilization};
use super::snapshot::MetricsSnapshot;
use super::{
    RequestGuard, TimerHandle, ACTIVE_REQUESTS, ACTIVE_REQUESTS_UNDERFLOW, MEMORY_USAGE,
    REQUESTS_TOTAL, THREAD_SATURATION,
};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

pub struct MetricsRegistry {
    id: u64,
    counters: DashMap<String, AtomicU64>,
    // f64 bit patterns
    gauges: DashMap<String, AtomicU64>,
    distributions: DashMap<String, AtomicHistogram>,
    active_requests: AtomicU64,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            counters: DashMap::new(),
            gauges: DashMap::new(),
            distributions: DashMap::new(),
            active_requests: AtomicU64::new(0),
        }
    }

    // --------------------
    // Counters
    // --------------------

    /// Increment by 1, creating the counter on first use.
    pub fn increment_counter(&self, name: &str) {
        self.add_counter(name, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add_counter(&self, name: &str, v: u64) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(v, Ordering::Relaxed);
            return;
        }
        self.counters
            .entry(name.to_owned())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(v, Ordering::Relaxed);
    }

    /// Current value; 0 for a counter never incremented.
    pub fn counter(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    // --------------------
    // Gauges
    // --------------------

    /// Overwrite the gauge. Non-finite values are logged and dropped.
    pub fn set_gauge(&self, name: &str, value: f64) {
        if let Err(e) = self.try_set_gauge(name, value) {
            tracing::warn!(gauge = %name, %value, error = %e, "gauge update dropped");
        }
    }

    fn try_set_gauge(&self, name: &str, value: f64) -> Result<(), MetricsError> {
        if !value.is_finite() {
            return Err(MetricsError::NonFiniteGauge(name.to_owned()));
        }
        let bits = value.to_bits();
        if let Some(gauge) = self.gauges.get(name) {
            gauge.store(bits, Ordering::Relaxed);
            return Ok(());
        }
        self.gauges
            .entry(name.to_owned())
            .or_insert_with(|| AtomicU64::new(bits))
            .store(bits, Ordering::Relaxed);
        Ok(())
    }

    /// Most recent write, or `None` if the gauge was never set.
    pub fn gauge(&self, name: &str) -> Option<f64> {
        self.gauges
            .get(name)
            .map(|g| f64::from_bits(g.load(Ordering::Relaxed)))
    }

    // --------------------
    // Timers / distributions
    // --------------------

    pub fn start_timer(&self) -> TimerHandle {
        TimerHandle::new(self.id, Instant::now())
    }

    /// Record the time since `handle` was issued as one sample of
    /// `distribution`. Foreign handles are logged and ignored.
    pub fn stop_timer(&self, handle: TimerHandle, distribution: &str) {
        if let Err(e) = self.try_stop_timer(handle, distribution) {
            tracing::warn!(distribution = %distribution, error = %e, "timer sample dropped");
        }
    }

    fn try_stop_timer(&self, handle: TimerHandle, distribution: &str) -> Result<Duration, MetricsError> {
        if handle.registry_id() != self.id {
            return Err(MetricsError::UnknownTimerHandle);
        }
        let elapsed = Instant::now()
            .checked_duration_since(handle.started_at())
            .ok_or(MetricsError::ClockUnavailable)?;
        self.record_duration(distribution, elapsed);
        Ok(elapsed)
    }

    /// Record an externally measured duration.
    pub fn record_duration(&self, distribution: &str, elapsed: Duration) {
        if let Some(hist) = self.distributions.get(distribution) {
            hist.observe(elapsed);
            return;
        }
        self.distributions
            .entry(distribution.to_owned())
            .or_insert_with(AtomicHistogram::default)
            .observe(elapsed);
    }

    pub fn distribution(&self, name: &str) -> Option<DistributionSummary> {
        self.distributions.get(name).map(|h| h.summary())
    }

    // --------------------
    // Active requests
    // --------------------

    /// Increment the in-flight count and the total request counter. These are
    /// two independent atomic updates.
    pub fn record_request_start(&self) {
        self.active_requests.fetch_add(1, Ordering::AcqRel);
        self.increment_counter(REQUESTS_TOTAL);
    }

    /// Decrement the in-flight count, clamping at zero.
    ///
    /// An end without a matching start leaves the count at 0, logs a warning
    /// and bumps `system.active.requests.underflow`.
    pub fn record_request_end(&self) {
        if let Err(e) = self.try_record_request_end() {
            self.increment_counter(ACTIVE_REQUESTS_UNDERFLOW);
            tracing::warn!(error = %e, "unbalanced request end; active count clamped at zero");
        }
    }

    fn try_record_request_end(&self) -> Result<(), MetricsError> {
        self.active_requests
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .map(|_| ())
            .map_err(|_| MetricsError::NegativeActiveCount)
    }

    pub fn active_requests(&self) -> u64 {
        self.active_requests.load(Ordering::Acquire)
    }

    /// Acquire an active-request slot released when the guard drops.
    pub fn begin_request(self: &Arc<Self>) -> RequestGuard {
        RequestGuard::new(Arc::clone(self))
    }

    // --------------------
    // Read-back
    // --------------------

    /// Read-only sample of process memory and thread usage.
    pub fn compute_resource_utilization(&self) -> ResourceUtilization {
        resources::sample()
    }

    /// Copy of every metric. Each value is read atomically; the snapshot as a
    /// whole is not a consistent cut across metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters: BTreeMap<String, u64> = self
            .counters
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();

        let mut gauges: BTreeMap<String, f64> = self
            .gauges
            .iter()
            .map(|r| (r.key().clone(), f64::from_bits(r.value().load(Ordering::Relaxed))))
            .collect();

        let distributions: BTreeMap<String, DistributionSummary> = self
            .distributions
            .iter()
            .map(|r| (r.key().clone(), r.value().summary()))
            .collect();

        let active_requests = self.active_requests();
        let resources = self.compute_resource_utilization();

        // derived gauges, evaluated at read time
        gauges.insert(ACTIVE_REQUESTS.to_owned(), active_requests as f64);
        gauges.insert(MEMORY_USAGE.to_owned(), resources.memory_pct);
        gauges.insert(THREAD_SATURATION.to_owned(), resources.thread_count as f64);

        MetricsSnapshot {
            counters,
            gauges,
            distributions,
            active_requests,
            resources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_starts_at_one() {
        let m = MetricsRegistry::new();
        assert_eq!(m.counter("x"), 0);
        m.increment_counter("x");
        assert_eq!(m.counter("x"), 1);
        m.add_counter("x", 4);
        assert_eq!(m.counter("x"), 5);
    }

    #[test]
    fn gauge_read_returns_last_write() {
        let m = MetricsRegistry::new();
        assert_eq!(m.gauge("g"), None);
        m.set_gauge("g", 12.5);
        m.set_gauge("g", -3.25);
        assert_eq!(m.gauge("g"), Some(-3.25));
    }

    #[test]
    fn non_finite_gauge_is_dropped() {
        let m = MetricsRegistry::new();
        m.set_gauge("g", 1.0);
        m.set_gauge("g", f64::NAN);
        m.set_gauge("g", f64::INFINITY);
        assert_eq!(m.gauge("g"), Some(1.0));
        assert_eq!(
            m.try_set_gauge("g", f64::NAN),
            Err(MetricsError::NonFiniteGauge("g".into()))
        );
    }

    #[test]
    fn foreign_timer_is_rejected() {
        let a = MetricsRegistry::new();
        let b = MetricsRegistry::new();
        let handle = b.start_timer();
        assert_eq!(
            a.try_stop_timer(handle, "d"),
            Err(MetricsError::UnknownTimerHandle)
        );
        assert!(a.distribution("d").is_none());
    }

    #[test]
    fn request_end_clamps_at_zero() {
        let m = MetricsRegistry::new();
        assert_eq!(m.try_record_request_end(), Err(MetricsError::NegativeActiveCount));
        m.record_request_end();
        assert_eq!(m.active_requests(), 0);
        assert_eq!(m.counter(ACTIVE_REQUESTS_UNDERFLOW), 1);

        m.record_request_start();
        m.record_request_end();
        assert_eq!(m.active_requests(), 0);
        assert_eq!(m.counter(REQUESTS_TOTAL), 1);
        assert_eq!(m.counter(ACTIVE_REQUESTS_UNDERFLOW), 1);
    }

    #[test]
    fn snapshot_carries_derived_gauges() {
        let m = MetricsRegistry::new();
        m.record_request_start();
        let snap = m.snapshot();
        assert_eq!(snap.active_requests, 1);
        assert_eq!(snap.gauges.get(ACTIVE_REQUESTS), Some(&1.0));
        assert!(snap.gauges.contains_key(MEMORY_USAGE));
        assert!(snap.gauges[THREAD_SATURATION] >= 1.0);
    }
}
