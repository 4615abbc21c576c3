//! Lock-free duration histogram.
//!
//! Buckets are fixed in microseconds to avoid floating point math on the
//! record path. Each bucket counts the samples that landed in it; cumulative
//! counts and percentile estimates are derived when a summary is taken.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

// 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s, 5s, 10s
pub(crate) const BUCKETS_MICROS: [u64; 11] = [
    100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000, 5_000_000, 10_000_000,
];

pub(crate) struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    min: AtomicU64,
    max: AtomicU64,
    // last slot holds samples above the largest bound
    buckets: [AtomicU64; BUCKETS_MICROS.len() + 1],
}

impl Default for AtomicHistogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            min: AtomicU64::new(u64::MAX),
            max: AtomicU64::new(0),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

impl AtomicHistogram {
    /// Record one sample (microsecond scale, saturating).
    pub(crate) fn observe(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        let slot = BUCKETS_MICROS
            .iter()
            .position(|&le| micros <= le)
            .unwrap_or(BUCKETS_MICROS.len());

        self.buckets[slot].fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(micros, Ordering::Relaxed);
        self.min.fetch_min(micros, Ordering::Relaxed);
        self.max.fetch_max(micros, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn summary(&self) -> DistributionSummary {
        let per_bucket: Vec<u64> = self
            .buckets
            .iter()
            .map(|b| b.load(Ordering::Relaxed))
            .collect();
        let count = self.count.load(Ordering::Relaxed);
        let sum_micros = self.sum.load(Ordering::Relaxed);
        let max_micros = self.max.load(Ordering::Relaxed);
        let min_micros = match self.min.load(Ordering::Relaxed) {
            u64::MAX => 0,
            m => m,
        };

        let mut running = 0;
        let buckets: Vec<BucketCount> = BUCKETS_MICROS
            .iter()
            .zip(&per_bucket)
            .map(|(&le_micros, &n)| {
                running += n;
                BucketCount { le_micros, count: running }
            })
            .collect();

        let mean_micros = if count == 0 {
            0.0
        } else {
            sum_micros as f64 / count as f64
        };

        DistributionSummary {
            count,
            sum_micros,
            min_micros,
            max_micros,
            mean_micros,
            p50_micros: percentile(&per_bucket, 0.50, max_micros),
            p90_micros: percentile(&per_bucket, 0.90, max_micros),
            p99_micros: percentile(&per_bucket, 0.99, max_micros),
            buckets,
        }
    }
}

/// Upper bound of the bucket holding the `q` quantile, capped at the observed
/// maximum so a lone small sample does not report a large bucket edge.
fn percentile(per_bucket: &[u64], q: f64, max_micros: u64) -> u64 {
    let total: u64 = per_bucket.iter().sum();
    if total == 0 {
        return 0;
    }
    let rank = ((q * total as f64).ceil() as u64).max(1);
    let mut seen = 0;
    for (slot, &n) in per_bucket.iter().enumerate() {
        seen += n;
        if seen >= rank {
            return BUCKETS_MICROS
                .get(slot)
                .map_or(max_micros, |&le| le.min(max_micros));
        }
    }
    max_micros
}

/// Cumulative count of samples at or below `le_micros`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub le_micros: u64,
    pub count: u64,
}

/// Point-in-time view of one distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub count: u64,
    pub sum_micros: u64,
    pub min_micros: u64,
    pub max_micros: u64,
    pub mean_micros: f64,
    pub p50_micros: u64,
    pub p90_micros: u64,
    pub p99_micros: u64,
    pub buckets: Vec<BucketCount>,
}

impl DistributionSummary {
    pub fn max(&self) -> Duration {
        Duration::from_micros(self.max_micros)
    }

    pub fn min(&self) -> Duration {
        Duration::from_micros(self.min_micros)
    }

    pub fn sum(&self) -> Duration {
        Duration::from_micros(self.sum_micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_is_all_zero() {
        let h = AtomicHistogram::default();
        let s = h.summary();
        assert_eq!(s.count, 0);
        assert_eq!(s.min_micros, 0);
        assert_eq!(s.p99_micros, 0);
        assert!(s.buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn buckets_are_cumulative() {
        let h = AtomicHistogram::default();
        h.observe(Duration::from_micros(50));
        h.observe(Duration::from_micros(700));
        h.observe(Duration::from_millis(20));

        let s = h.summary();
        assert_eq!(s.count, 3);
        assert_eq!(s.buckets[0], BucketCount { le_micros: 100, count: 1 });
        assert_eq!(s.buckets[2], BucketCount { le_micros: 1_000, count: 2 });
        assert_eq!(s.buckets[5], BucketCount { le_micros: 50_000, count: 3 });
        assert_eq!(s.buckets.last().map(|b| b.count), Some(3));
    }

    #[test]
    fn min_max_and_mean() {
        let h = AtomicHistogram::default();
        h.observe(Duration::from_micros(200));
        h.observe(Duration::from_micros(600));

        let s = h.summary();
        assert_eq!(s.min(), Duration::from_micros(200));
        assert_eq!(s.max(), Duration::from_micros(600));
        assert_eq!(s.sum(), Duration::from_micros(800));
        assert!((s.mean_micros - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percentiles_follow_bucket_edges() {
        let h = AtomicHistogram::default();
        for _ in 0..90 {
            h.observe(Duration::from_micros(80));
        }
        for _ in 0..10 {
            h.observe(Duration::from_millis(80));
        }

        let s = h.summary();
        assert_eq!(s.p50_micros, 100);
        assert_eq!(s.p90_micros, 100);
        assert_eq!(s.p99_micros, 80_000);
    }

    #[test]
    fn overflow_samples_report_observed_max() {
        let h = AtomicHistogram::default();
        h.observe(Duration::from_secs(30));

        let s = h.summary();
        assert_eq!(s.p50_micros, 30_000_000);
        assert_eq!(s.buckets.last().map(|b| b.count), Some(0));
    }
}
