use std::collections::BTreeMap;

use serde::Serialize;

use super::{DistributionSummary, ResourceUtilization};

/// Read-only copy of the registry, ordered by metric name.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<String, u64>,
    pub gauges: BTreeMap<String, f64>,
    pub distributions: BTreeMap<String, DistributionSummary>,
    pub active_requests: u64,
    pub resources: ResourceUtilization,
}

impl MetricsSnapshot {
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn distribution_count(&self, name: &str) -> u64 {
        self.distributions.get(name).map_or(0, |d| d.count)
    }
}
