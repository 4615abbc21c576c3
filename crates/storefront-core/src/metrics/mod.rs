//! In-process request metrics.
//!
//! A single [`MetricsRegistry`] is built at startup and handed to every
//! component that records: counters, gauges, and duration distributions are
//! independent named slots in concurrent maps, each updated with one atomic
//! operation. Nothing in here returns an error to the caller; failures are
//! logged and the sample is dropped.

pub mod guard;
pub mod histogram;
pub mod registry;
pub mod resources;
pub mod snapshot;
pub mod timer;

pub use guard::RequestGuard;
pub use histogram::{BucketCount, DistributionSummary};
pub use registry::MetricsRegistry;
pub use resources::ResourceUtilization;
pub use snapshot::MetricsSnapshot;
pub use timer::TimerHandle;

/// In-flight request count (gauge).
pub const ACTIVE_REQUESTS: &str = "system.active.requests";
/// Requests started since process start (counter).
pub const REQUESTS_TOTAL: &str = "system.requests.total";
/// End-to-end handling time of tracked requests (distribution).
pub const RESPONSE_TIME: &str = "system.response.time";
/// Process memory usage in percent of physical memory (gauge).
pub const MEMORY_USAGE: &str = "system.memory.usage";
/// Process thread count (gauge).
pub const THREAD_SATURATION: &str = "system.thread.saturation";
/// Unmatched `record_request_end` calls (counter).
pub const ACTIVE_REQUESTS_UNDERFLOW: &str = "system.active.requests.underflow";
