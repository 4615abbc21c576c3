//! Process resource sampling.
//!
//! On Linux the sample is read from procfs: resident set size from
//! `/proc/self/status` against `MemTotal` from `/proc/meminfo`, and the
//! `Threads:` line for the thread count. Elsewhere, or when procfs cannot be
//! read, memory reports 0% and the thread count falls back to 1 (the caller's
//! own thread).

use serde::Serialize;

/// Point-in-time process resource usage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResourceUtilization {
    /// Resident memory as a percentage of physical memory, in `[0, 100]`.
    pub memory_pct: f64,
    /// Live OS threads in this process, at least 1.
    pub thread_count: usize,
}

pub(crate) fn sample() -> ResourceUtilization {
    let (rss_kib, threads) = read_self_status().unwrap_or((None, None));
    let total_kib = read_mem_total();

    let memory_pct = match (rss_kib, total_kib) {
        (Some(rss), Some(total)) => memory_percent(rss, total),
        _ => 0.0,
    };
    let thread_count = threads.unwrap_or(1).max(1);

    ResourceUtilization { memory_pct, thread_count }
}

fn memory_percent(used_kib: u64, total_kib: u64) -> f64 {
    if total_kib == 0 {
        return 0.0;
    }
    let pct = used_kib as f64 / total_kib as f64 * 100.0;
    if pct.is_finite() {
        pct.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(target_os = "linux")]
fn read_self_status() -> Option<(Option<u64>, Option<usize>)> {
    match std::fs::read_to_string("/proc/self/status") {
        Ok(text) => {
            let rss = parse_field(&text, "VmRSS:");
            let threads = parse_field(&text, "Threads:").and_then(|t| usize::try_from(t).ok());
            Some((rss, threads))
        }
        Err(e) => {
            tracing::debug!(error = %e, "read /proc/self/status failed");
            None
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn read_self_status() -> Option<(Option<u64>, Option<usize>)> {
    None
}

#[cfg(target_os = "linux")]
fn read_mem_total() -> Option<u64> {
    std::fs::read_to_string("/proc/meminfo")
        .ok()
        .and_then(|text| parse_field(&text, "MemTotal:"))
}

#[cfg(not(target_os = "linux"))]
fn read_mem_total() -> Option<u64> {
    None
}

/// First integer after `key` on its line (`"VmRSS:\t  1234 kB"` -> 1234).
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_field(text: &str, key: &str) -> Option<u64> {
    text.lines()
        .find_map(|line| line.strip_prefix(key))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "Name:\tstorefront\nVmPeak:\t  20480 kB\nVmRSS:\t   5120 kB\nThreads:\t7\n";

    #[test]
    fn parses_proc_fields() {
        assert_eq!(parse_field(STATUS, "VmRSS:"), Some(5120));
        assert_eq!(parse_field(STATUS, "Threads:"), Some(7));
        assert_eq!(parse_field(STATUS, "VmSwap:"), None);
    }

    #[test]
    fn memory_percent_is_bounded() {
        assert!((memory_percent(512, 1024) - 50.0).abs() < f64::EPSILON);
        assert_eq!(memory_percent(10, 0), 0.0);
        assert_eq!(memory_percent(4096, 1024), 100.0);
    }

    #[test]
    fn live_sample_is_in_range() {
        let s = sample();
        assert!((0.0..=100.0).contains(&s.memory_pct));
        assert!(s.thread_count >= 1);
    }
}
