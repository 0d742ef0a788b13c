//! CPU usage sampling.
//!
//! The load accessors of [`OsMetrics`] report usage since their previous read
//! on the same handle, so sleeping before a read turns it into a short-window
//! measurement. [`process_cpu_usage_percent`] instead samples cumulative CPU
//! time twice and divides by the elapsed wall time.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::collector::platform::{OsMetric, OsMetrics, gate};
use crate::model::CpuUsage;

/// One reading of the process clock pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimeSample {
    /// Monotonic wall time, nanoseconds from an arbitrary origin.
    pub wall_ns: u64,
    /// Cumulative process CPU time, nanoseconds.
    pub cpu_ns: u64,
}

/// CPU time consumed between two samples as an integer percentage of the
/// elapsed wall time. Returns 0 when no wall time elapsed.
///
/// A multi-threaded process can exceed 100.
pub fn cpu_rate_percent(before: CpuTimeSample, after: CpuTimeSample) -> u64 {
    if after.wall_ns <= before.wall_ns {
        return 0;
    }
    let wall = u128::from(after.wall_ns - before.wall_ns);
    let cpu = u128::from(after.cpu_ns.saturating_sub(before.cpu_ns));
    u64::try_from(cpu * 100 / wall).unwrap_or(u64::MAX)
}

/// Sleeps for `interval`, then reads the whole-system CPU load.
pub fn system_cpu_usage<M: OsMetrics>(metrics: &M, interval: Duration) -> Option<f64> {
    thread::sleep(interval);
    gate(OsMetric::SystemCpuLoad, metrics.system_cpu_load())
}

/// Sleeps for `interval`, then reads this process's CPU load.
pub fn process_cpu_load_usage<M: OsMetrics>(metrics: &M, interval: Duration) -> Option<f64> {
    thread::sleep(interval);
    gate(OsMetric::ProcessCpuLoad, metrics.process_cpu_load())
}

/// Two-sample estimate of this process's CPU usage over `interval`.
///
/// Absent when the platform does not report process CPU time.
pub fn process_cpu_usage_percent<M: OsMetrics>(metrics: &M, interval: Duration) -> Option<u64> {
    let origin = Instant::now();
    let wall_ns = || u64::try_from(origin.elapsed().as_nanos()).unwrap_or(u64::MAX);

    let before_wall = wall_ns();
    let before_cpu = gate(OsMetric::ProcessCpuTime, metrics.process_cpu_time())?;
    thread::sleep(interval);
    let after_cpu = gate(OsMetric::ProcessCpuTime, metrics.process_cpu_time())?;
    let after_wall = wall_ns();

    let percent = cpu_rate_percent(
        CpuTimeSample {
            wall_ns: before_wall,
            cpu_ns: before_cpu,
        },
        CpuTimeSample {
            wall_ns: after_wall,
            cpu_ns: after_cpu,
        },
    );
    Some(percent)
}

/// Runs the sampling procedures in order. The two-sample estimator only
/// runs when `process_usage` is set.
pub fn sample_cpu_usage<M: OsMetrics>(
    metrics: &M,
    interval: Duration,
    process_usage: bool,
) -> CpuUsage {
    let usage = CpuUsage {
        system_cpu_usage: system_cpu_usage(metrics, interval),
        jvm_cpu_usage: process_cpu_load_usage(metrics, interval),
        process_cpu_usage: if process_usage {
            process_cpu_usage_percent(metrics, interval)
        } else {
            None
        },
    };
    debug!(
        system = ?usage.system_cpu_usage,
        process = ?usage.jvm_cpu_usage,
        percent = ?usage.process_cpu_usage,
        "sampled cpu usage"
    );
    usage
}
