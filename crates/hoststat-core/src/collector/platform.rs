//! Operating-system metrics provider abstraction.
//!
//! Not every platform exposes memory, swap and CPU accounting. An
//! [`OsProbe`] hands out a per-collection [`OsMetrics`] handle whose
//! accessors each either return a value or say why they cannot. Accessors a
//! platform does not implement fall back to [`CollectError::Unsupported`].
//!
//! The concrete probe is chosen at compile time: `/proc` on Linux,
//! [`UnsupportedProbe`] elsewhere.

use std::fmt;

use tracing::{info, warn};

use crate::collector::CollectError;
use crate::model::OsStatistics;

/// Source of [`OsMetrics`] handles.
pub trait OsProbe: Send + Sync {
    type Metrics: OsMetrics;

    /// Obtains a fresh handle. Load baselines live in the handle, so two
    /// handles never share sampling state.
    fn open(&self) -> Result<Self::Metrics, CollectError>;
}

/// Extended operating-system metrics of the current process and host.
///
/// The two load accessors report usage since the previous load read on the
/// same handle; the first read covers the time since boot (system) or since
/// process start (process).
pub trait OsMetrics {
    /// Virtual memory guaranteed to the process, bytes.
    fn committed_virtual_memory_size(&self) -> Result<u64, CollectError> {
        Err(CollectError::Unsupported)
    }

    fn total_swap_space_size(&self) -> Result<u64, CollectError> {
        Err(CollectError::Unsupported)
    }

    fn free_swap_space_size(&self) -> Result<u64, CollectError> {
        Err(CollectError::Unsupported)
    }

    /// Cumulative CPU time of the process, nanoseconds.
    fn process_cpu_time(&self) -> Result<u64, CollectError> {
        Err(CollectError::Unsupported)
    }

    fn free_physical_memory_size(&self) -> Result<u64, CollectError> {
        Err(CollectError::Unsupported)
    }

    fn total_physical_memory_size(&self) -> Result<u64, CollectError> {
        Err(CollectError::Unsupported)
    }

    /// Whole-system CPU usage in `[0.0, 1.0]`.
    fn system_cpu_load(&self) -> Result<f64, CollectError> {
        Err(CollectError::Unsupported)
    }

    /// CPU usage of this process in `[0.0, 1.0]`.
    fn process_cpu_load(&self) -> Result<f64, CollectError> {
        Err(CollectError::Unsupported)
    }
}

/// Names of the extended metrics, as they appear in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsMetric {
    CommittedVirtualMemorySize,
    TotalSwapSpaceSize,
    FreeSwapSpaceSize,
    ProcessCpuTime,
    FreePhysicalMemorySize,
    TotalPhysicalMemorySize,
    SystemCpuLoad,
    ProcessCpuLoad,
}

impl OsMetric {
    pub fn name(self) -> &'static str {
        match self {
            OsMetric::CommittedVirtualMemorySize => "committedVirtualMemorySize",
            OsMetric::TotalSwapSpaceSize => "totalSwapSpaceSize",
            OsMetric::FreeSwapSpaceSize => "freeSwapSpaceSize",
            OsMetric::ProcessCpuTime => "processCpuTime",
            OsMetric::FreePhysicalMemorySize => "freePhysicalMemorySize",
            OsMetric::TotalPhysicalMemorySize => "totalPhysicalMemorySize",
            OsMetric::SystemCpuLoad => "systemCpuLoad",
            OsMetric::ProcessCpuLoad => "processCpuLoad",
        }
    }
}

impl fmt::Display for OsMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Turns a metric read into an optional value, logging why it is absent.
pub(crate) fn gate<T>(metric: OsMetric, result: Result<T, CollectError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_unsupported() => {
            info!(metric = metric.name(), "metric not supported on this platform");
            None
        }
        Err(e) => {
            warn!(metric = metric.name(), error = %e, "failed to read metric");
            None
        }
    }
}

/// Reads all eight extended metrics. A failing metric never stops the others.
pub fn read_os_statistics<M: OsMetrics>(metrics: &M) -> OsStatistics {
    use OsMetric::*;

    OsStatistics {
        committed_virtual_memory_size: gate(
            CommittedVirtualMemorySize,
            metrics.committed_virtual_memory_size(),
        ),
        total_swap_space_size: gate(TotalSwapSpaceSize, metrics.total_swap_space_size()),
        free_swap_space_size: gate(FreeSwapSpaceSize, metrics.free_swap_space_size()),
        process_cpu_time: gate(ProcessCpuTime, metrics.process_cpu_time()),
        free_physical_memory_size: gate(
            FreePhysicalMemorySize,
            metrics.free_physical_memory_size(),
        ),
        total_physical_memory_size: gate(
            TotalPhysicalMemorySize,
            metrics.total_physical_memory_size(),
        ),
        system_cpu_load: gate(SystemCpuLoad, metrics.system_cpu_load()),
        process_cpu_load: gate(ProcessCpuLoad, metrics.process_cpu_load()),
    }
}

/// Probe for platforms without an operating-system metrics source.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedProbe;

/// Handle with no capabilities; every accessor is unsupported.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMetrics;

impl OsMetrics for NoMetrics {}

impl OsProbe for UnsupportedProbe {
    type Metrics = NoMetrics;

    fn open(&self) -> Result<NoMetrics, CollectError> {
        Err(CollectError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exposes memory figures only.
    struct MemoryOnly;

    impl OsMetrics for MemoryOnly {
        fn total_physical_memory_size(&self) -> Result<u64, CollectError> {
            Ok(16 << 30)
        }

        fn free_physical_memory_size(&self) -> Result<u64, CollectError> {
            Ok(4 << 30)
        }

        fn system_cpu_load(&self) -> Result<f64, CollectError> {
            Err(CollectError::MissingField("cpu"))
        }
    }

    #[test]
    fn test_read_os_statistics_partial_support() {
        let stats = read_os_statistics(&MemoryOnly);

        assert_eq!(stats.total_physical_memory_size, Some(16 << 30));
        assert_eq!(stats.free_physical_memory_size, Some(4 << 30));
        assert_eq!(stats.system_cpu_load, None);
        assert_eq!(stats.committed_virtual_memory_size, None);
        assert_eq!(stats.total_swap_space_size, None);
        assert_eq!(stats.process_cpu_time, None);
        assert_eq!(stats.process_cpu_load, None);
    }

    #[test]
    fn test_no_metrics_is_all_absent() {
        assert_eq!(read_os_statistics(&NoMetrics), OsStatistics::default());
        assert!(UnsupportedProbe.open().unwrap_err().is_unsupported());
    }

    #[test]
    fn test_metric_names_match_snapshot_fields() {
        let json = serde_json::to_value(OsStatistics::default()).unwrap();
        let all = [
            OsMetric::CommittedVirtualMemorySize,
            OsMetric::TotalSwapSpaceSize,
            OsMetric::FreeSwapSpaceSize,
            OsMetric::ProcessCpuTime,
            OsMetric::FreePhysicalMemorySize,
            OsMetric::TotalPhysicalMemorySize,
            OsMetric::SystemCpuLoad,
            OsMetric::ProcessCpuLoad,
        ];
        for metric in all {
            assert!(json.get(metric.name()).is_some(), "{metric}");
        }
    }
}
