//! Data types produced by the collector.

mod snapshot;

pub use snapshot::{CpuUsage, DiskSpace, MetricsSnapshot, OsStatistics, VolumeInfo};
