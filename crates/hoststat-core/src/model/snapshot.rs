//! Point-in-time host metrics snapshot.
//!
//! One `MetricsSnapshot` is built per `collect()` call and never mutated
//! afterwards. Serialized field names are camelCase (`freeSpace`,
//! `totalSpaceAsGigabytes`, `systemCpuLoad`, ...). Disk and OS groups are
//! flattened so the JSON object is a single level deep, with
//! `fileSystemVolumes` as the only nested map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::units::{bytes_to_gigabytes, bytes_to_kilobytes, bytes_to_megabytes};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Unix timestamp (milliseconds) taken when collection started.
    pub timestamp_ms: i64,
    #[serde(flatten)]
    pub disk: DiskSpace,
    #[serde(flatten)]
    pub os: OsStatistics,
    #[serde(flatten)]
    pub cpu: CpuUsage,
    /// Mounted volumes keyed by mount point.
    pub file_system_volumes: BTreeMap<String, VolumeInfo>,
}

/// Capacity of the filesystem holding the working directory.
///
/// Raw fields stay `None` when the filesystem could not be queried; the
/// converted fields are `0.0` in that case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DiskSpace {
    pub free_space: Option<u64>,
    pub total_space: Option<u64>,
    pub usable_space: Option<u64>,

    pub free_space_as_kilobytes: f64,
    pub total_space_as_kilobytes: f64,
    pub usable_space_as_kilobytes: f64,

    pub free_space_as_megabytes: f64,
    pub total_space_as_megabytes: f64,
    pub usable_space_as_megabytes: f64,

    pub free_space_as_gigabytes: f64,
    pub total_space_as_gigabytes: f64,
    pub usable_space_as_gigabytes: f64,
}

impl DiskSpace {
    /// Builds the raw and derived fields from byte counts.
    pub fn from_bytes(free: Option<u64>, total: Option<u64>, usable: Option<u64>) -> Self {
        Self {
            free_space: free,
            total_space: total,
            usable_space: usable,
            free_space_as_kilobytes: bytes_to_kilobytes(free),
            total_space_as_kilobytes: bytes_to_kilobytes(total),
            usable_space_as_kilobytes: bytes_to_kilobytes(usable),
            free_space_as_megabytes: bytes_to_megabytes(free),
            total_space_as_megabytes: bytes_to_megabytes(total),
            usable_space_as_megabytes: bytes_to_megabytes(usable),
            free_space_as_gigabytes: bytes_to_gigabytes(free),
            total_space_as_gigabytes: bytes_to_gigabytes(total),
            usable_space_as_gigabytes: bytes_to_gigabytes(usable),
        }
    }

    /// All raw fields absent, all converted fields zero.
    pub fn unavailable() -> Self {
        Self::from_bytes(None, None, None)
    }
}

/// Extended operating-system metrics. Each one is `None` when the platform
/// does not expose it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct OsStatistics {
    /// Virtual memory guaranteed to the process, bytes.
    pub committed_virtual_memory_size: Option<u64>,
    pub total_swap_space_size: Option<u64>,
    pub free_swap_space_size: Option<u64>,
    /// CPU time consumed by this process, nanoseconds.
    pub process_cpu_time: Option<u64>,
    pub free_physical_memory_size: Option<u64>,
    pub total_physical_memory_size: Option<u64>,
    /// Recent whole-system CPU usage in `[0.0, 1.0]`.
    pub system_cpu_load: Option<f64>,
    /// Recent CPU usage of this process in `[0.0, 1.0]`.
    pub process_cpu_load: Option<f64>,
}

/// Sampled CPU usage figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CpuUsage {
    /// Whole-system load read after the sampling delay, `[0.0, 1.0]`.
    pub system_cpu_usage: Option<f64>,
    /// Load of this process read after the sampling delay, `[0.0, 1.0]`.
    pub jvm_cpu_usage: Option<f64>,
    /// Two-sample estimate in percent of one CPU. Only filled when
    /// process usage sampling is enabled.
    pub process_cpu_usage: Option<u64>,
}

/// Descriptor of one mounted volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    /// Device or source name as reported by the kernel (e.g. `/dev/sda1`, `tmpfs`).
    pub name: String,
    pub mount_point: String,
    pub fs_type: String,
    /// `major:minor` of the backing device.
    pub device: String,
    pub read_only: bool,
}
