//! Host metrics collector.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   MetricsCollector                   │
//! │  ┌──────────────────┐     ┌───────────────────────┐  │
//! │  │  DiskCollector   │     │ OsProbe ─► OsMetrics  │  │
//! │  │  - statvfs(dir)  │     │ - ProcfsProbe (Linux) │  │
//! │  │  - mountinfo     │     │ - UnsupportedProbe    │  │
//! │  └────────┬─────────┘     └───────────┬───────────┘  │
//! │           │                    sampler│              │
//! │           └─────────────┬─────────────┘              │
//! │                  ┌──────▼──────┐                     │
//! │                  │  FileSystem │ (trait)             │
//! │                  └──────┬──────┘                     │
//! └─────────────────────────┼────────────────────────────┘
//!                 ┌─────────┴─────────┐
//!          ┌──────▼──────┐     ┌──────▼──────┐
//!          │   RealFs    │     │   MockFs    │
//!          └─────────────┘     └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use hoststat_core::collector::{CollectorConfig, MetricsCollector, MockFs, ProcfsProbe};
//!
//! let fs = MockFs::typical_system();
//! let probe = ProcfsProbe::new(fs.clone(), "/proc");
//! let config = CollectorConfig::default()
//!     .with_working_dir("/srv/app")
//!     .with_sample_interval(Duration::ZERO);
//! let snapshot = MetricsCollector::with_probe(fs, probe, config).collect();
//! assert_eq!(snapshot.disk.total_space_as_gigabytes, 1.0);
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod disk;
mod error;
pub mod mock;
pub mod platform;
pub mod procfs;
pub mod sampler;
pub mod traits;

pub use collector::{CollectorConfig, DEFAULT_SAMPLE_INTERVAL, MetricsCollector};
pub use error::CollectError;
pub use mock::MockFs;
pub use platform::{NoMetrics, OsMetric, OsMetrics, OsProbe, UnsupportedProbe};
pub use procfs::{ProcfsMetrics, ProcfsProbe};
pub use traits::{FileSystem, FsStats, RealFs};
