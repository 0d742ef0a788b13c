//! Builds one [`MetricsSnapshot`] from the disk and operating-system probes.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{Dispatch, debug, debug_span, info, warn};

use crate::collector::disk::DiskCollector;
use crate::collector::platform::{OsProbe, read_os_statistics};
#[cfg(not(target_os = "linux"))]
use crate::collector::platform::UnsupportedProbe;
#[cfg(target_os = "linux")]
use crate::collector::procfs::ProcfsProbe;
use crate::collector::sampler::sample_cpu_usage;
use crate::collector::traits::FileSystem;
use crate::model::{CpuUsage, MetricsSnapshot, OsStatistics};

/// Default pause before each CPU load read.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// What to measure and how long to sample.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Directory whose filesystem capacity is reported.
    pub working_dir: PathBuf,
    pub proc_path: String,
    pub sample_interval: Duration,
    /// Run the two-sample process CPU estimator (`processCpuUsage`).
    pub process_usage: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            proc_path: "/proc".to_string(),
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            process_usage: false,
        }
    }
}

impl CollectorConfig {
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn with_proc_path(mut self, proc_path: impl Into<String>) -> Self {
        self.proc_path = proc_path.into();
        self
    }

    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    pub fn with_process_usage(mut self, enabled: bool) -> Self {
        self.process_usage = enabled;
        self
    }
}

/// Host metrics collector.
///
/// Holds no state between calls: every [`collect`](Self::collect) opens its
/// own operating-system handle, so concurrent collections from several
/// threads are independent.
pub struct MetricsCollector<F: FileSystem, P: OsProbe> {
    fs: F,
    probe: P,
    config: CollectorConfig,
    log_sink: Option<Dispatch>,
}

#[cfg(target_os = "linux")]
impl<F: FileSystem + Clone> MetricsCollector<F, ProcfsProbe<F>> {
    /// Creates a collector reading operating-system metrics from `config.proc_path`.
    pub fn new(fs: F, config: CollectorConfig) -> Self {
        let probe = ProcfsProbe::new(fs.clone(), config.proc_path.clone());
        Self::with_probe(fs, probe, config)
    }
}

#[cfg(not(target_os = "linux"))]
impl<F: FileSystem> MetricsCollector<F, UnsupportedProbe> {
    /// Creates a collector that reports disk figures only.
    pub fn new(fs: F, config: CollectorConfig) -> Self {
        Self::with_probe(fs, UnsupportedProbe, config)
    }
}

impl<F: FileSystem, P: OsProbe> MetricsCollector<F, P> {
    pub fn with_probe(fs: F, probe: P, config: CollectorConfig) -> Self {
        Self {
            fs,
            probe,
            config,
            log_sink: None,
        }
    }

    /// Routes every log event of a collection to `sink` instead of the
    /// global subscriber.
    pub fn with_log_sink(mut self, sink: Dispatch) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Collects a snapshot. Never fails: unobtainable metrics are absent
    /// and logged.
    ///
    /// Blocks for one to three sample intervals.
    pub fn collect(&self) -> MetricsSnapshot {
        match &self.log_sink {
            Some(sink) => tracing::dispatcher::with_default(sink, || self.collect_inner()),
            None => self.collect_inner(),
        }
    }

    fn collect_inner(&self) -> MetricsSnapshot {
        let span = debug_span!("collect", dir = %self.config.working_dir.display());
        let _enter = span.enter();
        let started = Instant::now();
        let timestamp_ms = chrono::Utc::now().timestamp_millis();

        let disk_collector = DiskCollector::new(&self.fs, &self.config.proc_path);
        let disk = disk_collector.collect_space(&self.config.working_dir);
        let file_system_volumes = disk_collector.collect_volumes();

        let (os, cpu) = match self.probe.open() {
            Ok(metrics) => {
                let os = read_os_statistics(&metrics);
                let cpu = sample_cpu_usage(
                    &metrics,
                    self.config.sample_interval,
                    self.config.process_usage,
                );
                (os, cpu)
            }
            Err(e) if e.is_unsupported() => {
                info!("operating-system metrics not available on this platform");
                (OsStatistics::default(), CpuUsage::default())
            }
            Err(e) => {
                warn!(error = %e, "failed to open operating-system metrics");
                (OsStatistics::default(), CpuUsage::default())
            }
        };

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            volumes = file_system_volumes.len(),
            "collected snapshot"
        );

        MetricsSnapshot {
            timestamp_ms,
            disk,
            os,
            cpu,
            file_system_volumes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::MockFs;
    use crate::collector::mock::TickingFs;
    use crate::collector::mock::scenarios::WORKING_DIR;
    use crate::collector::platform::UnsupportedProbe;
    use crate::collector::procfs::ProcfsProbe;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn config() -> CollectorConfig {
        CollectorConfig::default()
            .with_working_dir(WORKING_DIR)
            .with_sample_interval(Duration::ZERO)
    }

    fn procfs_collector(fs: MockFs) -> MetricsCollector<MockFs, ProcfsProbe<MockFs>> {
        let probe = ProcfsProbe::new(fs.clone(), "/proc");
        MetricsCollector::with_probe(fs, probe, config())
    }

    #[test]
    fn test_config_defaults() {
        let config = CollectorConfig::default();
        assert_eq!(config.working_dir, PathBuf::from("."));
        assert_eq!(config.proc_path, "/proc");
        assert_eq!(config.sample_interval, Duration::from_millis(100));
        assert!(!config.process_usage);
    }

    #[test]
    fn test_collect_typical_system() {
        let snapshot = procfs_collector(MockFs::typical_system()).collect();

        assert_eq!(snapshot.disk.total_space, Some(1_073_741_824));
        assert_eq!(snapshot.disk.total_space_as_gigabytes, 1.0);
        assert_eq!(snapshot.disk.total_space_as_megabytes, 1024.0);
        assert_eq!(snapshot.disk.total_space_as_kilobytes, 1_048_576.0);

        assert_eq!(
            snapshot.os.total_physical_memory_size,
            Some(16_384_000 * 1024)
        );
        assert_eq!(snapshot.os.process_cpu_time, Some(2_000_000_000));
        assert!(snapshot.os.system_cpu_load.is_some());
        assert_eq!(snapshot.file_system_volumes.len(), 4);
        assert!(snapshot.timestamp_ms > 0);

        // The mock counters do not advance between reads.
        assert_eq!(snapshot.cpu.system_cpu_usage, None);
        assert_eq!(snapshot.cpu.jvm_cpu_usage, None);
        assert_eq!(snapshot.cpu.process_cpu_usage, None);
    }

    #[test]
    fn test_collect_with_process_usage() {
        let fs = MockFs::typical_system();
        let probe = ProcfsProbe::new(fs.clone(), "/proc");
        let collector =
            MetricsCollector::with_probe(fs, probe, config().with_process_usage(true));

        assert_eq!(collector.collect().cpu.process_cpu_usage, Some(0));
    }

    #[test]
    fn test_collect_unsupported_platform_keeps_disk() {
        let collector =
            MetricsCollector::with_probe(MockFs::typical_system(), UnsupportedProbe, config());
        let snapshot = collector.collect();

        assert_eq!(snapshot.disk.free_space, Some(536_870_912));
        assert_eq!(snapshot.disk.usable_space, Some(268_435_456));
        assert_eq!(snapshot.os, OsStatistics::default());
        assert_eq!(snapshot.cpu, CpuUsage::default());
        assert!(!snapshot.file_system_volumes.is_empty());
    }

    #[test]
    fn test_collect_bare_system() {
        let snapshot = procfs_collector(MockFs::bare_system()).collect();

        assert_eq!(snapshot.disk.total_space, None);
        assert_eq!(snapshot.disk.total_space_as_gigabytes, 0.0);
        assert_eq!(snapshot.os, OsStatistics::default());
        assert_eq!(snapshot.cpu, CpuUsage::default());
        assert!(snapshot.file_system_volumes.is_empty());
    }

    #[test]
    fn test_collect_samples_load_over_interval() {
        // 50 process ticks per one-second step on 2 CPUs.
        let fs = TickingFs::new(2, 50);
        let probe = ProcfsProbe::new(fs.clone(), "/proc");
        let snapshot = MetricsCollector::with_probe(fs, probe, config()).collect();

        assert_eq!(snapshot.cpu.system_cpu_usage, Some(0.3));
        assert_eq!(snapshot.cpu.jvm_cpu_usage, Some(0.25));
    }

    #[test]
    fn test_collect_clamps_process_load() {
        let fs = TickingFs::new(1, 300);
        let probe = ProcfsProbe::new(fs.clone(), "/proc");
        let snapshot = MetricsCollector::with_probe(fs, probe, config()).collect();

        // 3 s of CPU in the one-second sampling window on one CPU.
        assert_eq!(snapshot.cpu.jvm_cpu_usage, Some(1.0));
    }

    #[test]
    fn test_each_collect_opens_a_fresh_handle() {
        let fs = TickingFs::new(1, 50);
        let probe = ProcfsProbe::new(fs.clone(), "/proc");
        let collector = MetricsCollector::with_probe(fs, probe, config());
        collector.collect();

        // Second collection: step 3 at 1003 s, 150 ticks since start at boot.
        let snapshot = collector.collect();
        assert_eq!(snapshot.os.process_cpu_load, Some(1.5 / 1003.0));
        assert_eq!(snapshot.cpu.jvm_cpu_usage, Some(0.5));
    }

    #[test]
    fn test_concurrent_collects_are_independent() {
        let collector = procfs_collector(MockFs::typical_system());
        let reference = collector.collect();

        let snapshots: Vec<MetricsSnapshot> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| collector.collect())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(snapshots.len(), 8);
        for snapshot in &snapshots {
            assert_eq!(snapshot.disk, reference.disk);
            assert_eq!(snapshot.file_system_volumes, reference.file_system_volumes);
            // First load read of each handle is measured since boot, so a
            // shared baseline would show up as a missing load here.
            assert_eq!(snapshot.os.system_cpu_load, reference.os.system_cpu_load);
            assert_eq!(snapshot.os.process_cpu_load, reference.os.process_cpu_load);
            assert_eq!(snapshot.os.total_swap_space_size, reference.os.total_swap_space_size);
        }
    }

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_log_sink_receives_collection_events() {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        let collector =
            procfs_collector(MockFs::bare_system()).with_log_sink(Dispatch::new(subscriber));
        collector.collect();

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("failed to query filesystem capacity"));
        assert!(output.contains("failed to enumerate volumes"));
        assert!(output.contains("totalPhysicalMemorySize"));
        assert!(output.contains("WARN"));
    }

    #[test]
    fn test_log_sink_unsupported_is_info() {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        let collector =
            MetricsCollector::with_probe(MockFs::typical_system(), UnsupportedProbe, config())
                .with_log_sink(Dispatch::new(subscriber));
        collector.collect();

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("not available on this platform"));
        assert!(!output.contains("WARN"));
    }
}
