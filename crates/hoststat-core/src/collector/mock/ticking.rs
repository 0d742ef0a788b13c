//! Mock host whose counters advance while a collection runs.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::filesystem::MockFs;
use crate::collector::traits::{FileSystem, FsStats};

/// Seconds since boot before the first step.
pub const BASE_UPTIME_SECS: u64 = 1000;
/// Busy and idle ticks the aggregate `cpu` line gains per step.
pub const BUSY_TICKS_PER_STEP: u64 = 30;
pub const IDLE_TICKS_PER_STEP: u64 = 70;

/// Wraps a [`MockFs`] and moves time forward by one second on every read of
/// `/proc/uptime`.
///
/// Each step adds `process_ticks` to this process's `utime` and a fixed
/// busy/idle split to `/proc/stat`. Clones share the same clock.
#[derive(Debug, Clone)]
pub struct TickingFs {
    inner: MockFs,
    steps: Arc<AtomicU64>,
    cpus: u64,
    process_ticks: u64,
}

impl TickingFs {
    /// Host with `cpus` CPUs on top of [`MockFs::typical_system`]. The
    /// process started at boot.
    pub fn new(cpus: u64, process_ticks: u64) -> Self {
        Self {
            inner: MockFs::typical_system(),
            steps: Arc::default(),
            cpus,
            process_ticks,
        }
    }

    fn step(&self) -> u64 {
        self.steps.load(Ordering::SeqCst)
    }

    fn uptime(&self) -> String {
        let step = self.steps.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}.00 0.00\n", BASE_UPTIME_SECS + step)
    }

    fn global_stat(&self) -> String {
        let step = self.step();
        let busy = 1000 + step * BUSY_TICKS_PER_STEP;
        let idle = 9000 + step * IDLE_TICKS_PER_STEP;
        let mut out = format!("cpu  {busy} 0 0 {idle} 0 0 0 0 0 0\n");
        for id in 0..self.cpus {
            out.push_str(&format!("cpu{id} 0 0 0 0 0 0 0 0 0 0\n"));
        }
        out
    }

    fn self_stat(&self) -> String {
        let utime = self.step() * self.process_ticks;
        format!(
            "4242 (hoststat) R 1 4242 4242 0 -1 4194304 1200 0 0 0 {utime} 0 0 0 20 0 4 0 0 268435456 2500 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 1 0 0 0 0 0\n"
        )
    }
}

impl FileSystem for TickingFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        match path.to_str() {
            Some("/proc/uptime") => Ok(self.uptime()),
            Some("/proc/stat") => Ok(self.global_stat()),
            Some("/proc/self/stat") => Ok(self.self_stat()),
            _ => self.inner.read_to_string(path),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn fs_stats(&self, path: &Path) -> io::Result<FsStats> {
        self.inner.fs_stats(path)
    }
}
