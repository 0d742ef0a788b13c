//! Operating-system metrics read from `/proc`.

use std::cell::Cell;
use std::path::Path;

use crate::collector::CollectError;
use crate::collector::platform::{OsMetrics, OsProbe};
use crate::collector::procfs::parser::{
    CpuStat, MemInfo, ProcStat, parse_global_stat, parse_meminfo, parse_proc_stat, parse_uptime,
};
use crate::collector::traits::FileSystem;

/// Clock ticks per second (USER_HZ). Standard value for Linux.
const CLK_TCK: u64 = 100;
const NANOS_PER_TICK: u64 = 1_000_000_000 / CLK_TCK;

/// Process CPU ticks at a point on the `/proc/uptime` clock.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ProcessTicks {
    ticks: u64,
    uptime_secs: f64,
}

/// Opens [`ProcfsMetrics`] handles over a proc filesystem.
#[derive(Debug, Clone)]
pub struct ProcfsProbe<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem + Clone> ProcfsProbe<F> {
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }
}

impl<F: FileSystem + Clone> OsProbe for ProcfsProbe<F> {
    type Metrics = ProcfsMetrics<F>;

    fn open(&self) -> Result<ProcfsMetrics<F>, CollectError> {
        if !self.fs.exists(Path::new(&self.proc_path)) {
            return Err(CollectError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("proc filesystem not found at {}", self.proc_path),
            )));
        }
        Ok(ProcfsMetrics {
            fs: self.fs.clone(),
            proc_path: self.proc_path.clone(),
            system_baseline: Cell::new(None),
            process_baseline: Cell::new(None),
        })
    }
}

/// One collection's view of `/proc`.
///
/// Every accessor rereads its source file. Load baselines are kept per
/// handle.
pub struct ProcfsMetrics<F: FileSystem> {
    fs: F,
    proc_path: String,
    system_baseline: Cell<Option<CpuStat>>,
    process_baseline: Cell<Option<ProcessTicks>>,
}

impl<F: FileSystem> ProcfsMetrics<F> {
    fn read(&self, name: &str) -> Result<String, CollectError> {
        let path = format!("{}/{}", self.proc_path, name);
        Ok(self.fs.read_to_string(Path::new(&path))?)
    }

    fn meminfo(&self) -> Result<MemInfo, CollectError> {
        Ok(parse_meminfo(&self.read("meminfo")?)?)
    }

    fn self_stat(&self) -> Result<ProcStat, CollectError> {
        Ok(parse_proc_stat(&self.read("self/stat")?)?)
    }

    fn meminfo_bytes(
        &self,
        field: &'static str,
        pick: fn(&MemInfo) -> Option<u64>,
    ) -> Result<u64, CollectError> {
        let info = self.meminfo()?;
        pick(&info)
            .map(|kb| kb.saturating_mul(1024))
            .ok_or(CollectError::MissingField(field))
    }
}

fn clamp_load(load: f64) -> f64 {
    load.clamp(0.0, 1.0)
}

impl<F: FileSystem> OsMetrics for ProcfsMetrics<F> {
    fn committed_virtual_memory_size(&self) -> Result<u64, CollectError> {
        Ok(self.self_stat()?.vsize)
    }

    fn total_swap_space_size(&self) -> Result<u64, CollectError> {
        self.meminfo_bytes("SwapTotal", |m| m.swap_total)
    }

    fn free_swap_space_size(&self) -> Result<u64, CollectError> {
        self.meminfo_bytes("SwapFree", |m| m.swap_free)
    }

    fn process_cpu_time(&self) -> Result<u64, CollectError> {
        Ok(self.self_stat()?.cpu_ticks().saturating_mul(NANOS_PER_TICK))
    }

    fn free_physical_memory_size(&self) -> Result<u64, CollectError> {
        self.meminfo_bytes("MemFree", |m| m.mem_free)
    }

    fn total_physical_memory_size(&self) -> Result<u64, CollectError> {
        self.meminfo_bytes("MemTotal", |m| m.mem_total)
    }

    fn system_cpu_load(&self) -> Result<f64, CollectError> {
        let current = parse_global_stat(&self.read("stat")?)?.total;
        let baseline = self.system_baseline.replace(Some(current)).unwrap_or_default();

        let total = current.total().saturating_sub(baseline.total());
        if total == 0 {
            return Err(CollectError::NoElapsedTime);
        }
        let busy = current.busy().saturating_sub(baseline.busy());
        Ok(clamp_load(busy as f64 / total as f64))
    }

    fn process_cpu_load(&self) -> Result<f64, CollectError> {
        let uptime_secs = parse_uptime(&self.read("uptime")?)?;
        let global = parse_global_stat(&self.read("stat")?)?;
        let cpus = global.cpus.len().max(1) as f64;
        let stat = self.self_stat()?;
        let current = ProcessTicks {
            ticks: stat.cpu_ticks(),
            uptime_secs,
        };

        let (cpu_ticks, wall_secs) = match self.process_baseline.replace(Some(current)) {
            Some(prev) => (
                current.ticks.saturating_sub(prev.ticks),
                uptime_secs - prev.uptime_secs,
            ),
            None => (current.ticks, uptime_secs - stat.starttime as f64 / CLK_TCK as f64),
        };

        if wall_secs <= 0.0 {
            return Err(CollectError::NoElapsedTime);
        }
        let cpu_secs = cpu_ticks as f64 / CLK_TCK as f64;
        Ok(clamp_load(cpu_secs / (wall_secs * cpus)))
    }
}
