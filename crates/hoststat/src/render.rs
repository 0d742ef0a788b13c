//! Plain-text rendering of a snapshot.

use std::fmt::Write;

use chrono::DateTime;
use hoststat_core::fmt::{format_load, format_ns, format_opt_bytes};
use hoststat_core::model::MetricsSnapshot;
use hoststat_core::units::SizeUnit;

/// Renders `snapshot` as an aligned report. Disk figures use `unit` when
/// given, otherwise the best-fitting binary unit.
pub fn render_text(snapshot: &MetricsSnapshot, unit: Option<SizeUnit>) -> String {
    let mut out = String::new();
    let taken = DateTime::from_timestamp_millis(snapshot.timestamp_ms)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| snapshot.timestamp_ms.to_string());
    let _ = writeln!(out, "snapshot at {taken}");

    let disk = &snapshot.disk;
    let _ = writeln!(out, "\nDisk");
    line(&mut out, "total", disk_value(disk.total_space, unit));
    line(&mut out, "free", disk_value(disk.free_space, unit));
    line(&mut out, "usable", disk_value(disk.usable_space, unit));

    let os = &snapshot.os;
    let _ = writeln!(out, "\nMemory");
    line(
        &mut out,
        "physical total",
        format_opt_bytes(os.total_physical_memory_size),
    );
    line(
        &mut out,
        "physical free",
        format_opt_bytes(os.free_physical_memory_size),
    );
    line(
        &mut out,
        "swap total",
        format_opt_bytes(os.total_swap_space_size),
    );
    line(
        &mut out,
        "swap free",
        format_opt_bytes(os.free_swap_space_size),
    );
    line(
        &mut out,
        "committed virtual",
        format_opt_bytes(os.committed_virtual_memory_size),
    );

    let cpu = &snapshot.cpu;
    let _ = writeln!(out, "\nCPU");
    line(&mut out, "system load", format_load(os.system_cpu_load));
    line(&mut out, "process load", format_load(os.process_cpu_load));
    line(&mut out, "system usage", format_load(cpu.system_cpu_usage));
    line(&mut out, "process usage", format_load(cpu.jvm_cpu_usage));
    line(&mut out, "process time", format_ns(os.process_cpu_time));
    if let Some(percent) = cpu.process_cpu_usage {
        line(&mut out, "process sampled", format!("{percent}%"));
    }

    let _ = writeln!(out, "\nVolumes ({})", snapshot.file_system_volumes.len());
    for (mount_point, v) in &snapshot.file_system_volumes {
        let _ = writeln!(
            out,
            "  {:<24} {:<10} {:<8} {:<16} {}",
            mount_point,
            v.fs_type,
            v.device,
            v.name,
            if v.read_only { "ro" } else { "rw" }
        );
    }

    out
}

fn line(out: &mut String, label: &str, value: String) {
    let _ = writeln!(out, "  {:<18} {}", label, value);
}

fn disk_value(bytes: Option<u64>, unit: Option<SizeUnit>) -> String {
    match (bytes, unit) {
        (None, _) => "--".to_string(),
        (Some(b), Some(unit)) => format!("{:.2} {}", unit.convert(b), unit),
        (Some(b), None) => format_opt_bytes(Some(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoststat_core::model::{CpuUsage, DiskSpace, OsStatistics, VolumeInfo};
    use std::collections::BTreeMap;

    fn snapshot() -> MetricsSnapshot {
        let mut volumes = BTreeMap::new();
        volumes.insert(
            "/".to_string(),
            VolumeInfo {
                name: "/dev/sda1".to_string(),
                mount_point: "/".to_string(),
                fs_type: "ext4".to_string(),
                device: "8:1".to_string(),
                read_only: false,
            },
        );
        MetricsSnapshot {
            timestamp_ms: 1_700_000_000_000,
            disk: DiskSpace::from_bytes(Some(1 << 29), Some(1 << 30), None),
            os: OsStatistics {
                total_physical_memory_size: Some(16 << 30),
                system_cpu_load: Some(0.125),
                ..Default::default()
            },
            cpu: CpuUsage {
                process_cpu_usage: Some(42),
                ..Default::default()
            },
            file_system_volumes: volumes,
        }
    }

    #[test]
    fn test_render_text_auto_units() {
        let text = render_text(&snapshot(), None);

        assert!(text.starts_with("snapshot at 2023-11-14T22:13:20"));
        assert!(text.contains("total              1.0 GiB"));
        assert!(text.contains("free               512.0 MiB"));
        assert!(text.contains("usable             --"));
        assert!(text.contains("physical total     16.0 GiB"));
        assert!(text.contains("system load        12.5%"));
        assert!(text.contains("process sampled    42%"));
        assert!(text.contains("Volumes (1)"));
        assert!(text.contains("/dev/sda1"));
    }

    #[test]
    fn test_render_text_fixed_unit() {
        let text = render_text(&snapshot(), Some(SizeUnit::Mb));
        assert!(text.contains("total              1024.00 MB"));
    }
}
