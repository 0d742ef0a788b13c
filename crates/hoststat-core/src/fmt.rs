//! Human-readable formatting for snapshot values.
//!
//! Used by the CLI text renderer. Absent values render as `"--"`.

use crate::units::SizeUnit;

/// Format byte count as human-readable size.
///
/// `"1.5 GiB"`, `"100.3 MiB"`, `"50.0 KiB"`, `"512 B"`
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1024 * 1024 * 1024 {
        format!("{:.1} GiB", SizeUnit::Gb.convert(bytes))
    } else if bytes >= 1024 * 1024 {
        format!("{:.1} MiB", SizeUnit::Mb.convert(bytes))
    } else if bytes >= 1024 {
        format!("{:.1} KiB", SizeUnit::Kb.convert(bytes))
    } else {
        format!("{} B", bytes)
    }
}

pub fn format_opt_bytes(bytes: Option<u64>) -> String {
    bytes.map_or_else(|| "--".to_string(), format_bytes)
}

/// Format a `[0.0, 1.0]` load as a percentage with one decimal.
pub fn format_load(load: Option<f64>) -> String {
    match load {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => "--".to_string(),
    }
}

/// Format nanoseconds to human-readable.
pub fn format_ns(ns: Option<u64>) -> String {
    let Some(ns) = ns else {
        return "--".to_string();
    };
    if ns == 0 {
        return "0".to_string();
    }
    let ms = ns / 1_000_000;
    if ms > 1000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else if ms > 0 {
        format!("{}ms", ms)
    } else {
        format!("{}us", ns / 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(1_073_741_824), "1.0 GiB");
        assert_eq!(format_bytes(3 * 1_048_576), "3.0 MiB");
    }

    #[test]
    fn test_absent_values() {
        assert_eq!(format_opt_bytes(None), "--");
        assert_eq!(format_load(None), "--");
        assert_eq!(format_ns(None), "--");
    }

    #[test]
    fn test_format_load_and_ns() {
        assert_eq!(format_load(Some(0.125)), "12.5%");
        assert_eq!(format_load(Some(1.0)), "100.0%");
        assert_eq!(format_ns(Some(0)), "0");
        assert_eq!(format_ns(Some(2_500_000_000)), "2.5s");
        assert_eq!(format_ns(Some(15_000_000)), "15ms");
        assert_eq!(format_ns(Some(40_000)), "40us");
    }
}
