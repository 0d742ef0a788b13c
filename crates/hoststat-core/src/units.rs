//! Byte count conversions.
//!
//! Binary units throughout: 1 KB = 1024 bytes, 1 MB = 1024² bytes,
//! 1 GB = 1024³ bytes. Results are plain `f64` division with no rounding.
//! An absent byte count converts to `0.0`.

use std::fmt;
use std::str::FromStr;

const KILOBYTE: f64 = 1024.0;
const MEGABYTE: f64 = 1_048_576.0;
const GIGABYTE: f64 = 1_073_741_824.0;

/// Error returned for a unit tag that is not `kb`, `mb` or `gb`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    #[error("unknown size unit '{0}' (expected kb, mb or gb)")]
    UnknownUnit(String),
}

/// Target unit for [`convert_by_unit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Kb,
    Mb,
    Gb,
}

impl SizeUnit {
    pub fn divisor(self) -> f64 {
        match self {
            SizeUnit::Kb => KILOBYTE,
            SizeUnit::Mb => MEGABYTE,
            SizeUnit::Gb => GIGABYTE,
        }
    }

    /// Converts a byte count into this unit. Absent input yields `0.0`.
    pub fn convert(self, bytes: impl Into<Option<u64>>) -> f64 {
        match bytes.into() {
            Some(b) => b as f64 / self.divisor(),
            None => 0.0,
        }
    }
}

impl FromStr for SizeUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        if tag.eq_ignore_ascii_case("kb") {
            Ok(SizeUnit::Kb)
        } else if tag.eq_ignore_ascii_case("mb") {
            Ok(SizeUnit::Mb)
        } else if tag.eq_ignore_ascii_case("gb") {
            Ok(SizeUnit::Gb)
        } else {
            Err(UnitError::UnknownUnit(s.to_string()))
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SizeUnit::Kb => "KB",
            SizeUnit::Mb => "MB",
            SizeUnit::Gb => "GB",
        };
        f.write_str(s)
    }
}

pub fn bytes_to_kilobytes(bytes: impl Into<Option<u64>>) -> f64 {
    SizeUnit::Kb.convert(bytes)
}

pub fn bytes_to_megabytes(bytes: impl Into<Option<u64>>) -> f64 {
    SizeUnit::Mb.convert(bytes)
}

pub fn bytes_to_gigabytes(bytes: impl Into<Option<u64>>) -> f64 {
    SizeUnit::Gb.convert(bytes)
}

/// Converts `bytes` into the unit named by `unit` (case-insensitive
/// `kb`/`mb`/`gb`).
///
/// Any other tag is rejected rather than guessed at.
pub fn convert_by_unit(bytes: impl Into<Option<u64>>, unit: &str) -> Result<f64, UnitError> {
    let unit: SizeUnit = unit.parse()?;
    Ok(unit.convert(bytes))
}
