//! Abstractions for filesystem access to enable testing and mocking.
//!
//! The `FileSystem` trait lets the collector read `/proc` and query
//! filesystem capacity either from the real host or from an in-memory
//! [`MockFs`](crate::collector::MockFs).

use std::io;
use std::path::Path;

/// Capacity figures of one filesystem, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsStats {
    /// Free blocks, including those reserved for the superuser.
    pub free: u64,
    pub total: u64,
    /// Blocks available to an unprivileged caller.
    pub usable: u64,
}

/// Abstraction for filesystem operations.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Returns capacity of the filesystem that contains `path`.
    fn fs_stats(&self, path: &Path) -> io::Result<FsStats>;
}

/// Real filesystem implementation that delegates to `std::fs` and `statvfs(3)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    #[cfg(unix)]
    #[allow(clippy::unnecessary_cast)]
    fn fs_stats(&self, path: &Path) -> io::Result<FsStats> {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        // SAFETY: `c_path` is a valid NUL-terminated string and `stat` is a
        // properly sized, writable statvfs struct owned by this frame.
        let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
        let ret = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
        if ret != 0 {
            return Err(io::Error::last_os_error());
        }

        // Field widths differ between libc targets.
        let frsize = stat.f_frsize as u64;
        Ok(FsStats {
            free: (stat.f_bfree as u64).saturating_mul(frsize),
            total: (stat.f_blocks as u64).saturating_mul(frsize),
            usable: (stat.f_bavail as u64).saturating_mul(frsize),
        })
    }

    #[cfg(not(unix))]
    fn fs_stats(&self, _path: &Path) -> io::Result<FsStats> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "filesystem statistics are only available on unix targets",
        ))
    }
}
