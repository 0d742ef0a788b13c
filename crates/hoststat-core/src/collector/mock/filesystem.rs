//! In-memory mock filesystem for testing collectors without real `/proc`.

use crate::collector::traits::{FileSystem, FsStats};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
///
/// Stores files, directories and per-mount capacity figures in memory so
/// tests can simulate any `/proc` state and any disk size.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    /// Capacity per mount root; a query resolves to the nearest ancestor.
    mounts: HashMap<PathBuf, FsStats>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.insert(path);
    }

    /// Removes a file, simulating a kernel that does not expose it.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        self.files.remove(path.as_ref());
    }

    /// Registers `path` as a mount root with the given capacity.
    pub fn set_fs_stats(&mut self, path: impl AsRef<Path>, stats: FsStats) {
        let path = path.as_ref().to_path_buf();
        self.add_dir(&path);
        self.mounts.insert(path, stats);
    }

    /// Writes `/proc/self/stat` for the calling process.
    pub fn set_self_stat(&mut self, utime: u64, stime: u64, starttime: u64, vsize: u64) {
        self.add_file(
            "/proc/self/stat",
            format!(
                "4242 (hoststat) R 1 4242 4242 0 -1 4194304 1200 0 0 0 {utime} {stime} 0 0 20 0 4 0 {starttime} {vsize} 2500 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 1 0 0 0 0 0\n"
            ),
        );
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    fn fs_stats(&self, path: &Path) -> io::Result<FsStats> {
        if !self.exists(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("path not found: {:?}", path),
            ));
        }

        path.ancestors()
            .find_map(|p| self.mounts.get(p).copied())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::Unsupported,
                    format!("no mounted filesystem for {:?}", path),
                )
            })
    }
}
