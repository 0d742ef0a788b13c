//! Disk capacity of the working directory and mounted volume enumeration.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::collector::procfs::parser::parse_mountinfo;
use crate::collector::traits::FileSystem;
use crate::model::{DiskSpace, VolumeInfo};

pub struct DiskCollector<'a, F: FileSystem> {
    fs: &'a F,
    proc_path: &'a str,
}

impl<'a, F: FileSystem> DiskCollector<'a, F> {
    pub fn new(fs: &'a F, proc_path: &'a str) -> Self {
        Self { fs, proc_path }
    }

    /// Capacity of the filesystem holding `dir`.
    ///
    /// On failure the raw figures are absent and the converted ones are `0.0`.
    pub fn collect_space(&self, dir: &Path) -> DiskSpace {
        match self.fs.fs_stats(dir) {
            Ok(stats) => DiskSpace::from_bytes(
                Some(stats.free),
                Some(stats.total),
                Some(stats.usable),
            ),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to query filesystem capacity");
                DiskSpace::unavailable()
            }
        }
    }

    /// Volumes visible to this process, keyed by mount point.
    ///
    /// When a mount point is stacked, the topmost (last listed) mount wins.
    pub fn collect_volumes(&self) -> BTreeMap<String, VolumeInfo> {
        let path = format!("{}/self/mountinfo", self.proc_path);
        let content = match self.fs.read_to_string(Path::new(&path)) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path, error = %e, "failed to enumerate volumes");
                return BTreeMap::new();
            }
        };

        let volumes: BTreeMap<String, VolumeInfo> = parse_mountinfo(&content)
            .into_iter()
            .map(|m| {
                let info = VolumeInfo {
                    name: m.source,
                    mount_point: m.mount_point.clone(),
                    fs_type: m.fs_type,
                    device: format!("{}:{}", m.major, m.minor),
                    read_only: m.read_only,
                };
                (m.mount_point, info)
            })
            .collect();
        debug!(count = volumes.len(), "enumerated volumes");
        volumes
    }
}
