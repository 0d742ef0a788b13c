//! Pre-built mock host states for testing.

use super::filesystem::MockFs;
use crate::collector::traits::FsStats;

/// Working directory used by the scenarios.
pub const WORKING_DIR: &str = "/srv/app";

const GIB: u64 = 1024 * 1024 * 1024;

#[allow(dead_code)]
impl MockFs {
    /// A 4-CPU host with a 1 GiB root volume, a separate `/home` volume and
    /// a running `hoststat` process.
    pub fn typical_system() -> Self {
        let mut fs = Self::new();

        fs.add_file("/proc/uptime", "12345.67 98765.43\n");
        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
SwapTotal:       4096000 kB
SwapFree:        2048000 kB
Dirty:              1024 kB
",
        );
        fs.add_file(
            "/proc/stat",
            "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
processes 10000
",
        );
        // 2 s of CPU, started 10 s after boot, 256 MiB virtual.
        fs.set_self_stat(150, 50, 1000, 268_435_456);
        fs.add_file(
            "/proc/self/mountinfo",
            "\
22 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw,errors=remount-ro
23 22 0:21 / /proc rw,nosuid,nodev,noexec,relatime shared:12 - proc proc rw
24 22 8:2 / /home rw,relatime shared:2 - xfs /dev/sda2 rw
25 22 0:45 / /mnt/backup\\040disk ro,relatime shared:3 - ext4 /dev/sdb1 ro
",
        );

        fs.set_fs_stats(
            "/",
            FsStats {
                free: GIB / 2,
                total: GIB,
                usable: GIB / 4,
            },
        );
        fs.set_fs_stats(
            "/home",
            FsStats {
                free: 40 * GIB,
                total: 100 * GIB,
                usable: 35 * GIB,
            },
        );
        fs.add_dir(WORKING_DIR);

        fs
    }

    /// A host whose `/proc` exposes nothing and whose working directory has
    /// no capacity figures.
    pub fn bare_system() -> Self {
        let mut fs = Self::new();
        fs.add_dir("/proc");
        fs.add_dir(WORKING_DIR);
        fs
    }
}
