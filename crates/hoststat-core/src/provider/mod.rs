//! Snapshot source abstraction.
//!
//! Front ends hold an `Arc<dyn SnapshotProvider>` so they do not carry the
//! collector's filesystem and probe type parameters.

use crate::collector::traits::FileSystem;
use crate::collector::{MetricsCollector, OsProbe};
use crate::model::MetricsSnapshot;

/// Produces a fresh snapshot on each call. Implementations may block.
pub trait SnapshotProvider: Send + Sync {
    fn collect(&self) -> MetricsSnapshot;
}

impl<F: FileSystem, P: OsProbe> SnapshotProvider for MetricsCollector<F, P> {
    fn collect(&self) -> MetricsSnapshot {
        MetricsCollector::collect(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{CollectorConfig, MockFs, UnsupportedProbe};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_collector_as_dyn_provider() {
        let config = CollectorConfig::default()
            .with_working_dir("/srv/app")
            .with_sample_interval(Duration::ZERO);
        let provider: Arc<dyn SnapshotProvider> = Arc::new(MetricsCollector::with_probe(
            MockFs::typical_system(),
            UnsupportedProbe,
            config,
        ));

        let snapshot = provider.collect();
        assert_eq!(snapshot.disk.total_space_as_megabytes, 1024.0);
    }
}
