//! Shared application state.

use std::sync::Arc;

use hoststat_core::provider::SnapshotProvider;

/// Handlers share one provider. Collections run independently, so no lock.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) provider: Arc<dyn SnapshotProvider>,
}

impl AppState {
    pub(crate) fn new(provider: Arc<dyn SnapshotProvider>) -> Self {
        Self { provider }
    }
}
