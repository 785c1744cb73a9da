use crate::config::Config;
use crate::error::ServerResult;
use crate::store::ProjectStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,

    /// Project store (shared across requests)
    pub store: ProjectStore,
}

impl AppState {
    /// Create new application state.
    ///
    /// Creates the on-disk layout (projects root and temp directory)
    /// under the configured data directory.
    pub fn new(config: Config) -> ServerResult<Self> {
        let store = ProjectStore::new(config.project_dir(), config.temp_dir());
        store.ensure_layout()?;

        Ok(Self {
            config: Arc::new(config),
            store,
        })
    }
}
