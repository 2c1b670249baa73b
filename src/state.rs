//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::extract::Extractor;

/// Shared application state
///
/// Immutable after startup; handlers only read from it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    extractor: Extractor,
}

impl AppState {
    pub fn new(config: Config, extractor: Extractor) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, extractor }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the extraction service
    pub fn extractor(&self) -> &Extractor {
        &self.inner.extractor
    }
}
