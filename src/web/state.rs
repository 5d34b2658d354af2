//! Application State
//!
//! Shared state accessible by all handlers. Everything in it is read-only
//! after startup.

use std::sync::Arc;
use std::time::Instant;

use crate::analytics::Analytics;
use crate::config::ServerConfig;
use crate::predict::ModelPair;
use crate::upload::UploadHandler;
use crate::views::Layout;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Aggregated training dataset
    pub analytics: Arc<Analytics>,
    /// Pre-rendered page skeleton
    pub layout: Arc<Layout>,
    /// Runs uploads through the two models
    pub uploads: UploadHandler,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Build the state from the startup products. `input_size` is the model
    /// input side length.
    pub fn new(
        analytics: Analytics,
        models: ModelPair,
        input_size: u32,
        config: ServerConfig,
    ) -> Self {
        let layout = Layout::new(&analytics);
        Self {
            analytics: Arc::new(analytics),
            layout: Arc::new(layout),
            uploads: UploadHandler::new(models, input_size),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
