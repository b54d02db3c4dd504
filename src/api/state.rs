//! Shared application state

use crate::arm::{ArmClient, ArmError};
use crate::config::Config;
use std::sync::Arc;
use std::time::Duration;

/// State shared by all request handlers. Cheap to clone; the client and
/// config are shared, handlers hold no per-request state of their own.
#[derive(Clone)]
pub struct AppState {
    pub client: ArmClient,
    pub config: Arc<Config>,
    pub readonly: bool,
}

impl AppState {
    pub fn new(config: Config, readonly: bool) -> Result<Self, ArmError> {
        let client = ArmClient::new(
            &config.effective_arm_base_url(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self {
            client,
            config: Arc::new(config),
            readonly,
        })
    }

    /// Per-item operation timeout for batch work.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.config.operation_timeout_secs)
    }
}
