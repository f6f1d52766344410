use async_trait::async_trait;
use tracing::{info, warn};

/// Trait for abstracting entry into interactive setup to enable
/// dependency injection
#[async_trait]
pub trait ConfigurationMode {
    /// Hand the device over to interactive re-provisioning. Whatever
    /// happens there is no longer this process's concern.
    async fn enter_configuration_mode(&self);
}

/// Configuration fallback that announces the setup portal.
pub struct ConfigPortal;

#[async_trait]
impl ConfigurationMode for ConfigPortal {
    async fn enter_configuration_mode(&self) {
        warn!("entering configuration mode");
        info!("use the companion app to configure this device");
    }
}
