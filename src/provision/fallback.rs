use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::configmode::{ConfigPortal, ConfigurationMode};
use crate::identity::DeviceIdentity;
use crate::session::{BrokerHandoff, Session, SessionConnector, SessionError};
use crate::util::http::InvalidUriError;

use super::lookup::{CredentialClient, CredentialLookup, Strategy};

/// Terminal outcome of one provisioning run.
#[derive(Debug)]
pub enum Provisioned {
    /// Credentials resolved and the session handed off
    Connected(Session),
    /// Every strategy exhausted, device handed to configuration mode
    NeedsConfiguration,
}

/// Drives the credential fallback chain for one provisioning run.
///
/// Strategies are attempted in strict priority order and each one at
/// most once per run. The first resolved bundle goes straight to the
/// session connector; running out of strategies always ends in an
/// explicit handover to configuration mode, never in a silent stop.
pub struct Provisioner {
    lookup: Box<dyn CredentialLookup + Send + Sync>,
    connector: Box<dyn SessionConnector + Send + Sync>,
    config_mode: Box<dyn ConfigurationMode + Send + Sync>,
}

impl Provisioner {
    pub fn new(config: &Config) -> Result<Self, InvalidUriError> {
        Ok(Self {
            lookup: Box::new(CredentialClient::new(config)?),
            connector: Box::new(BrokerHandoff),
            config_mode: Box::new(ConfigPortal),
        })
    }

    #[allow(dead_code)]
    fn with_lookup<L>(mut self, lookup: L) -> Self
    where
        L: CredentialLookup + Send + Sync + 'static,
    {
        self.lookup = Box::new(lookup);
        self
    }

    #[allow(dead_code)]
    fn with_connector<C>(mut self, connector: C) -> Self
    where
        C: SessionConnector + Send + Sync + 'static,
    {
        self.connector = Box::new(connector);
        self
    }

    #[allow(dead_code)]
    fn with_config_mode<M>(mut self, config_mode: M) -> Self
    where
        M: ConfigurationMode + Send + Sync + 'static,
    {
        self.config_mode = Box::new(config_mode);
        self
    }

    /// Work through the fallback chain until credentials resolve or
    /// every strategy is exhausted.
    ///
    /// A session-level failure after a successful lookup is returned
    /// as-is; re-establishing a broken session is not a provisioning
    /// concern.
    #[instrument(name = "provision", skip_all, err)]
    pub async fn run(&self, identity: DeviceIdentity) -> Result<Provisioned, SessionError> {
        for strategy in plan(&identity) {
            debug!("attempting credential lookup by {strategy}");
            match self.lookup.lookup(strategy, &identity).await {
                Ok(credentials) => {
                    info!(
                        "credentials for device {} resolved by {strategy}",
                        credentials.device_id
                    );
                    let session = self.connector.connect(credentials).await?;
                    return Ok(Provisioned::Connected(session));
                }
                Err(err) => {
                    warn!("lookup by {strategy} failed: {err}");
                }
            }
        }

        warn!("no credentials could be resolved, handing over to configuration mode");
        self.config_mode.enter_configuration_mode().await;
        Ok(Provisioned::NeedsConfiguration)
    }
}

/// Strategy order for one run. The activation code is the fast path
/// when the unit carries one; the hardware identifiers are the durable
/// backup pair and always come last.
fn plan(identity: &DeviceIdentity) -> Vec<Strategy> {
    let mut strategies = Vec::new();
    if identity.activation_code().is_some() {
        strategies.push(Strategy::ByActivationCode);
    }
    strategies.push(Strategy::ByHardwareIdentity);
    strategies
}
