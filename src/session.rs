use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::types::Credentials;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The resolved credentials carry no broker address to connect to
    #[error("Credentials carry no broker address")]
    MissingBroker,
}

/// Handle for an established platform session.
#[derive(Debug, Clone)]
pub struct Session {
    device_id: String,
    broker: String,
}

impl Session {
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn broker(&self) -> &str {
        &self.broker
    }
}

/// Trait for abstracting the platform session handoff to enable
/// dependency injection
#[async_trait]
pub trait SessionConnector {
    /// Open a platform session with the resolved credentials. The
    /// bundle is consumed; the caller keeps only the returned handle.
    async fn connect(&self, credentials: Credentials) -> Result<Session, SessionError>;
}

/// Session connector that hands the bundle to the broker layer.
pub struct BrokerHandoff;

#[async_trait]
impl SessionConnector for BrokerHandoff {
    async fn connect(&self, credentials: Credentials) -> Result<Session, SessionError> {
        if credentials.mqtt_server.is_empty() {
            return Err(SessionError::MissingBroker);
        }

        let broker = format!("{}:{}", credentials.mqtt_server, credentials.mqtt_port);
        info!(
            device_id = %credentials.device_id,
            device_name = %credentials.device_name,
            product_id = %credentials.product_id,
            device_key = %credentials.device_key,
            "connecting to broker {broker}"
        );

        Ok(Session {
            device_id: credentials.device_id,
            broker,
        })
    }
}
