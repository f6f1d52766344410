use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::{self, Display};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::identity::DeviceIdentity;
use crate::types::{Credentials, DeviceKey};
use crate::util::http::{InvalidUriError, Uri};

/// Broker port used when the backend omits one. This matches the port
/// the platform broker listens on for plain MQTT.
pub const DEFAULT_MQTT_PORT: u16 = 1883;

const CREDENTIALS_PATH: &str = "/api/hardware/device/credentials";

/// Which identifiers to present to the backend for one lookup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Present the activation code from the packaging label
    ByActivationCode,
    /// Present the MAC address and hardware serial
    ByHardwareIdentity,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::ByActivationCode => f.write_str("activation-code"),
            Strategy::ByHardwareIdentity => f.write_str("hardware-identity"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    /// The request never completed or came back with a non-2xx status
    #[error("Could not reach credential service: {0}")]
    Transport(String),

    /// The backend answered but does not know these identifiers
    #[error("Server rejected the identifiers: {0}")]
    Rejected(String),

    /// The backend claims success but the payload is unusable
    #[error("Invalid credentials response: {0}")]
    Malformed(String),
}

/// Trait for abstracting the credential lookup call to enable
/// dependency injection
#[async_trait]
pub trait CredentialLookup {
    /// Ask the backend for this device's credentials, presenting the
    /// identifiers selected by `strategy`. Single-shot: no retries
    /// happen at this level.
    async fn lookup(
        &self,
        strategy: Strategy,
        identity: &DeviceIdentity,
    ) -> Result<Credentials, LookupError>;
}

/// Credential lookup against the backend HTTP API.
pub struct CredentialClient {
    client: Client,
    endpoint: Uri,
    timeout: Duration,
}

impl CredentialClient {
    pub fn new(config: &Config) -> Result<Self, InvalidUriError> {
        let endpoint = Uri::from_parts(config.api_endpoint.clone(), CREDENTIALS_PATH, None)?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            timeout: config.request_timeout,
        })
    }
}

#[async_trait]
impl CredentialLookup for CredentialClient {
    async fn lookup(
        &self,
        strategy: Strategy,
        identity: &DeviceIdentity,
    ) -> Result<Credentials, LookupError> {
        let query: Vec<(&str, &str)> = match strategy {
            Strategy::ByActivationCode => match identity.activation_code() {
                Some(code) => vec![("activation_code", code.as_str())],
                // the fallback chain never dispatches this strategy
                // without a code
                None => unreachable!("activation code strategy requires a code"),
            },
            Strategy::ByHardwareIdentity => vec![
                ("mac", identity.mac_address()),
                ("serial", identity.hardware_serial()),
            ],
        };

        debug!("requesting credentials by {strategy}");
        let response = self
            .client
            .get(self.endpoint.to_string())
            .query(&query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| LookupError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            let err_code = response.status();
            let err_msg = response.text().await.unwrap_or_default();
            return Err(LookupError::Transport(format!("({err_code}) {err_msg}")));
        }

        let body: CredentialsResponse = response.json().await.map_err(|err| {
            if err.is_decode() {
                LookupError::Malformed(err.to_string())
            } else {
                LookupError::Transport(err.to_string())
            }
        })?;

        body.into_credentials()
    }
}

/*
    response {
        success: bool,
        error?: string,
        credentials?: {
            device_id,
            device_name,
            product_id,
            device_key,
            mqtt_server,
            mqtt_port,
        }
    }
*/
#[derive(Clone, Debug, Deserialize)]
struct CredentialsResponse {
    #[serde(default)]
    success: bool,
    error: Option<String>,
    credentials: Option<CredentialsPayload>,
}

#[derive(Clone, Debug, Deserialize)]
struct CredentialsPayload {
    device_id: Option<String>,
    device_name: Option<String>,
    product_id: Option<String>,
    device_key: Option<DeviceKey>,
    mqtt_server: Option<String>,
    mqtt_port: Option<u16>,
}

impl CredentialsResponse {
    /// Promote a decoded body into a usable bundle. The backend signals
    /// "unknown device" through the success flag, while a missing or
    /// empty `device_id`/`device_key` means the record itself is broken.
    fn into_credentials(self) -> Result<Credentials, LookupError> {
        if !self.success {
            return Err(LookupError::Rejected(self.error.unwrap_or_else(|| {
                "server did not accept the identifiers".to_string()
            })));
        }

        let payload = self.credentials.ok_or_else(|| {
            LookupError::Malformed("success response without a credentials object".to_string())
        })?;

        let device_id = payload
            .device_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| LookupError::Malformed("credentials missing device_id".to_string()))?;
        let device_key = payload
            .device_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| LookupError::Malformed("credentials missing device_key".to_string()))?;

        Ok(Credentials {
            device_id,
            device_name: payload.device_name.unwrap_or_default(),
            product_id: payload.product_id.unwrap_or_default(),
            device_key,
            mqtt_server: payload.mqtt_server.unwrap_or_default(),
            mqtt_port: payload.mqtt_port.unwrap_or(DEFAULT_MQTT_PORT),
        })
    }
}
