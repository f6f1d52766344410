use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use tokio::fs;
use tracing::warn;

use crate::config::Config;
use crate::types::ActivationCode;

/// Trait for abstracting where device identifiers come from to enable
/// dependency injection
#[async_trait]
pub trait IdentifierSource {
    /// MAC address of the primary network interface
    async fn mac_address(&self) -> String;

    /// Serial number burned into the board
    async fn hardware_serial(&self) -> String;

    /// Activation code from the packaging label, if the unit carries one
    async fn activation_code(&self) -> Option<ActivationCode>;
}

/// Everything we know about who this device is, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    mac_address: String,
    hardware_serial: String,
    activation_code: Option<ActivationCode>,
}

impl DeviceIdentity {
    /// An empty activation code means the unit never had one, so it is
    /// dropped here and callers never have to re-check.
    pub fn new(
        mac_address: impl Into<String>,
        hardware_serial: impl Into<String>,
        activation_code: Option<ActivationCode>,
    ) -> Self {
        Self {
            mac_address: mac_address.into(),
            hardware_serial: hardware_serial.into(),
            activation_code: activation_code.filter(|code| !code.is_empty()),
        }
    }

    /// Take a full identity snapshot from `source`.
    pub async fn from_source(source: &(dyn IdentifierSource + Send + Sync)) -> Self {
        Self::new(
            source.mac_address().await,
            source.hardware_serial().await,
            source.activation_code().await,
        )
    }

    pub fn mac_address(&self) -> &str {
        &self.mac_address
    }

    pub fn hardware_serial(&self) -> &str {
        &self.hardware_serial
    }

    pub fn activation_code(&self) -> Option<&ActivationCode> {
        self.activation_code.as_ref()
    }
}

/// Identifier source backed by the runtime configuration, with the
/// activation code coming from the command line or a file written by
/// the factory flashing station.
pub struct BoardInfo {
    mac_address: String,
    hardware_serial: String,
    activation_code: Option<String>,
    activation_code_file: Option<PathBuf>,
}

impl BoardInfo {
    pub fn new(config: &Config) -> Self {
        Self {
            mac_address: config.mac_address.clone(),
            hardware_serial: config.hardware_serial.clone(),
            activation_code: config.activation_code.clone(),
            activation_code_file: config.activation_code_file.clone(),
        }
    }

    async fn code_from_file(&self) -> Option<ActivationCode> {
        let path = self.activation_code_file.as_ref()?;
        match fs::read_to_string(path).await {
            Ok(contents) => {
                // The flashing station writes the code with a trailing newline
                let code = contents.trim();
                if code.is_empty() {
                    None
                } else {
                    Some(ActivationCode::from(code))
                }
            }
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    warn!(
                        "failed to read activation code file {}: {err}",
                        path.display()
                    );
                }
                None
            }
        }
    }
}

#[async_trait]
impl IdentifierSource for BoardInfo {
    async fn mac_address(&self) -> String {
        self.mac_address.clone()
    }

    async fn hardware_serial(&self) -> String {
        self.hardware_serial.clone()
    }

    async fn activation_code(&self) -> Option<ActivationCode> {
        // A code given on the command line wins over the stored one
        if let Some(code) = &self.activation_code {
            return Some(ActivationCode::from(code.clone()));
        }
        self.code_from_file().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_REQUEST_TIMEOUT;
    use std::io::Write;

    fn config_with_code(
        activation_code: Option<&str>,
        activation_code_file: Option<PathBuf>,
    ) -> Config {
        Config {
            api_endpoint: "http://localhost:3000".parse().unwrap(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            mac_address: "AA:BB:CC:DD:EE:FF".to_string(),
            hardware_serial: "HW123456".to_string(),
            activation_code: activation_code.map(str::to_string),
            activation_code_file,
        }
    }

    #[test]
    fn test_identity_drops_empty_code() {
        let identity = DeviceIdentity::new(
            "AA:BB:CC:DD:EE:FF",
            "HW123456",
            Some(ActivationCode::from("")),
        );
        assert_eq!(identity.activation_code(), None);

        let identity = DeviceIdentity::new(
            "AA:BB:CC:DD:EE:FF",
            "HW123456",
            Some(ActivationCode::from("ABC123")),
        );
        assert_eq!(
            identity.activation_code(),
            Some(&ActivationCode::from("ABC123"))
        );
    }

    #[tokio::test]
    async fn test_board_info_without_code() {
        let board = BoardInfo::new(&config_with_code(None, None));
        let identity = DeviceIdentity::from_source(&board).await;

        assert_eq!(identity.mac_address(), "AA:BB:CC:DD:EE:FF");
        assert_eq!(identity.hardware_serial(), "HW123456");
        assert_eq!(identity.activation_code(), None);
    }

    #[tokio::test]
    async fn test_board_info_reads_code_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ABC123").unwrap();

        let board = BoardInfo::new(&config_with_code(None, Some(file.path().to_path_buf())));
        assert_eq!(
            board.activation_code().await,
            Some(ActivationCode::from("ABC123"))
        );
    }

    #[tokio::test]
    async fn test_board_info_ignores_blank_code_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "   ").unwrap();

        let board = BoardInfo::new(&config_with_code(None, Some(file.path().to_path_buf())));
        assert_eq!(board.activation_code().await, None);
    }

    #[tokio::test]
    async fn test_board_info_missing_code_file() {
        let board = BoardInfo::new(&config_with_code(
            None,
            Some(PathBuf::from("/nonexistent/activation-code")),
        ));
        assert_eq!(board.activation_code().await, None);
    }

    #[tokio::test]
    async fn test_board_info_argument_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "FROM-FILE").unwrap();

        let board = BoardInfo::new(&config_with_code(
            Some("FROM-ARGS"),
            Some(file.path().to_path_buf()),
        ));
        assert_eq!(
            board.activation_code().await,
            Some(ActivationCode::from("FROM-ARGS"))
        );
    }
}
