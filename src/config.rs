use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::util::http::Uri;

/// How long a single credential lookup may take before we give up on it.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration assembled from the command line and environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_endpoint: Uri,
    pub request_timeout: Duration,
    pub mac_address: String,
    pub hardware_serial: String,
    pub activation_code: Option<String>,
    pub activation_code_file: Option<PathBuf>,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            api_endpoint: cli.api_endpoint,
            request_timeout: cli.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            mac_address: cli.mac_address,
            hardware_serial: cli.hardware_serial,
            activation_code: cli.activation_code,
            activation_code_file: cli.activation_code_file,
        }
    }
}
