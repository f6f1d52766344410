use clap::Parser;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

use crate::util::http::Uri;

fn parse_duration(s: &str) -> Result<Duration, ParseIntError> {
    let millis: u64 = s.parse()?;
    Ok(Duration::from_millis(millis))
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)] // read from Cargo.toml
pub struct Cli {
    /// Backend API endpoint URI
    #[arg(env = "PLUVIA_API_ENDPOINT", long = "api-endpoint", value_name = "uri")]
    pub api_endpoint: Uri,

    /// Credential lookup request timeout in milliseconds
    #[arg(
        env = "PLUVIA_REQUEST_TIMEOUT_MS",
        long = "request-timeout-ms",
        value_name = "ms",
        value_parser = parse_duration
    )]
    pub request_timeout: Option<Duration>,

    /// MAC address of the primary network interface
    #[arg(env = "PLUVIA_MAC_ADDRESS", long = "mac-address", value_name = "mac")]
    pub mac_address: String,

    /// Hardware serial number burned into the board
    #[arg(
        env = "PLUVIA_HARDWARE_SERIAL",
        long = "hardware-serial",
        value_name = "serial"
    )]
    pub hardware_serial: String,

    /// Activation code from the packaging QR label, if the unit has one
    #[arg(
        env = "PLUVIA_ACTIVATION_CODE",
        long = "activation-code",
        value_name = "code"
    )]
    pub activation_code: Option<String>,

    /// File holding a previously stored activation code
    #[arg(
        env = "PLUVIA_ACTIVATION_CODE_FILE",
        long = "activation-code-file",
        value_name = "path"
    )]
    pub activation_code_file: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Parser::parse()
}
