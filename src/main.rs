mod cli;
mod config;
mod configmode;
mod identity;
mod provision;
mod session;
mod types;
mod util;

use anyhow::Result;
use config::Config;
use identity::{BoardInfo, DeviceIdentity};
use provision::{Provisioned, Provisioner};
use tracing::{debug, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for human-readable logs
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or(
                EnvFilter::default()
                    .add_directive("debug".parse()?)
                    .add_directive("hyper=error".parse()?)
                    .add_directive("reqwest=debug".parse()?),
            ),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::CLOSE)
                .event_format(fmt::format().compact().with_target(false).without_time()),
        )
        .init();

    info!("Service started");

    let config = Config::from(cli::parse());
    info!("Configuration loaded successfully");
    debug!("{:#?}", config);

    let board = BoardInfo::new(&config);
    let identity = DeviceIdentity::from_source(&board).await;
    debug!(
        mac = %identity.mac_address(),
        serial = %identity.hardware_serial(),
        has_activation_code = identity.activation_code().is_some(),
        "resolved device identity"
    );

    let provisioner = Provisioner::new(&config)?;
    match provisioner.run(identity).await? {
        Provisioned::Connected(session) => {
            info!(
                "device {} is online via {}",
                session.device_id(),
                session.broker()
            );
        }
        Provisioned::NeedsConfiguration => {
            warn!("device remains unprovisioned until configured");
        }
    }

    Ok(())
}
