//! USDC deposit monitor with `/health` endpoint.
//!
//! Watches every chain that has an RPC URL configured and relays deposits into
//! the unified contract. Configuration comes from the environment (and `.env`);
//! see `unified_relayer::config::MonitorConfig`.

use std::io;

use unified_relayer::config::MonitorConfig;
use unified_relayer::health::{self, HealthState};
use unified_relayer::monitor::start_chain_monitors;
use unified_relayer::telemetry::{init_telemetry, TelemetryConfig};

async fn run() -> unified_relayer::Result<()> {
    let config = MonitorConfig::from_env()?;
    init_telemetry(&TelemetryConfig::from_env("MONITOR"))?;

    let monitors = start_chain_monitors(&config);
    tracing::info!(
        monitors = monitors.len(),
        port = config.port(),
        event = "deposit_monitor_started"
    );

    let state = HealthState::new(config.monitored_chain_names());
    health::serve(state, config.port()).await
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(err) = run().await {
        eprintln!("[deposit-monitor] startup failed: {err}");
        return Err(io::Error::other(err.to_string()));
    }

    Ok(())
}
