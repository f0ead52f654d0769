//! One-shot EIP-7702 setup of the unified contract on Sepolia.
//!
//! Requires `PRIVATE_KEY` (the contract owner), `SEPOLIA_RPC_URL`,
//! `CONTRACT_ADDRESS` and `RECIPIENT_ADDRESS`. Waits a fixed 15 seconds after
//! each of the first two steps; set `BOOTSTRAP_SETTLE=confirm` to poll for
//! receipts instead and fail on a revert or timeout.

use std::process::ExitCode;

use unified_relayer::bootstrap::Bootstrap;
use unified_relayer::config::BootstrapConfig;
use unified_relayer::providers::{AlloyDelegator, TokioClock};
use unified_relayer::telemetry::{init_telemetry, TelemetryConfig};
use unified_relayer::UnifiedChain;

async fn run() -> unified_relayer::Result<()> {
    let config = BootstrapConfig::from_env()?;
    init_telemetry(&TelemetryConfig::from_env("BOOTSTRAP"))?;

    let executor = AlloyDelegator::connect_http(config.rpc_url().clone(), config.signer().clone());

    let report = Bootstrap::builder()
        .executor(executor)
        .clock(TokioClock::new())
        .chain(config.chain())
        .contract(config.contract())
        .recipient(config.recipient())
        .settle(config.settle())
        .build()
        .run()
        .await?;

    for outcome in &report.steps {
        let link = config
            .chain()
            .explorer_tx_url(outcome.tx_hash)
            .unwrap_or_else(|| outcome.tx_hash.to_string());
        println!("{}: {link}", outcome.step.name());
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[eip7702-bootstrap] failed: {err}");
            ExitCode::FAILURE
        }
    }
}
