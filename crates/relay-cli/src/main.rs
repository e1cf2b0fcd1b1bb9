//! `relay`: long-running daemon. Polls until Ctrl-C.

use relay_cli::{telemetry, wiring};
use relay_core::RelayConfig;
use relay_core::ports::Unbounded;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_file = dotenvy::dotenv().ok();
    telemetry::init(telemetry::LogFormat::from_env());
    if let Some(path) = env_file {
        info!(path = %path.display(), "loaded .env file");
    }

    // 常駐モードではサイクル数の上限なし
    let config = RelayConfig::from_env()?.with_max_cycles(None);
    let host = wiring::build_host(&config).await?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown requested");
                shutdown.cancel();
            }
            Err(error) => warn!(%error, "cannot listen for shutdown signal"),
        }
    });

    let report = host.run(&Unbounded, &cancel).await;
    info!(
        cycles = report.cycles,
        dispatched = report.dispatched,
        failed = report.failed,
        "relay stopped"
    );
    Ok(())
}
