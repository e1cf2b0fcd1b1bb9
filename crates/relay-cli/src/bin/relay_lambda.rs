//! `relay-lambda`: AWS Lambda host, typically triggered by a schedule.
//!
//! Each invocation runs up to `RELAY_MAX_CYCLES` cycles and stops early when
//! the remaining invocation time drops below `RELAY_SAFETY_MARGIN_MS`.

use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent, service_fn};
use relay_cli::{telemetry, wiring};
use relay_core::ports::{DeadlineBudget, SystemClock};
use relay_core::{PollingHost, RelayConfig};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

async fn handle_request(event: LambdaEvent<Value>, host: &PollingHost) -> Result<Value, Error> {
    let budget = DeadlineBudget::from_epoch_millis(event.context.deadline, SystemClock);
    let report = host.run(&budget, &CancellationToken::new()).await;
    Ok(serde_json::to_value(report)?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init(telemetry::LogFormat::from_env());

    let config = RelayConfig::from_env()?;
    let host = Arc::new(wiring::build_host(&config).await?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let host = Arc::clone(&host);
        async move { handle_request(event, &host).await }
    }))
    .await
}
