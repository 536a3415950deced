use anyhow::Result;
use chrono::Utc;
use futures::StreamExt;
use log::info;

use pulseline::central::BtleCentral;
use pulseline::client::{HrClient, HrClientConfig};
use pulseline::decode::decode;
use pulseline::serialize::{to_json, to_line_protocol, DEFAULT_DEVICE, DEFAULT_MEASUREMENT};

#[tokio::main]
async fn main() -> Result<()> {
    // ── Logging ───────────────────────────────────────────────────────────────
    // Diagnostics go to stderr via the logger; measurements go to stdout.
    // Set RUST_LOG=debug for verbose output, e.g.:
    //   RUST_LOG=pulseline=debug cargo run
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // ── Output format ─────────────────────────────────────────────────────────
    // The only flag: --json switches from line protocol to JSON.
    let json = std::env::args().skip(1).any(|arg| arg == "--json");

    // ── Acquire ───────────────────────────────────────────────────────────────
    let central = BtleCentral::first_adapter().await?;
    let client = HrClient::new(central, HrClientConfig::default());

    info!("looking for a heart rate monitor …");
    let mut source = client.acquire().await?;

    // ── Stream measurements ───────────────────────────────────────────────────
    // One notification at a time: decode and print before polling the next,
    // so output order matches arrival order. A payload that contradicts its
    // own flags byte is fatal.
    while let Some(payload) = source.next().await {
        let now = Utc::now();
        let record = decode(&payload)?;
        let output = if json {
            to_json(&record, now)
        } else {
            to_line_protocol(&record, now, DEFAULT_MEASUREMENT, DEFAULT_DEVICE)
        };
        println!("{output}");
    }

    info!("notification stream ended – exiting.");
    Ok(())
}
