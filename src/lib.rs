//! # pulseline
//!
//! Async library and CLI for streaming heart rate measurements from a
//! Bluetooth Low Energy heart rate monitor (Polar H7 and anything else
//! implementing the standard Heart Rate service).
//!
//! The pipeline is single-shot: wait for the adapter to power on, scan for
//! the first peripheral advertising the Heart Rate service (`0x180D`),
//! connect, resolve the Heart Rate Measurement characteristic (`0x2A37`),
//! subscribe, then decode each notification into a [`types::HeartRateRecord`]
//! and serialize it as InfluxDB line protocol or JSON.
//!
//! ## Quick start
//!
//! ```no_run
//! use chrono::Utc;
//! use futures::StreamExt;
//! use pulseline::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let central = BtleCentral::first_adapter().await?;
//!     let client = HrClient::new(central, HrClientConfig::default());
//!
//!     let mut source = client.acquire().await?;
//!     while let Some(payload) = source.next().await {
//!         let record = decode(&payload)?;
//!         println!("{}", to_line_protocol(&record, Utc::now(), "heart", "polarH7"));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |---|---|
//! | [`prelude`] | One-line glob import of the commonly needed items |
//! | [`central`] | BLE capability traits and the btleplug-backed adapter |
//! | [`client`] | Readiness gate, first-match discovery, acquisition pipeline |
//! | [`decode`] | Pure Heart Rate Measurement payload decoder |
//! | [`serialize`] | Line-protocol and JSON text builders |
//! | [`protocol`] | GATT UUIDs and the measurement flags layout |
//! | [`types`] | Adapter state, sensor contact, and record types |
//! | [`error`] | The [`error::HrError`] failure taxonomy |

pub mod central;
pub mod client;
pub mod decode;
pub mod error;
pub mod protocol;
pub mod serialize;
pub mod types;

// ── Prelude ───────────────────────────────────────────────────────────────────

/// Convenience re-exports for downstream crates.
pub mod prelude {
    // ── Client and capability ─────────────────────────────────────────────────
    pub use crate::central::{AdapterEvent, BtleCentral, Central, Peripheral};
    pub use crate::client::{HrClient, HrClientConfig, NotificationSource};

    // ── Decoding and output ───────────────────────────────────────────────────
    pub use crate::decode::decode;
    pub use crate::serialize::{to_json, to_line_protocol, DEFAULT_DEVICE, DEFAULT_MEASUREMENT};

    // ── Data types ────────────────────────────────────────────────────────────
    pub use crate::error::HrError;
    pub use crate::types::{AdapterState, HeartRateRecord, SensorContact};

    // ── Protocol constants ────────────────────────────────────────────────────
    pub use crate::protocol::{HEART_RATE_MEASUREMENT, HEART_RATE_SERVICE};
}
