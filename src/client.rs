//! Device acquisition: readiness gate, first-match discovery, and the
//! connect → resolve → subscribe pipeline.
//!
//! [`HrClient`] is generic over the [`Central`] capability so the whole
//! pipeline runs unchanged against real hardware (via
//! [`crate::central::BtleCentral`]) or a scripted fake in tests.
//!
//! The pipeline is single-shot by design: one peripheral, one characteristic,
//! no retry and no reconnect. Any stage failure other than notify enablement
//! ends the run.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use log::{debug, error, info};
use uuid::Uuid;

use crate::central::{AdapterEvent, Central, Payloads, Peripheral};
use crate::error::HrError;
use crate::protocol::{HEART_RATE_MEASUREMENT, HEART_RATE_SERVICE};
use crate::types::AdapterState;

// ── Configuration ────────────────────────────────────────────────────────────

/// Identifier sets the client scans for and resolves against.
///
/// The defaults target the Bluetooth Heart Rate profile; both sets are kept
/// as lists so a caller can aim the same pipeline at a different profile.
#[derive(Debug, Clone)]
pub struct HrClientConfig {
    /// Services the scan is restricted to; a peripheral advertising any of
    /// them is a match.
    pub services: Vec<Uuid>,
    /// Characteristics accepted during resolution; the first match wins.
    pub characteristics: Vec<Uuid>,
}

impl Default for HrClientConfig {
    fn default() -> Self {
        Self {
            services: vec![HEART_RATE_SERVICE],
            characteristics: vec![HEART_RATE_MEASUREMENT],
        }
    }
}

// ── NotificationSource ───────────────────────────────────────────────────────

/// The subscribed notification stream together with the peripheral that
/// produces it.
///
/// Owning the peripheral here keeps the BLE link alive for as long as the
/// source is held; there is no explicit teardown, process exit releases both.
/// The stream yields one raw payload per notification, in arrival order,
/// until the connection drops.
pub struct NotificationSource<P: Peripheral> {
    peripheral: P,
    payloads: Payloads,
}

impl<P: Peripheral> NotificationSource<P> {
    /// The connected peripheral backing this source.
    pub fn peripheral(&self) -> &P {
        &self.peripheral
    }
}

impl<P: Peripheral> std::fmt::Debug for NotificationSource<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationSource").finish_non_exhaustive()
    }
}

impl<P: Peripheral> Stream for NotificationSource<P> {
    type Item = Vec<u8>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().payloads.as_mut().poll_next_unpin(cx)
    }
}

// ── HrClient ─────────────────────────────────────────────────────────────────

/// Acquires the first matching heart rate peripheral and turns it into a
/// stream of notification payloads.
pub struct HrClient<C: Central> {
    central: C,
    config: HrClientConfig,
}

impl<C: Central> HrClient<C> {
    pub fn new(central: C, config: HrClientConfig) -> Self {
        Self { central, config }
    }

    /// Run the full acquisition pipeline:
    /// readiness gate → discover first match → connect → resolve → subscribe.
    ///
    /// Each stage short-circuits the rest on failure, with one exception:
    /// a failed notify enable is logged and the notification stream is
    /// attached anyway. In that degraded case the returned source simply
    /// never yields.
    pub async fn acquire(&self) -> Result<NotificationSource<C::Peripheral>, HrError> {
        self.await_powered_on().await?;

        let peripheral = self.discover_first().await?;
        let name = peripheral
            .local_name()
            .await
            .unwrap_or_else(|| "(unnamed peripheral)".into());

        info!("connecting to {name}");
        peripheral.connect().await?;

        let characteristics = peripheral
            .resolve(&self.config.services, &self.config.characteristics)
            .await?;
        // Only the first matching characteristic is used.
        let characteristic =
            characteristics
                .into_iter()
                .next()
                .ok_or(HrError::CharacteristicNotFound {
                    service: self.config.services.first().copied().unwrap_or_else(Uuid::nil),
                    characteristic: self
                        .config
                        .characteristics
                        .first()
                        .copied()
                        .unwrap_or_else(Uuid::nil),
                })?;

        if let Err(e) = peripheral.subscribe(&characteristic).await {
            // Not fatal: the stream below is attached regardless, it will
            // just never fire if notifications really are disabled.
            error!("{name}: enabling notifications failed: {e}");
        }

        let payloads = peripheral.notifications(&characteristic).await?;
        info!("{name}: subscribed, streaming measurements");
        Ok(NotificationSource {
            peripheral,
            payloads,
        })
    }

    /// Wait until the adapter reports [`AdapterState::PoweredOn`].
    ///
    /// Resolves immediately when the adapter is already powered on.
    /// Otherwise the state is re-checked after every state-change event,
    /// repeatedly, since an intermediate state may be reported before the
    /// adapter becomes ready. There is no timeout: a radio that never powers
    /// on keeps this pending for the life of the process.
    async fn await_powered_on(&self) -> Result<(), HrError> {
        if self.central.state().await == AdapterState::PoweredOn {
            return Ok(());
        }
        let mut events = self.central.events().await?;
        info!("adapter is not powered on; waiting");
        loop {
            if self.central.state().await == AdapterState::PoweredOn {
                return Ok(());
            }
            match events.next().await {
                Some(AdapterEvent::StateChanged(state)) => {
                    debug!("adapter state changed: {state:?}");
                }
                Some(_) => {}
                None => {
                    return Err(HrError::Adapter(
                        "adapter event stream closed before power-on".into(),
                    ))
                }
            }
        }
    }

    /// Scan for the configured services and resolve with the first
    /// discovered peripheral.
    ///
    /// The event stream is opened before the scan starts so the first
    /// advertisement cannot be missed, and it is dropped as soon as the
    /// first match is taken. That makes the resolution single-shot: later
    /// discovery events, including ones batched into the same poll, land in
    /// a stream nobody reads. Scanning stops no later than resolution.
    async fn discover_first(&self) -> Result<C::Peripheral, HrError> {
        let mut events = self.central.events().await?;
        info!("scanning for services {:?}", self.config.services);
        self.central.start_scan(&self.config.services).await?;

        while let Some(event) = events.next().await {
            if let AdapterEvent::Discovered(peripheral) = event {
                if let Err(e) = self.central.stop_scan().await {
                    debug!("stopping scan failed: {e}");
                }
                return Ok(peripheral);
            }
        }
        Err(HrError::Adapter(
            "adapter event stream closed while scanning".into(),
        ))
    }
}
