//! The BLE capability seam and its btleplug-backed implementation.
//!
//! [`Central`] and [`Peripheral`] abstract exactly the operations the
//! acquisition pipeline needs: adapter state, an adapter event stream,
//! scan start/stop, connect, service/characteristic resolution, notify
//! enablement, and the per-notification payload stream. The production
//! implementation wraps a [`btleplug`] adapter; tests substitute a scripted
//! fake so the pipeline can be exercised without radio hardware.

use std::pin::Pin;

use async_trait::async_trait;
use btleplug::api::{
    Central as _, CentralEvent as BtCentralEvent, CentralState, Characteristic, Manager as _,
    Peripheral as _, ScanFilter,
};
use btleplug::platform::{Adapter, Manager, Peripheral as PlatformPeripheral};
use futures::{Stream, StreamExt};
use log::debug;
use uuid::Uuid;

use crate::error::HrError;
use crate::types::AdapterState;

// ── Events and stream aliases ────────────────────────────────────────────────

/// An event emitted by a [`Central`] while its event stream is held open.
#[derive(Debug)]
pub enum AdapterEvent<P> {
    /// The adapter moved to a new power state.
    StateChanged(AdapterState),
    /// A scan discovered a peripheral matching the active filter.
    Discovered(P),
}

/// Stream of adapter events; stays open for as long as the caller holds it.
pub type AdapterEvents<P> = Pin<Box<dyn Stream<Item = AdapterEvent<P>> + Send>>;

/// Stream of raw notification payloads from one subscribed characteristic.
pub type Payloads = Pin<Box<dyn Stream<Item = Vec<u8>> + Send>>;

// ── Capability traits ────────────────────────────────────────────────────────

/// A BLE central/adapter: reports its power state, emits discovery and
/// state-change events, and starts/stops scans.
#[async_trait]
pub trait Central: Send + Sync {
    type Peripheral: Peripheral;

    /// Current adapter power state.
    async fn state(&self) -> AdapterState;

    /// Subscribe to adapter events. Must be called before [`start_scan`]
    /// so no discovery event can be missed.
    ///
    /// [`start_scan`]: Central::start_scan
    async fn events(&self) -> Result<AdapterEvents<Self::Peripheral>, HrError>;

    /// Start a non-duplicate-filtered scan restricted to peripherals
    /// advertising any of `services`.
    async fn start_scan(&self, services: &[Uuid]) -> Result<(), HrError>;

    /// Stop an active scan.
    async fn stop_scan(&self) -> Result<(), HrError>;
}

/// A discovered, connectable BLE peripheral.
#[async_trait]
pub trait Peripheral: Send + Sync + Unpin + 'static {
    type Characteristic: Clone + Send + Sync;

    /// Advertised device name, when one was seen.
    async fn local_name(&self) -> Option<String>;

    /// Establish the BLE link.
    async fn connect(&self) -> Result<(), HrError>;

    /// Discover GATT services, restricted to the requested identifier sets:
    /// characteristics are returned only when they match one of
    /// `characteristics` *and* live under one of `services`. Anything else
    /// the device exposes is ignored.
    async fn resolve(
        &self,
        services: &[Uuid],
        characteristics: &[Uuid],
    ) -> Result<Vec<Self::Characteristic>, HrError>;

    /// Enable notifications on `characteristic`.
    async fn subscribe(&self, characteristic: &Self::Characteristic) -> Result<(), HrError>;

    /// Stream of notification payloads for `characteristic`, in arrival
    /// order. Unbounded and non-restartable; ends only when the link drops.
    async fn notifications(
        &self,
        characteristic: &Self::Characteristic,
    ) -> Result<Payloads, HrError>;
}

// ── btleplug implementation ──────────────────────────────────────────────────

impl From<CentralState> for AdapterState {
    fn from(state: CentralState) -> Self {
        match state {
            CentralState::PoweredOn => AdapterState::PoweredOn,
            CentralState::PoweredOff => AdapterState::PoweredOff,
            _ => AdapterState::Unknown,
        }
    }
}

/// [`Central`] backed by the first btleplug adapter on the host.
pub struct BtleCentral {
    adapter: Adapter,
}

impl BtleCentral {
    /// Open the platform BLE manager and wrap its first adapter.
    pub async fn first_adapter() -> Result<Self, HrError> {
        let manager = Manager::new()
            .await
            .map_err(|e| HrError::Adapter(e.into()))?;
        let adapters = manager
            .adapters()
            .await
            .map_err(|e| HrError::Adapter(e.into()))?;
        let adapter = adapters
            .into_iter()
            .next()
            .ok_or_else(|| HrError::Adapter("no Bluetooth adapter found".into()))?;
        if let Ok(info) = adapter.adapter_info().await {
            debug!("using adapter: {info}");
        }
        Ok(Self { adapter })
    }
}

#[async_trait]
impl Central for BtleCentral {
    type Peripheral = BtlePeripheral;

    async fn state(&self) -> AdapterState {
        match self.adapter.adapter_state().await {
            Ok(state) => state.into(),
            Err(_) => AdapterState::Unknown,
        }
    }

    async fn events(&self) -> Result<AdapterEvents<Self::Peripheral>, HrError> {
        let inner = self
            .adapter
            .events()
            .await
            .map_err(|e| HrError::Adapter(e.into()))?;
        // DeviceDiscovered only carries the peripheral id; look the handle up
        // on the adapter before handing the event out.
        let adapter = self.adapter.clone();
        let stream = inner.filter_map(move |event| {
            let adapter = adapter.clone();
            async move {
                match event {
                    BtCentralEvent::StateUpdate(state) => {
                        Some(AdapterEvent::StateChanged(state.into()))
                    }
                    BtCentralEvent::DeviceDiscovered(id) => adapter
                        .peripheral(&id)
                        .await
                        .ok()
                        .map(|p| AdapterEvent::Discovered(BtlePeripheral { inner: p })),
                    _ => None,
                }
            }
        });
        Ok(Box::pin(stream))
    }

    async fn start_scan(&self, services: &[Uuid]) -> Result<(), HrError> {
        let filter = ScanFilter {
            services: services.to_vec(),
        };
        self.adapter
            .start_scan(filter)
            .await
            .map_err(|e| HrError::Adapter(e.into()))
    }

    async fn stop_scan(&self) -> Result<(), HrError> {
        self.adapter
            .stop_scan()
            .await
            .map_err(|e| HrError::Adapter(e.into()))
    }
}

/// [`Peripheral`] wrapping a btleplug platform peripheral.
pub struct BtlePeripheral {
    inner: PlatformPeripheral,
}

#[async_trait]
impl Peripheral for BtlePeripheral {
    type Characteristic = Characteristic;

    async fn local_name(&self) -> Option<String> {
        self.inner.properties().await.ok().flatten()?.local_name
    }

    async fn connect(&self) -> Result<(), HrError> {
        self.inner
            .connect()
            .await
            .map_err(|e| HrError::Connection(e.into()))
    }

    async fn resolve(
        &self,
        services: &[Uuid],
        characteristics: &[Uuid],
    ) -> Result<Vec<Characteristic>, HrError> {
        self.inner
            .discover_services()
            .await
            .map_err(|e| HrError::Resolution(e.into()))?;
        let matches = self
            .inner
            .services()
            .into_iter()
            .filter(|service| services.contains(&service.uuid))
            .flat_map(|service| service.characteristics)
            .filter(|characteristic| characteristics.contains(&characteristic.uuid))
            .collect();
        Ok(matches)
    }

    async fn subscribe(&self, characteristic: &Characteristic) -> Result<(), HrError> {
        self.inner
            .subscribe(characteristic)
            .await
            .map_err(|e| HrError::Subscription(e.into()))
    }

    async fn notifications(
        &self,
        characteristic: &Characteristic,
    ) -> Result<Payloads, HrError> {
        let uuid = characteristic.uuid;
        let stream = self
            .inner
            .notifications()
            .await
            .map_err(|e| HrError::Subscription(e.into()))?;
        // btleplug multiplexes every subscribed characteristic onto one
        // stream; keep only the payloads for ours.
        Ok(Box::pin(stream.filter_map(move |notification| {
            futures::future::ready((notification.uuid == uuid).then_some(notification.value))
        })))
    }
}
