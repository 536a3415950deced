/// Power state of the local Bluetooth adapter.
///
/// Only [`AdapterState::PoweredOn`] permits scanning; every other state makes
/// the readiness gate in [`crate::client::HrClient`] wait for the next
/// state-change event.
///
/// The btleplug backend only ever produces `Unknown`, `PoweredOff`, and
/// `PoweredOn`; the remaining variants exist so alternative capability
/// implementations can report the full CoreBluetooth-style state set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    /// The stack has not yet determined the adapter state.
    Unknown,
    /// The adapter is resetting and will report a definitive state later.
    Resetting,
    /// The host has no usable BLE adapter.
    Unsupported,
    /// The application is not authorized to use Bluetooth.
    Unauthorized,
    /// The adapter is present but radio power is off.
    PoweredOff,
    /// The adapter is ready; scanning and connecting are permitted.
    PoweredOn,
}

/// Sensor-contact status decoded from bits 1–2 of the measurement flags byte.
///
/// | Bits | Meaning | Variant |
/// |---|---|---|
/// | `00` / `01` | contact detection not supported | `Unknown` |
/// | `10` | supported, no skin contact | `NoContact` |
/// | `11` | supported, contact detected | `Contact` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorContact {
    /// The sensor does not report contact status on this connection.
    Unknown,
    /// Contact detection is supported but the strap is not touching skin.
    NoContact,
    /// Contact detection is supported and contact is detected.
    Contact,
}

impl SensorContact {
    /// The wire-compatible label used in the JSON output format.
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorContact::Unknown => "N/A",
            SensorContact::NoContact => "no contact",
            SensorContact::Contact => "contact",
        }
    }
}

impl std::fmt::Display for SensorContact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded Heart Rate Measurement notification.
///
/// Produced by [`crate::decode::decode`], one record per BLE notification.
/// Records are plain values with no identity: the two optional fields are
/// `Some` exactly when the corresponding flags bit was set in the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartRateRecord {
    /// Heart rate in beats per minute. Read as 1 byte or 2 bytes
    /// little-endian depending on bit 0 of the flags byte.
    pub bpm: u16,
    /// Skin-contact status reported alongside the measurement.
    pub sensor_contact: SensorContact,
    /// Accumulated energy expended in kilojoules, when the device sends it.
    pub energy_expended_kj: Option<u16>,
    /// The first RR-interval sample of the notification, rescaled from
    /// 1/1024-second ticks to milliseconds (truncated toward zero).
    ///
    /// The characteristic format allows several RR samples per notification;
    /// only the first is decoded and the rest are discarded, matching the
    /// system this crate replaces.
    pub rr_interval_ms: Option<u16>,
}
