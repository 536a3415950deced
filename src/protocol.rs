//! GATT UUIDs and wire-format constants for the Bluetooth Heart Rate profile.
//!
//! The 16-bit assigned numbers (`0x180D`, `0x2A37`) are expanded into the
//! Bluetooth base UUID namespace `0000XXXX-0000-1000-8000-00805f9b34fb`.

use bitflags::bitflags;
use uuid::Uuid;

// ── Service ──────────────────────────────────────────────────────────────────

/// "Heart Rate" GATT service (assigned number `0x180D`).
///
/// Used as the scan filter so only peripherals advertising this service are
/// discovered.
pub const HEART_RATE_SERVICE: Uuid = Uuid::from_u128(0x0000180d_0000_1000_8000_00805f9b34fb);

// ── Characteristic ────────────────────────────────────────────────────────────

/// "Heart Rate Measurement" characteristic (assigned number `0x2A37`).
///
/// Notified once per measurement by the peripheral; the payload layout is
/// driven by [`Flags`] and decoded by [`crate::decode::decode`].
pub const HEART_RATE_MEASUREMENT: Uuid = Uuid::from_u128(0x00002a37_0000_1000_8000_00805f9b34fb);

// ── Flags byte ────────────────────────────────────────────────────────────────

bitflags! {
    /// The mandatory first byte of every Heart Rate Measurement payload.
    ///
    /// ```text
    /// 0b00010110
    ///          ^ 0 => heart rate value is u8, 1 => u16 little-endian
    ///        ^^ sensor contact: 00/01 = not supported,
    ///           10 = supported without contact, 11 = supported with contact
    ///       ^ 1 => a 2-byte Energy Expended field (kJ) follows
    ///      ^ 1 => one or more 2-byte RR-interval samples follow
    ///   ^^^ reserved, ignored
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u8 {
        const RATE_U16 = 1 << 0;
        const CONTACT_DETECTED = 1 << 1;
        const CONTACT_SUPPORTED = 1 << 2;
        const ENERGY_EXPENDED = 1 << 3;
        const RR_INTERVAL = 1 << 4;
    }
}

// ── RR-interval scaling ───────────────────────────────────────────────────────

/// RR-interval samples are transmitted with a resolution of 1/1024 second.
pub const RR_TICKS_PER_SECOND: u32 = 1024;

/// Convert a raw RR-interval tick count to milliseconds, truncating toward
/// zero (`floor(ticks × 1000 / 1024)`).
///
/// The maximum raw value 0xFFFF maps to 63 999 ms, so the result always fits
/// in a `u16`.
pub fn rr_ticks_to_ms(ticks: u16) -> u16 {
    (u32::from(ticks) * 1000 / RR_TICKS_PER_SECOND) as u16
}
