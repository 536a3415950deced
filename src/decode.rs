//! Binary decoder for Heart Rate Measurement notification payloads.
//!
//! [`decode`] is pure: no I/O, no shared state, no allocation. The layout of
//! a payload is driven entirely by its first byte, [`Flags`]:
//!
//! | Field | Present when | Width |
//! |---|---|---|
//! | flags | always | 1 byte |
//! | heart rate | always | 1 byte, or 2 bytes LE when `RATE_U16` |
//! | energy expended (kJ) | `ENERGY_EXPENDED` | 2 bytes LE |
//! | RR-interval samples | `RR_INTERVAL` | 2 bytes LE each, to end of buffer |
//!
//! Only the first RR sample is decoded; any further samples in the buffer are
//! discarded, matching the system this crate replaces. A buffer shorter than
//! its flags require is rejected with [`HrError::MalformedPayload`] rather
//! than decoded partially.

use crate::error::HrError;
use crate::protocol::{rr_ticks_to_ms, Flags};
use crate::types::{HeartRateRecord, SensorContact};

/// Sequential little-endian reader over one notification payload.
///
/// Every read is bounds-checked against the buffer and reports the total
/// number of bytes the flags demanded when the buffer falls short.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    flags: u8,
}

impl<'a> Reader<'a> {
    fn take_u8(&mut self) -> Result<u8, HrError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or_else(|| self.short(self.pos + 1))?;
        self.pos += 1;
        Ok(byte)
    }

    fn take_u16_le(&mut self) -> Result<u16, HrError> {
        let end = self.pos + 2;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or_else(|| self.short(end))?;
        self.pos = end;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn short(&self, needed: usize) -> HrError {
        HrError::MalformedPayload {
            flags: self.flags,
            len: self.data.len(),
            needed,
        }
    }
}

/// Decode one Heart Rate Measurement payload into a [`HeartRateRecord`].
///
/// Deterministic and safely callable repeatedly: identical input bytes always
/// produce an identical record.
pub fn decode(data: &[u8]) -> Result<HeartRateRecord, HrError> {
    let mut reader = Reader {
        data,
        pos: 0,
        flags: 0,
    };
    reader.flags = reader.take_u8()?;
    let flags = Flags::from_bits_retain(reader.flags);

    let bpm = if flags.contains(Flags::RATE_U16) {
        reader.take_u16_le()?
    } else {
        u16::from(reader.take_u8()?)
    };

    let sensor_contact = if !flags.contains(Flags::CONTACT_SUPPORTED) {
        SensorContact::Unknown
    } else if flags.contains(Flags::CONTACT_DETECTED) {
        SensorContact::Contact
    } else {
        SensorContact::NoContact
    };

    let energy_expended_kj = if flags.contains(Flags::ENERGY_EXPENDED) {
        Some(reader.take_u16_le()?)
    } else {
        None
    };

    // The format allows RR samples to fill the rest of the buffer; only the
    // first one is read.
    let rr_interval_ms = if flags.contains(Flags::RR_INTERVAL) {
        Some(rr_ticks_to_ms(reader.take_u16_le()?))
    } else {
        None
    };

    Ok(HeartRateRecord {
        bpm,
        sensor_contact,
        energy_expended_kj,
        rr_interval_ms,
    })
}
