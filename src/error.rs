use thiserror::Error;
use uuid::Uuid;

/// Boxed underlying cause carried by the BLE-facing error variants.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for device acquisition and payload decoding.
///
/// Every variant except [`HrError::Subscription`] is fatal for the current
/// run: there is no retry of any stage, so the binary surfaces the error and
/// exits non-zero. A subscription failure is logged and the pipeline keeps
/// going with a notification stream that will simply never fire.
#[derive(Error, Debug)]
pub enum HrError {
    /// The scan could not start, or the adapter's event stream is unusable.
    #[error("bluetooth adapter error: {0}")]
    Adapter(#[source] Cause),

    /// Connecting to the discovered peripheral failed.
    #[error("could not connect to peripheral")]
    Connection(#[source] Cause),

    /// GATT service/characteristic discovery failed outright.
    #[error("could not resolve services and characteristics")]
    Resolution(#[source] Cause),

    /// Discovery succeeded but the peripheral exposes no characteristic
    /// matching the requested identifier sets.
    #[error("peripheral has no characteristic {characteristic} under service {service}")]
    CharacteristicNotFound { service: Uuid, characteristic: Uuid },

    /// Enabling notifications on the characteristic failed. Non-fatal.
    #[error("could not enable notifications")]
    Subscription(#[source] Cause),

    /// A notification payload is shorter than its own flags byte requires.
    #[error("malformed payload: {len} bytes is too short for flags {flags:#04x} ({needed} needed)")]
    MalformedPayload { flags: u8, len: usize, needed: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{HEART_RATE_MEASUREMENT, HEART_RATE_SERVICE};

    #[test]
    fn display_includes_flags_and_lengths() {
        let err = HrError::MalformedPayload {
            flags: 0x16,
            len: 2,
            needed: 4,
        };
        assert_eq!(
            err.to_string(),
            "malformed payload: 2 bytes is too short for flags 0x16 (4 needed)"
        );
    }

    #[test]
    fn not_found_names_both_identifiers() {
        let err = HrError::CharacteristicNotFound {
            service: HEART_RATE_SERVICE,
            characteristic: HEART_RATE_MEASUREMENT,
        };
        let msg = err.to_string();
        assert!(msg.contains("0000180d"));
        assert!(msg.contains("00002a37"));
    }

    #[test]
    fn adapter_error_preserves_the_cause() {
        use std::error::Error as _;
        let cause: Cause = "scan request rejected".into();
        let err = HrError::Adapter(cause);
        assert!(err.source().is_some());
    }
}
