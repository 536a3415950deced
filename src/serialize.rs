//! Output formats: InfluxDB line protocol and JSON.
//!
//! Both serializers are stateless text builders over a
//! [`HeartRateRecord`] and the timestamp captured when its notification
//! arrived.
//!
//! The two formats deliberately differ in coverage: line protocol emits only
//! `bpm` and (when present) `rr`, never energy expended, while JSON carries
//! every present field. This asymmetry is inherited from the system this
//! crate replaces and is part of the output contract.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::types::HeartRateRecord;

/// Default line-protocol measurement name.
pub const DEFAULT_MEASUREMENT: &str = "heart";

/// Default line-protocol device tag.
pub const DEFAULT_DEVICE: &str = "polarH7";

/// Serialize a record as one line of InfluxDB line protocol:
///
/// ```text
/// <measurement>,device=<device> bpm=<bpm>i[,rr=<rr>i] <epoch_ms>
/// ```
///
/// The `rr` field is emitted only when the record carries an RR interval.
pub fn to_line_protocol(
    record: &HeartRateRecord,
    timestamp: DateTime<Utc>,
    measurement: &str,
    device: &str,
) -> String {
    let mut fields = vec![format!("bpm={}i", record.bpm)];
    if let Some(rr) = record.rr_interval_ms {
        fields.push(format!("rr={rr}i"));
    }
    format!(
        "{measurement},device={device} {fields} {timestamp}",
        fields = fields.join(","),
        timestamp = timestamp.timestamp_millis(),
    )
}

/// JSON shape: timestamp first, then the present record fields. Field names
/// match the original output (`sensorContact`, `energyExpendedKJ`,
/// `rrIntervalMs`); absent optionals are omitted rather than null.
#[derive(Serialize)]
struct JsonRecord<'a> {
    timestamp: String,
    bpm: u16,
    #[serde(rename = "sensorContact")]
    sensor_contact: &'a str,
    #[serde(rename = "energyExpendedKJ", skip_serializing_if = "Option::is_none")]
    energy_expended_kj: Option<u16>,
    #[serde(rename = "rrIntervalMs", skip_serializing_if = "Option::is_none")]
    rr_interval_ms: Option<u16>,
}

/// Serialize a record as a single-line JSON object with an ISO-8601
/// millisecond-precision timestamp.
pub fn to_json(record: &HeartRateRecord, timestamp: DateTime<Utc>) -> String {
    let json = JsonRecord {
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        bpm: record.bpm,
        sensor_contact: record.sensor_contact.as_str(),
        energy_expended_kj: record.energy_expended_kj,
        rr_interval_ms: record.rr_interval_ms,
    };
    serde_json::to_string(&json).expect("a JsonRecord always serializes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SensorContact;
    use chrono::TimeZone;

    fn record() -> HeartRateRecord {
        HeartRateRecord {
            bpm: 75,
            sensor_contact: SensorContact::Contact,
            energy_expended_kj: None,
            rr_interval_ms: Some(500),
        }
    }

    #[test]
    fn line_protocol_with_rr() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(
            to_line_protocol(&record(), ts, DEFAULT_MEASUREMENT, DEFAULT_DEVICE),
            "heart,device=polarH7 bpm=75i,rr=500i 1700000000000"
        );
    }

    #[test]
    fn line_protocol_without_rr() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let record = HeartRateRecord {
            rr_interval_ms: None,
            ..record()
        };
        assert_eq!(
            to_line_protocol(&record, ts, DEFAULT_MEASUREMENT, DEFAULT_DEVICE),
            "heart,device=polarH7 bpm=75i 1700000000000"
        );
    }

    #[test]
    fn line_protocol_never_emits_energy() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let record = HeartRateRecord {
            energy_expended_kj: Some(10),
            ..record()
        };
        let line = to_line_protocol(&record, ts, DEFAULT_MEASUREMENT, DEFAULT_DEVICE);
        assert!(!line.contains("energy"));
        assert_eq!(line, "heart,device=polarH7 bpm=75i,rr=500i 1700000000000");
    }

    #[test]
    fn line_protocol_custom_measurement_and_device() {
        let ts = Utc.timestamp_millis_opt(0).unwrap();
        assert_eq!(
            to_line_protocol(&record(), ts, "hr", "wahooTickr"),
            "hr,device=wahooTickr bpm=75i,rr=500i 0"
        );
    }

    #[test]
    fn json_with_energy_omits_absent_rr() {
        let ts = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let record = HeartRateRecord {
            bpm: 75,
            sensor_contact: SensorContact::Unknown,
            energy_expended_kj: Some(10),
            rr_interval_ms: None,
        };
        assert_eq!(
            to_json(&record, ts),
            r#"{"timestamp":"2023-01-01T00:00:00.000Z","bpm":75,"sensorContact":"N/A","energyExpendedKJ":10}"#
        );
    }

    #[test]
    fn json_with_all_fields() {
        let ts = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let record = HeartRateRecord {
            bpm: 75,
            sensor_contact: SensorContact::Contact,
            energy_expended_kj: Some(10),
            rr_interval_ms: Some(500),
        };
        assert_eq!(
            to_json(&record, ts),
            r#"{"timestamp":"2023-01-01T00:00:00.000Z","bpm":75,"sensorContact":"contact","energyExpendedKJ":10,"rrIntervalMs":500}"#
        );
    }

    #[test]
    fn json_minimal_record() {
        let ts = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let record = HeartRateRecord {
            bpm: 80,
            sensor_contact: SensorContact::NoContact,
            energy_expended_kj: None,
            rr_interval_ms: None,
        };
        assert_eq!(
            to_json(&record, ts),
            r#"{"timestamp":"2023-01-01T00:00:00.000Z","bpm":80,"sensorContact":"no contact"}"#
        );
    }
}
