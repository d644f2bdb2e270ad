//! Sensor kinds and their registration payloads.

use serde::{Deserialize, Serialize};

/// Sensors a phone can register with the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SensorKind {
    /// Step counter
    Steps,
    /// PROMIS self-report assessments
    Promis,
    /// Self annotations
    Annotation,
    /// Location
    Gps,
}

impl SensorKind {
    /// All kinds, in registration order.
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Steps,
        SensorKind::Promis,
        SensorKind::Annotation,
        SensorKind::Gps,
    ];

    /// Name used in filenames and serial numbers.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Steps => "STEPS",
            Self::Promis => "PROMIS",
            Self::Annotation => "ANNOTATION",
            Self::Gps => "GPS",
        }
    }

    /// Sensor type understood by the platform.
    pub fn platform_type(&self) -> &'static str {
        match self {
            Self::Steps => "STEPCOUNT",
            Self::Promis => "PROMISASSESSMENT",
            Self::Annotation => "ANNOTATION",
            Self::Gps => "GPS",
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the `uploadSensors` list sent when registering sensors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorRegistration {
    pub participant_code: String,

    /// `<app serial>-<SENSOR NAME>`
    pub serial_number: String,

    /// Unix seconds
    pub start_date: i64,

    pub sensor_type: String,

    pub sensor_name: String,
}

impl SensorRegistration {
    /// Build the registration entry for `kind` on the device `serial_number`.
    pub fn new(
        kind: SensorKind,
        participant_code: impl Into<String>,
        serial_number: &str,
        start_date: i64,
    ) -> Self {
        Self {
            participant_code: participant_code.into(),
            serial_number: format!("{}-{}", serial_number, kind.name()),
            start_date,
            sensor_type: kind.platform_type().to_string(),
            sensor_name: kind.name().to_string(),
        }
    }
}

/// Which identity a protocol query is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataType {
    /// Query by participant code
    #[serde(rename = "participantCode")]
    ParticipantCode,
    /// Query by the device's serial number
    #[serde(rename = "sensorSerialNumber")]
    SensorSerialNumber,
}

impl MetadataType {
    /// Query parameter name.
    pub fn param(&self) -> &'static str {
        match self {
            Self::ParticipantCode => "participantCode",
            Self::SensorSerialNumber => "sensorSerialNumber",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_payload_shape() {
        let reg = SensorRegistration::new(SensorKind::Steps, "P001", "1112223333", 1_453_500_000);
        let json = serde_json::to_value(&reg).unwrap();

        assert_eq!(json["participantCode"], "P001");
        assert_eq!(json["serialNumber"], "1112223333-STEPS");
        assert_eq!(json["startDate"], 1_453_500_000);
        assert_eq!(json["sensorType"], "STEPCOUNT");
        assert_eq!(json["sensorName"], "STEPS");
    }

    #[test]
    fn test_platform_types() {
        assert_eq!(SensorKind::Promis.platform_type(), "PROMISASSESSMENT");
        assert_eq!(SensorKind::Gps.platform_type(), "GPS");
        assert_eq!(SensorKind::ALL.len(), 4);
    }

    #[test]
    fn test_metadata_param() {
        assert_eq!(MetadataType::ParticipantCode.param(), "participantCode");
        assert_eq!(
            MetadataType::SensorSerialNumber.param(),
            "sensorSerialNumber"
        );
    }
}
