//! Queue message announcing an uploaded mHealth file.

use serde::{Deserialize, Serialize};

/// `origin` value identifying messages sent by this SDK.
pub const NOTIFICATION_ORIGIN: &str = "SDK_IOS";

/// Message attribute key carrying the intended queue action.
pub const QUEUE_ACTION_ATTRIBUTE: &str = "QUEUE_ACTION";

/// Queue action for a newly uploaded mHealth file.
pub const UPLOAD_FILE_ACTION: &str = "MHEALTH_UPLOAD_FILE";

/// `fileFormat` value in the sensor metadata.
pub const MHEALTH_FILE_FORMAT: &str = "MHEALTH";

/// Body of the queue message sent after a verified upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadNotification {
    /// Serial identifier (filename segment 1)
    pub sensor_id: String,

    /// Basename of the uploaded file
    pub filename: String,

    /// Object key the file was stored under
    pub s3_key_path: String,

    pub file_size_in_bytes: u64,

    #[serde(rename = "sensorMetaData")]
    pub sensor_metadata: SensorMetadata,

    /// Unique id of this upload
    pub transaction_id: String,

    pub participant_code: String,

    pub origin: String,
}

/// `sensorMetaData` object nested in [`UploadNotification`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorMetadata {
    pub file_format: String,

    /// Same value as [`UploadNotification::sensor_id`]
    pub serial_number: String,

    /// Sensor type and version descriptor (filename segment 0)
    pub sensor_type: String,

    /// Numeric study id; `null` when the study id is not numeric
    pub study_id: Option<i64>,

    /// File kind (filename segment 3)
    #[serde(rename = "mHealthType")]
    pub mhealth_type: String,
}

impl SensorMetadata {
    /// Metadata for an mHealth file.
    pub fn mhealth(
        serial_number: impl Into<String>,
        sensor_type: impl Into<String>,
        study_id: &str,
        mhealth_type: impl Into<String>,
    ) -> Self {
        Self {
            file_format: MHEALTH_FILE_FORMAT.to_string(),
            serial_number: serial_number.into(),
            sensor_type: sensor_type.into(),
            study_id: study_id.parse().ok(),
            mhealth_type: mhealth_type.into(),
        }
    }
}
