//! Building mHealth filenames on the device side.

use sp_error::{FilenameError, Result};
use sp_types::SensorKind;

use crate::filename::{is_valid, FileKind};
use crate::timestamp::MHealthTimestamp;

/// Device type prefix for sensor descriptors.
pub const DEVICE_TYPE: &str = "iPhone";

/// OS descriptor from a dotted version, e.g. `9.1` -> `iOSx9x1`.
///
/// Dots are replaced so the descriptor stays a single filename segment.
pub fn os_info(version: &str) -> String {
    format!("iOSx{}", version.replace('.', "x"))
}

/// Sensor type and version descriptor, e.g. `iPhone-STEPS-iOSx9x1`.
pub fn sensor_type_descriptor(device: &str, sensor: SensorKind, os_info: &str) -> String {
    format!("{device}-{}-{os_info}", sensor.name())
}

/// Sensor identifier, e.g. `1112223333-STEPS`.
pub fn sensor_id(serial_number: &str, sensor: SensorKind) -> String {
    format!("{serial_number}-{}", sensor.name())
}

/// Assemble a filename and check it against the grammar.
pub fn build_filename(
    sensor_type_and_version: &str,
    sensor_id: &str,
    timestamp: &MHealthTimestamp,
    kind: FileKind,
) -> Result<String> {
    let filename = format!("{sensor_type_and_version}.{sensor_id}.{timestamp}.{kind}.csv.gz");
    if is_valid(&filename) {
        Ok(filename)
    } else {
        Err(FilenameError::Grammar(filename).into())
    }
}
