//! sp-mhealth - the mHealth filename convention.
//!
//! mHealth data files carry their identity in their name:
//!
//! ```text
//! iPhone-STEPS-iOSx9x1.1112223333-STEPS.2016-01-22-19-22-34-310-M0500.sensor.csv.gz
//! └─ sensor type/version ┘└─ sensor id ──┘└──────── timestamp ─────────┘└ kind ┘
//! ```
//!
//! This crate provides:
//!
//! - [`is_valid`] - anchored grammar check of a whole filename
//! - [`extract_field`] - dot-split field access that only checks suffix and segment count
//! - [`MHealthFilename`] - typed view of a grammar-valid filename
//! - [`MHealthTimestamp`] - parsed timestamp segment
//! - [`FilenameFilter`] - glob + kind filter over valid filenames
//! - [`device`] - helpers for building filenames on the device side
//!
//! Validation and extraction are independent: [`extract_field`] happily
//! returns fields of names that [`is_valid`] rejects, as long as the suffix
//! and segment count are right.
//!
//! # Example
//!
//! ```
//! use sp_mhealth::{extract_field, is_valid, sensor_id};
//!
//! let name = "iPhone-STEPS-iOSx9x1.1112223333-STEPS.2016-01-22-19-22-34-310-M0500.sensor.csv.gz";
//! assert!(is_valid(name));
//! assert_eq!(sensor_id(name), "1112223333-STEPS");
//! assert_eq!(extract_field(name, 3), "sensor");
//! ```

pub mod device;
pub mod filename;
pub mod filter;
pub mod timestamp;

pub use filename::{
    extract_field, file_kind, is_valid, sensor_id, sensor_type_and_version, timestamp_token,
    try_extract_field, FileKind, MHealthFilename, FIELD_COUNT, MHEALTH_SUFFIX,
};
pub use filter::FilenameFilter;
pub use timestamp::MHealthTimestamp;
