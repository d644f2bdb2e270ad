//! Common utilities for integration tests.
//!
//! LocalStack client setup plus sample mHealth files and users.

pub mod localstack;

pub use localstack::{sample_user, unique_name, write_mhealth_file, LocalStackTestContext};
