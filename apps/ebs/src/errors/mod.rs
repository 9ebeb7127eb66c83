//! Error handling for the EBS.

pub mod error_code;

pub use error_code::ErrorCode;
