//! Shared helpers for the EBS unit and integration tests.
//!
//! Kept free of `ebs` types so the service crate can depend on it as a
//! dev-dependency without a cycle.

pub mod logging;
pub mod plain_errors;
