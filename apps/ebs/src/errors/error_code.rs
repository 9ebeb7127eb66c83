//! Error codes for the EBS API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Codes are SCREAMING_SNAKE_CASE and appear in server-side logs next to
//! every rejected request.

use core::fmt;

/// Centralized error codes for the EBS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Authentication required or token rejected
    Unauthorized,
    /// More than one Authorization header value was sent
    MultipleAuthHeaders,
    /// Authorization header without the bearer prefix or too short
    MalformedAuthHeader,

    // Request Validation
    /// Body could not be read or decoded
    BadRequest,
    /// Body exceeded the configured limit
    PayloadTooLarge,

    // System Errors
    /// Internal server error
    Internal,
    /// Token verifier failed for a reason other than a bad token
    VerifierFailure,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::MultipleAuthHeaders => "MULTIPLE_AUTH_HEADERS",
            Self::MalformedAuthHeader => "MALFORMED_AUTH_HEADER",

            Self::BadRequest => "BAD_REQUEST",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",

            Self::Internal => "INTERNAL",
            Self::VerifierFailure => "VERIFIER_FAILURE",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
