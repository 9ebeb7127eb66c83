use std::fmt;

use jsonwebtoken::Algorithm;

/// Shared-secret settings used both to verify inbound tokens and to sign
/// the tokens this service issues for itself.
#[derive(Clone)]
pub struct SecurityConfig {
    /// Raw HMAC key (already base64-decoded)
    pub secret: Vec<u8>,
    /// The only algorithm accepted or produced
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given shared secret
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
        }
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("secret", &"[redacted]")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
