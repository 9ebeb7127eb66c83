use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::state::security_config::SecurityConfig;

/// Why a token was refused. Callers collapse every variant except
/// `Internal` into a plain 401; the variant only feeds server-side logs.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token expired")]
    Expired,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("signing algorithm not accepted")]
    Algorithm,
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("verifier failure: {0}")]
    Internal(String),
}

impl VerifyError {
    pub fn is_internal(&self) -> bool {
        matches!(self, VerifyError::Internal(_))
    }
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => VerifyError::Expired,
            ErrorKind::InvalidSignature => VerifyError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                VerifyError::Algorithm
            }
            ErrorKind::InvalidKeyFormat
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::RsaFailedSigning => VerifyError::Internal(e.to_string()),
            _ => VerifyError::Malformed(e.to_string()),
        }
    }
}

/// Verifies compact tokens against the shared secret.
///
/// Validation is pinned to the configured HMAC algorithm so a token whose
/// header names any other algorithm (including `none`) is refused before the
/// signature is even considered. `exp` is mandatory and checked with no leeway.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(security: &SecurityConfig) -> Self {
        let mut validation = Validation::new(security.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(&security.secret),
            validation,
        }
    }

    /// Decode `token` into the claims shape `C`.
    pub fn verify<C>(&self, token: &str) -> Result<C, VerifyError>
    where
        C: DeserializeOwned,
    {
        decode::<C>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(VerifyError::from)
    }
}
