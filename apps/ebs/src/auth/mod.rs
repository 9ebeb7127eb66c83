pub mod claims;
pub mod issuer;
pub mod verifier;

pub use claims::{AuthClaims, TransactionClaims};
pub use issuer::TokenIssuer;
pub use verifier::{TokenVerifier, VerifyError};
