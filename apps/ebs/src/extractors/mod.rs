pub mod bearer;
pub mod transaction_body;
pub mod verified;

pub use bearer::{bearer_token, BEARER_PREFIX};
pub use verified::Verified;
