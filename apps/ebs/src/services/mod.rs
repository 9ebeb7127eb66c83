pub mod cooldown;
pub mod publisher;
pub mod transport;

pub use cooldown::CooldownGate;
pub use publisher::{PublishOutcome, Publisher};
pub use transport::{OutboundMessage, OutboundRequest, PubSubTransport, ReqwestTransport};
