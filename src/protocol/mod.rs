pub mod bus;
pub mod envelope;
pub mod message_log;
pub mod registry;
pub mod session;

pub use bus::BroadcastBus;
pub use envelope::{DecodeError, Envelope, EnvelopeKind};
pub use message_log::MessageLog;
pub use registry::PeerRegistry;
pub use session::{ChatSession, SessionError};
