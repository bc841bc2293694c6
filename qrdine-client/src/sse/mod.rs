//! Server-sent events transport
//!
//! Wire parser plus the spawned per-subscription read loop. The typed
//! payment/order-status subscriptions live in [`crate::bridge`]; this
//! module only knows about the `text/event-stream` format.

mod parser;
mod stream;

pub use parser::{SseEvent, SseParser};
pub use stream::{ReconnectPolicy, StreamConfig, SubscriptionHandle};

pub(crate) use stream::spawn_event_stream;
