//! Notification consumer interface.
//!
//! Type definition changes may arrive from a message queue as batches of
//! raw payloads tagged with a partition and an offset. This module only
//! describes that boundary; nothing in the store is driven by it.

mod consumer;
mod memory;

pub use consumer::{
    JsonDeserializer, MessageDeserializer, NotificationConsumer, NotificationMessage,
};
pub use memory::{InMemoryConsumer, Publisher, DEFAULT_MAX_BATCH};
