//! Consumer traits and message types.

use std::marker::PhantomData;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::Error;

/// A decoded message with its queue position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage<T> {
    /// Decoded payload.
    pub message: T,
    /// Offset of the message within its partition.
    pub offset: u64,
    /// Partition the message was read from.
    pub partition: u32,
}

/// Decodes raw message payloads.
pub trait MessageDeserializer<T>: Send + Sync {
    /// Decode one payload.
    fn deserialize(&self, raw: &str) -> Result<T, Error>;
}

/// JSON payload decoder.
#[derive(Debug)]
pub struct JsonDeserializer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDeserializer<T> {
    /// Create a JSON decoder.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonDeserializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> MessageDeserializer<T> for JsonDeserializer<T> {
    fn deserialize(&self, raw: &str) -> Result<T, Error> {
        serde_json::from_str(raw).map_err(|e| Error::Deserialization(e.to_string()))
    }
}

/// Polls batches of messages and acknowledges processed offsets.
pub trait NotificationConsumer<T> {
    /// Receive the next batch, waiting at most `timeout` for messages.
    fn receive(&mut self, timeout: Duration) -> Result<Vec<NotificationMessage<T>>, Error>;

    /// Acknowledge everything up to `offset` in `partition`.
    ///
    /// A no-op when the consumer commits automatically.
    fn commit(&mut self, partition: u32, offset: u64) -> Result<(), Error>;

    /// Release the underlying connection.
    fn close(&mut self);
}
