//! Queue-backed consumer.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::{MessageDeserializer, NotificationConsumer, NotificationMessage};
use crate::error::Error;

/// Default number of messages returned per `receive` call.
pub const DEFAULT_MAX_BATCH: usize = 100;

#[derive(Debug, Default)]
struct Partitions {
    queue: VecDeque<(u32, u64, String)>,
    next_offset: BTreeMap<u32, u64>,
    committed: BTreeMap<u32, u64>,
}

/// Consumer reading raw payloads from an in-process queue.
///
/// Publishers and the consumer share the queue through [`InMemoryConsumer::publisher`].
pub struct InMemoryConsumer<T> {
    deserializer: Box<dyn MessageDeserializer<T>>,
    state: Arc<Mutex<Partitions>>,
    auto_commit: bool,
    max_batch: usize,
    closed: bool,
}

/// Handle used to publish raw payloads to an [`InMemoryConsumer`].
#[derive(Clone)]
pub struct Publisher {
    state: Arc<Mutex<Partitions>>,
}

impl Publisher {
    /// Append a payload to a partition, returning its offset.
    pub fn publish(&self, partition: u32, raw: impl Into<String>) -> u64 {
        let mut state = self.state.lock();
        let next = state.next_offset.entry(partition).or_insert(0);
        let offset = *next;
        *next += 1;
        state.queue.push_back((partition, offset, raw.into()));
        offset
    }
}

impl<T> InMemoryConsumer<T> {
    /// Create a consumer with the given payload decoder.
    pub fn new(deserializer: impl MessageDeserializer<T> + 'static, auto_commit: bool) -> Self {
        Self {
            deserializer: Box::new(deserializer),
            state: Arc::new(Mutex::new(Partitions::default())),
            auto_commit,
            max_batch: DEFAULT_MAX_BATCH,
            closed: false,
        }
    }

    /// Limit the number of messages per batch.
    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch.max(1);
        self
    }

    /// Get a publishing handle for this consumer's queue.
    pub fn publisher(&self) -> Publisher {
        Publisher {
            state: Arc::clone(&self.state),
        }
    }

    /// Last committed offset of a partition.
    pub fn committed(&self, partition: u32) -> Option<u64> {
        self.state.lock().committed.get(&partition).copied()
    }

    /// Check whether the consumer has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<T> NotificationConsumer<T> for InMemoryConsumer<T> {
    fn receive(&mut self, _timeout: Duration) -> Result<Vec<NotificationMessage<T>>, Error> {
        if self.closed {
            return Err(Error::Config("consumer is closed".to_string()));
        }

        let raw: Vec<(u32, u64, String)> = {
            let mut state = self.state.lock();
            let take = state.queue.len().min(self.max_batch);
            state.queue.drain(..take).collect()
        };

        let mut messages = Vec::with_capacity(raw.len());
        for (partition, offset, payload) in raw {
            debug!(partition, offset, "Received message");
            match self.deserializer.deserialize(&payload) {
                Ok(message) => messages.push(NotificationMessage {
                    message,
                    offset,
                    partition,
                }),
                Err(e) => warn!(partition, offset, error = %e, "Skipping undecodable message"),
            }
        }

        Ok(messages)
    }

    fn commit(&mut self, partition: u32, offset: u64) -> Result<(), Error> {
        if self.auto_commit {
            return Ok(());
        }

        debug!(partition, offset, "Committing offset");
        self.state.lock().committed.insert(partition, offset);
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
