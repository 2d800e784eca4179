use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use chronicle_core::{Event, EventStore, StreamId};

use super::recorded::RecordedEvent;

/// In-memory store operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InMemoryStoreError {
    /// A writer panicked while holding the stream lock.
    #[error("event store lock poisoned")]
    Poisoned,
}

/// In-memory append-only event store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug)]
pub struct InMemoryEventStore<E> {
    streams: RwLock<HashMap<StreamId, Vec<RecordedEvent<E>>>>,
}

impl<E> Default for InMemoryEventStore<E> {
    fn default() -> Self {
        Self {
            streams: RwLock::new(HashMap::new()),
        }
    }
}

impl<E: Event> InMemoryEventStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_version(stream: &[RecordedEvent<E>]) -> u64 {
        stream.last().map(|e| e.sequence_number).unwrap_or(0)
    }

    /// Recorded events of `stream`, oldest first.
    pub fn stream(&self, stream: &StreamId) -> Result<Vec<RecordedEvent<E>>, InMemoryStoreError> {
        let streams = self
            .streams
            .read()
            .map_err(|_| InMemoryStoreError::Poisoned)?;

        Ok(streams.get(stream).cloned().unwrap_or_default())
    }

    /// Sequence number of the last event in `stream` (0 when empty).
    pub fn stream_version(&self, stream: &StreamId) -> Result<u64, InMemoryStoreError> {
        let streams = self
            .streams
            .read()
            .map_err(|_| InMemoryStoreError::Poisoned)?;

        Ok(streams
            .get(stream)
            .map(|s| Self::current_version(s))
            .unwrap_or(0))
    }

    /// Identifiers of every non-empty stream, sorted.
    pub fn stream_ids(&self) -> Result<Vec<StreamId>, InMemoryStoreError> {
        let streams = self
            .streams
            .read()
            .map_err(|_| InMemoryStoreError::Poisoned)?;

        let mut ids: Vec<StreamId> = streams.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Total number of events across all streams.
    pub fn event_count(&self) -> Result<usize, InMemoryStoreError> {
        let streams = self
            .streams
            .read()
            .map_err(|_| InMemoryStoreError::Poisoned)?;

        Ok(streams.values().map(Vec::len).sum())
    }
}

impl<E: Event> EventStore<E> for InMemoryEventStore<E> {
    type Error = InMemoryStoreError;

    fn read_stream_events_forward(&self, stream: &StreamId) -> Result<Vec<E>, Self::Error> {
        let streams = self
            .streams
            .read()
            .map_err(|_| InMemoryStoreError::Poisoned)?;

        Ok(streams
            .get(stream)
            .map(|recorded| recorded.iter().map(|e| e.payload.clone()).collect())
            .unwrap_or_default())
    }

    fn publish_event(&self, event: &E, stream: &StreamId) -> Result<(), Self::Error> {
        let mut streams = self
            .streams
            .write()
            .map_err(|_| InMemoryStoreError::Poisoned)?;

        let recorded = streams.entry(stream.clone()).or_default();
        let next = Self::current_version(recorded) + 1;

        recorded.push(RecordedEvent {
            event_id: Uuid::now_v7(),
            stream_id: stream.clone(),
            sequence_number: next,
            event_type: event.event_type().to_string(),
            recorded_at: Utc::now(),
            payload: event.clone(),
        });

        Ok(())
    }
}
