use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chronicle_core::StreamId;

/// An event as held by a store (assigned an id and a stream position).
///
/// ## Sequence Numbers
///
/// Sequence numbers are assigned on publish and are:
/// - **Monotonically increasing**: each event gets the previous one + 1, starting at 1
/// - **Stream-scoped**: every stream counts on its own
/// - **Immutable**: once assigned, they never change
///
/// The aggregate capability only ever sees `payload`; the rest is store
/// bookkeeping available for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent<E> {
    pub event_id: Uuid,
    pub stream_id: StreamId,

    /// Monotonically increasing position in the stream.
    pub sequence_number: u64,

    pub event_type: String,
    pub recorded_at: DateTime<Utc>,

    pub payload: E,
}

impl<E> RecordedEvent<E> {
    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
