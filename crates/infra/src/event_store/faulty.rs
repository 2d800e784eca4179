use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

use chronicle_core::{Event, EventStore, StreamId};

/// Error of a [`FaultyEventStore`].
#[derive(Debug, Error)]
pub enum FaultyStoreError<S> {
    /// Failure injected by the wrapper.
    #[error("injected failure: {0}")]
    Injected(&'static str),

    /// Failure of the wrapped store.
    #[error(transparent)]
    Inner(S),
}

#[derive(Debug, Default, Clone, Copy)]
struct FaultPlan {
    fail_reads: bool,
    /// Publishes still allowed before every publish fails. `None` = unlimited.
    publishes_left: Option<usize>,
}

/// Store wrapper that fails on demand.
///
/// Intended for tests that exercise partial replay and partial publish. Reads
/// and publishes pass through to the wrapped store until a fault is armed.
#[derive(Debug)]
pub struct FaultyEventStore<S> {
    inner: S,
    plan: Mutex<FaultPlan>,
    publish_attempts: AtomicUsize,
}

impl<S> FaultyEventStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            plan: Mutex::new(FaultPlan::default()),
            publish_attempts: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Make every read fail (or stop failing).
    pub fn fail_reads(&self, fail: bool) {
        if let Ok(mut plan) = self.plan.lock() {
            plan.fail_reads = fail;
        }
    }

    /// Let `n` more publishes through, then fail every following one.
    pub fn fail_publish_after(&self, n: usize) {
        if let Ok(mut plan) = self.plan.lock() {
            plan.publishes_left = Some(n);
        }
    }

    /// Disarm every fault.
    pub fn heal(&self) {
        if let Ok(mut plan) = self.plan.lock() {
            *plan = FaultPlan::default();
        }
    }

    /// Number of publish calls received, failed ones included.
    pub fn publish_attempts(&self) -> usize {
        self.publish_attempts.load(Ordering::SeqCst)
    }
}

impl<E, S> EventStore<E> for FaultyEventStore<S>
where
    E: Event,
    S: EventStore<E>,
{
    type Error = FaultyStoreError<S::Error>;

    fn read_stream_events_forward(&self, stream: &StreamId) -> Result<Vec<E>, Self::Error> {
        let fail = self
            .plan
            .lock()
            .map_err(|_| FaultyStoreError::Injected("fault plan poisoned"))?
            .fail_reads;
        if fail {
            return Err(FaultyStoreError::Injected("read failed"));
        }

        self.inner
            .read_stream_events_forward(stream)
            .map_err(FaultyStoreError::Inner)
    }

    fn publish_event(&self, event: &E, stream: &StreamId) -> Result<(), Self::Error> {
        self.publish_attempts.fetch_add(1, Ordering::SeqCst);

        {
            let mut plan = self
                .plan
                .lock()
                .map_err(|_| FaultyStoreError::Injected("fault plan poisoned"))?;
            match plan.publishes_left {
                Some(0) => return Err(FaultyStoreError::Injected("publish failed")),
                Some(ref mut left) => *left -= 1,
                None => {}
            }
        }

        self.inner
            .publish_event(event, stream)
            .map_err(FaultyStoreError::Inner)
    }
}
