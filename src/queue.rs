// SPDX-License-Identifier: MIT

//! Bounded MPSC observation queue with drop-oldest backpressure.
//!
//! `enqueue` never blocks. When the queue is full, the oldest element is
//! evicted to make room for the new one in the same critical section, so
//! a slot freed by eviction cannot be stolen by a concurrent producer
//! before the new element lands (the race flagged in spec.md §9). Each
//! eviction is reported to the shared `Status` block in the same call, so
//! `status.dropped` and the queue's own eviction count never diverge.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::Notify;

use crate::observation::Observation;
use crate::status::Status;
use std::sync::Arc;

/// An item in the queue: either a live observation or the shutdown sentinel.
enum Slot {
    Item(Observation),
    Shutdown,
}

pub struct ObservationQueue {
    capacity: usize,
    inner: Mutex<VecDeque<Slot>>,
    notify: Notify,
    status: Arc<Status>,
}

impl ObservationQueue {
    pub fn new(capacity: usize, status: Arc<Status>) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
            notify: Notify::new(),
            status,
        }
    }

    /// Insert `obs` at the tail, evicting the head if the queue is full.
    /// Never blocks.
    pub fn enqueue(&self, obs: Observation) {
        let mut guard = self.inner.lock().unwrap();
        if guard.len() >= self.capacity {
            guard.pop_front();
            self.status.record_drop();
        }
        guard.push_back(Slot::Item(obs));
        drop(guard);
        self.notify.notify_one();
    }

    /// Enqueue the shutdown sentinel, unconditionally (never evicted as a
    /// normal observation would be, so a shutdown request is never lost).
    pub fn enqueue_shutdown(&self) {
        let mut guard = self.inner.lock().unwrap();
        guard.push_back(Slot::Shutdown);
        drop(guard);
        self.notify.notify_one();
    }

    /// Current number of queued items (observations + any pending sentinel).
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pop the head if present, without blocking.
    fn try_pop(&self) -> Option<Slot> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Block until at least one element is available, then return it.
    /// Returns `None` if the popped element was the shutdown sentinel.
    pub async fn dequeue(&self) -> Option<Observation> {
        loop {
            match self.try_pop() {
                Some(Slot::Item(obs)) => return Some(obs),
                Some(Slot::Shutdown) => return None,
                None => self.notify.notified().await,
            }
        }
    }

    /// Poll-dequeue with a timeout; `Ok(None)` on timeout, `Err(())` on sentinel.
    pub async fn dequeue_timeout(&self, timeout: Duration) -> Result<Option<Observation>, ()> {
        match self.try_pop() {
            Some(Slot::Item(obs)) => return Ok(Some(obs)),
            Some(Slot::Shutdown) => return Err(()),
            None => {}
        }
        match tokio::time::timeout(timeout, self.notify.notified()).await {
            Ok(()) => match self.try_pop() {
                Some(Slot::Item(obs)) => Ok(Some(obs)),
                Some(Slot::Shutdown) => Err(()),
                None => Ok(None),
            },
            Err(_) => Ok(None),
        }
    }
}
