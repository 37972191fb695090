// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A subscriber that records every signal it receives.

use parking_lot::Mutex;
use rill_core::{demand, RillError, Subscriber, Subscription};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct RecordingState<T> {
    initial_demand: u64,
    subscription: Mutex<Option<Arc<dyn Subscription>>>,
    items: Mutex<Vec<T>>,
    completions: AtomicUsize,
    errors: Mutex<Vec<RillError>>,
}

/// Records items and terminal signals for assertions.
///
/// By default the recorder requests unbounded demand as soon as it is
/// subscribed; [`with_demand`](Self::with_demand) builds one that requests
/// a fixed amount instead (zero to exercise a downstream that never asks).
/// Further demand can be issued with [`request`](Self::request).
///
/// Cheap to clone; all clones share the same state.
pub struct RecordingSubscriber<T> {
    state: Arc<RecordingState<T>>,
}

impl<T: Send + Sync + 'static> RecordingSubscriber<T> {
    /// A recorder with unbounded initial demand.
    #[must_use]
    pub fn new() -> Self {
        Self::with_demand(demand::UNBOUNDED)
    }

    /// A recorder that requests exactly `initial_demand` on subscription.
    #[must_use]
    pub fn with_demand(initial_demand: u64) -> Self {
        Self {
            state: Arc::new(RecordingState {
                initial_demand,
                subscription: Mutex::new(None),
                items: Mutex::new(Vec::new()),
                completions: AtomicUsize::new(0),
                errors: Mutex::new(Vec::new()),
            }),
        }
    }

    /// This recorder as a subscriber trait object.
    #[must_use]
    pub fn subscriber(&self) -> Arc<dyn Subscriber<T>> {
        Arc::new(self.clone())
    }

    /// Requests `n` more items through the captured subscription.
    ///
    /// # Panics
    ///
    /// Panics if no subscription has been received yet.
    pub fn request(&self, n: u64) {
        self.state
            .subscription
            .lock()
            .clone()
            .expect("RecordingSubscriber: request before on_subscribe")
            .request(n);
    }

    /// Cancels the captured subscription.
    ///
    /// # Panics
    ///
    /// Panics if no subscription has been received yet.
    pub fn cancel(&self) {
        self.state
            .subscription
            .lock()
            .clone()
            .expect("RecordingSubscriber: cancel before on_subscribe")
            .cancel();
    }

    /// Returns `true` once a subscription has been received.
    #[must_use]
    pub fn has_subscription(&self) -> bool {
        self.state.subscription.lock().is_some()
    }

    /// Number of items received so far.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.state.items.lock().len()
    }

    /// Returns `true` once `on_complete` has been received.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state.completions.load(Ordering::Acquire) > 0
    }

    /// The first error received, if any.
    #[must_use]
    pub fn error(&self) -> Option<RillError> {
        self.state.errors.lock().first().cloned()
    }

    /// Total number of terminal signals observed. A law-abiding publisher
    /// produces exactly one.
    #[must_use]
    pub fn terminal_count(&self) -> usize {
        self.state.completions.load(Ordering::Acquire) + self.state.errors.lock().len()
    }
}

impl<T: Clone + Send + Sync + 'static> RecordingSubscriber<T> {
    /// The items received so far.
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.state.items.lock().clone()
    }
}

impl<T: Send + Sync + 'static> Default for RecordingSubscriber<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> Subscriber<T> for RecordingSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.state.subscription.lock() = Some(subscription.clone());
        if self.state.initial_demand > 0 {
            subscription.request(self.state.initial_demand);
        }
    }

    fn on_next(&self, item: T) {
        self.state.items.lock().push(item);
    }

    fn on_error(&self, error: RillError) {
        self.state.errors.lock().push(error);
    }

    fn on_complete(&self) {
        self.state.completions.fetch_add(1, Ordering::AcqRel);
    }
}

impl<T> Clone for RecordingSubscriber<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}
