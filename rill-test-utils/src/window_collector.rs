// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The "collect each window to a list" harness.

use crate::recording::RecordingSubscriber;
use parking_lot::Mutex;
use rill_core::{demand, Publisher, RillError, Subscriber, Subscription, UnicastWindow};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct CollectorState<T> {
    initial_demand: u64,
    subscription: Mutex<Option<Arc<dyn Subscription>>>,
    windows: Mutex<Vec<RecordingSubscriber<T>>>,
    completions: AtomicUsize,
    errors: Mutex<Vec<RillError>>,
}

/// An outer subscriber that attaches an unbounded recorder to every window
/// it receives, so each window's contents can be asserted as a plain list.
///
/// Cheap to clone; all clones share the same state.
pub struct WindowCollector<T> {
    state: Arc<CollectorState<T>>,
}

impl<T: Clone + Send + Sync + 'static> WindowCollector<T> {
    /// A collector with unbounded demand for windows.
    #[must_use]
    pub fn new() -> Self {
        Self::with_demand(demand::UNBOUNDED)
    }

    /// A collector that requests exactly `initial_demand` windows on
    /// subscription.
    #[must_use]
    pub fn with_demand(initial_demand: u64) -> Self {
        Self {
            state: Arc::new(CollectorState {
                initial_demand,
                subscription: Mutex::new(None),
                windows: Mutex::new(Vec::new()),
                completions: AtomicUsize::new(0),
                errors: Mutex::new(Vec::new()),
            }),
        }
    }

    /// This collector as a subscriber trait object.
    #[must_use]
    pub fn subscriber(&self) -> Arc<dyn Subscriber<UnicastWindow<T>>> {
        Arc::new(self.clone())
    }

    /// Requests `n` more windows.
    ///
    /// # Panics
    ///
    /// Panics if no subscription has been received yet.
    pub fn request(&self, n: u64) {
        self.state
            .subscription
            .lock()
            .clone()
            .expect("WindowCollector: request before on_subscribe")
            .request(n);
    }

    /// Cancels the outer subscription.
    ///
    /// # Panics
    ///
    /// Panics if no subscription has been received yet.
    pub fn cancel(&self) {
        self.state
            .subscription
            .lock()
            .clone()
            .expect("WindowCollector: cancel before on_subscribe")
            .cancel();
    }

    /// The contents of every window received so far, in arrival order.
    #[must_use]
    pub fn windows(&self) -> Vec<Vec<T>> {
        self.state
            .windows
            .lock()
            .iter()
            .map(RecordingSubscriber::items)
            .collect()
    }

    /// Number of windows received so far.
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.state.windows.lock().len()
    }

    /// The per-window recorders, for terminal-signal assertions.
    #[must_use]
    pub fn window_recorders(&self) -> Vec<RecordingSubscriber<T>> {
        self.state.windows.lock().clone()
    }

    /// Returns `true` once the outer subscription completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state.completions.load(Ordering::Acquire) > 0
    }

    /// The first outer error, if any.
    #[must_use]
    pub fn error(&self) -> Option<RillError> {
        self.state.errors.lock().first().cloned()
    }

    /// Total number of outer terminal signals observed.
    #[must_use]
    pub fn terminal_count(&self) -> usize {
        self.state.completions.load(Ordering::Acquire) + self.state.errors.lock().len()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for WindowCollector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Subscriber<UnicastWindow<T>> for WindowCollector<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.state.subscription.lock() = Some(subscription.clone());
        if self.state.initial_demand > 0 {
            subscription.request(self.state.initial_demand);
        }
    }

    fn on_next(&self, window: UnicastWindow<T>) {
        let recorder = RecordingSubscriber::new();
        window.subscribe(recorder.subscriber());
        self.state.windows.lock().push(recorder);
    }

    fn on_error(&self, error: RillError) {
        self.state.errors.lock().push(error);
    }

    fn on_complete(&self) {
        self.state.completions.fetch_add(1, Ordering::AcqRel);
    }
}

impl<T> Clone for WindowCollector<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}
