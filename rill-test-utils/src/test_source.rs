// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A manually driven publisher that records everything its subscriber does.

use parking_lot::Mutex;
use rill_core::{Publisher, RillError, Subscriber, Subscription};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct SourceState<T> {
    subscriber: Mutex<Option<Arc<dyn Subscriber<T>>>>,
    requests: Mutex<Vec<u64>>,
    cancellations: AtomicUsize,
}

/// A test publisher driven explicitly from test code.
///
/// `TestSource` does not pace itself to demand; tests decide what to emit
/// and when, which makes it possible to simulate both well-behaved and
/// misbehaving upstreams. Every `request(n)` and `cancel()` issued by the
/// subscriber is recorded for assertions.
///
/// Cheap to clone; all clones share the same state.
pub struct TestSource<T> {
    state: Arc<SourceState<T>>,
}

impl<T: Send + 'static> TestSource<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(SourceState {
                subscriber: Mutex::new(None),
                requests: Mutex::new(Vec::new()),
                cancellations: AtomicUsize::new(0),
            }),
        }
    }

    /// Delivers `item` to the subscriber.
    ///
    /// # Panics
    ///
    /// Panics if nothing has subscribed yet.
    pub fn emit(&self, item: T) {
        let subscriber = self
            .state
            .subscriber
            .lock()
            .clone()
            .expect("TestSource: emit before subscribe");
        subscriber.on_next(item);
    }

    /// Completes the subscriber.
    ///
    /// # Panics
    ///
    /// Panics if nothing has subscribed yet.
    pub fn complete(&self) {
        let subscriber = self
            .state
            .subscriber
            .lock()
            .clone()
            .expect("TestSource: complete before subscribe");
        subscriber.on_complete();
    }

    /// Fails the subscriber with `error`.
    ///
    /// # Panics
    ///
    /// Panics if nothing has subscribed yet.
    pub fn error(&self, error: RillError) {
        let subscriber = self
            .state
            .subscriber
            .lock()
            .clone()
            .expect("TestSource: error before subscribe");
        subscriber.on_error(error);
    }

    /// Every `request(n)` observed, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<u64> {
        self.state.requests.lock().clone()
    }

    /// Sum of all requested demand, saturating.
    #[must_use]
    pub fn total_requested(&self) -> u64 {
        self.state
            .requests
            .lock()
            .iter()
            .fold(0u64, |total, n| total.saturating_add(*n))
    }

    /// Number of `cancel()` calls observed.
    #[must_use]
    pub fn cancellations(&self) -> usize {
        self.state.cancellations.load(Ordering::Acquire)
    }

    /// Returns `true` once the subscriber has cancelled at least once.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellations() > 0
    }

    /// Returns `true` once a subscriber is attached.
    #[must_use]
    pub fn has_subscriber(&self) -> bool {
        self.state.subscriber.lock().is_some()
    }

    /// Sends a second `on_subscribe` to the current subscriber, simulating a
    /// misbehaving upstream. The returned probe reports whether the
    /// duplicate subscription was cancelled.
    ///
    /// # Panics
    ///
    /// Panics if nothing has subscribed yet.
    pub fn send_duplicate_subscription(&self) -> SubscriptionProbe {
        let subscriber = self
            .state
            .subscriber
            .lock()
            .clone()
            .expect("TestSource: duplicate subscription before subscribe");
        let cancellations = Arc::new(AtomicUsize::new(0));
        subscriber.on_subscribe(Arc::new(ProbeSubscription {
            cancellations: cancellations.clone(),
        }));
        SubscriptionProbe { cancellations }
    }
}

/// Observes what a subscriber did with a subscription it should refuse.
pub struct SubscriptionProbe {
    cancellations: Arc<AtomicUsize>,
}

impl SubscriptionProbe {
    /// Returns `true` once the probed subscription has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellations.load(Ordering::Acquire) > 0
    }
}

struct ProbeSubscription {
    cancellations: Arc<AtomicUsize>,
}

impl Subscription for ProbeSubscription {
    fn request(&self, _n: u64) {}

    fn cancel(&self) {
        self.cancellations.fetch_add(1, Ordering::AcqRel);
    }
}

impl<T: Send + 'static> Default for TestSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Publisher for TestSource<T> {
    type Item = T;

    fn subscribe(&self, subscriber: Arc<dyn Subscriber<T>>) {
        *self.state.subscriber.lock() = Some(subscriber.clone());
        subscriber.on_subscribe(Arc::new(SourceSubscription {
            state: self.state.clone(),
        }));
    }
}

impl<T> Clone for TestSource<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

struct SourceSubscription<T> {
    state: Arc<SourceState<T>>,
}

impl<T: Send + 'static> Subscription for SourceSubscription<T> {
    fn request(&self, n: u64) {
        self.state.requests.lock().push(n);
    }

    fn cancel(&self) {
        self.state.cancellations.fetch_add(1, Ordering::AcqRel);
    }
}
