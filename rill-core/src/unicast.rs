// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, single-subscriber window publisher.
//!
//! A [`UnicastWindow`] is the unit a windowing operator hands to its outer
//! subscriber: elements are pushed into it as they arrive from upstream
//! (hot), while the receiving side sees an ordinary [`Publisher`] it can
//! subscribe to whenever it likes (cold handle). Elements accumulate in a
//! bounded buffer until the lone subscriber attaches and requests demand.
//!
//! ## Characteristics
//!
//! - **Single subscriber**: a second subscriber is rejected with
//!   [`RillError::AlreadySubscribed`].
//! - **Bounded**: backed by a `crossbeam_queue::ArrayQueue` whose capacity
//!   the producer sizes to the window length; pushing into a full buffer
//!   fails the window with [`RillError::Overflow`].
//! - **Demand-paced**: buffered elements are replayed no faster than the
//!   subscriber requests them.
//! - **Terminal after buffer**: buffered elements are delivered before the
//!   terminal signal, so a late subscriber still observes the full window.
//! - **Terminate callback**: completion, error and cancellation all fire an
//!   optional callback exactly once; producers use it to release their
//!   interest in the shared upstream.
//!
//! ## Example
//!
//! ```
//! use crossbeam_queue::ArrayQueue;
//! use futures::StreamExt;
//! use rill_core::{IntoStream, UnicastWindow};
//!
//! let window = UnicastWindow::new(ArrayQueue::new(3));
//! window.push(1);
//! window.push(2);
//! window.complete();
//!
//! let items = futures::executor::block_on(async {
//!     window.into_stream().map(|i| i.unwrap()).collect::<Vec<_>>().await
//! });
//! assert_eq!(items, vec![1, 2]);
//! ```

use crate::demand;
use crate::error::RillError;
use crate::hooks;
use crate::lifecycle::OnceLatch;
use crate::publisher::{reject, Publisher, Subscriber, Subscription};
use crossbeam_queue::ArrayQueue;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

type TerminateFn = Box<dyn FnOnce() + Send>;

struct WindowState<T> {
    buffer: ArrayQueue<T>,
    requested: AtomicU64,
    wip: AtomicUsize,
    subscribed: OnceLatch,
    subscriber: Mutex<Option<Arc<dyn Subscriber<T>>>>,
    on_terminate: Mutex<Option<TerminateFn>>,
    done: AtomicBool,
    error: Mutex<Option<RillError>>,
    cancelled: AtomicBool,
}

/// A hot publisher that relays one window of elements to a single subscriber.
///
/// Cheap to clone; all clones share the same buffer and subscription state.
/// The producer side pushes with [`push`](Self::push), [`error`](Self::error)
/// and [`complete`](Self::complete); the consumer side attaches through
/// [`Publisher::subscribe`].
pub struct UnicastWindow<T> {
    state: Arc<WindowState<T>>,
}

impl<T: Send + 'static> UnicastWindow<T> {
    /// Creates a window over `buffer` with no terminate callback.
    #[must_use]
    pub fn new(buffer: ArrayQueue<T>) -> Self {
        Self {
            state: Arc::new(WindowState {
                buffer,
                requested: AtomicU64::new(0),
                wip: AtomicUsize::new(0),
                subscribed: OnceLatch::new(),
                subscriber: Mutex::new(None),
                on_terminate: Mutex::new(None),
                done: AtomicBool::new(false),
                error: Mutex::new(None),
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    /// Creates a window over `buffer` that runs `on_terminate` the first
    /// time it completes, errors or is cancelled.
    #[must_use]
    pub fn with_terminate(buffer: ArrayQueue<T>, on_terminate: impl FnOnce() + Send + 'static) -> Self {
        let window = Self::new(buffer);
        *window.state.on_terminate.lock() = Some(Box::new(on_terminate));
        window
    }

    /// Pushes the next element into the window.
    ///
    /// After a terminal signal the element is routed to the dropped-signal
    /// side channel. A full buffer fails the window with an overflow error.
    pub fn push(&self, item: T) {
        if self.is_terminated() {
            hooks::on_next_dropped(&item);
            return;
        }
        if self.state.buffer.push(item).is_err() {
            self.error(RillError::overflow("window buffer rejected an element"));
            return;
        }
        self.drain();
    }

    /// Fails the window. Buffered elements are still delivered first.
    pub fn error(&self, error: RillError) {
        if self.is_terminated() {
            hooks::on_error_dropped(&error);
            return;
        }
        *self.state.error.lock() = Some(error);
        self.state.done.store(true, Ordering::Release);
        self.terminate();
        self.drain();
    }

    /// Completes the window. Buffered elements are still delivered first.
    pub fn complete(&self) {
        if self.is_terminated() {
            return;
        }
        self.state.done.store(true, Ordering::Release);
        self.terminate();
        self.drain();
    }

    /// Returns `true` once the producer side has terminated or the
    /// subscriber has cancelled.
    pub fn is_terminated(&self) -> bool {
        self.state.done.load(Ordering::Acquire) || self.state.cancelled.load(Ordering::Acquire)
    }

    fn terminate(&self) {
        let callback = self.state.on_terminate.lock().take();
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Serialized drain: the entrant that raises `wip` from zero delivers on
    /// behalf of everyone; later entrants only record that more work exists.
    fn drain(&self) {
        let state = &self.state;
        if state.wip.fetch_add(1, Ordering::AcqRel) != 0 {
            return;
        }

        let mut missed = 1;
        loop {
            let subscriber = state.subscriber.lock().clone();
            if let Some(ref subscriber) = subscriber {
                let r = state.requested.load(Ordering::Acquire);
                let mut e = 0u64;

                while e != r {
                    let done = state.done.load(Ordering::Acquire);
                    let item = state.buffer.pop();
                    if self.check_terminated(done, item.is_none(), subscriber) {
                        return;
                    }
                    match item {
                        Some(item) => {
                            subscriber.on_next(item);
                            e += 1;
                        }
                        None => break,
                    }
                }

                if e == r {
                    let done = state.done.load(Ordering::Acquire);
                    if self.check_terminated(done, state.buffer.is_empty(), subscriber) {
                        return;
                    }
                }

                if e != 0 && r != demand::UNBOUNDED {
                    demand::produced(&state.requested, e);
                }
            }

            missed = state.wip.fetch_sub(missed, Ordering::AcqRel) - missed;
            if missed == 0 {
                break;
            }
        }
    }

    fn check_terminated(
        &self,
        done: bool,
        empty: bool,
        subscriber: &Arc<dyn Subscriber<T>>,
    ) -> bool {
        let state = &self.state;
        if state.cancelled.load(Ordering::Acquire) {
            while state.buffer.pop().is_some() {}
            *state.subscriber.lock() = None;
            return true;
        }
        if done && empty {
            *state.subscriber.lock() = None;
            let error = state.error.lock().take();
            match error {
                Some(error) => subscriber.on_error(error),
                None => subscriber.on_complete(),
            }
            return true;
        }
        false
    }
}

impl<T: Send + 'static> Publisher for UnicastWindow<T> {
    type Item = T;

    fn subscribe(&self, subscriber: Arc<dyn Subscriber<T>>) {
        if self.state.subscribed.fire() {
            subscriber.on_subscribe(Arc::new(self.clone()));
            if self.state.cancelled.load(Ordering::Acquire) {
                return;
            }
            *self.state.subscriber.lock() = Some(subscriber);
            self.drain();
        } else {
            reject(
                &subscriber,
                RillError::already_subscribed("window allows only a single subscriber"),
            );
        }
    }
}

impl<T: Send + 'static> Subscription for UnicastWindow<T> {
    fn request(&self, n: u64) {
        if demand::validate(n) {
            demand::add_cap(&self.state.requested, n);
            self.drain();
        }
    }

    fn cancel(&self) {
        let state = &self.state;
        if state.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        self.terminate();
        // Claim the drain; if nobody held it, clear here, otherwise the
        // active drain observes the flag and clears.
        if state.wip.fetch_add(1, Ordering::AcqRel) == 0 {
            while state.buffer.pop().is_some() {}
            *state.subscriber.lock() = None;
        }
    }
}

impl<T> Clone for UnicastWindow<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T> fmt::Debug for UnicastWindow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnicastWindow")
            .field("buffered", &self.state.buffer.len())
            .field("done", &self.state.done.load(Ordering::Acquire))
            .field("cancelled", &self.state.cancelled.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}
