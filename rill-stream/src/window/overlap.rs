// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Overlap strategy: overlapping windows (`skip < size`).
//!
//! Up to `⌈size/skip⌉` windows are open at the same time and every upstream
//! element is fanned into each of them. Because windows cannot be emitted
//! downstream faster than the outer subscriber requests them, opened
//! windows go through a ready queue drained by a serialized loop.
//!
//! ## The drain loop
//!
//! Emission is serialized by a work-claim counter: only the entrant that
//! raises the counter from zero runs the loop; every other entrant just
//! increments it and returns, and its work is absorbed by the running
//! entrant's next iteration. The loop emits ready windows while outer
//! demand lasts, subtracts what it emitted from the demand counter, and
//! exits when a terminal condition is met or no work remains.
//!
//! ## Cancellation
//!
//! Outer cancellation releases the outer subscriber's holder unit but does
//! not touch the upstream directly: the upstream subscription is cancelled
//! exactly once, when the holder count reaches zero, i.e. when the outer
//! subscriber *and* every still-open window have let go.

use super::ElementQueueSupplier;
use crossbeam_queue::SegQueue;
use parking_lot::Mutex;
use rill_core::{
    demand, hooks, reject_duplicate, OnceLatch, RillError, SharedUpstream, Subscriber,
    Subscription, UnicastWindow,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

struct WindowTrack<T> {
    /// Rolling position within the current stride, `[0, skip)`.
    index: usize,
    /// Elements routed into the oldest still-open window, `[0, size)`.
    produced: usize,
    /// Open windows, oldest first.
    open: VecDeque<UnicastWindow<T>>,
}

struct OverlapInner<T> {
    outer: Arc<dyn Subscriber<UnicastWindow<T>>>,
    element_queues: ElementQueueSupplier<T>,
    size: usize,
    skip: usize,
    upstream: SharedUpstream,
    cancel_once: OnceLatch,
    first_request: OnceLatch,
    /// Windows opened but not yet delivered downstream.
    ready: SegQueue<UnicastWindow<T>>,
    /// Outstanding outer demand, in windows. Saturates at
    /// [`demand::UNBOUNDED`].
    requested: AtomicU64,
    /// Work-claim counter serializing the drain loop.
    wip: AtomicUsize,
    done: AtomicBool,
    cancelled: AtomicBool,
    error: Mutex<Option<RillError>>,
    /// Signal-path state; only the upstream signal path mutates it.
    track: Mutex<WindowTrack<T>>,
}

/// Subscriber for overlapping windows.
///
/// The first outer request `n` translates to `size ⊕ skip ⊗ (n − 1)`
/// upstream elements (the first window needs `size`, each further window
/// starts `skip` later); subsequent requests `n` translate to `skip ⊗ n`.
pub(super) struct WindowOverlap<T> {
    inner: Arc<OverlapInner<T>>,
}

impl<T: Clone + Send + Sync + 'static> WindowOverlap<T> {
    pub(super) fn new(
        outer: Arc<dyn Subscriber<UnicastWindow<T>>>,
        size: usize,
        skip: usize,
        element_queues: ElementQueueSupplier<T>,
        ready: SegQueue<UnicastWindow<T>>,
    ) -> Self {
        Self {
            inner: Arc::new(OverlapInner {
                outer,
                element_queues,
                size,
                skip,
                upstream: SharedUpstream::with_holders(1),
                cancel_once: OnceLatch::new(),
                first_request: OnceLatch::new(),
                ready,
                requested: AtomicU64::new(0),
                wip: AtomicUsize::new(0),
                done: AtomicBool::new(false),
                cancelled: AtomicBool::new(false),
                error: Mutex::new(None),
                track: Mutex::new(WindowTrack {
                    index: 0,
                    produced: 0,
                    open: VecDeque::new(),
                }),
            }),
        }
    }

    fn drain(&self) {
        let inner = &self.inner;
        if inner.wip.fetch_add(1, Ordering::AcqRel) != 0 {
            return;
        }

        let mut missed = 1;
        loop {
            let r = inner.requested.load(Ordering::Acquire);
            let mut e = 0u64;

            while e != r {
                let done = inner.done.load(Ordering::Acquire);
                let window = inner.ready.pop();
                if self.check_terminated(done, window.is_none()) {
                    return;
                }
                match window {
                    Some(window) => {
                        inner.outer.on_next(window);
                        e += 1;
                    }
                    None => break,
                }
            }

            if e == r {
                let done = inner.done.load(Ordering::Acquire);
                if self.check_terminated(done, inner.ready.is_empty()) {
                    return;
                }
            }

            if e != 0 && r != demand::UNBOUNDED {
                demand::produced(&inner.requested, e);
            }

            missed = inner.wip.fetch_sub(missed, Ordering::AcqRel) - missed;
            if missed == 0 {
                break;
            }
        }
    }

    fn check_terminated(&self, done: bool, empty: bool) -> bool {
        let inner = &self.inner;
        if inner.cancelled.load(Ordering::Acquire) {
            while inner.ready.pop().is_some() {}
            return true;
        }
        if done {
            let error = inner.error.lock().clone();
            if let Some(error) = error {
                while inner.ready.pop().is_some() {}
                inner.outer.on_error(error);
                return true;
            }
            if empty {
                inner.outer.on_complete();
                return true;
            }
        }
        false
    }
}

impl<T: Clone + Send + Sync + 'static> Subscriber<T> for WindowOverlap<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        if self.inner.upstream.set(subscription.clone()) {
            self.inner.outer.on_subscribe(Arc::new(self.clone()));
        } else {
            reject_duplicate(&subscription);
        }
    }

    fn on_next(&self, item: T) {
        let inner = &self.inner;
        if inner.done.load(Ordering::Acquire) {
            hooks::on_next_dropped(&item);
            return;
        }

        let mut track = inner.track.lock();
        let i = track.index;

        if i == 0 && !inner.cancelled.load(Ordering::Acquire) {
            inner.upstream.acquire();
            match (inner.element_queues)() {
                Some(buffer) => {
                    let upstream = inner.upstream.clone();
                    let window = UnicastWindow::with_terminate(buffer, move || upstream.release());
                    track.open.push_back(window.clone());
                    inner.ready.push(window);
                    self.drain();
                }
                None => {
                    inner.upstream.release();
                    inner.done.store(true, Ordering::Release);
                    drop(track);
                    self.cancel();
                    // Open windows still hold their units; the failure must
                    // not wait for them.
                    inner.upstream.cancel_upstream();
                    inner
                        .outer
                        .on_error(RillError::queue_supplier(
                            "element-queue supplier returned no queue",
                        ));
                    return;
                }
            }
        }

        let i = i + 1;

        for window in track.open.iter() {
            window.push(item.clone());
        }

        let p = track.produced + 1;
        if p == inner.size {
            // The head is the oldest window and has just taken its
            // size-th element.
            track.produced = p - inner.skip;
            if let Some(window) = track.open.pop_front() {
                window.complete();
            }
        } else {
            track.produced = p;
        }

        track.index = if i == inner.skip { 0 } else { i };
    }

    fn on_error(&self, error: RillError) {
        let inner = &self.inner;
        if inner.done.load(Ordering::Acquire) {
            hooks::on_error_dropped(&error);
            return;
        }

        let mut track = inner.track.lock();
        for window in track.open.drain(..) {
            window.error(error.clone());
        }
        drop(track);

        *inner.error.lock() = Some(error);
        inner.done.store(true, Ordering::Release);
        self.drain();
    }

    fn on_complete(&self) {
        let inner = &self.inner;
        if inner.done.load(Ordering::Acquire) {
            return;
        }

        let mut track = inner.track.lock();
        for window in track.open.drain(..) {
            window.complete();
        }
        drop(track);

        inner.done.store(true, Ordering::Release);
        self.drain();
    }
}

impl<T: Clone + Send + Sync + 'static> Subscription for WindowOverlap<T> {
    fn request(&self, n: u64) {
        if !demand::validate(n) {
            return;
        }
        let inner = &self.inner;
        demand::add_cap(&inner.requested, n);

        let size = inner.size as u64;
        let skip = inner.skip as u64;
        if inner.first_request.fire() {
            let strides = skip.saturating_mul(n - 1);
            inner.upstream.request(size.saturating_add(strides));
        } else {
            inner.upstream.request(skip.saturating_mul(n));
        }

        self.drain();
    }

    fn cancel(&self) {
        let inner = &self.inner;
        inner.cancelled.store(true, Ordering::Release);
        if inner.cancel_once.fire() {
            inner.upstream.release();
        }
    }
}

impl<T> Clone for WindowOverlap<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
