// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Skip strategy: gapped windows (`skip > size`).
//!
//! Between windows, `skip − size` upstream elements are consumed and
//! discarded. They are not routed anywhere; the gap is part of the
//! operator's contract, not a dropped-signal condition.

use super::ElementQueueSupplier;
use parking_lot::Mutex;
use rill_core::{
    demand, hooks, reject_duplicate, OnceLatch, RillError, SharedUpstream, Subscriber,
    Subscription, UnicastWindow,
};
use std::sync::Arc;

struct SkipState<T> {
    index: usize,
    window: Option<UnicastWindow<T>>,
    done: bool,
}

struct SkipInner<T> {
    outer: Arc<dyn Subscriber<UnicastWindow<T>>>,
    element_queues: ElementQueueSupplier<T>,
    size: usize,
    skip: usize,
    upstream: SharedUpstream,
    cancel_once: OnceLatch,
    first_request: OnceLatch,
    state: Mutex<SkipState<T>>,
}

/// Subscriber for windows of `size` elements beginning every `skip > size`
/// upstream elements.
///
/// The first outer request `n` must cover the first window plus `n − 1`
/// full strides: `size ⊗ n ⊕ (skip − size) ⊗ (n − 1)` elements. Once the
/// stride cadence is established, every further request `n` is `skip ⊗ n`.
/// The [`OnceLatch`] `first_request` tells the two cases apart.
pub(super) struct WindowSkip<T> {
    inner: Arc<SkipInner<T>>,
}

impl<T: Send + Sync + 'static> WindowSkip<T> {
    pub(super) fn new(
        outer: Arc<dyn Subscriber<UnicastWindow<T>>>,
        size: usize,
        skip: usize,
        element_queues: ElementQueueSupplier<T>,
    ) -> Self {
        Self {
            inner: Arc::new(SkipInner {
                outer,
                element_queues,
                size,
                skip,
                upstream: SharedUpstream::with_holders(1),
                cancel_once: OnceLatch::new(),
                first_request: OnceLatch::new(),
                state: Mutex::new(SkipState {
                    index: 0,
                    window: None,
                    done: false,
                }),
            }),
        }
    }
}

impl<T: Send + Sync + 'static> Subscriber<T> for WindowSkip<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        if self.inner.upstream.set(subscription.clone()) {
            self.inner.outer.on_subscribe(Arc::new(self.clone()));
        } else {
            reject_duplicate(&subscription);
        }
    }

    fn on_next(&self, item: T) {
        let inner = &self.inner;
        let mut state = inner.state.lock();
        if state.done {
            hooks::on_next_dropped(&item);
            return;
        }

        let i = state.index;
        if i == 0 {
            inner.upstream.acquire();
            let Some(buffer) = (inner.element_queues)() else {
                inner.upstream.release();
                state.done = true;
                drop(state);
                self.cancel();
                inner
                    .outer
                    .on_error(RillError::queue_supplier(
                        "element-queue supplier returned no queue",
                    ));
                return;
            };
            let upstream = inner.upstream.clone();
            let window = UnicastWindow::with_terminate(buffer, move || upstream.release());
            state.window = Some(window.clone());
            inner.outer.on_next(window);
        }

        let i = i + 1;

        // Inside the gap the window is absent and the element is discarded.
        if let Some(ref window) = state.window {
            window.push(item);
        }

        if i == inner.size {
            if let Some(window) = state.window.take() {
                window.complete();
            }
        }

        state.index = if i == inner.skip { 0 } else { i };
    }

    fn on_error(&self, error: RillError) {
        let inner = &self.inner;
        let mut state = inner.state.lock();
        if state.done {
            hooks::on_error_dropped(&error);
            return;
        }
        state.done = true;
        let window = state.window.take();
        drop(state);

        if let Some(window) = window {
            window.error(error.clone());
        }
        inner.outer.on_error(error);
    }

    fn on_complete(&self) {
        let inner = &self.inner;
        let mut state = inner.state.lock();
        if state.done {
            return;
        }
        state.done = true;
        let window = state.window.take();
        drop(state);

        if let Some(window) = window {
            window.complete();
        }
        inner.outer.on_complete();
    }
}

impl<T: Send + Sync + 'static> Subscription for WindowSkip<T> {
    fn request(&self, n: u64) {
        if !demand::validate(n) {
            return;
        }
        let inner = &self.inner;
        let size = inner.size as u64;
        let skip = inner.skip as u64;
        if inner.first_request.fire() {
            let windows = size.saturating_mul(n);
            let gaps = (skip - size).saturating_mul(n - 1);
            inner.upstream.request(windows.saturating_add(gaps));
        } else {
            inner.upstream.request(skip.saturating_mul(n));
        }
    }

    fn cancel(&self) {
        if self.inner.cancel_once.fire() {
            self.inner.upstream.release();
        }
    }
}

impl<T> Clone for WindowSkip<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
