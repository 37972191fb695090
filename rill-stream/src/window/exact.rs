// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Exact strategy: contiguous, non-overlapping windows (`skip == size`).

use super::ElementQueueSupplier;
use parking_lot::Mutex;
use rill_core::{
    demand, hooks, reject_duplicate, OnceLatch, RillError, SharedUpstream, Subscriber,
    Subscription, UnicastWindow,
};
use std::sync::Arc;

struct ExactState<T> {
    index: usize,
    window: Option<UnicastWindow<T>>,
    done: bool,
}

struct ExactInner<T> {
    outer: Arc<dyn Subscriber<UnicastWindow<T>>>,
    element_queues: ElementQueueSupplier<T>,
    size: usize,
    upstream: SharedUpstream,
    cancel_once: OnceLatch,
    state: Mutex<ExactState<T>>,
}

/// Subscriber that chops the upstream into windows of exactly `size`
/// elements, one open at a time.
///
/// Windows are emitted to the outer subscriber the moment they open, so the
/// outer request translation is simply `size ⊗ n`: requesting `n` windows
/// requests `size · n` elements upstream (saturating).
pub(super) struct WindowExact<T> {
    inner: Arc<ExactInner<T>>,
}

impl<T: Send + Sync + 'static> WindowExact<T> {
    pub(super) fn new(
        outer: Arc<dyn Subscriber<UnicastWindow<T>>>,
        size: usize,
        element_queues: ElementQueueSupplier<T>,
    ) -> Self {
        Self {
            inner: Arc::new(ExactInner {
                outer,
                element_queues,
                size,
                // One holder for the outer subscriber; each open window
                // acquires another.
                upstream: SharedUpstream::with_holders(1),
                cancel_once: OnceLatch::new(),
                state: Mutex::new(ExactState {
                    index: 0,
                    window: None,
                    done: false,
                }),
            }),
        }
    }
}

impl<T: Send + Sync + 'static> Subscriber<T> for WindowExact<T> {
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

        let mut i = state.index;
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

        i += 1;

        if let Some(ref window) = state.window {
            window.push(item);
        }

        if i == inner.size {
            state.index = 0;
            if let Some(window) = state.window.take() {
                window.complete();
            }
        } else {
            state.index = i;
        }
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

impl<T: Send + Sync + 'static> Subscription for WindowExact<T> {
    fn request(&self, n: u64) {
        if demand::validate(n) {
            let elements = (self.inner.size as u64).saturating_mul(n);
            self.inner.upstream.request(elements);
        }
    }

    fn cancel(&self) {
        if self.inner.cancel_once.fire() {
            self.inner.upstream.release();
        }
    }
}

impl<T> Clone for WindowExact<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
