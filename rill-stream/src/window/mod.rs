// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Window operator that re-chunks a stream into a stream of windows.
//!
//! This module provides the [`window`](WindowExt::window) family of
//! operators: they split one upstream sequence into a sequence of
//! [`UnicastWindow`]s, each of which is itself a publisher carrying up to
//! `size` elements. A second parameter, `skip`, sets the stride between
//! consecutive window starts, which selects one of three strategies:
//!
//! | Strategy | Condition | Shape |
//! |----------|-----------|-------|
//! | Exact    | `skip == size` | Contiguous, non-overlapping windows |
//! | Skip     | `skip > size`  | `skip − size` elements discarded between windows |
//! | Overlap  | `skip < size`  | Up to `⌈size/skip⌉` windows open at once |
//!
//! # Backpressure
//!
//! Demand flows on two channels: the outer subscriber requests *windows*,
//! each window's subscriber requests *elements*. Outer demand is translated
//! into an upstream element request; because the first window's `size`
//! elements overlap the first stride, the first request is translated
//! differently from subsequent ones (skip and overlap strategies).
//!
//! # Basic Usage
//!
//! ```
//! use futures::StreamExt;
//! use rill_core::IntoStream;
//! use rill_stream::prelude::*;
//! use rill_test_utils::TestSource;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = TestSource::<i32>::new();
//! let mut windows = source.clone().window(3).into_stream();
//!
//! for v in 1..=7 {
//!     source.emit(v);
//! }
//! source.complete();
//!
//! let first = windows.next().await.unwrap().unwrap();
//! let contents = first.into_stream().map(|i| i.unwrap()).collect::<Vec<_>>().await;
//! assert_eq!(contents, vec![1, 2, 3]);
//! # }
//! ```
//!
//! # Error Handling
//!
//! An upstream error is forwarded into every open window and then to the
//! outer subscriber. A queue supplier returning no queue fails the outer
//! subscriber and cancels upstream; nothing of the partial window is
//! observable.

mod exact;
mod overlap;
mod skip;

use crossbeam_queue::{ArrayQueue, SegQueue};
use exact::WindowExact;
use overlap::WindowOverlap;
use rill_core::{reject, Publisher, RillError, Subscriber, UnicastWindow};
use skip::WindowSkip;
use std::sync::Arc;

/// Factory for the bounded element buffer backing one window.
///
/// Invoked once per opened window. Returning `None` violates the supplier
/// contract and terminates the subscription with
/// [`RillError::QueueSupplier`].
pub type ElementQueueSupplier<T> = Arc<dyn Fn() -> Option<ArrayQueue<T>> + Send + Sync>;

/// Factory for the queue buffering ready-but-undelivered windows
/// (overlap strategy only). Invoked once per subscription, at subscribe
/// time.
pub type ReadyQueueSupplier<T> = Arc<dyn Fn() -> Option<SegQueue<UnicastWindow<T>>> + Send + Sync>;

/// A publisher of windows over `P`'s elements.
///
/// Created by the [`WindowExt`] methods. Subscribing picks the strategy
/// from `size` and `skip` and attaches the corresponding subscriber to the
/// source; the three strategies share no mutable state.
pub struct Windowed<P: Publisher> {
    source: P,
    size: usize,
    skip: usize,
    element_queues: ElementQueueSupplier<P::Item>,
    ready_queue: ReadyQueueSupplier<P::Item>,
}

impl<P> Windowed<P>
where
    P: Publisher,
    P::Item: Clone + Send + Sync + 'static,
{
    fn new(
        source: P,
        size: usize,
        skip: usize,
        element_queues: ElementQueueSupplier<P::Item>,
        ready_queue: ReadyQueueSupplier<P::Item>,
    ) -> Self {
        assert!(size >= 1, "window: size must be at least 1");
        assert!(skip >= 1, "window: skip must be at least 1");
        Self {
            source,
            size,
            skip,
            element_queues,
            ready_queue,
        }
    }
}

impl<P> Publisher for Windowed<P>
where
    P: Publisher,
    P::Item: Clone + Send + Sync + 'static,
{
    type Item = UnicastWindow<P::Item>;

    fn subscribe(&self, subscriber: Arc<dyn Subscriber<Self::Item>>) {
        if self.skip == self.size {
            self.source.subscribe(Arc::new(WindowExact::new(
                subscriber,
                self.size,
                self.element_queues.clone(),
            )));
        } else if self.skip > self.size {
            self.source.subscribe(Arc::new(WindowSkip::new(
                subscriber,
                self.size,
                self.skip,
                self.element_queues.clone(),
            )));
        } else {
            let ready = match (self.ready_queue)() {
                Some(queue) => queue,
                None => {
                    // Subscribe-time failure: the upstream is never touched.
                    reject(
                        &subscriber,
                        RillError::queue_supplier("ready-queue supplier returned no queue"),
                    );
                    return;
                }
            };
            self.source.subscribe(Arc::new(WindowOverlap::new(
                subscriber,
                self.size,
                self.skip,
                self.element_queues.clone(),
                ready,
            )));
        }
    }
}

/// Extension trait providing the [`window`](WindowExt::window) operators.
///
/// Implemented for every publisher whose element type can be fanned out
/// into overlapping windows (`Clone`) and shared across threads.
pub trait WindowExt: Publisher + Sized
where
    Self::Item: Clone + Send + Sync + 'static,
{
    /// Splits the stream into contiguous windows of `size` elements.
    ///
    /// Equivalent to [`window_with_skip`](Self::window_with_skip) with
    /// `skip == size`. The final window may hold fewer than `size` elements
    /// and is completed when the upstream completes.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    fn window(self, size: usize) -> Windowed<Self> {
        self.window_with_skip(size, size)
    }

    /// Splits the stream into windows of `size` elements, starting a new
    /// window every `skip` upstream elements.
    ///
    /// With `skip > size`, the `skip − size` elements between windows are
    /// consumed from upstream and discarded. With `skip < size`, windows
    /// overlap and every element is delivered to each of the up to
    /// `⌈size/skip⌉` currently open windows.
    ///
    /// # Panics
    ///
    /// Panics if `size` or `skip` is zero.
    fn window_with_skip(self, size: usize, skip: usize) -> Windowed<Self> {
        let element_queues: ElementQueueSupplier<Self::Item> =
            Arc::new(move || Some(ArrayQueue::new(size)));
        let ready_queue: ReadyQueueSupplier<Self::Item> = Arc::new(|| Some(SegQueue::new()));
        Windowed::new(self, size, skip, element_queues, ready_queue)
    }

    /// Full-control variant of [`window_with_skip`](Self::window_with_skip)
    /// with caller-provided queue suppliers.
    ///
    /// `element_queues` is invoked once per opened window and should return
    /// a queue of capacity `size`; `ready_queue` is invoked once per
    /// subscription in the overlap strategy and buffers windows that have
    /// been opened but not yet delivered downstream.
    ///
    /// # Panics
    ///
    /// Panics if `size` or `skip` is zero.
    fn window_with_suppliers(
        self,
        size: usize,
        skip: usize,
        element_queues: ElementQueueSupplier<Self::Item>,
        ready_queue: ReadyQueueSupplier<Self::Item>,
    ) -> Windowed<Self> {
        Windowed::new(self, size, skip, element_queues, ready_queue)
    }
}

impl<P> WindowExt for P
where
    P: Publisher + Sized,
    P::Item: Clone + Send + Sync + 'static,
{
}
