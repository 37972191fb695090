// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Demand-driven windowing for reactive streams.
//!
//! rill re-chunks a single asynchronous sequence into a sequence of smaller
//! asynchronous subsequences (*windows*) while honoring backpressure in
//! both directions. Each window is itself a publisher that downstream code
//! can subscribe to, and the stride between window starts selects the
//! strategy: contiguous, gapped or overlapping windows.
//!
//! This crate is a facade over the workspace members:
//!
//! - [`rill_core`]: publisher/subscriber vocabulary, demand accounting,
//!   lifecycle primitives, the unicast window publisher and the `futures`
//!   bridge.
//! - [`rill_stream`]: the [`window`](rill_stream::WindowExt::window)
//!   operator family.
//!
//! # Example
//!
//! ```
//! use futures::StreamExt;
//! use rill::prelude::*;
//! use rill_test_utils::TestSource;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = TestSource::<i32>::new();
//! let mut windows = source.clone().window_with_skip(3, 1).into_stream();
//!
//! for v in 1..=5 {
//!     source.emit(v);
//! }
//! source.complete();
//!
//! // The first overlapping window carries elements 1..=3.
//! let first = windows.next().await.unwrap().unwrap();
//! let contents = first.into_stream().map(|i| i.unwrap()).collect::<Vec<_>>().await;
//! assert_eq!(contents, vec![1, 2, 3]);
//! # }
//! ```

pub use rill_core::{
    demand, hooks, IntoStream, OnceLatch, Publisher, Result, RillError, SharedUpstream,
    SignalStream, StreamItem, Subscriber, Subscription, UnicastWindow,
};
pub use rill_stream::{ElementQueueSupplier, ReadyQueueSupplier, WindowExt, Windowed};

/// Convenience re-exports.
pub mod prelude {
    pub use rill_stream::prelude::*;
}
