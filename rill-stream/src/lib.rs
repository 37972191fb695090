// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Demand-driven window operators for rill.
//!
//! This crate re-chunks a single reactive stream into a stream of
//! [`UnicastWindow`](rill_core::UnicastWindow)s while honoring backpressure
//! in both directions: toward the upstream producer and toward the
//! subscriber consuming the windows.
//!
//! The entry point is the [`WindowExt`] extension trait:
//!
//! - [`window(size)`](WindowExt::window): contiguous windows.
//! - [`window_with_skip(size, skip)`](WindowExt::window_with_skip): gapped
//!   (`skip > size`) or overlapping (`skip < size`) windows.
//! - [`window_with_suppliers`](WindowExt::window_with_suppliers): full
//!   control over the backing queues.
//!
//! See the [`window`] module documentation for strategy selection, demand
//! translation and error semantics.

pub mod prelude;
pub mod window;

pub use window::{ElementQueueSupplier, ReadyQueueSupplier, WindowExt, Windowed};
