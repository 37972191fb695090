// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core vocabulary for rill reactive streams.
//!
//! This crate holds everything the windowing operators build on:
//!
//! - The reactive-streams traits: [`Publisher`], [`Subscriber`],
//!   [`Subscription`] (see [`publisher`]).
//! - The root error type [`RillError`] and the in-band [`StreamItem`].
//! - Demand accounting that saturates at [`demand::UNBOUNDED`].
//! - Lifecycle primitives: [`OnceLatch`] and [`SharedUpstream`], which
//!   together guarantee that an upstream subscription is cancelled exactly
//!   once, when the last interested party lets go.
//! - [`UnicastWindow`], the hot single-subscriber publisher that carries one
//!   window of elements.
//! - [`IntoStream`], the bridge into the `futures` ecosystem.
//!
//! Side channels for late or invalid signals live in [`hooks`] and report
//! through the crate's logging shim (`tracing` behind the `tracing` feature,
//! stderr otherwise).

pub mod demand;
pub mod error;
pub mod hooks;
pub mod into_stream;
pub mod lifecycle;
mod logging;
pub mod publisher;
pub mod stream_item;
pub mod unicast;

// Re-export commonly used types
pub use error::{Result, RillError};
pub use into_stream::{IntoStream, SignalStream};
pub use lifecycle::{OnceLatch, SharedUpstream};
pub use publisher::{reject, reject_duplicate, InertSubscription, Publisher, Subscriber, Subscription};
pub use stream_item::StreamItem;
pub use unicast::UnicastWindow;
