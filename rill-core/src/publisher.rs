// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The reactive-streams vocabulary used throughout rill.
//!
//! Three traits mirror the reactive-streams contract:
//!
//! - [`Publisher`] produces a sequence of items for a [`Subscriber`]. Like
//!   `futures::Stream`, the item type is an associated type.
//! - [`Subscriber`] consumes items. Like `futures::Sink`, the item type is a
//!   generic parameter, so one type can subscribe to several element types.
//! - [`Subscription`] is the demand channel handed to a subscriber: it
//!   accepts `request(n)` and `cancel()`.
//!
//! The contract assumed everywhere in this workspace: `on_subscribe`,
//! `on_next`, `on_error` and `on_complete` are externally serialized per
//! subscription, `on_next` is never invoked beyond the outstanding requested
//! demand, and no signal follows a terminal one. `request` and `cancel` may
//! race with upstream signals and with each other; implementations in this
//! workspace are written to tolerate that.

use crate::error::RillError;
use crate::hooks;
use std::sync::Arc;

/// A source of an asynchronous sequence of items.
pub trait Publisher {
    /// The type of items this publisher emits.
    type Item;

    /// Attaches `subscriber` to this publisher.
    ///
    /// The publisher must call `on_subscribe` exactly once before any other
    /// signal. Whether multiple subscribers are accepted is up to the
    /// implementation; single-subscriber publishers reject the second
    /// subscriber through [`reject`].
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<Self::Item>>);
}

/// A consumer of an asynchronous sequence of items.
pub trait Subscriber<T>: Send + Sync {
    /// Receives the subscription for this attachment. Called exactly once,
    /// before any other signal.
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>);

    /// Receives the next item. Never called beyond the requested demand.
    fn on_next(&self, item: T);

    /// Receives a terminal error. No further signals follow.
    fn on_error(&self, error: RillError);

    /// Receives normal completion. No further signals follow.
    fn on_complete(&self);
}

/// The demand channel between a subscriber and its publisher.
pub trait Subscription: Send + Sync {
    /// Requests `n` more items. `n == 0` is a protocol violation and is
    /// routed to the validation side channel instead of corrupting state.
    fn request(&self, n: u64);

    /// Releases the subscriber's interest. Idempotent.
    fn cancel(&self);
}

/// A subscription that does nothing.
///
/// Handed to subscribers that are failed before any real subscription
/// exists, so that the `on_subscribe`-before-`on_error` ordering of the
/// contract still holds.
pub struct InertSubscription;

impl Subscription for InertSubscription {
    fn request(&self, n: u64) {
        // Demand on an inert subscription is meaningless but must still be
        // validated, so bogus values reach the side channel.
        let _ = crate::demand::validate(n);
    }

    fn cancel(&self) {}
}

/// Fails `subscriber` immediately, without involving any upstream.
///
/// Sends an inert subscription followed by `error`. Used for subscribe-time
/// failures such as a ready-queue supplier returning no queue.
pub fn reject<T>(subscriber: &Arc<dyn Subscriber<T>>, error: RillError) {
    subscriber.on_subscribe(Arc::new(InertSubscription));
    subscriber.on_error(error);
}

/// Validates a late `on_subscribe` against an already-occupied slot.
///
/// The incoming subscription is cancelled and the event reported to the
/// side channel; the existing subscription stays in place.
pub fn reject_duplicate(incoming: &Arc<dyn Subscription>) {
    hooks::on_duplicate_subscription();
    incoming.cancel();
}
