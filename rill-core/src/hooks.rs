// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Side channels for signals that cannot be delivered.
//!
//! The reactive-streams contract forbids signals after a terminal one and
//! demand requests of zero, but a subscription must survive receiving them.
//! Misbehaving peers are reported here instead of corrupting subscription
//! state: a dropped value or error is logged and discarded, never delivered
//! downstream.

use crate::error::RillError;

/// Reports an `on_next` that arrived after the subscription terminated.
///
/// The value is dropped. Only its type is reported; elements are not
/// required to be `Debug`.
pub fn on_next_dropped<T>(_item: &T) {
    crate::warn!(
        "rill: dropping on_next of {} received after terminal signal",
        std::any::type_name::<T>()
    );
}

/// Reports an `on_error` that arrived after the subscription terminated.
pub fn on_error_dropped(error: &RillError) {
    crate::error!("rill: dropping on_error received after terminal signal: {error}");
}

/// Reports a `request(0)` protocol violation.
pub fn on_invalid_request() {
    crate::warn!("rill: ignoring request(0); demand must be positive");
}

/// Reports a second `on_subscribe` on an already-subscribed subscriber.
pub fn on_duplicate_subscription() {
    crate::warn!("rill: subscription already set; cancelling the incoming subscription");
}
