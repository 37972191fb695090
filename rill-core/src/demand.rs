// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Atomic demand accounting.
//!
//! Outstanding demand is a `u64` that saturates at [`UNBOUNDED`]: once a
//! subscriber has requested effectively-infinite demand, further arithmetic
//! must not wrap it back into the finite range. Producers subtract what they
//! emitted only while the counter is finite.

use std::sync::atomic::{AtomicU64, Ordering};

/// Demand value treated as "effectively unbounded".
pub const UNBOUNDED: u64 = u64::MAX;

/// Validates a demand request.
///
/// Returns `false` and reports to the side channel for `n == 0`; a valid
/// request returns `true`.
#[must_use]
pub fn validate(n: u64) -> bool {
    if n == 0 {
        crate::hooks::on_invalid_request();
        return false;
    }
    true
}

/// Adds `n` to `requested`, saturating at [`UNBOUNDED`].
///
/// Returns the previous value, so callers can detect the transition from
/// zero demand.
pub fn add_cap(requested: &AtomicU64, n: u64) -> u64 {
    let mut current = requested.load(Ordering::Relaxed);
    loop {
        if current == UNBOUNDED {
            return current;
        }
        let next = current.saturating_add(n);
        match requested.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(previous) => return previous,
            Err(actual) => current = actual,
        }
    }
}

/// Subtracts `emitted` items from `requested`.
///
/// Must only be called with `emitted` no larger than the finite demand the
/// caller observed; unbounded demand is never decremented.
pub fn produced(requested: &AtomicU64, emitted: u64) {
    requested.fetch_sub(emitted, Ordering::AcqRel);
}
