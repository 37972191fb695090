// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared lifecycle primitives for window subscriptions.
//!
//! Two small building blocks carry the whole cancellation protocol:
//!
//! - [`OnceLatch`]: a one-shot CAS latch. Used to make outer cancellation
//!   idempotent and to distinguish the first demand request from subsequent
//!   ones.
//! - [`SharedUpstream`]: the upstream subscription slot fused with the
//!   active-holders counter. The outer subscriber holds one unit; every open
//!   window holds one. Upstream `cancel()` fires exactly once, either on the
//!   `1 → 0` edge of the counter or through a direct terminal cancel,
//!   whichever happens first.
//!
//! All state is atomic; none of the operations block.

use crate::publisher::Subscription;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// A one-shot latch.
///
/// `fire()` succeeds for exactly one caller over the lifetime of the latch.
///
/// # Example
///
/// ```
/// use rill_core::OnceLatch;
///
/// let latch = OnceLatch::new();
/// assert!(latch.fire());
/// assert!(!latch.fire());
/// assert!(latch.is_fired());
/// ```
#[derive(Debug, Default)]
pub struct OnceLatch {
    fired: AtomicBool,
}

impl OnceLatch {
    /// Creates a latch in the unfired state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// Attempts to fire the latch. Returns `true` for the single caller
    /// that wins the race.
    pub fn fire(&self) -> bool {
        self.fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Returns `true` once the latch has fired.
    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

struct UpstreamState {
    slot: Mutex<Option<Arc<dyn Subscription>>>,
    holders: AtomicUsize,
    cancel_once: OnceLatch,
}

/// The upstream subscription shared between an outer subscriber and the
/// windows it has opened.
///
/// Cheap to clone; all clones share the same slot and counter. The slot is
/// set once by `on_subscribe`; a second set is refused so the caller can
/// cancel the incoming duplicate.
pub struct SharedUpstream {
    inner: Arc<UpstreamState>,
}

impl SharedUpstream {
    /// Creates a handle with `initial` active holders.
    ///
    /// Window subscribers start at one: the unit held by the outer
    /// subscriber itself.
    #[must_use]
    pub fn with_holders(initial: usize) -> Self {
        Self {
            inner: Arc::new(UpstreamState {
                slot: Mutex::new(None),
                holders: AtomicUsize::new(initial),
                cancel_once: OnceLatch::new(),
            }),
        }
    }

    /// Stores the upstream subscription. Returns `false` if a subscription
    /// is already present, leaving the existing one in place.
    pub fn set(&self, subscription: Arc<dyn Subscription>) -> bool {
        let mut slot = self.inner.slot.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(subscription);
        true
    }

    /// Forwards a demand request to the upstream subscription, if set.
    pub fn request(&self, n: u64) {
        let subscription = self.inner.slot.lock().clone();
        if let Some(s) = subscription {
            s.request(n);
        }
    }

    /// Adds one active holder.
    pub fn acquire(&self) {
        self.inner.holders.fetch_add(1, Ordering::AcqRel);
    }

    /// Releases one active holder. When the count reaches zero the upstream
    /// subscription is cancelled.
    pub fn release(&self) {
        let previous = self.inner.holders.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "active holder count underflow");
        if previous == 1 {
            self.cancel_upstream();
        }
    }

    /// Cancels the upstream subscription directly, bypassing the holder
    /// count. At most one cancel ever reaches the upstream, no matter how
    /// this races with [`release`](Self::release).
    pub fn cancel_upstream(&self) {
        if self.inner.cancel_once.fire() {
            let subscription = self.inner.slot.lock().clone();
            if let Some(s) = subscription {
                s.cancel();
            }
        }
    }

    /// Returns `true` once the upstream has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancel_once.is_fired()
    }
}

impl Clone for SharedUpstream {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
