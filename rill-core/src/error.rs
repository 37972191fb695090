// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for rill reactive streaming.
//!
//! A single root [`RillError`] covers every failure a subscription can
//! observe: stream-level processing errors, queue-supplier contract
//! violations, window buffer overflow, single-subscriber violations and
//! wrapped user errors.
//!
//! Construction-time parameter errors (`size == 0`, `skip == 0`) are
//! programmer errors and panic at the call site instead of appearing here.

/// Root error type for all rill operations.
#[derive(Debug, thiserror::Error)]
pub enum RillError {
    /// Stream processing encountered an error.
    ///
    /// General-purpose variant for failures that don't fit a more specific
    /// category, and the variant test fixtures inject as an upstream error.
    #[error("Stream processing error: {context}")]
    StreamProcessing {
        /// Description of what went wrong during stream processing.
        context: String,
    },

    /// A queue supplier violated its contract by returning no queue.
    #[error("Queue supplier violation: {context}")]
    QueueSupplier {
        /// Which supplier failed and when.
        context: String,
    },

    /// A bounded window buffer rejected an element.
    ///
    /// Under the operator's own demand discipline this cannot happen; it is
    /// observable when a window is driven directly with an undersized buffer.
    #[error("Window buffer overflow: {context}")]
    Overflow {
        /// Which buffer overflowed.
        context: String,
    },

    /// A single-subscriber publisher received a second subscriber.
    #[error("Already subscribed: {context}")]
    AlreadySubscribed {
        /// Which publisher rejected the subscriber.
        context: String,
    },

    /// Custom error from user code.
    ///
    /// Wraps errors produced by user-provided sources and callbacks so they
    /// can be propagated through the rill error system.
    #[error("User error: {0}")]
    User(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RillError {
    /// Create a stream processing error with the given context.
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessing {
            context: context.into(),
        }
    }

    /// Create a queue-supplier contract violation with the given context.
    pub fn queue_supplier(context: impl Into<String>) -> Self {
        Self::QueueSupplier {
            context: context.into(),
        }
    }

    /// Create a buffer overflow error with the given context.
    pub fn overflow(context: impl Into<String>) -> Self {
        Self::Overflow {
            context: context.into(),
        }
    }

    /// Create a single-subscriber violation with the given context.
    pub fn already_subscribed(context: impl Into<String>) -> Self {
        Self::AlreadySubscribed {
            context: context.into(),
        }
    }

    /// Wrap a user error.
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::User(Box::new(error))
    }

    /// Check if this error indicates a contract violation (as opposed to a
    /// failure forwarded from user code or the upstream).
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::QueueSupplier { .. } | Self::Overflow { .. } | Self::AlreadySubscribed { .. }
        )
    }
}

/// Specialized Result type for rill operations.
pub type Result<T> = std::result::Result<T, RillError>;

impl Clone for RillError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessing { context } => Self::StreamProcessing {
                context: context.clone(),
            },
            Self::QueueSupplier { context } => Self::QueueSupplier {
                context: context.clone(),
            },
            Self::Overflow { context } => Self::Overflow {
                context: context.clone(),
            },
            Self::AlreadySubscribed { context } => Self::AlreadySubscribed {
                context: context.clone(),
            },
            // The boxed error cannot be cloned; carry its message instead.
            Self::User(e) => Self::StreamProcessing {
                context: format!("User error: {}", e),
            },
        }
    }
}
