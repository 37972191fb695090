// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Convenience re-exports for working with rill streams.
//!
//! ```
//! use rill_stream::prelude::*;
//! ```

pub use crate::window::{WindowExt, Windowed};
pub use rill_core::{
    IntoStream, Publisher, Result, RillError, StreamItem, Subscriber, Subscription, UnicastWindow,
};
