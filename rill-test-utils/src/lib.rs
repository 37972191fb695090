// Copyright 2025 Umberto Gotti
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
pub mod helpers;
pub mod recording;
pub mod test_source;
pub mod window_collector;

// Re-export commonly used test utilities
pub use helpers::{assert_no_element_emitted, assert_stream_ended, unwrap_stream, unwrap_value};
pub use recording::RecordingSubscriber;
pub use test_source::{SubscriptionProbe, TestSource};
pub use window_collector::WindowCollector;
