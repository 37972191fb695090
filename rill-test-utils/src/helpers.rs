// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::Stream;
use futures::stream::StreamExt;
use rill_core::StreamItem;
use std::fmt::Debug;
use std::time::Duration;
use tokio::time::sleep;

/// Asserts that `stream` emits nothing within `timeout_ms`.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
    T: Debug,
{
    tokio::select! {
        item = stream.next() => {
            panic!("Unexpected item emitted: {:?}, expected no output.", item);
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Asserts that `stream` ends within `timeout_ms`.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
    T: Debug,
{
    tokio::select! {
        item = stream.next() => {
            assert!(item.is_none(), "Expected end of stream, got: {:?}", item);
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("Stream did not end within {timeout_ms}ms");
        }
    }
}

/// Reads the next item from `stream`, panicking if nothing arrives within
/// `timeout_ms`.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> T
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        item = stream.next() => {
            item.expect("Stream ended while an item was expected")
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("No item emitted within {timeout_ms}ms");
        }
    }
}

/// Unwraps a `StreamItem::Value`, panicking on an error item.
pub fn unwrap_value<T>(item: StreamItem<T>) -> T {
    item.expect("Expected a value item")
}
