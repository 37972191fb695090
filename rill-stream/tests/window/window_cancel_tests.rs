// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cancellation protocol tests: upstream must observe exactly one cancel,
//! and only once every interested party has let go.

use rill_core::Publisher;
use rill_stream::WindowExt;
use rill_test_utils::{TestSource, WindowCollector};

#[test]
fn upstream_cancel_waits_for_the_last_open_window() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source
        .clone()
        .window_with_skip(2, 1)
        .subscribe(collector.subscriber());

    // Act: two windows delivered, then the outer lets go.
    source.emit(1);
    source.emit(2);
    assert_eq!(collector.window_count(), 2);
    collector.cancel();

    // The second window is still open, so the upstream is not cancelled yet.
    assert_eq!(source.cancellations(), 0);

    // The element that closes the second window releases the last holder.
    source.emit(3);

    // Assert
    assert_eq!(source.cancellations(), 1);
    assert_eq!(collector.window_count(), 2);
    assert_eq!(collector.windows(), vec![vec![1, 2], vec![2, 3]]);
}

#[test]
fn cancel_with_no_open_window_cancels_upstream_directly() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source.clone().window(2).subscribe(collector.subscriber());

    // Act: the only window has already closed.
    source.emit(1);
    source.emit(2);
    collector.cancel();

    // Assert
    assert_eq!(source.cancellations(), 1);
}

#[test]
fn outer_cancel_is_idempotent() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source.clone().window(2).subscribe(collector.subscriber());
    source.emit(1);
    source.emit(2);

    // Act
    collector.cancel();
    collector.cancel();
    collector.cancel();

    // Assert
    assert_eq!(source.cancellations(), 1);
}

#[test]
fn no_window_opens_after_outer_cancel() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source
        .clone()
        .window_with_skip(2, 1)
        .subscribe(collector.subscriber());

    // Act
    source.emit(1);
    collector.cancel();
    source.emit(2);
    source.emit(3);

    // Assert: only the pre-cancel window exists; it still ran to its
    // element budget.
    assert_eq!(collector.window_count(), 1);
    assert_eq!(collector.windows(), vec![vec![1, 2]]);
    assert_eq!(source.cancellations(), 1);
}

#[test]
fn ready_windows_are_not_delivered_after_cancel() {
    // Arrange: zero outer demand keeps opened windows in the ready queue.
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::with_demand(0);
    source
        .clone()
        .window_with_skip(3, 1)
        .subscribe(collector.subscriber());

    // Act
    source.emit(1);
    source.emit(2);
    collector.cancel();
    collector.request(5);

    // Assert
    assert_eq!(collector.window_count(), 0);
    assert_eq!(collector.terminal_count(), 0);
}

#[test]
fn cancelling_a_window_subscriber_releases_its_holder() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source
        .clone()
        .window_with_skip(3, 3)
        .subscribe(collector.subscriber());

    // Act: open a window, cancel the outer, then cancel the window's own
    // subscriber instead of feeding it to its budget.
    source.emit(1);
    collector.cancel();
    assert_eq!(source.cancellations(), 0);

    let recorders = collector.window_recorders();
    recorders[0].cancel();

    // Assert: the orphaned window's cancel released the last holder.
    assert_eq!(source.cancellations(), 1);
}
