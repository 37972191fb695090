// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tests for overlapping windows (`skip < size`).

use rill_core::Publisher;
use rill_stream::WindowExt;
use rill_test_utils::{TestSource, WindowCollector};

#[test]
fn sliding_windows_share_elements() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source
        .clone()
        .window_with_skip(3, 1)
        .subscribe(collector.subscriber());

    // Act
    for v in 1..=5 {
        source.emit(v);
    }
    source.complete();

    // Assert: a window opens on every element; the trailing ones are short.
    assert_eq!(
        collector.windows(),
        vec![
            vec![1, 2, 3],
            vec![2, 3, 4],
            vec![3, 4, 5],
            vec![4, 5],
            vec![5]
        ]
    );
    assert!(collector.is_completed());
}

#[test]
fn full_windows_complete_at_size_short_windows_at_completion() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source
        .clone()
        .window_with_skip(3, 1)
        .subscribe(collector.subscriber());

    // Act
    for v in 1..=5 {
        source.emit(v);
    }

    // Assert: three windows have hit their element budget so far.
    let recorders = collector.window_recorders();
    assert_eq!(recorders.len(), 5);
    assert!(recorders[0].is_completed());
    assert!(recorders[1].is_completed());
    assert!(recorders[2].is_completed());
    assert!(!recorders[3].is_completed());
    assert!(!recorders[4].is_completed());

    source.complete();
    for recorder in collector.window_recorders() {
        assert!(recorder.is_completed());
        assert_eq!(recorder.terminal_count(), 1);
    }
}

#[test]
fn stride_two_overlap() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source
        .clone()
        .window_with_skip(4, 2)
        .subscribe(collector.subscriber());

    // Act
    for v in 1..=8 {
        source.emit(v);
    }
    source.complete();

    // Assert
    assert_eq!(
        collector.windows(),
        vec![
            vec![1, 2, 3, 4],
            vec![3, 4, 5, 6],
            vec![5, 6, 7, 8],
            vec![7, 8]
        ]
    );
}

#[test]
fn window_delivery_waits_for_outer_demand() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::with_demand(1);
    source
        .clone()
        .window_with_skip(2, 1)
        .subscribe(collector.subscriber());

    // Act & Assert
    source.emit(1);
    assert_eq!(collector.window_count(), 1);

    // The second window opens but stays in the ready queue.
    source.emit(2);
    assert_eq!(collector.window_count(), 1);

    collector.request(1);
    assert_eq!(collector.window_count(), 2);
    assert_eq!(collector.windows(), vec![vec![1, 2], vec![2]]);
}

#[test]
fn enqueued_windows_are_flushed_before_completion() {
    // Arrange: the outer subscriber asks for nothing up front.
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::with_demand(0);
    source
        .clone()
        .window_with_skip(2, 1)
        .subscribe(collector.subscriber());

    // Act
    source.emit(1);
    source.emit(2);
    source.emit(3);
    source.complete();
    assert_eq!(collector.window_count(), 0);
    assert!(!collector.is_completed());

    collector.request(10);

    // Assert: all three windows arrive, fully replayable, then completion.
    assert_eq!(
        collector.windows(),
        vec![vec![1, 2], vec![2, 3], vec![3]]
    );
    assert!(collector.is_completed());
}

#[test]
fn dispatch_with_equal_size_and_skip_behaves_like_exact() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source
        .clone()
        .window_with_skip(2, 2)
        .subscribe(collector.subscriber());

    // Act
    for v in 1..=6 {
        source.emit(v);
    }
    source.complete();

    // Assert
    assert_eq!(
        collector.windows(),
        vec![vec![1, 2], vec![3, 4], vec![5, 6]]
    );
}
