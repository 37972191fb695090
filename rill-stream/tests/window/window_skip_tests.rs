// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tests for gapped windows (`skip > size`).

use rill_core::Publisher;
use rill_stream::WindowExt;
use rill_test_utils::{TestSource, WindowCollector};

#[test]
fn elements_between_windows_are_discarded() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source
        .clone()
        .window_with_skip(3, 5)
        .subscribe(collector.subscriber());

    // Act
    for v in 1..=8 {
        source.emit(v);
    }
    source.complete();

    // Assert: elements 4 and 5 fall into the gap.
    assert_eq!(collector.windows(), vec![vec![1, 2, 3], vec![6, 7, 8]]);
    assert!(collector.is_completed());
}

#[test]
fn window_completes_at_size_before_the_gap_ends() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source
        .clone()
        .window_with_skip(2, 4)
        .subscribe(collector.subscriber());

    // Act: the first window closes on its second element, while the
    // upstream is still inside the first stride.
    source.emit(1);
    source.emit(2);

    // Assert
    let recorders = collector.window_recorders();
    assert_eq!(recorders.len(), 1);
    assert_eq!(recorders[0].items(), vec![1, 2]);
    assert!(recorders[0].is_completed());

    // The gap elements open nothing.
    source.emit(3);
    source.emit(4);
    assert_eq!(collector.window_count(), 1);

    source.emit(5);
    assert_eq!(collector.window_count(), 2);
}

#[test]
fn completion_mid_window_closes_the_short_window() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source
        .clone()
        .window_with_skip(3, 5)
        .subscribe(collector.subscriber());

    // Act
    source.emit(1);
    source.emit(2);
    source.complete();

    // Assert
    assert_eq!(collector.windows(), vec![vec![1, 2]]);
    let recorders = collector.window_recorders();
    assert!(recorders[0].is_completed());
    assert!(collector.is_completed());
}

#[test]
fn completion_mid_gap_emits_nothing_extra() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source
        .clone()
        .window_with_skip(2, 4)
        .subscribe(collector.subscriber());

    // Act
    source.emit(1);
    source.emit(2);
    source.emit(3);
    source.complete();

    // Assert: element 3 was consumed by the gap and is gone.
    assert_eq!(collector.windows(), vec![vec![1, 2]]);
    assert!(collector.is_completed());
}

#[test]
fn first_request_of_n_yields_exactly_n_windows() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::with_demand(3);
    source
        .clone()
        .window_with_skip(2, 5)
        .subscribe(collector.subscriber());

    // The first request covers three windows plus two full gaps.
    assert_eq!(source.requests(), vec![12]);

    // Act: feed exactly the requested demand.
    for v in 1..=12 {
        source.emit(v);
    }
    source.complete();

    // Assert
    assert_eq!(
        collector.windows(),
        vec![vec![1, 2], vec![6, 7], vec![11, 12]]
    );
    assert_eq!(collector.window_count(), 3);
}
