// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tests for contiguous windows (`skip == size`).

use rill_core::Publisher;
use rill_stream::WindowExt;
use rill_test_utils::{TestSource, WindowCollector};

#[test]
fn chops_the_stream_into_exact_windows() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source.clone().window(3).subscribe(collector.subscriber());

    // Act
    for v in 1..=8 {
        source.emit(v);
    }
    source.complete();

    // Assert: the trailing window is short and closed by completion.
    assert_eq!(
        collector.windows(),
        vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8]]
    );
    assert!(collector.is_completed());
    assert_eq!(collector.terminal_count(), 1);
}

#[test]
fn every_window_terminates_exactly_once() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source.clone().window(3).subscribe(collector.subscriber());

    // Act
    for v in 1..=8 {
        source.emit(v);
    }
    source.complete();

    // Assert
    for recorder in collector.window_recorders() {
        assert!(recorder.is_completed());
        assert_eq!(recorder.terminal_count(), 1);
    }
}

#[test]
fn windows_are_delivered_as_they_open() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source.clone().window(3).subscribe(collector.subscriber());

    // Act & Assert: the window handle arrives with its first element.
    source.emit(1);
    assert_eq!(collector.window_count(), 1);
    assert_eq!(collector.windows(), vec![vec![1]]);

    source.emit(2);
    source.emit(3);
    assert_eq!(collector.window_count(), 1);

    source.emit(4);
    assert_eq!(collector.window_count(), 2);
}

#[test]
fn concatenating_windows_recovers_the_input() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source.clone().window(4).subscribe(collector.subscriber());

    // Act
    let input: Vec<i32> = (1..=10).collect();
    for v in &input {
        source.emit(*v);
    }
    source.complete();

    // Assert
    let concatenated: Vec<i32> = collector.windows().into_iter().flatten().collect();
    assert_eq!(concatenated, input);
}

#[test]
fn empty_upstream_completes_with_no_windows() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source.clone().window(3).subscribe(collector.subscriber());

    // Act
    source.complete();

    // Assert
    assert_eq!(collector.window_count(), 0);
    assert!(collector.is_completed());
}

#[test]
fn size_one_wraps_every_element() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::new();
    source.clone().window(1).subscribe(collector.subscriber());

    // Act
    source.emit(1);
    source.emit(2);
    source.emit(3);
    source.complete();

    // Assert
    assert_eq!(collector.windows(), vec![vec![1], vec![2], vec![3]]);
}

#[test]
#[should_panic(expected = "size must be at least 1")]
fn zero_size_panics() {
    let source = TestSource::<i32>::new();
    let _ = source.window(0);
}
