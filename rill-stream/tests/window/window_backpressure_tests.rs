// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Demand translation and drain serialization tests.

use rill_core::{demand, Publisher};
use rill_stream::WindowExt;
use rill_test_utils::{TestSource, WindowCollector};
use std::thread;

#[test]
fn exact_translates_windows_to_elements() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::with_demand(2);
    source.clone().window(3).subscribe(collector.subscriber());

    // Act & Assert
    assert_eq!(source.requests(), vec![6]);

    collector.request(4);
    assert_eq!(source.requests(), vec![6, 12]);
}

#[test]
fn exact_unbounded_demand_saturates() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::with_demand(demand::UNBOUNDED);

    // Act
    source.clone().window(3).subscribe(collector.subscriber());

    // Assert
    assert_eq!(source.requests(), vec![demand::UNBOUNDED]);
}

#[test]
fn skip_first_request_covers_windows_and_gaps() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::with_demand(2);
    source
        .clone()
        .window_with_skip(3, 5)
        .subscribe(collector.subscriber());

    // Act & Assert: first 3·2 + 2·1, then stride-aligned 5·n.
    assert_eq!(source.requests(), vec![8]);

    collector.request(2);
    assert_eq!(source.requests(), vec![8, 10]);

    collector.request(1);
    assert_eq!(source.requests(), vec![8, 10, 5]);
}

#[test]
fn skip_first_request_of_one_asks_one_window() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::with_demand(1);

    // Act: with n = 1 the gap term vanishes.
    source
        .clone()
        .window_with_skip(3, 7)
        .subscribe(collector.subscriber());

    // Assert
    assert_eq!(source.requests(), vec![3]);
}

#[test]
fn overlap_first_request_covers_first_window_plus_strides() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::with_demand(3);
    source
        .clone()
        .window_with_skip(4, 2)
        .subscribe(collector.subscriber());

    // Act & Assert: 4 + 2·2 first, then 2·n.
    assert_eq!(source.requests(), vec![8]);

    collector.request(3);
    assert_eq!(source.requests(), vec![8, 6]);
}

#[test]
fn request_zero_is_rejected_without_effect() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::with_demand(1);
    source
        .clone()
        .window_with_skip(2, 1)
        .subscribe(collector.subscriber());
    assert_eq!(source.requests(), vec![2]);

    // Act
    collector.request(0);

    // Assert: nothing reached the upstream and the subscription still works.
    assert_eq!(source.requests(), vec![2]);
    source.emit(1);
    assert_eq!(collector.window_count(), 1);
}

#[test]
fn no_window_is_emitted_beyond_outer_demand() {
    // Arrange
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::with_demand(2);
    source
        .clone()
        .window_with_skip(2, 1)
        .subscribe(collector.subscriber());

    // Act: open five windows worth of elements.
    for v in 1..=5 {
        source.emit(v);
    }

    // Assert: only the requested two were delivered; the rest wait.
    assert_eq!(collector.window_count(), 2);

    collector.request(1);
    assert_eq!(collector.window_count(), 3);
}

#[test]
fn drain_survives_concurrent_producer_and_consumer() {
    // Arrange
    const ELEMENTS: i32 = 200;
    let source = TestSource::<i32>::new();
    let collector = WindowCollector::with_demand(1);
    source
        .clone()
        .window_with_skip(2, 1)
        .subscribe(collector.subscriber());

    // Act: one thread floods elements while this thread trickles demand.
    let producer = {
        let source = source.clone();
        thread::spawn(move || {
            for v in 1..=ELEMENTS {
                source.emit(v);
            }
            source.complete();
        })
    };

    while !collector.is_completed() {
        collector.request(4);
        thread::yield_now();
    }
    producer.join().unwrap();

    // Assert: every element opened a window, delivered FIFO and intact.
    let windows = collector.windows();
    assert_eq!(windows.len(), ELEMENTS as usize);
    for (i, window) in windows.iter().enumerate() {
        assert_eq!(window[0], i as i32 + 1);
        assert!(window.len() <= 2);
    }
    for recorder in collector.window_recorders() {
        assert_eq!(recorder.terminal_count(), 1);
    }
    assert_eq!(collector.terminal_count(), 1);
}
