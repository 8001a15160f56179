// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use tempo_core::TempoError;
use tempo_stream::{zip, Publisher};
use tempo_test_utils::{settle, CollectingSubscriber};

#[test]
fn test_zip_pairs_elements_with_the_combiner() -> anyhow::Result<()> {
    // Arrange
    let left = Publisher::new();
    let right = Publisher::new();
    let zipped = zip(vec![left.clone(), right.clone()], |values| {
        values[0] + values[1]
    })?;

    let collector = CollectingSubscriber::unbounded();
    zipped.subscribe(collector.clone())?;

    // Act
    for i in 1..=3 {
        left.submit(i);
    }
    for i in [10, 20, 30] {
        right.submit(i);
    }
    left.close();
    right.close();
    settle(&[left.executor(), right.executor()])?;

    // Assert - pairings in strict insertion order
    assert_eq!(collector.borrow().items(), &[11, 22, 33]);
    assert_eq!(collector.borrow().completions(), 1);
    Ok(())
}

#[test]
fn test_zip_with_uneven_sources_drops_nothing_and_completes() -> anyhow::Result<()> {
    // Arrange
    let left = Publisher::new();
    let right = Publisher::new();
    let zipped = zip(vec![left.clone(), right.clone()], |values| {
        values[0] + values[1]
    })?;

    let collector = CollectingSubscriber::unbounded();
    zipped.subscribe(collector.clone())?;

    // Act - five elements against four
    for i in 1..=5 {
        left.submit(i);
    }
    for i in 10..=13 {
        right.submit(i);
    }
    left.close();
    right.close();
    settle(&[left.executor(), right.executor()])?;

    // Assert - every possible pair was emitted, then exactly one completion
    assert_eq!(collector.borrow().items(), &[11, 13, 15, 17]);
    assert_eq!(collector.borrow().completions(), 1);
    Ok(())
}

#[test]
fn test_zip_with_an_empty_source_completes_without_output() -> anyhow::Result<()> {
    // Arrange
    let left = Publisher::new();
    let right: Publisher<i32> = Publisher::new();
    let zipped = zip(vec![left.clone(), right.clone()], |values| {
        values.iter().sum::<i32>()
    })?;

    let collector = CollectingSubscriber::unbounded();
    zipped.subscribe(collector.clone())?;

    // Act
    for i in 1..=5 {
        left.submit(i);
    }
    left.close();
    right.close();
    settle(&[left.executor(), right.executor()])?;

    // Assert
    assert!(collector.borrow().items().is_empty());
    assert_eq!(collector.borrow().completions(), 1);
    Ok(())
}

#[test]
fn test_zip_three_sources_pairs_in_index_order() -> anyhow::Result<()> {
    // Arrange
    let sources: Vec<Publisher<i32>> = (0..3).map(|_| Publisher::new()).collect();
    let zipped = zip(sources.clone(), |values| {
        values[0] * 100 + values[1] * 10 + values[2]
    })?;

    let collector = CollectingSubscriber::unbounded();
    zipped.subscribe(collector.clone())?;

    // Act
    for (offset, source) in sources.iter().enumerate() {
        source.submit(1 + offset as i32);
        source.submit(4 + offset as i32);
        source.close();
    }
    let executors: Vec<_> = sources.iter().map(Publisher::executor).collect();
    settle(&executors)?;

    // Assert
    assert_eq!(collector.borrow().items(), &[123, 456]);
    assert_eq!(collector.borrow().completions(), 1);
    Ok(())
}

#[test]
fn test_zip_source_error_is_forwarded_and_cancels_siblings() -> anyhow::Result<()> {
    // Arrange
    let failing = Publisher::new();
    let healthy = Publisher::new();
    let zipped = zip(vec![failing.clone(), healthy.clone()], |values| {
        values[0] + values[1]
    })?;

    let collector = CollectingSubscriber::unbounded();
    zipped.subscribe(collector.clone())?;

    // Act
    healthy.submit(1);
    failing.fail(TempoError::contract_violation("left broke"));
    settle(&[failing.executor(), healthy.executor()])?;

    // Assert
    assert_eq!(collector.borrow().errors().len(), 1);
    assert_eq!(collector.borrow().completions(), 0);
    assert!(healthy.subscription().is_none());
    Ok(())
}
