// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::cell::RefCell;
use std::rc::Rc;
use tempo_stream::{ConsumerSubscriber, Flow, Publisher};
use tempo_test_utils::CollectingSubscriber;

#[test]
fn test_filter_then_map_pipeline() -> anyhow::Result<()> {
    // Arrange
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let source = Flow::from(Publisher::new())
        .filter(|x: &i32| x % 2 == 0)
        .map(|x| x * 2)
        .to_each(move |x| sink.borrow_mut().push(x))
        .build()?;

    // Act
    for i in 1..=10 {
        source.submit(i);
    }
    source.close();
    source.start()?;

    // Assert
    assert_eq!(*seen.borrow(), vec![4, 8, 12, 16, 20]);
    Ok(())
}

#[test]
fn test_ping_pong_with_demand_one() -> anyhow::Result<()> {
    // Arrange - the consumer feeds each element back into the source until
    // the count reaches ten
    let source: Publisher<i32> = Publisher::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let sink = seen.clone();
    let echo = source.clone();
    let consumer = ConsumerSubscriber::new(move |element: i32| {
        sink.borrow_mut().push(element);
        if element < 10 {
            echo.submit(element + 1);
        }
        Ok(())
    });
    source.subscribe(consumer.into_shared())?;

    // Act
    source.submit(1);
    source.start()?;

    // Assert
    assert_eq!(*seen.borrow(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    Ok(())
}

#[test]
fn test_skip_and_take_compose() -> anyhow::Result<()> {
    // Arrange
    let collector = CollectingSubscriber::unbounded();
    let source = Flow::from(Publisher::new())
        .skip(2)
        .take(3)
        .to(collector.clone())
        .build()?;

    // Act
    for i in 1..=10 {
        source.submit(i);
    }
    source.close();
    source.start()?;

    // Assert
    assert_eq!(collector.borrow().items(), &[3, 4, 5]);
    assert_eq!(collector.borrow().completions(), 1);
    Ok(())
}

#[test]
fn test_grep_is_an_alias_for_filter() -> anyhow::Result<()> {
    // Arrange
    let collector = CollectingSubscriber::unbounded();
    let source = Flow::from(Publisher::new())
        .grep(|x: &i32| *x > 3)
        .to(collector.clone())
        .build()?;

    // Act
    for i in 1..=5 {
        source.submit(i);
    }
    source.close();
    source.start()?;

    // Assert
    assert_eq!(collector.borrow().items(), &[4, 5]);
    Ok(())
}

#[test]
fn test_terminal_consumer_with_configurable_request_size() -> anyhow::Result<()> {
    // Arrange
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let source = Flow::from(Publisher::new())
        .map(|x: i32| x + 100)
        .to_each_with_request(move |x| sink.borrow_mut().push(x), 4)
        .build()?;

    // Act
    for i in 1..=4 {
        source.submit(i);
    }
    source.close();
    source.start()?;

    // Assert
    assert_eq!(*seen.borrow(), vec![101, 102, 103, 104]);
    Ok(())
}

#[test]
fn test_reusing_a_wired_publisher_surfaces_at_build() {
    // Arrange - the source is already wired into a pipeline
    let source: Publisher<i32> = Publisher::new();
    let _first = Flow::from(source.clone())
        .map(|x| x + 1)
        .to_each(|_| {})
        .build()
        .unwrap();

    // Act - subscribing the same publisher again must fail, fluently
    let result = Flow::from(source).map(|x| x + 2).to_each(|_| {}).build();

    // Assert
    assert!(result.unwrap_err().is_contract_violation());
}

#[test]
fn test_build_returns_the_head_publisher() -> anyhow::Result<()> {
    // Arrange
    let origin: Publisher<i32> = Publisher::new();
    let built = Flow::from(origin.clone()).map(|x| x * 2).to_each(|_| {}).build()?;

    // Assert - driving the returned head drives the original source
    assert!(origin.executor().same_executor(&built.executor()));
    Ok(())
}
