// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::cell::RefCell;
use std::rc::Rc;
use tempo_stream::Publisher;
use tempo_test_utils::{CollectingSubscriber, StreamEvent};

#[test]
fn test_items_submitted_before_subscribe_are_delivered_in_order() -> anyhow::Result<()> {
    // Arrange
    let publisher = Publisher::new();
    for i in 1..=5 {
        publisher.submit(i);
    }

    // Act
    let collector = CollectingSubscriber::unbounded();
    publisher.subscribe(collector.clone())?;
    publisher.start()?;

    // Assert
    assert_eq!(collector.borrow().items(), &[1, 2, 3, 4, 5]);
    Ok(())
}

#[test]
fn test_submit_close_delivers_everything_then_completes() -> anyhow::Result<()> {
    // Arrange
    let publisher = Publisher::new();
    let collector = CollectingSubscriber::unbounded();
    publisher.subscribe(collector.clone())?;

    // Act
    for i in 1..=3 {
        publisher.submit(i);
    }
    publisher.close();
    publisher.start()?;

    // Assert - completion strictly after the final element
    assert_eq!(
        collector.borrow().events(),
        &[
            StreamEvent::Next(1),
            StreamEvent::Next(2),
            StreamEvent::Next(3),
            StreamEvent::Completed,
        ]
    );
    Ok(())
}

#[test]
fn test_close_before_subscribe_still_drains_the_buffer_first() -> anyhow::Result<()> {
    // Arrange
    let publisher = Publisher::new();
    publisher.submit("buffered");
    publisher.close();

    // Act
    let collector = CollectingSubscriber::unbounded();
    publisher.subscribe(collector.clone())?;
    publisher.start()?;

    // Assert
    assert_eq!(
        collector.borrow().events(),
        &[StreamEvent::Next("buffered"), StreamEvent::Completed]
    );
    Ok(())
}

#[test]
fn test_empty_publisher_close_signals_only_completion() -> anyhow::Result<()> {
    // Arrange
    let publisher: Publisher<i32> = Publisher::new();
    let collector = CollectingSubscriber::unbounded();
    publisher.subscribe(collector.clone())?;

    // Act
    publisher.close();
    publisher.start()?;

    // Assert
    assert_eq!(collector.borrow().events(), &[StreamEvent::Completed]);
    Ok(())
}

#[test]
fn test_submit_after_close_is_dropped() -> anyhow::Result<()> {
    // Arrange
    let publisher = Publisher::new();
    let collector = CollectingSubscriber::unbounded();
    publisher.subscribe(collector.clone())?;

    // Act
    publisher.submit(1);
    publisher.close();
    publisher.submit(2);
    publisher.start()?;

    // Assert
    assert_eq!(collector.borrow().items(), &[1]);
    assert_eq!(collector.borrow().completions(), 1);
    Ok(())
}

#[test]
fn test_second_subscription_is_rejected() -> anyhow::Result<()> {
    // Arrange
    let publisher: Publisher<i32> = Publisher::new();
    publisher.subscribe(CollectingSubscriber::unbounded())?;

    // Act
    let result = publisher.subscribe(CollectingSubscriber::unbounded());

    // Assert
    assert!(result.unwrap_err().is_contract_violation());
    Ok(())
}

#[test]
fn test_close_callback_runs_after_subscriber_completion() -> anyhow::Result<()> {
    // Arrange
    let publisher = Publisher::new();
    let collector = CollectingSubscriber::unbounded();
    publisher.subscribe(collector.clone())?;

    let order = Rc::new(RefCell::new(Vec::new()));
    let sink = order.clone();

    // Act
    publisher.submit(1);
    publisher.close_with(move || {
        sink.borrow_mut().push("close callback");
        Ok(())
    });
    publisher.start()?;

    // Assert
    assert_eq!(collector.borrow().completions(), 1);
    assert_eq!(*order.borrow(), vec!["close callback"]);
    Ok(())
}

#[test]
fn test_unsubscribe_is_idempotent() -> anyhow::Result<()> {
    // Arrange
    let publisher: Publisher<i32> = Publisher::new();
    let subscription = publisher.subscribe(CollectingSubscriber::unbounded())?;

    // Act
    publisher.unsubscribe(&subscription);
    publisher.unsubscribe(&subscription);

    // Assert - a fresh subscriber can attach again
    assert!(publisher.subscription().is_none());
    assert!(publisher.subscribe(CollectingSubscriber::unbounded()).is_ok());
    Ok(())
}

#[test]
fn test_fail_reaches_the_subscriber_as_on_error() -> anyhow::Result<()> {
    // Arrange
    let publisher = Publisher::new();
    let collector = CollectingSubscriber::unbounded();
    publisher.subscribe(collector.clone())?;

    // Act
    publisher.submit(1);
    publisher.fail(tempo_core::TempoError::contract_violation("source broke"));
    publisher.start()?;

    // Assert - the error trails the delivered element
    assert_eq!(collector.borrow().items(), &[1]);
    assert_eq!(collector.borrow().errors().len(), 1);
    assert_eq!(collector.borrow().completions(), 0);
    Ok(())
}
