// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::cell::RefCell;
use std::rc::Rc;
use tempo_core::ScheduledExecutor;
use tempo_promise::{Completion, Promise};

#[test]
fn test_delay_resolves_after_the_given_ticks() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ScheduledExecutor::new();
    let promise = Promise::delay("OK", 50, &scheduler);

    // Act
    assert!(promise.is_in_progress());
    scheduler.run()?;

    // Assert
    assert_eq!(promise.result(), Some("OK"));
    assert_eq!(scheduler.current_time(), 50);
    Ok(())
}

#[test]
fn test_delay_zero_is_promoted_to_one_tick() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ScheduledExecutor::new();
    let promise = Promise::delay(1, 0, &scheduler);

    // Act
    scheduler.run()?;

    // Assert
    assert_eq!(promise.result(), Some(1));
    assert_eq!(scheduler.current_time(), 1);
    Ok(())
}

#[test]
fn test_resolution_beats_a_later_timeout() -> anyhow::Result<()> {
    // Arrange - resolves at t=50, timeout would fire at t=100
    let scheduler = ScheduledExecutor::new();
    let guarded = Promise::delay("OK", 50, &scheduler).timeout(100, &scheduler);

    // Act
    scheduler.run()?;

    // Assert - resolved, and the timeout timer was cancelled
    assert_eq!(guarded.result(), Some("OK"));
    assert_eq!(scheduler.timer_count(), 0);
    Ok(())
}

#[test]
fn test_timeout_beats_a_later_resolution() -> anyhow::Result<()> {
    // Arrange - resolves at t=100, timeout fires at t=50
    let scheduler = ScheduledExecutor::new();
    let guarded = Promise::delay("OK", 100, &scheduler).timeout(50, &scheduler);

    // Act
    scheduler.run()?;

    // Assert
    assert!(guarded.is_rejected());
    let error = guarded.error().expect("rejection recorded");
    assert!(error.is_timeout());
    assert_eq!(error.to_string(), "Timeout error: Timeout after 50");
    Ok(())
}

#[test]
fn test_timeout_result_remains_chainable() -> anyhow::Result<()> {
    // Arrange - the timeout wrapper must not insert an intermediate promise
    // that breaks further chaining.
    let scheduler = ScheduledExecutor::new();
    let chained = Promise::delay(5, 10, &scheduler)
        .timeout(100, &scheduler)
        .then(|value| Ok(Completion::Value(value * 3)));

    // Act
    scheduler.run()?;

    // Assert
    assert_eq!(chained.result(), Some(15));
    assert_eq!(scheduler.timer_count(), 0);
    Ok(())
}

#[test]
fn test_timeout_on_an_unsettled_promise_rejects_at_expiry() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ScheduledExecutor::new();
    let promise: Promise<i32> = Promise::new(scheduler.as_executor());
    let guarded = promise.timeout(25, &scheduler);

    // Act
    scheduler.run()?;

    // Assert
    assert!(promise.is_in_progress());
    assert!(guarded.is_rejected());
    assert_eq!(scheduler.current_time(), 25);
    Ok(())
}

#[test]
fn test_recursive_flattening_through_nested_delays() -> anyhow::Result<()> {
    // Arrange - the handler returns a promise of a promise; the chain must
    // flatten to the base value.
    let scheduler = ScheduledExecutor::new();
    let promise: Promise<i32> = Promise::new(scheduler.as_executor());

    let delay_scheduler = scheduler.clone();
    let flattened = promise.then(move |value| {
        let inner = Promise::delay(value * 2, 5, &delay_scheduler);
        let nested = Promise::delay(inner, 5, &delay_scheduler);
        Ok(Completion::Pending(nested.flatten()))
    });

    let result = Rc::new(RefCell::new(None));
    let sink = result.clone();
    let _terminal = flattened.then(move |value| {
        *sink.borrow_mut() = Some(value);
        Ok(Completion::Value(value))
    });

    // Act
    promise.resolve(7)?;
    scheduler.run()?;

    // Assert
    assert_eq!(*result.borrow(), Some(14));
    assert_eq!(flattened.result(), Some(14));
    Ok(())
}
