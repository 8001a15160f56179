// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::cell::RefCell;
use std::rc::Rc;
use tempo_core::{Executor, TempoError};

#[test]
fn test_thunks_run_in_fifo_order() -> anyhow::Result<()> {
    // Arrange
    let executor = Executor::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    for i in 1..=5 {
        let sink = seen.clone();
        executor.next_tick(move || {
            sink.borrow_mut().push(i);
            Ok(())
        });
    }

    // Act
    executor.run()?;

    // Assert
    assert_eq!(*seen.borrow(), vec![1, 2, 3, 4, 5]);
    assert!(executor.is_done());
    Ok(())
}

#[test]
fn test_thunk_enqueued_during_tick_runs_on_next_tick() -> anyhow::Result<()> {
    // Arrange
    let executor = Executor::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let inner_executor = executor.clone();
    executor.next_tick(move || {
        sink.borrow_mut().push("outer");
        let sink = sink.clone();
        inner_executor.next_tick(move || {
            sink.borrow_mut().push("inner");
            Ok(())
        });
        Ok(())
    });

    // Act - one tick only runs the thunks queued at its start
    executor.tick()?;

    // Assert
    assert_eq!(*seen.borrow(), vec!["outer"]);
    assert!(!executor.is_done());

    executor.tick()?;
    assert_eq!(*seen.borrow(), vec!["outer", "inner"]);
    Ok(())
}

#[test]
fn test_run_drains_to_quiescence() -> anyhow::Result<()> {
    // Arrange - each thunk re-enqueues until a countdown expires
    let executor = Executor::new();
    let count = Rc::new(RefCell::new(0));

    fn reschedule(executor: &Executor, count: &Rc<RefCell<i32>>) {
        let executor_handle = executor.clone();
        let count = count.clone();
        executor.next_tick(move || {
            *count.borrow_mut() += 1;
            if *count.borrow() < 10 {
                reschedule(&executor_handle, &count);
            }
            Ok(())
        });
    }
    reschedule(&executor, &count);

    // Act
    executor.run()?;

    // Assert
    assert_eq!(*count.borrow(), 10);
    Ok(())
}

#[test]
fn test_chained_executor_is_drained_by_run() -> anyhow::Result<()> {
    // Arrange
    let upstream = Executor::new();
    let downstream = Executor::new();
    upstream.set_next(&downstream)?;

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let downstream_handle = downstream.clone();
    upstream.next_tick(move || {
        sink.borrow_mut().push("upstream");
        let sink = sink.clone();
        downstream_handle.next_tick(move || {
            sink.borrow_mut().push("downstream");
            Ok(())
        });
        Ok(())
    });

    // Act - a single run on the upstream covers the chain
    upstream.run()?;

    // Assert
    assert_eq!(*seen.borrow(), vec!["upstream", "downstream"]);
    assert!(upstream.is_chain_done());
    Ok(())
}

#[test]
fn test_work_enqueued_back_upstream_by_the_chain_is_observed() -> anyhow::Result<()> {
    // Arrange
    let upstream = Executor::new();
    let downstream = Executor::new();
    upstream.set_next(&downstream)?;

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let upstream_handle = upstream.clone();
    downstream.next_tick(move || {
        sink.borrow_mut().push("downstream");
        let sink = sink.clone();
        upstream_handle.next_tick(move || {
            sink.borrow_mut().push("upstream again");
            Ok(())
        });
        Ok(())
    });

    // Act
    upstream.run()?;

    // Assert
    assert_eq!(*seen.borrow(), vec!["downstream", "upstream again"]);
    Ok(())
}

#[test]
fn test_set_next_twice_to_a_different_executor_is_rejected() -> anyhow::Result<()> {
    // Arrange
    let executor = Executor::new();
    let first = Executor::new();
    let second = Executor::new();
    executor.set_next(&first)?;

    // Act / Assert - same target is an idempotent no-op, new target errors
    assert!(executor.set_next(&first).is_ok());
    let error = executor.set_next(&second).unwrap_err();
    assert!(error.is_contract_violation());
    Ok(())
}

#[test]
fn test_set_next_to_self_is_rejected() {
    let executor = Executor::new();
    assert!(executor.set_next(&executor).unwrap_err().is_contract_violation());
}

#[test]
fn test_failing_thunk_aborts_tick_and_preserves_the_rest() -> anyhow::Result<()> {
    // Arrange
    let executor = Executor::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let sink = seen.clone();
    executor.next_tick(move || {
        sink.borrow_mut().push("first");
        Ok(())
    });
    executor.next_tick(|| Err(TempoError::contract_violation("boom")));
    let sink = seen.clone();
    executor.next_tick(move || {
        sink.borrow_mut().push("third");
        Ok(())
    });

    // Act
    let result = executor.run();

    // Assert - the failure surfaced and the untaken thunk survived
    assert!(result.is_err());
    assert_eq!(*seen.borrow(), vec!["first"]);
    assert_eq!(executor.pending_count(), 1);

    executor.run()?;
    assert_eq!(*seen.borrow(), vec!["first", "third"]);
    Ok(())
}
