// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-threaded FIFO executor with forward chaining.
//!
//! An [`Executor`] is a queue of thunks drained explicitly by its owner.
//! Nothing runs until [`Executor::tick`] or [`Executor::run`] is called,
//! which makes delivery order fully deterministic.
//!
//! ## Characteristics
//!
//! - **FIFO**: thunks run in the order they were enqueued.
//! - **Tick isolation**: a thunk enqueued during a tick runs on a later tick,
//!   never the current one.
//! - **Chaining**: an executor may name one downstream executor via
//!   [`Executor::set_next`]; [`Executor::run`] drains the whole chain to
//!   quiescence. Chains are acyclic singly-linked lists.
//! - **Not thread-safe**: handles are `Rc`-based and must stay on one thread.
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tempo_core::Executor;
//!
//! let executor = Executor::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = seen.clone();
//! executor.next_tick(move || {
//!     sink.borrow_mut().push("first");
//!     Ok(())
//! });
//! let sink = seen.clone();
//! executor.next_tick(move || {
//!     sink.borrow_mut().push("second");
//!     Ok(())
//! });
//!
//! executor.run().unwrap();
//! assert_eq!(*seen.borrow(), vec!["first", "second"]);
//! ```

use crate::error::{Result, TempoError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A unit of deferred work.
///
/// The `Result` is how a thunk "throws": an `Err` aborts the current
/// `tick`/`run` and leaves the remaining queued work in place.
pub type Thunk = Box<dyn FnOnce() -> Result<()> + 'static>;

struct ExecutorState {
    queue: VecDeque<Thunk>,
    next: Option<Executor>,
}

/// A single-threaded FIFO scheduler for thunks.
///
/// `Executor` is a cheaply clonable handle; all clones share the same queue.
/// See the [module documentation](self) for the scheduling model.
pub struct Executor {
    state: Rc<RefCell<ExecutorState>>,
}

impl Executor {
    /// Creates a new executor with an empty queue and no chain link.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ExecutorState {
                queue: VecDeque::new(),
                next: None,
            })),
        }
    }

    /// Appends a thunk to the pending queue.
    ///
    /// The thunk runs on the next [`tick`](Self::tick), after everything
    /// already queued.
    pub fn next_tick<F>(&self, thunk: F)
    where
        F: FnOnce() -> Result<()> + 'static,
    {
        self.state.borrow_mut().queue.push_back(Box::new(thunk));
    }

    /// Drains the thunks queued at the moment of the call, invoking each in
    /// FIFO order. Thunks enqueued during the pass are left for the next tick.
    ///
    /// # Errors
    ///
    /// Returns the first thunk error; the rest of the pass (and anything
    /// enqueued meanwhile) stays queued, in order.
    pub fn tick(&self) -> Result<()> {
        let mut batch = std::mem::take(&mut self.state.borrow_mut().queue);
        while let Some(thunk) = batch.pop_front() {
            if let Err(e) = thunk() {
                // Preserve the untaken remainder ahead of newly enqueued work.
                let mut state = self.state.borrow_mut();
                while let Some(t) = batch.pop_back() {
                    state.queue.push_front(t);
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Returns `true` if the immediate queue is empty.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state.borrow().queue.is_empty()
    }

    /// Number of thunks currently queued.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Installs the forward chain link: draining this executor via
    /// [`run`](Self::run) also drains `other`.
    ///
    /// Re-linking to the executor already installed is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a contract violation when a different executor is already
    /// linked, or when `other` is this executor itself.
    pub fn set_next(&self, other: &Executor) -> Result<()> {
        if self.same_executor(other) {
            return Err(TempoError::contract_violation(
                "cannot chain an executor to itself",
            ));
        }
        let mut state = self.state.borrow_mut();
        match &state.next {
            Some(existing) if existing.same_executor(other) => Ok(()),
            Some(_) => Err(TempoError::contract_violation_hint(
                "executor is already chained to a different executor",
                "an executor drives at most one downstream executor",
            )),
            None => {
                state.next = Some(other.clone());
                Ok(())
            }
        }
    }

    /// The downstream executor installed via [`set_next`](Self::set_next),
    /// if any.
    #[must_use]
    pub fn next_executor(&self) -> Option<Executor> {
        self.state.borrow().next.clone()
    }

    /// Returns `true` when `other` is a handle to this same executor.
    #[must_use]
    pub fn same_executor(&self, other: &Executor) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Returns `true` when this executor and its entire chain are idle.
    #[must_use]
    pub fn is_chain_done(&self) -> bool {
        if !self.is_done() {
            return false;
        }
        match self.next_executor() {
            Some(next) => next.is_chain_done(),
            None => true,
        }
    }

    /// Drains this executor and its chain until everything is quiescent.
    ///
    /// The loop re-checks this executor after running the chain, so work the
    /// chain enqueues back here is observed within the same call.
    ///
    /// # Errors
    ///
    /// Propagates the first thunk error; queued work is preserved.
    pub fn run(&self) -> Result<()> {
        loop {
            if !self.is_done() {
                self.tick()?;
                continue;
            }
            if let Some(next) = self.next_executor() {
                if !next.is_chain_done() {
                    next.run()?;
                    continue;
                }
            }
            break;
        }
        Ok(())
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Executor {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("pending", &self.pending_count())
            .field("chained", &self.state.borrow().next.is_some())
            .finish()
    }
}
