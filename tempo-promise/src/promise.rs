// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Three-state promise with asynchronous handler delivery.
//!
//! ## Characteristics
//!
//! - **Settle once**: `resolve`/`reject` on a settled promise is a contract
//!   violation; the first settlement is permanent.
//! - **Asynchronous delivery**: handlers never run inside `resolve`,
//!   `reject`, or `then`; they are enqueued on the owning executor and run
//!   on its next tick.
//! - **Flattening**: a handler returning [`Completion::Pending`] chains the
//!   derived promise to the returned promise, recursively.
//! - **Error policy**: a handler returning `Err` rejects the derived
//!   promise with that error.
//!
//! ## Example
//!
//! ```
//! use tempo_core::Executor;
//! use tempo_promise::{Completion, Promise};
//!
//! let executor = Executor::new();
//! let promise: Promise<i32> = Promise::new(&executor);
//!
//! let doubled = promise.then(|value| Ok(Completion::Value(value * 2)));
//!
//! promise.resolve(21).unwrap();
//! executor.run().unwrap();
//! assert_eq!(doubled.result(), Some(42));
//! ```

use crate::completion::Completion;
use std::cell::RefCell;
use std::rc::Rc;
use tempo_core::{Executor, Result, TempoError};

/// Observable settlement state of a [`Promise`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseStatus {
    /// Not yet settled.
    InProgress,
    /// Settled with a value.
    Resolved,
    /// Settled with an error.
    Rejected,
}

enum Settlement<T> {
    InProgress,
    Resolved(T),
    Rejected(TempoError),
}

type ResolveHandler<T> = Box<dyn FnOnce(T) -> Result<()>>;
type RejectHandler = Box<dyn FnOnce(TempoError) -> Result<()>>;

struct PromiseState<T> {
    executor: Executor,
    settlement: Settlement<T>,
    on_resolved: Vec<ResolveHandler<T>>,
    on_rejected: Vec<RejectHandler>,
}

/// A single-assignment value delivered through an [`Executor`].
///
/// `Promise` is a cheaply clonable handle; all clones observe the same
/// settlement. See the [module documentation](self) for the delivery model.
pub struct Promise<T: Clone + 'static> {
    state: Rc<RefCell<PromiseState<T>>>,
}

impl<T: Clone + 'static> Promise<T> {
    /// Creates an in-progress promise owned by `executor`.
    #[must_use]
    pub fn new(executor: &Executor) -> Self {
        Self::with_settlement(executor, Settlement::InProgress)
    }

    /// Creates a promise already resolved with `value`.
    #[must_use]
    pub fn resolved(executor: &Executor, value: T) -> Self {
        Self::with_settlement(executor, Settlement::Resolved(value))
    }

    /// Creates a promise already rejected with `error`.
    #[must_use]
    pub fn rejected(executor: &Executor, error: TempoError) -> Self {
        Self::with_settlement(executor, Settlement::Rejected(error))
    }

    fn with_settlement(executor: &Executor, settlement: Settlement<T>) -> Self {
        Self {
            state: Rc::new(RefCell::new(PromiseState {
                executor: executor.clone(),
                settlement,
                on_resolved: Vec::new(),
                on_rejected: Vec::new(),
            })),
        }
    }

    /// The owning executor.
    #[must_use]
    pub fn executor(&self) -> Executor {
        self.state.borrow().executor.clone()
    }

    /// Settles the promise with `value` and enqueues all registered
    /// resolve-handlers on the executor.
    ///
    /// # Errors
    ///
    /// Returns a contract violation when the promise is already settled.
    pub fn resolve(&self, value: T) -> Result<()> {
        let (executor, handlers) = {
            let mut state = self.state.borrow_mut();
            if !matches!(state.settlement, Settlement::InProgress) {
                return Err(TempoError::contract_violation(
                    "Cannot resolve an already settled promise",
                ));
            }
            state.settlement = Settlement::Resolved(value.clone());
            state.on_rejected.clear();
            (state.executor.clone(), std::mem::take(&mut state.on_resolved))
        };
        for handler in handlers {
            let value = value.clone();
            executor.next_tick(move || handler(value));
        }
        Ok(())
    }

    /// Settles the promise with `error` and enqueues all registered
    /// reject-handlers on the executor.
    ///
    /// # Errors
    ///
    /// Returns a contract violation when the promise is already settled.
    pub fn reject(&self, error: TempoError) -> Result<()> {
        let (executor, handlers) = {
            let mut state = self.state.borrow_mut();
            if !matches!(state.settlement, Settlement::InProgress) {
                return Err(TempoError::contract_violation(
                    "Cannot reject an already settled promise",
                ));
            }
            state.settlement = Settlement::Rejected(error.clone());
            state.on_resolved.clear();
            (state.executor.clone(), std::mem::take(&mut state.on_rejected))
        };
        for handler in handlers {
            let error = error.clone();
            executor.next_tick(move || handler(error));
        }
        Ok(())
    }

    /// Current settlement state.
    #[must_use]
    pub fn status(&self) -> PromiseStatus {
        match self.state.borrow().settlement {
            Settlement::InProgress => PromiseStatus::InProgress,
            Settlement::Resolved(_) => PromiseStatus::Resolved,
            Settlement::Rejected(_) => PromiseStatus::Rejected,
        }
    }

    /// The resolved value, if any.
    #[must_use]
    pub fn result(&self) -> Option<T> {
        match &self.state.borrow().settlement {
            Settlement::Resolved(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// The rejection error, if any.
    #[must_use]
    pub fn error(&self) -> Option<TempoError> {
        match &self.state.borrow().settlement {
            Settlement::Rejected(error) => Some(error.clone()),
            _ => None,
        }
    }

    /// Returns `true` while unsettled.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.status() == PromiseStatus::InProgress
    }

    /// Returns `true` once resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.status() == PromiseStatus::Resolved
    }

    /// Returns `true` once rejected.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.status() == PromiseStatus::Rejected
    }

    /// Derives a promise from this one's resolution.
    ///
    /// `on_ok` runs on the executor once this promise resolves; its
    /// [`Completion`] settles the derived promise (flattening through
    /// returned promises), and an `Err` return rejects it. A rejection of
    /// this promise passes through to the derived promise unchanged.
    pub fn then<U, F>(&self, on_ok: F) -> Promise<U>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> Result<Completion<U>> + 'static,
    {
        let derived = Promise::new(&self.executor());
        let adopt_target = derived.clone();
        let pass_through = derived.clone();
        self.attach(
            move |value| adopt(&adopt_target, on_ok(value)),
            move |error| pass_through.reject(error),
        );
        derived
    }

    /// Derives a promise from this one's rejection.
    ///
    /// The counterpart of [`then`](Self::then): `on_err` runs once this
    /// promise rejects, and a resolution passes through unchanged.
    pub fn catch<F>(&self, on_err: F) -> Promise<T>
    where
        F: FnOnce(TempoError) -> Result<Completion<T>> + 'static,
    {
        let derived = Promise::new(&self.executor());
        let pass_through = derived.clone();
        let adopt_target = derived.clone();
        self.attach(
            move |value| pass_through.resolve(value),
            move |error| adopt(&adopt_target, on_err(error)),
        );
        derived
    }

    /// Derives a promise handling both outcomes, the two-slot form of
    /// [`then`](Self::then)/[`catch`](Self::catch).
    pub fn then_catch<U, FOk, FErr>(&self, on_ok: FOk, on_err: FErr) -> Promise<U>
    where
        U: Clone + 'static,
        FOk: FnOnce(T) -> Result<Completion<U>> + 'static,
        FErr: FnOnce(TempoError) -> Result<Completion<U>> + 'static,
    {
        let derived = Promise::new(&self.executor());
        let ok_target = derived.clone();
        let err_target = derived.clone();
        self.attach(
            move |value| adopt(&ok_target, on_ok(value)),
            move |error| adopt(&err_target, on_err(error)),
        );
        derived
    }

    // Registers a settlement-handler pair directly on the handler lists,
    // or enqueues the matching one when already settled. This is the seam
    // `timeout` uses to avoid an intermediate promise in the chain.
    pub(crate) fn attach<FOk, FErr>(&self, on_resolved: FOk, on_rejected: FErr)
    where
        FOk: FnOnce(T) -> Result<()> + 'static,
        FErr: FnOnce(TempoError) -> Result<()> + 'static,
    {
        let mut state = self.state.borrow_mut();
        match &state.settlement {
            Settlement::InProgress => {
                state.on_resolved.push(Box::new(on_resolved));
                state.on_rejected.push(Box::new(on_rejected));
            }
            Settlement::Resolved(value) => {
                let value = value.clone();
                let executor = state.executor.clone();
                drop(state);
                executor.next_tick(move || on_resolved(value));
            }
            Settlement::Rejected(error) => {
                let error = error.clone();
                let executor = state.executor.clone();
                drop(state);
                executor.next_tick(move || on_rejected(error));
            }
        }
    }
}

impl<U: Clone + 'static> Promise<Promise<U>> {
    /// Unwraps a promise-valued promise one level.
    ///
    /// Apply repeatedly for deeper nesting; each application removes
    /// exactly one type-level `Promise` layer.
    #[must_use]
    pub fn flatten(&self) -> Promise<U> {
        self.then(|inner| Ok(Completion::Pending(inner)))
    }
}

// Settles `derived` from a handler outcome, chaining through a returned
// promise. The one-shot handlers attached to the inner promise go through
// `attach`, so a pending inner promise that is itself settled via a chain
// keeps flattening transitively.
fn adopt<U: Clone + 'static>(derived: &Promise<U>, outcome: Result<Completion<U>>) -> Result<()> {
    match outcome {
        Ok(Completion::Value(value)) => derived.resolve(value),
        Ok(Completion::Pending(inner)) => {
            let ok_target = derived.clone();
            let err_target = derived.clone();
            inner.attach(
                move |value| ok_target.resolve(value),
                move |error| err_target.reject(error),
            );
            Ok(())
        }
        Err(error) => derived.reject(error),
    }
}

impl<T: Clone + 'static> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Clone + 'static> std::fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Promise")
            .field("status", &self.status())
            .finish()
    }
}
