// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Chainable single-assignment promises on top of the tempo executor.
//!
//! A [`Promise`] is a three-state cell (in progress, resolved, rejected)
//! whose handlers are always delivered asynchronously through the owning
//! [`Executor`](tempo_core::Executor): settling a promise only enqueues
//! work, and nothing is observed until the executor runs.
//!
//! Chaining handlers may return further promises via
//! [`Completion::Pending`]; the chain flattens recursively so that the
//! derived promise always settles with a base value, never with a promise.
//!
//! Time-based constructors ([`Promise::delay`], [`Promise::timeout`])
//! require a [`ScheduledExecutor`](tempo_core::ScheduledExecutor) by type.

pub mod completion;
pub mod promise;
mod time;

pub use completion::Completion;
pub use promise::{Promise, PromiseStatus};
