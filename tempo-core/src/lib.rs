// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core building blocks of the tempo cooperative runtime.
//!
//! This crate provides the two schedulers everything else in the workspace is
//! layered on:
//!
//! - [`Executor`]: a single-threaded FIFO queue of thunks with an optional
//!   forward chain link, driven explicitly via [`Executor::tick`] and
//!   [`Executor::run`].
//! - [`ScheduledExecutor`]: an executor that additionally owns a sorted timer
//!   queue and a tick-time clock, advancing time only when no immediate work
//!   remains.
//!
//! There is no preemption and no thread-safety: every executor and all state
//! attached to it (promises, publishers, subscriptions) must stay confined to
//! the thread that created it. Forward progress happens only while the owner
//! calls `run`.

pub mod error;
pub mod executor;
pub mod scheduled;

pub use error::{Result, TempoError};
pub use executor::{Executor, Thunk};
pub use scheduled::{ScheduledExecutor, TimerId};
