// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Pass-through operations: subscriber upstream, publisher downstream.
//!
//! An operation consumes items from one upstream subscription and re-emits
//! through an output [`Publisher`] that lives on its own executor. On
//! subscribe the upstream executor is chained to the output executor, so a
//! single `run` on the source drives the whole pipeline.
//!
//! Operations issue an initial request of 1 and rely on the subscription's
//! per-delivery replenishment, regardless of the downstream subscriber's
//! own `request_size`.

pub mod filter;
pub mod map;
pub mod skip;
pub mod take;

pub use filter::FilterOperation;
pub use map::MapOperation;
pub use skip::SkipOperation;
pub use take::TakeOperation;

use crate::publisher::Publisher;
use crate::subscription::Subscription;
use tempo_core::Result;

// Chain the upstream executor to the operation's output executor, so that
// draining the source also drains work this operation schedules.
pub(crate) fn chain_executors<T: 'static, U: 'static>(
    upstream: &Subscription<T>,
    output: &Publisher<U>,
) -> Result<()> {
    upstream.executor().set_next(&output.executor())
}
