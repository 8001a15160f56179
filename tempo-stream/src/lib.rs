// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Pull-on-demand reactive streams over the tempo cooperative executor.
//!
//! ## Overview
//!
//! A [`Publisher`] pushes items into a [`Subscription`], which delivers
//! them to a [`Subscriber`] strictly within its requested demand. Delivery
//! is asynchronous over the owning [`Executor`](tempo_core::Executor): an
//! offered item reaches the subscriber exactly two ticks later (drain,
//! then `on_next`), and completion always trails the final elements.
//!
//! Operations ([`MapOperation`], [`FilterOperation`], [`TakeOperation`],
//! [`SkipOperation`]) are subscriber and publisher at once and chain their
//! executors so that one `run` on the source drives the whole pipeline.
//! Combining publishers ([`merge`], [`concat`], [`zip`]) fan several
//! sources into one stream. The [`Flow`] builder wires it all fluently.
//!
//! This crate shares the runtime's threading model: everything is
//! `Rc`-based and confined to one thread.

#[macro_use]
mod logging;

pub mod combine;
pub mod flow;
pub mod operations;
pub mod prelude;
pub mod publisher;
pub mod subscriber;
pub mod subscription;

pub use combine::{concat, merge, zip};
pub use flow::{Flow, FlowBuilder};
pub use operations::{FilterOperation, MapOperation, SkipOperation, TakeOperation};
pub use publisher::Publisher;
pub use subscriber::{ConsumerSubscriber, SharedSubscriber, Subscriber, UNBOUNDED};
pub use subscription::{Subscription, SubscriptionWeak};
