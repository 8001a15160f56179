// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Tempo
//!
//! A cooperative, tick-driven concurrency runtime: single-threaded
//! executors, chainable promises, and backpressured reactive streams with
//! fully deterministic ordering.
//!
//! ## Overview
//!
//! Nothing in tempo runs on its own. Every asynchronous step (a promise
//! handler, a stream delivery, a timer) is a thunk queued on an
//! [`Executor`], and work happens only while the owner drives it with
//! `run`. That makes delivery order a property of the data flow rather
//! than of the scheduler's mood, which is what the stream layer's
//! completion guarantees are built on.
//!
//! ## Quick Start
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tempo_rt::prelude::*;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//!
//! let source = Flow::from(Publisher::new())
//!     .map(|x: i32| x * 10)
//!     .take(3)
//!     .to_each(move |x| sink.borrow_mut().push(x))
//!     .build()
//!     .unwrap();
//!
//! for i in 1..=5 {
//!     source.submit(i);
//! }
//! source.close();
//! source.start().unwrap();
//! assert_eq!(*seen.borrow(), vec![10, 20, 30]);
//! ```

// Re-export the runtime core
pub use tempo_core::{Executor, Result, ScheduledExecutor, TempoError, Thunk, TimerId};

// Re-export promises
pub use tempo_promise::{Completion, Promise, PromiseStatus};

// Re-export the stream layer
pub use tempo_stream::{
    concat, merge, zip, ConsumerSubscriber, FilterOperation, Flow, FlowBuilder, MapOperation,
    Publisher, SharedSubscriber, SkipOperation, Subscriber, Subscription, SubscriptionWeak,
    TakeOperation, UNBOUNDED,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use tempo_core::{Executor, Result, ScheduledExecutor, TempoError};
    pub use tempo_promise::{Completion, Promise};
    pub use tempo_stream::prelude::*;
}
