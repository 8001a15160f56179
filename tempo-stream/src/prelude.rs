// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Convenient imports for stream pipelines.

pub use crate::combine::{concat, merge, zip};
pub use crate::flow::Flow;
pub use crate::publisher::Publisher;
pub use crate::subscriber::{ConsumerSubscriber, SharedSubscriber, Subscriber};
pub use crate::subscription::Subscription;
pub use tempo_core::{Executor, Result, ScheduledExecutor, TempoError};
