// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Filter operation: forwards only elements matching a predicate.

use crate::operations::chain_executors;
use crate::publisher::Publisher;
use crate::subscriber::Subscriber;
use crate::subscription::{Subscription, SubscriptionWeak};
use tempo_core::{Result, TempoError};

/// Forwards elements for which the predicate holds.
///
/// Dropped elements still count against upstream demand; the
/// subscription's per-delivery replenishment keeps the stream flowing, so
/// downstream demand is preserved.
pub struct FilterOperation<T: 'static> {
    predicate: Box<dyn Fn(&T) -> bool>,
    upstream: Option<SubscriptionWeak<T>>,
    output: Publisher<T>,
}

impl<T: 'static> FilterOperation<T> {
    /// Creates a filter operation; its output publisher lives on a fresh
    /// executor.
    pub fn new<P>(predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            upstream: None,
            output: Publisher::new(),
        }
    }

    /// The downstream side of the operation.
    #[must_use]
    pub fn publisher(&self) -> Publisher<T> {
        self.output.clone()
    }
}

impl<T: 'static> Subscriber<T> for FilterOperation<T> {
    fn on_subscribe(&mut self, subscription: Subscription<T>) -> Result<()> {
        chain_executors(&subscription, &self.output)?;
        self.upstream = Some(subscription.downgrade());
        subscription.request(1);
        Ok(())
    }

    fn on_next(&mut self, item: T) -> Result<()> {
        if (self.predicate)(&item) {
            self.output.submit(item);
        }
        Ok(())
    }

    fn on_completed(&mut self) -> Result<()> {
        self.output.close();
        Ok(())
    }

    fn on_error(&mut self, error: TempoError) -> Result<()> {
        self.output.fail(error);
        Ok(())
    }
}
