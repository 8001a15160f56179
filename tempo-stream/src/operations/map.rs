// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Map operation: emits `f(e)` for every upstream element.

use crate::operations::chain_executors;
use crate::publisher::Publisher;
use crate::subscriber::Subscriber;
use crate::subscription::{Subscription, SubscriptionWeak};
use tempo_core::{Result, TempoError};

/// Transforms every upstream element through a function.
pub struct MapOperation<T: 'static, U: 'static> {
    transform: Box<dyn Fn(T) -> U>,
    upstream: Option<SubscriptionWeak<T>>,
    output: Publisher<U>,
}

impl<T: 'static, U: 'static> MapOperation<T, U> {
    /// Creates a map operation; its output publisher lives on a fresh
    /// executor.
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(T) -> U + 'static,
    {
        Self {
            transform: Box::new(transform),
            upstream: None,
            output: Publisher::new(),
        }
    }

    /// The downstream side of the operation.
    #[must_use]
    pub fn publisher(&self) -> Publisher<U> {
        self.output.clone()
    }
}

impl<T: 'static, U: 'static> Subscriber<T> for MapOperation<T, U> {
    fn on_subscribe(&mut self, subscription: Subscription<T>) -> Result<()> {
        chain_executors(&subscription, &self.output)?;
        self.upstream = Some(subscription.downgrade());
        subscription.request(1);
        Ok(())
    }

    fn on_next(&mut self, item: T) -> Result<()> {
        self.output.submit((self.transform)(item));
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
