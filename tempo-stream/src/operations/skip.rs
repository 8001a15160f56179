// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Skip operation: drops the first `n` elements, then passes through.

use crate::operations::chain_executors;
use crate::publisher::Publisher;
use crate::subscriber::Subscriber;
use crate::subscription::{Subscription, SubscriptionWeak};
use tempo_core::{Result, TempoError};

/// Drops the first `n` upstream elements and forwards the rest.
///
/// Completes even when upstream had fewer than `n` elements.
pub struct SkipOperation<T: 'static> {
    to_skip: usize,
    upstream: Option<SubscriptionWeak<T>>,
    output: Publisher<T>,
}

impl<T: 'static> SkipOperation<T> {
    /// Creates a skip operation; its output publisher lives on a fresh
    /// executor.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            to_skip: count,
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

impl<T: 'static> Subscriber<T> for SkipOperation<T> {
    fn on_subscribe(&mut self, subscription: Subscription<T>) -> Result<()> {
        chain_executors(&subscription, &self.output)?;
        self.upstream = Some(subscription.downgrade());
        subscription.request(1);
        Ok(())
    }

    fn on_next(&mut self, item: T) -> Result<()> {
        if self.to_skip > 0 {
            self.to_skip -= 1;
            return Ok(());
        }
        self.output.submit(item);
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
