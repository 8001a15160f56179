// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Take operation: limits the stream to its first `n` elements.

use crate::operations::chain_executors;
use crate::publisher::Publisher;
use crate::subscriber::Subscriber;
use crate::subscription::{Subscription, SubscriptionWeak};
use tempo_core::{Result, TempoError};

/// Emits the first `n` upstream elements, then completes downstream and
/// cancels upstream.
///
/// `take(0)` completes at subscribe time without requesting anything. A
/// completed flag guards against elements that were already in flight when
/// the limit was reached.
pub struct TakeOperation<T: 'static> {
    remaining: usize,
    completed: bool,
    upstream: Option<SubscriptionWeak<T>>,
    output: Publisher<T>,
}

impl<T: 'static> TakeOperation<T> {
    /// Creates a take operation; its output publisher lives on a fresh
    /// executor.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            remaining: count,
            completed: false,
            upstream: None,
            output: Publisher::new(),
        }
    }

    /// The downstream side of the operation.
    #[must_use]
    pub fn publisher(&self) -> Publisher<T> {
        self.output.clone()
    }

    fn finish(&mut self) {
        self.completed = true;
        self.output.close();
        if let Some(upstream) = self.upstream.as_ref().and_then(SubscriptionWeak::upgrade) {
            upstream.cancel();
        }
    }
}

impl<T: 'static> Subscriber<T> for TakeOperation<T> {
    fn on_subscribe(&mut self, subscription: Subscription<T>) -> Result<()> {
        chain_executors(&subscription, &self.output)?;
        self.upstream = Some(subscription.downgrade());
        if self.remaining == 0 {
            self.finish();
            return Ok(());
        }
        subscription.request(1);
        Ok(())
    }

    fn on_next(&mut self, item: T) -> Result<()> {
        if self.completed {
            return Ok(());
        }
        self.output.submit(item);
        self.remaining -= 1;
        if self.remaining == 0 {
            self.finish();
        }
        Ok(())
    }

    fn on_completed(&mut self) -> Result<()> {
        if !self.completed {
            self.completed = true;
            self.output.close();
        }
        Ok(())
    }

    fn on_error(&mut self, error: TempoError) -> Result<()> {
        if !self.completed {
            self.completed = true;
            self.output.fail(error);
        }
        Ok(())
    }
}
