// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The consumer side of a stream.
//!
//! A [`Subscriber`] receives items from a [`Subscription`] subject to the
//! demand it has requested. Subscribers are shared as
//! [`SharedSubscriber`] (`Rc<RefCell<dyn Subscriber<T>>>`) so that a
//! subscription can hold them while user code retains access.
//!
//! [`ConsumerSubscriber`] wraps a closure into a terminal subscriber, the
//! common case for the end of a pipeline.

use crate::subscription::Subscription;
use std::cell::RefCell;
use std::rc::Rc;
use tempo_core::{Result, TempoError};

/// Request size for subscribers that never want to be throttled.
pub const UNBOUNDED: usize = usize::MAX;

/// Receiver of stream signals.
///
/// Methods returning [`Result`] let consumer failures propagate out of the
/// driving `run` call.
pub trait Subscriber<T: 'static> {
    /// Called once when attached to a publisher. Implementations issue
    /// their initial [`Subscription::request`] here.
    ///
    /// # Errors
    ///
    /// Operations fail here when their executor cannot be chained.
    fn on_subscribe(&mut self, subscription: Subscription<T>) -> Result<()>;

    /// Called for each delivered item.
    ///
    /// # Errors
    ///
    /// An error aborts the driving `run`, leaving queued work intact.
    fn on_next(&mut self, item: T) -> Result<()>;

    /// Called once after the final item of a completed stream.
    ///
    /// # Errors
    ///
    /// An error aborts the driving `run`.
    fn on_completed(&mut self) -> Result<()>;

    /// Called once when the stream terminates with an error.
    ///
    /// # Errors
    ///
    /// An error aborts the driving `run`.
    fn on_error(&mut self, error: TempoError) -> Result<()>;

    /// Called after the subscription is cancelled.
    fn on_unsubscribe(&mut self) {}

    /// Initial demand issued on subscribe.
    fn request_size(&self) -> usize {
        1
    }
}

/// Shared handle to a type-erased subscriber.
pub type SharedSubscriber<T> = Rc<RefCell<dyn Subscriber<T>>>;

/// Terminal subscriber driving a consumer closure.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use tempo_stream::{ConsumerSubscriber, Publisher};
///
/// let publisher = Publisher::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = seen.clone();
/// let consumer = ConsumerSubscriber::unbounded(move |item: i32| {
///     sink.borrow_mut().push(item);
///     Ok(())
/// });
/// publisher.subscribe(consumer.into_shared()).unwrap();
///
/// publisher.submit(1);
/// publisher.submit(2);
/// publisher.start().unwrap();
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// ```
pub struct ConsumerSubscriber<T: 'static, F>
where
    F: FnMut(T) -> Result<()> + 'static,
{
    consumer: F,
    request_size: usize,
    subscription: Option<Subscription<T>>,
}

impl<T: 'static, F> ConsumerSubscriber<T, F>
where
    F: FnMut(T) -> Result<()> + 'static,
{
    /// Creates a consumer with the default demand of 1 item at a time.
    pub fn new(consumer: F) -> Self {
        Self::with_request_size(consumer, 1)
    }

    /// Creates a consumer issuing an initial demand of `request_size`.
    pub fn with_request_size(consumer: F, request_size: usize) -> Self {
        Self {
            consumer,
            request_size,
            subscription: None,
        }
    }

    /// Creates a consumer with effectively infinite demand.
    pub fn unbounded(consumer: F) -> Self {
        Self::with_request_size(consumer, UNBOUNDED)
    }

    /// Wraps this consumer for [`Publisher::subscribe`](crate::Publisher::subscribe).
    #[must_use]
    pub fn into_shared(self) -> SharedSubscriber<T> {
        Rc::new(RefCell::new(self))
    }

    /// The subscription received in `on_subscribe`, if attached.
    #[must_use]
    pub fn subscription(&self) -> Option<Subscription<T>> {
        self.subscription.clone()
    }
}

impl<T: 'static, F> Subscriber<T> for ConsumerSubscriber<T, F>
where
    F: FnMut(T) -> Result<()> + 'static,
{
    fn on_subscribe(&mut self, subscription: Subscription<T>) -> Result<()> {
        subscription.request(self.request_size);
        self.subscription = Some(subscription);
        Ok(())
    }

    fn on_next(&mut self, item: T) -> Result<()> {
        (self.consumer)(item)
    }

    fn on_completed(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_error(&mut self, error: TempoError) -> Result<()> {
        // No error slot on a plain consumer: surface it to the driving run.
        Err(error)
    }

    fn request_size(&self) -> usize {
        self.request_size
    }
}
