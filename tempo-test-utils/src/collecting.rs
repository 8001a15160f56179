// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Recording subscriber for assertions on delivery and ordering.

use std::cell::RefCell;
use std::rc::Rc;
use tempo_core::{Result, TempoError};
use tempo_stream::{Subscriber, Subscription, UNBOUNDED};

/// Everything a subscriber can observe, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent<T> {
    /// An `on_next` delivery.
    Next(T),
    /// The `on_completed` signal.
    Completed,
    /// An `on_error` signal, rendered to its message.
    Errored(String),
}

/// Shared handle to a [`CollectingSubscriber`], as handed to
/// `Publisher::subscribe`.
pub type SharedCollector<T> = Rc<RefCell<CollectingSubscriber<T>>>;

/// A subscriber that records every signal it receives.
///
/// Construct via [`unbounded`](Self::unbounded),
/// [`with_request_size`](Self::with_request_size) or
/// [`cancelling_after`](Self::cancelling_after), keep the returned handle,
/// and assert on [`items`](Self::items) / [`events`](Self::events) after
/// driving the executor.
pub struct CollectingSubscriber<T: Clone + 'static> {
    events: Vec<StreamEvent<T>>,
    items: Vec<T>,
    request_size: usize,
    cancel_after: Option<usize>,
    subscription: Option<Subscription<T>>,
    unsubscribed: bool,
}

impl<T: Clone + 'static> CollectingSubscriber<T> {
    /// A collector with effectively infinite demand.
    #[must_use]
    pub fn unbounded() -> SharedCollector<T> {
        Self::with_request_size(UNBOUNDED)
    }

    /// A collector issuing an initial demand of `request_size`.
    #[must_use]
    pub fn with_request_size(request_size: usize) -> SharedCollector<T> {
        Rc::new(RefCell::new(Self {
            events: Vec::new(),
            items: Vec::new(),
            request_size,
            cancel_after: None,
            subscription: None,
            unsubscribed: false,
        }))
    }

    /// A collector that cancels its subscription from within `on_next`
    /// once `count` items have arrived.
    #[must_use]
    pub fn cancelling_after(count: usize, request_size: usize) -> SharedCollector<T> {
        let collector = Self::with_request_size(request_size);
        collector.borrow_mut().cancel_after = Some(count);
        collector
    }

    /// Items received so far, in delivery order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Every observed signal, in delivery order.
    #[must_use]
    pub fn events(&self) -> &[StreamEvent<T>] {
        &self.events
    }

    /// Number of `on_completed` signals received.
    #[must_use]
    pub fn completions(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, StreamEvent::Completed))
            .count()
    }

    /// Rendered messages of `on_error` signals received.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Errored(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether `on_unsubscribe` has been observed.
    #[must_use]
    pub fn is_unsubscribed(&self) -> bool {
        self.unsubscribed
    }

    /// The subscription received in `on_subscribe`.
    #[must_use]
    pub fn subscription(&self) -> Option<Subscription<T>> {
        self.subscription.clone()
    }
}

impl<T: Clone + 'static> Subscriber<T> for CollectingSubscriber<T> {
    fn on_subscribe(&mut self, subscription: Subscription<T>) -> Result<()> {
        subscription.request(self.request_size);
        self.subscription = Some(subscription);
        Ok(())
    }

    fn on_next(&mut self, item: T) -> Result<()> {
        self.events.push(StreamEvent::Next(item.clone()));
        self.items.push(item);
        if self
            .cancel_after
            .is_some_and(|count| self.items.len() >= count)
        {
            if let Some(subscription) = &self.subscription {
                subscription.cancel();
            }
        }
        Ok(())
    }

    fn on_completed(&mut self) -> Result<()> {
        self.events.push(StreamEvent::Completed);
        Ok(())
    }

    fn on_error(&mut self, error: TempoError) -> Result<()> {
        self.events.push(StreamEvent::Errored(error.to_string()));
        Ok(())
    }

    fn on_unsubscribe(&mut self) {
        self.unsubscribed = true;
    }

    fn request_size(&self) -> usize {
        self.request_size
    }
}
