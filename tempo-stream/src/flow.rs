// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fluent pipeline builder.
//!
//! [`Flow::from`] starts a builder at a source publisher; each operator
//! call wires a new operation onto the current tail eagerly; a terminal
//! [`to`](FlowBuilder::to) attaches the consumer; [`build`](FlowBuilder::build)
//! hands back the head publisher for driving via `submit`/`close`/`start`.
//!
//! Wiring failures (e.g. reusing a publisher that is already part of
//! another pipeline) are deferred and surface from `build`, keeping the
//! chain fluent.
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tempo_stream::{Flow, Publisher};
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//!
//! let source = Flow::from(Publisher::new())
//!     .filter(|x: &i32| x % 2 == 0)
//!     .map(|x| x * 2)
//!     .to_each(move |x| sink.borrow_mut().push(x))
//!     .build()
//!     .unwrap();
//!
//! for i in 1..=10 {
//!     source.submit(i);
//! }
//! source.close();
//! source.start().unwrap();
//! assert_eq!(*seen.borrow(), vec![4, 8, 12, 16, 20]);
//! ```

use crate::operations::{FilterOperation, MapOperation, SkipOperation, TakeOperation};
use crate::publisher::Publisher;
use crate::subscriber::{ConsumerSubscriber, SharedSubscriber};
use std::cell::RefCell;
use std::rc::Rc;
use tempo_core::{Result, TempoError};

/// Entry point of the pipeline DSL.
pub struct Flow;

impl Flow {
    /// Starts a builder with `source` as both head and tail.
    #[must_use]
    pub fn from<T: 'static>(source: Publisher<T>) -> FlowBuilder<T, T> {
        FlowBuilder {
            head: source.clone(),
            tail: source,
            error: None,
        }
    }
}

/// A pipeline under construction: `S` is the head element type, `T` the
/// current tail element type.
pub struct FlowBuilder<S: 'static, T: 'static> {
    head: Publisher<S>,
    tail: Publisher<T>,
    error: Option<TempoError>,
}

impl<S: 'static, T: 'static> FlowBuilder<S, T> {
    fn step<U: 'static>(
        self,
        subscriber: SharedSubscriber<T>,
        output: Publisher<U>,
    ) -> FlowBuilder<S, U> {
        let error = match self.error {
            Some(error) => Some(error),
            None => self.tail.subscribe(subscriber).err(),
        };
        FlowBuilder {
            head: self.head,
            tail: output,
            error,
        }
    }

    /// Appends a transforming stage.
    #[must_use]
    pub fn map<U: 'static, F>(self, transform: F) -> FlowBuilder<S, U>
    where
        F: Fn(T) -> U + 'static,
    {
        let operation = MapOperation::new(transform);
        let output = operation.publisher();
        self.step(Rc::new(RefCell::new(operation)), output)
    }

    /// Appends a predicate stage.
    #[must_use]
    pub fn filter<P>(self, predicate: P) -> FlowBuilder<S, T>
    where
        P: Fn(&T) -> bool + 'static,
    {
        let operation = FilterOperation::new(predicate);
        let output = operation.publisher();
        self.step(Rc::new(RefCell::new(operation)), output)
    }

    /// Alias for [`filter`](Self::filter).
    #[must_use]
    pub fn grep<P>(self, predicate: P) -> FlowBuilder<S, T>
    where
        P: Fn(&T) -> bool + 'static,
    {
        self.filter(predicate)
    }

    /// Appends a stage limiting the stream to its first `n` elements.
    #[must_use]
    pub fn take(self, n: usize) -> FlowBuilder<S, T> {
        let operation = TakeOperation::new(n);
        let output = operation.publisher();
        self.step(Rc::new(RefCell::new(operation)), output)
    }

    /// Appends a stage dropping the first `n` elements.
    #[must_use]
    pub fn skip(self, n: usize) -> FlowBuilder<S, T> {
        let operation = SkipOperation::new(n);
        let output = operation.publisher();
        self.step(Rc::new(RefCell::new(operation)), output)
    }

    /// Attaches a terminal subscriber to the tail.
    #[must_use]
    pub fn to(mut self, subscriber: SharedSubscriber<T>) -> FlowBuilder<S, T> {
        if self.error.is_none() {
            self.error = self.tail.subscribe(subscriber).err();
        }
        self
    }

    /// Attaches a terminal consumer closure with the default demand of 1.
    #[must_use]
    pub fn to_each<F>(self, mut consumer: F) -> FlowBuilder<S, T>
    where
        F: FnMut(T) + 'static,
    {
        self.to(
            ConsumerSubscriber::new(move |item| {
                consumer(item);
                Ok(())
            })
            .into_shared(),
        )
    }

    /// Attaches a terminal consumer closure with an initial demand of
    /// `request_size`.
    #[must_use]
    pub fn to_each_with_request<F>(self, mut consumer: F, request_size: usize) -> FlowBuilder<S, T>
    where
        F: FnMut(T) + 'static,
    {
        self.to(
            ConsumerSubscriber::with_request_size(
                move |item| {
                    consumer(item);
                    Ok(())
                },
                request_size,
            )
            .into_shared(),
        )
    }

    /// Finishes the pipeline, returning the head publisher for driving.
    ///
    /// # Errors
    ///
    /// Returns the first wiring failure recorded while building.
    pub fn build(self) -> Result<Publisher<S>> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.head),
        }
    }
}
