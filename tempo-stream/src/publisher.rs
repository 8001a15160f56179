// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Push source with pull-on-demand delivery.
//!
//! A [`Publisher`] accepts items via [`Publisher::submit`] at any time.
//! Items submitted before a subscriber attaches are buffered and delivered
//! in order on subscription; afterwards they flow through the
//! [`Subscription`](crate::Subscription) subject to the subscriber's demand.
//!
//! Basic publishers are **single-subscription**: a second concurrent
//! `subscribe` is a contract violation. Closing is idempotent and finalises
//! delivery: buffered items drain before the completion signal.
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tempo_stream::{ConsumerSubscriber, Publisher};
//!
//! let publisher = Publisher::new();
//! publisher.submit("early");
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! let consumer = ConsumerSubscriber::unbounded(move |item: &str| {
//!     sink.borrow_mut().push(item);
//!     Ok(())
//! });
//! publisher.subscribe(consumer.into_shared()).unwrap();
//!
//! publisher.submit("late");
//! publisher.close();
//! publisher.start().unwrap();
//! assert_eq!(*seen.borrow(), vec!["early", "late"]);
//! ```

use crate::subscriber::SharedSubscriber;
use crate::subscription::Subscription;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tempo_core::{Executor, Result, TempoError};

type CompletionCallback = Box<dyn FnOnce() -> Result<()>>;

pub(crate) struct PublisherState<T: 'static> {
    executor: Executor,
    pub(crate) subscription: Option<Subscription<T>>,
    pending: VecDeque<T>,
    closed: bool,
    pending_error: Option<TempoError>,
    close_callback: Option<CompletionCallback>,
    cancel_hook: Option<Rc<dyn Fn()>>,
}

/// A single-subscription push source bound to an [`Executor`].
///
/// `Publisher` is a cheaply clonable handle; all clones share the same
/// buffer and subscription.
pub struct Publisher<T: 'static> {
    state: Rc<RefCell<PublisherState<T>>>,
}

impl<T: 'static> Publisher<T> {
    /// Creates an open publisher on a fresh executor.
    #[must_use]
    pub fn new() -> Self {
        Self::with_executor(&Executor::new())
    }

    /// Creates an open publisher on the given executor.
    #[must_use]
    pub fn with_executor(executor: &Executor) -> Self {
        Self {
            state: Rc::new(RefCell::new(PublisherState {
                executor: executor.clone(),
                subscription: None,
                pending: VecDeque::new(),
                closed: false,
                pending_error: None,
                close_callback: None,
                cancel_hook: None,
            })),
        }
    }

    /// The owning executor.
    #[must_use]
    pub fn executor(&self) -> Executor {
        self.state.borrow().executor.clone()
    }

    /// The live subscription, if a subscriber is attached.
    #[must_use]
    pub fn subscription(&self) -> Option<Subscription<T>> {
        self.state.borrow().subscription.clone()
    }

    /// Returns `true` once the publisher has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    /// Hands an item to the stream: offered to the live subscription, or
    /// buffered until one attaches. Items submitted after
    /// [`close`](Self::close) are dropped.
    pub fn submit(&self, item: T) {
        let target = {
            let state = self.state.borrow();
            if state.closed {
                warn!("submit on a closed publisher: item dropped");
                return;
            }
            state.subscription.clone()
        };
        match target {
            Some(subscription) => subscription.offer(item),
            None => self.state.borrow_mut().pending.push_back(item),
        }
    }

    /// Attaches `subscriber` and returns its subscription.
    ///
    /// The subscriber's `on_subscribe` runs synchronously (issuing the
    /// initial request), then any pre-subscription buffer is offered in
    /// submission order. Subscribing to an already-closed publisher
    /// delivers the buffer followed by the terminal signal.
    ///
    /// # Errors
    ///
    /// Returns a contract violation when a subscription is already active,
    /// or whatever `on_subscribe` itself fails with.
    pub fn subscribe(&self, subscriber: SharedSubscriber<T>) -> Result<Subscription<T>> {
        let (executor, cancel_hook) = {
            let state = self.state.borrow();
            if state.subscription.is_some() {
                return Err(TempoError::contract_violation_hint(
                    "publisher already has an active subscription",
                    "basic publishers support a single subscriber",
                ));
            }
            (state.executor.clone(), state.cancel_hook.clone())
        };
        let subscription = Subscription::new(
            &executor,
            Rc::downgrade(&self.state),
            subscriber.clone(),
            cancel_hook,
        );
        let close_callback = {
            let mut state = self.state.borrow_mut();
            state.subscription = Some(subscription.clone());
            state.close_callback.take()
        };
        if let Some(callback) = close_callback {
            subscription.set_completion_callback(callback);
        }
        subscriber.borrow_mut().on_subscribe(subscription.clone())?;
        loop {
            let item = self.state.borrow_mut().pending.pop_front();
            match item {
                Some(item) => subscription.offer(item),
                None => break,
            }
        }
        let terminal = {
            let mut state = self.state.borrow_mut();
            if state.closed {
                Some(state.pending_error.take())
            } else {
                None
            }
        };
        match terminal {
            Some(Some(error)) => subscription.on_error(error),
            Some(None) => subscription.on_completed(),
            None => {}
        }
        Ok(subscription)
    }

    /// Detaches `subscription` if it is the one currently stored.
    /// Idempotent.
    pub fn unsubscribe(&self, subscription: &Subscription<T>) {
        let mut state = self.state.borrow_mut();
        if state
            .subscription
            .as_ref()
            .is_some_and(|current| current.same(subscription))
        {
            state.subscription = None;
        }
    }

    /// Closes the publisher: the buffer drains, then the subscriber's
    /// `on_completed` is signalled. Closing twice is ignored.
    pub fn close(&self) {
        self.close_inner(None);
    }

    /// Like [`close`](Self::close), with a callback invoked after the
    /// subscriber's `on_completed`.
    pub fn close_with<F>(&self, done: F)
    where
        F: FnOnce() -> Result<()> + 'static,
    {
        self.close_inner(Some(Box::new(done)));
    }

    fn close_inner(&self, callback: Option<CompletionCallback>) {
        let target = {
            let mut state = self.state.borrow_mut();
            if state.closed {
                warn!("close on an already closed publisher: ignored");
                return;
            }
            state.closed = true;
            state.subscription.clone()
        };
        match target {
            Some(subscription) => {
                loop {
                    let item = self.state.borrow_mut().pending.pop_front();
                    match item {
                        Some(item) => subscription.offer(item),
                        None => break,
                    }
                }
                if let Some(callback) = callback {
                    subscription.set_completion_callback(callback);
                }
                subscription.on_completed();
            }
            None => {
                self.state.borrow_mut().close_callback = callback;
            }
        }
    }

    /// Terminates the stream with `error`. Forwarded to the live
    /// subscription, or held for delivery to a later subscriber.
    pub fn fail(&self, error: TempoError) {
        let target = {
            let mut state = self.state.borrow_mut();
            if state.closed {
                warn!("fail on a closed publisher: error dropped");
                return;
            }
            state.closed = true;
            state.subscription.clone()
        };
        match target {
            Some(subscription) => subscription.on_error(error),
            None => self.state.borrow_mut().pending_error = Some(error),
        }
    }

    /// Drives the owning executor (and its chain) to quiescence.
    ///
    /// # Errors
    ///
    /// Propagates the first callback error.
    pub fn start(&self) -> Result<()> {
        self.executor().run()
    }

    // Installed hook is copied into every subscription this publisher
    // creates; combining publishers use it to cancel their sources when
    // the downstream subscription is cancelled.
    pub(crate) fn set_cancel_hook<F>(&self, hook: F)
    where
        F: Fn() + 'static,
    {
        self.state.borrow_mut().cancel_hook = Some(Rc::new(hook));
    }
}

impl<T: 'static> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: 'static> std::fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Publisher")
            .field("buffered", &state.pending.len())
            .field("subscribed", &state.subscription.is_some())
            .field("closed", &state.closed)
            .finish()
    }
}
