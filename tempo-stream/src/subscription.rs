// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-subscriber delivery state.
//!
//! A [`Subscription`] mediates between one publisher and one subscriber: it
//! buffers offered items, tracks outstanding demand, and turns both into
//! scheduled deliveries on the owning executor.
//!
//! ## Two-tick delivery
//!
//! Delivery is deliberately asynchronous in two hops: `offer` only buffers
//! and schedules a drain; the drain (tick 1) moves drainable items into
//! scheduled deliveries; each delivery (tick 2) invokes the subscriber's
//! `on_next`. Exactly two ticks elapse between an offer and its arrival.
//! Combining publishers rely on this cadence: completion decisions are made
//! on buffer state, never on timing, precisely because deliveries are still
//! in flight when upstream signals arrive.
//!
//! ## Terminal ordering
//!
//! `on_completed`/`on_error` record a pending terminal event which is only
//! scheduled once the buffer is empty and no delivery is in flight: final
//! elements always beat completion.
//!
//! ## Cancellation
//!
//! `cancel` is idempotent. A delivery that was already scheduled when
//! `cancel` arrived is still dispatched (at most one element after a cancel
//! issued from within `on_next`); terminal events are suppressed outright.

use crate::publisher::PublisherState;
use crate::subscriber::SharedSubscriber;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use tempo_core::{Executor, Result, TempoError};

enum TerminalEvent {
    Completed,
    Errored(TempoError),
}

type CompletionCallback = Box<dyn FnOnce() -> Result<()>>;

struct SubscriptionState<T: 'static> {
    executor: Executor,
    // Back-references are weak; the publisher owns the subscription.
    publisher: Weak<RefCell<PublisherState<T>>>,
    subscriber: Option<SharedSubscriber<T>>,
    buffer: VecDeque<T>,
    requested: usize,
    in_flight: usize,
    cancelled: bool,
    pending_terminal: Option<TerminalEvent>,
    terminal_scheduled: bool,
    terminal_delivered: bool,
    completion_callback: Option<CompletionCallback>,
    cancel_hook: Option<Rc<dyn Fn()>>,
}

/// Delivery state between one publisher and one subscriber.
///
/// `Subscription` is a cheaply clonable handle; see the
/// [module documentation](self) for the delivery model.
pub struct Subscription<T: 'static> {
    state: Rc<RefCell<SubscriptionState<T>>>,
}

/// Weak counterpart of [`Subscription`], used for upstream back-references.
pub struct SubscriptionWeak<T: 'static> {
    state: Weak<RefCell<SubscriptionState<T>>>,
}

impl<T: 'static> Subscription<T> {
    pub(crate) fn new(
        executor: &Executor,
        publisher: Weak<RefCell<PublisherState<T>>>,
        subscriber: SharedSubscriber<T>,
        cancel_hook: Option<Rc<dyn Fn()>>,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(SubscriptionState {
                executor: executor.clone(),
                publisher,
                subscriber: Some(subscriber),
                buffer: VecDeque::new(),
                requested: 0,
                in_flight: 0,
                cancelled: false,
                pending_terminal: None,
                terminal_scheduled: false,
                terminal_delivered: false,
                completion_callback: None,
                cancel_hook,
            })),
        }
    }

    /// The executor deliveries are scheduled on.
    #[must_use]
    pub fn executor(&self) -> Executor {
        self.state.borrow().executor.clone()
    }

    /// Adds `n` to the outstanding demand and schedules a drain when
    /// buffered items can now move. `request(0)` is a no-op.
    pub fn request(&self, n: usize) {
        if n == 0 {
            return;
        }
        let drain = {
            let mut state = self.state.borrow_mut();
            if state.cancelled {
                return;
            }
            state.requested = state.requested.saturating_add(n);
            !state.buffer.is_empty()
        };
        if drain {
            self.schedule_drain();
        }
    }

    /// Hands an item to the buffer. Dropped silently when the subscription
    /// is cancelled or a terminal event has been recorded.
    pub fn offer(&self, item: T) {
        let drain = {
            let mut state = self.state.borrow_mut();
            if state.cancelled || state.terminal_delivered || state.pending_terminal.is_some() {
                return;
            }
            state.buffer.push_back(item);
            state.requested > 0
        };
        if drain {
            self.schedule_drain();
        }
    }

    /// Records stream completion. Delivery of the subscriber's
    /// `on_completed` waits for buffered and in-flight items.
    pub fn on_completed(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.cancelled || state.terminal_delivered || state.pending_terminal.is_some() {
                return;
            }
            state.pending_terminal = Some(TerminalEvent::Completed);
        }
        self.maybe_schedule_terminal();
    }

    /// Records stream failure. Same ordering rules as
    /// [`on_completed`](Self::on_completed).
    pub fn on_error(&self, error: TempoError) {
        {
            let mut state = self.state.borrow_mut();
            if state.cancelled || state.terminal_delivered || state.pending_terminal.is_some() {
                return;
            }
            state.pending_terminal = Some(TerminalEvent::Errored(error));
        }
        self.maybe_schedule_terminal();
    }

    /// Cancels the subscription: no further deliveries are scheduled,
    /// terminal events are suppressed, and the subscriber is notified via
    /// `on_unsubscribe` on the next tick. Idempotent.
    pub fn cancel(&self) {
        let (hook, publisher, subscriber, executor) = {
            let mut state = self.state.borrow_mut();
            if state.cancelled {
                return;
            }
            state.cancelled = true;
            state.buffer.clear();
            state.pending_terminal = None;
            (
                state.cancel_hook.take(),
                state.publisher.clone(),
                state.subscriber.take(),
                state.executor.clone(),
            )
        };
        if let Some(hook) = hook {
            hook();
        }
        if let Some(publisher) = publisher.upgrade() {
            let mut pub_state = publisher.borrow_mut();
            if pub_state
                .subscription
                .as_ref()
                .is_some_and(|current| current.same(self))
            {
                pub_state.subscription = None;
            }
        }
        if let Some(subscriber) = subscriber {
            // Deferred: cancel is frequently called from inside on_next,
            // while the subscriber cell is already borrowed.
            executor.next_tick(move || {
                subscriber.borrow_mut().on_unsubscribe();
                Ok(())
            });
        }
    }

    /// Returns `true` once cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.borrow().cancelled
    }

    /// Returns `true` once a terminal event has been recorded or delivered.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        let state = self.state.borrow();
        state.terminal_delivered || state.pending_terminal.is_some()
    }

    /// Outstanding demand not yet consumed by deliveries.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.state.borrow().requested
    }

    /// Returns `true` when `other` is a handle to this same subscription.
    #[must_use]
    pub fn same(&self, other: &Subscription<T>) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Downgrades to a weak handle for upstream back-references.
    #[must_use]
    pub fn downgrade(&self) -> SubscriptionWeak<T> {
        SubscriptionWeak {
            state: Rc::downgrade(&self.state),
        }
    }

    pub(crate) fn set_completion_callback(&self, callback: CompletionCallback) {
        self.state.borrow_mut().completion_callback = Some(callback);
    }

    fn schedule_drain(&self) {
        let this = self.clone();
        self.executor().next_tick(move || {
            this.drain_buffer();
            Ok(())
        });
    }

    // Moves every currently drainable item into a scheduled delivery.
    fn drain_buffer(&self) {
        loop {
            let item = {
                let mut state = self.state.borrow_mut();
                if state.cancelled || state.requested == 0 || state.buffer.is_empty() {
                    None
                } else {
                    state.requested -= 1;
                    state.in_flight += 1;
                    state.buffer.pop_front()
                }
            };
            match item {
                Some(item) => {
                    let this = self.clone();
                    self.executor().next_tick(move || this.deliver(item));
                }
                None => break,
            }
        }
        self.maybe_schedule_terminal();
    }

    /// Delivers `item` to the subscriber directly, then replenishes one
    /// unit of demand. This is the delivery step the drain schedules;
    /// calling it yourself bypasses the buffer and demand accounting.
    ///
    /// # Errors
    ///
    /// Propagates the subscriber's `on_next` failure.
    pub fn on_next(&self, item: T) -> Result<()> {
        let subscriber = {
            let state = self.state.borrow();
            if state.cancelled {
                None
            } else {
                state.subscriber.clone()
            }
        };
        if let Some(subscriber) = subscriber {
            subscriber.borrow_mut().on_next(item)?;
            let replenish = {
                let state = self.state.borrow();
                !state.cancelled && !state.terminal_delivered && state.pending_terminal.is_none()
            };
            if replenish {
                self.request(1);
            }
        }
        self.maybe_schedule_terminal();
        Ok(())
    }

    // Scheduled delivery path: settles the in-flight accounting before the
    // actual dispatch.
    fn deliver(&self, item: T) -> Result<()> {
        self.state.borrow_mut().in_flight -= 1;
        self.on_next(item)
    }

    // Schedules the pending terminal event once every prior delivery has
    // landed.
    fn maybe_schedule_terminal(&self) {
        let event = {
            let mut state = self.state.borrow_mut();
            if state.cancelled || state.terminal_scheduled || state.terminal_delivered {
                return;
            }
            if state.pending_terminal.is_none()
                || !state.buffer.is_empty()
                || state.in_flight > 0
            {
                return;
            }
            state.terminal_scheduled = true;
            state.pending_terminal.take()
        };
        if let Some(event) = event {
            let this = self.clone();
            self.executor().next_tick(move || this.deliver_terminal(event));
        }
    }

    fn deliver_terminal(&self, event: TerminalEvent) -> Result<()> {
        let (subscriber, callback) = {
            let mut state = self.state.borrow_mut();
            if state.cancelled || state.terminal_delivered {
                return Ok(());
            }
            state.terminal_delivered = true;
            (state.subscriber.clone(), state.completion_callback.take())
        };
        match event {
            TerminalEvent::Completed => {
                if let Some(subscriber) = subscriber {
                    subscriber.borrow_mut().on_completed()?;
                }
                if let Some(callback) = callback {
                    callback()?;
                }
            }
            TerminalEvent::Errored(error) => {
                if let Some(subscriber) = subscriber {
                    subscriber.borrow_mut().on_error(error)?;
                }
            }
        }
        self.cancel();
        Ok(())
    }
}

impl<T: 'static> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: 'static> SubscriptionWeak<T> {
    /// Recovers a strong handle while the subscription is alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Subscription<T>> {
        self.state.upgrade().map(|state| Subscription { state })
    }
}

impl<T: 'static> Clone for SubscriptionWeak<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: 'static> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Subscription")
            .field("buffered", &state.buffer.len())
            .field("requested", &state.requested)
            .field("cancelled", &state.cancelled)
            .finish()
    }
}
