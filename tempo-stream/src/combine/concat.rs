// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Concat: drains sources strictly one after another.

use crate::publisher::Publisher;
use crate::subscriber::Subscriber;
use crate::subscription::{Subscription, SubscriptionWeak};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tempo_core::{Result, TempoError};

struct ConcatShared<T: 'static> {
    output: Publisher<T>,
    queued: VecDeque<Publisher<T>>,
    current: Option<SubscriptionWeak<T>>,
    errored: bool,
}

struct ConcatSource<T: 'static> {
    shared: Rc<RefCell<ConcatShared<T>>>,
}

// Subscribes to the next queued source, or completes the output when none
// remain. Called once up front and again after each source completes.
fn subscribe_next<T: 'static>(shared: &Rc<RefCell<ConcatShared<T>>>) -> Result<()> {
    let next = shared.borrow_mut().queued.pop_front();
    match next {
        Some(source) => {
            let helper = Rc::new(RefCell::new(ConcatSource {
                shared: shared.clone(),
            }));
            let subscription = source.subscribe(helper)?;
            shared.borrow_mut().current = Some(subscription.downgrade());
            Ok(())
        }
        None => {
            let output = shared.borrow().output.clone();
            output.close();
            Ok(())
        }
    }
}

impl<T: 'static> Subscriber<T> for ConcatSource<T> {
    fn on_subscribe(&mut self, subscription: Subscription<T>) -> Result<()> {
        let output = self.shared.borrow().output.clone();
        subscription.executor().set_next(&output.executor())?;
        subscription.request(1);
        Ok(())
    }

    fn on_next(&mut self, item: T) -> Result<()> {
        let output = self.shared.borrow().output.clone();
        output.submit(item);
        Ok(())
    }

    fn on_completed(&mut self) -> Result<()> {
        if self.shared.borrow().errored {
            return Ok(());
        }
        subscribe_next(&self.shared)
    }

    fn on_error(&mut self, error: TempoError) -> Result<()> {
        let output = {
            let mut shared = self.shared.borrow_mut();
            if shared.errored {
                return Ok(());
            }
            shared.errored = true;
            shared.queued.clear();
            shared.output.clone()
        };
        output.fail(error);
        Ok(())
    }
}

/// Combines `sources` into one publisher that forwards each source in
/// order, subscribing to source *i + 1* only once source *i* completed.
///
/// # Errors
///
/// Fails when the first source cannot be subscribed; later subscribe
/// failures surface through the driving `run`.
pub fn concat<T: 'static>(sources: Vec<Publisher<T>>) -> Result<Publisher<T>> {
    let output = Publisher::new();
    let shared = Rc::new(RefCell::new(ConcatShared {
        output: output.clone(),
        queued: sources.into_iter().collect(),
        current: None,
        errored: false,
    }));
    {
        // Weak capture: the hook lives inside the output publisher, which
        // the shared state already owns.
        let shared = Rc::downgrade(&shared);
        output.set_cancel_hook(move || {
            let current = shared
                .upgrade()
                .and_then(|shared| shared.borrow().current.clone());
            if let Some(subscription) = current.as_ref().and_then(SubscriptionWeak::upgrade) {
                subscription.cancel();
            }
        });
    }
    subscribe_next(&shared)?;
    Ok(output)
}
