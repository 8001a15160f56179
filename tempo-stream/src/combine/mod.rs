// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Combining publishers: fan-in from multiple sources.
//!
//! Each factory subscribes internal helper subscribers to its sources and
//! returns the output [`Publisher`](crate::Publisher). Every helper chains
//! its source's executor to the output executor on subscribe, so driving a
//! source also drives the combined stream.
//!
//! Failure semantics are shared: an error from any source is forwarded
//! downstream once and all sibling source subscriptions are cancelled;
//! cancelling the output's downstream subscription cancels every source
//! subscription.

pub mod concat;
pub mod merge;
pub mod zip;

pub use concat::concat;
pub use merge::merge;
pub use zip::zip;

use crate::subscription::SubscriptionWeak;
use std::cell::RefCell;
use std::rc::Rc;

// Shared registry of source subscriptions, used both by the output
// publisher's cancel hook and by error forwarding.
pub(crate) type SourceSubscriptions<T> = Rc<RefCell<Vec<SubscriptionWeak<T>>>>;

pub(crate) fn cancel_all<T: 'static>(subscriptions: &SourceSubscriptions<T>) {
    for weak in subscriptions.borrow().iter() {
        if let Some(subscription) = weak.upgrade() {
            subscription.cancel();
        }
    }
}
