// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Executor variant with time-based callbacks.
//!
//! A [`ScheduledExecutor`] wraps an [`Executor`] and adds a sorted queue of
//! timers over a simulated clock. The clock runs in **tick-time**: it starts
//! at 0 and advances only inside [`ScheduledExecutor::run`], jumping straight
//! to the next pending expiry once all immediate work (including chained
//! executors) has flushed. There is no relation to wall-clock time.
//!
//! ## Characteristics
//!
//! - Immediate callbacks always flush before time advances, so a callback
//!   that cancels a near-future timer is guaranteed to win.
//! - `schedule_delayed` promotes a zero delay to 1 tick: timer work never
//!   fires at the current instant and never races `next_tick` work.
//! - Timers due at the same instant fire in scheduling order (id order).
//! - Cancellation is lazy: a cancelled entry keeps its slot until it is
//!   scanned over or would have fired.
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tempo_core::ScheduledExecutor;
//!
//! let scheduler = ScheduledExecutor::new();
//! let fired = Rc::new(Cell::new(false));
//!
//! let flag = fired.clone();
//! scheduler.schedule_delayed(
//!     move || {
//!         flag.set(true);
//!         Ok(())
//!     },
//!     10,
//! );
//!
//! scheduler.run().unwrap();
//! assert!(fired.get());
//! assert_eq!(scheduler.current_time(), 10);
//! ```

use crate::error::Result;
use crate::executor::{Executor, Thunk};
use std::cell::RefCell;
use std::rc::Rc;

/// Identifier returned by [`ScheduledExecutor::schedule_delayed`].
///
/// Ids are allocated from a monotonically increasing 64-bit counter and are
/// never reused within a process lifetime.
pub type TimerId = u64;

struct TimerEntry {
    expiry: u64,
    id: TimerId,
    thunk: Thunk,
    cancelled: bool,
}

struct TimerQueue {
    // Sorted non-decreasing by (expiry, id).
    entries: Vec<TimerEntry>,
    now: u64,
    next_id: TimerId,
}

/// An [`Executor`] that additionally supports time-based callbacks.
///
/// The immediate-queue surface (`next_tick`, `tick`, `is_done`) delegates to
/// the wrapped executor, which is also available via
/// [`as_executor`](Self::as_executor) for collaborators that only need to
/// enqueue work (promises, publishers).
pub struct ScheduledExecutor {
    base: Executor,
    timers: Rc<RefCell<TimerQueue>>,
}

impl ScheduledExecutor {
    /// Creates a scheduler with an empty queue and the clock at 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: Executor::new(),
            timers: Rc::new(RefCell::new(TimerQueue {
                entries: Vec::new(),
                now: 0,
                next_id: 1,
            })),
        }
    }

    /// The underlying immediate executor.
    #[must_use]
    pub fn as_executor(&self) -> &Executor {
        &self.base
    }

    /// Appends a thunk to the immediate queue. See [`Executor::next_tick`].
    pub fn next_tick<F>(&self, thunk: F)
    where
        F: FnOnce() -> Result<()> + 'static,
    {
        self.base.next_tick(thunk);
    }

    /// Drains the immediate queue once. See [`Executor::tick`].
    ///
    /// # Errors
    ///
    /// Propagates the first thunk error.
    pub fn tick(&self) -> Result<()> {
        self.base.tick()
    }

    /// Returns `true` if the immediate queue is empty. Pending timers do not
    /// count; see [`timer_count`](Self::timer_count).
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.base.is_done()
    }

    /// Schedules `thunk` to fire `delay` ticks from now and returns its id.
    ///
    /// A delay of 0 is promoted to 1 so that the expiry is always in the
    /// future; this is observable to callers and kept for determinism.
    pub fn schedule_delayed<F>(&self, thunk: F, delay: u64) -> TimerId
    where
        F: FnOnce() -> Result<()> + 'static,
    {
        let mut queue = self.timers.borrow_mut();
        let expiry = queue.now + delay.max(1);
        let id = queue.next_id;
        queue.next_id += 1;
        let entry = TimerEntry {
            expiry,
            id,
            thunk: Box::new(thunk),
            cancelled: false,
        };
        // Common case: new expiry is the latest, O(1) append. Otherwise
        // binary search keeps (expiry, id) order; the fresh id sorts after
        // every existing entry with the same expiry.
        let append = queue.entries.last().is_none_or(|last| expiry >= last.expiry);
        if append {
            queue.entries.push(entry);
        } else {
            let at = queue.entries.partition_point(|e| e.expiry <= expiry);
            queue.entries.insert(at, entry);
        }
        id
    }

    /// Marks the timer `id` cancelled. Returns 1 when a live timer was
    /// found, 0 otherwise; cancelling an unknown or already-cancelled id is
    /// never an error.
    pub fn cancel_scheduled(&self, id: TimerId) -> usize {
        let mut queue = self.timers.borrow_mut();
        match queue.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) if !entry.cancelled => {
                entry.cancelled = true;
                1
            }
            _ => 0,
        }
    }

    /// The scheduler's clock, in ticks since creation.
    #[must_use]
    pub fn current_time(&self) -> u64 {
        self.timers.borrow().now
    }

    /// Number of pending, non-cancelled timers.
    #[must_use]
    pub fn timer_count(&self) -> usize {
        self.timers
            .borrow()
            .entries
            .iter()
            .filter(|e| !e.cancelled)
            .count()
    }

    /// Drains immediate work, then advances the clock timer by timer, until
    /// neither queued thunks nor pending timers remain.
    ///
    /// The ordering is load-bearing: all immediate work, including chained
    /// executors, flushes before the clock moves, so resolutions scheduled
    /// "now" always beat a timer due at the next instant.
    ///
    /// # Errors
    ///
    /// Propagates the first thunk or timer error; later timers remain
    /// scheduled.
    pub fn run(&self) -> Result<()> {
        loop {
            if !self.base.is_chain_done() {
                self.base.run()?;
                continue;
            }
            if self.fire_next_due()? {
                continue;
            }
            break;
        }
        Ok(())
    }

    // Advances the clock to the earliest pending expiry and fires every
    // timer due at that instant, in id order. Returns false when no pending
    // timer remains. Cancelled entries scanned over are dropped.
    fn fire_next_due(&self) -> Result<bool> {
        let expiry = {
            let mut queue = self.timers.borrow_mut();
            while queue.entries.first().is_some_and(|e| e.cancelled) {
                queue.entries.remove(0);
            }
            let expiry = match queue.entries.first() {
                Some(entry) => entry.expiry,
                None => return Ok(false),
            };
            queue.now = expiry;
            expiry
        };
        loop {
            let entry = {
                let mut queue = self.timers.borrow_mut();
                if !queue.entries.first().is_some_and(|e| e.expiry == expiry) {
                    break;
                }
                queue.entries.remove(0)
            };
            if entry.cancelled {
                continue;
            }
            // Invoked with no borrow held: the timer may schedule or cancel
            // other timers.
            (entry.thunk)()?;
        }
        Ok(true)
    }
}

impl Default for ScheduledExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ScheduledExecutor {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            timers: self.timers.clone(),
        }
    }
}

impl std::fmt::Debug for ScheduledExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledExecutor")
            .field("now", &self.current_time())
            .field("pending", &self.base.pending_count())
            .field("timers", &self.timer_count())
            .finish()
    }
}
