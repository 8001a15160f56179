// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Time-based promise constructors over a [`ScheduledExecutor`].

use crate::promise::Promise;
use tempo_core::{ScheduledExecutor, TempoError};

impl<T: Clone + 'static> Promise<T> {
    /// Creates a promise that resolves with `value` after `delay` ticks.
    ///
    /// The scheduler enforces a minimum delay of 1 tick, so `delay(v, 0, s)`
    /// observably resolves at tick 1.
    #[must_use]
    pub fn delay(value: T, delay: u64, scheduler: &ScheduledExecutor) -> Promise<T> {
        let promise = Promise::new(scheduler.as_executor());
        let target = promise.clone();
        scheduler.schedule_delayed(move || target.resolve(value), delay);
        promise
    }

    /// Derives a promise that rejects with a timeout error unless this
    /// promise settles within `delay` ticks.
    ///
    /// When this promise settles first, the timer is cancelled and the
    /// settlement propagates; when the timer fires first, the derived
    /// promise rejects with "Timeout after `delay`" and a later settlement
    /// of this promise is ignored by the derived one.
    ///
    /// The propagation handlers are attached directly to this promise's
    /// handler lists rather than through [`then`](Self::then): an
    /// intermediate promise would break chains that consume the result.
    #[must_use]
    pub fn timeout(&self, delay: u64, scheduler: &ScheduledExecutor) -> Promise<T> {
        let derived = Promise::new(&self.executor());

        let timeout_target = derived.clone();
        let timer = scheduler.schedule_delayed(
            move || {
                if timeout_target.is_in_progress() {
                    timeout_target.reject(TempoError::timeout_error(format!(
                        "Timeout after {delay}"
                    )))
                } else {
                    Ok(())
                }
            },
            delay,
        );

        let ok_target = derived.clone();
        let ok_scheduler = scheduler.clone();
        let err_target = derived.clone();
        let err_scheduler = scheduler.clone();
        self.attach(
            move |value| {
                ok_scheduler.cancel_scheduled(timer);
                if ok_target.is_in_progress() {
                    ok_target.resolve(value)
                } else {
                    Ok(())
                }
            },
            move |error| {
                err_scheduler.cancel_scheduled(timer);
                if err_target.is_in_progress() {
                    err_target.reject(error)
                } else {
                    Ok(())
                }
            },
        );
        derived
    }
}
