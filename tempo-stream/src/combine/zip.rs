// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Zip: pairs one element from every source through a combiner.
//!
//! Every source gets its own FIFO buffer; a pairing pops the head of each
//! buffer (index order) and offers the combined result downstream. Across
//! pairings the output is strictly in insertion order.
//!
//! Completion is **state-based**: the output closes as soon as some source
//! has completed with an empty buffer (no pairing can ever form again),
//! and never earlier. Deciding on buffer state rather than timing matters
//! because deliveries take two ticks: a timing-based rule would race with
//! pairs that are emitted but not yet delivered downstream.

use crate::combine::{cancel_all, SourceSubscriptions};
use crate::publisher::Publisher;
use crate::subscriber::Subscriber;
use crate::subscription::Subscription;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tempo_core::{Result, TempoError};

struct ZipShared<T: 'static, U: 'static> {
    output: Publisher<U>,
    buffers: Vec<VecDeque<T>>,
    completed: Vec<bool>,
    errored: bool,
    combiner: Rc<dyn Fn(Vec<T>) -> U>,
}

struct ZipSource<T: 'static, U: 'static> {
    index: usize,
    shared: Rc<RefCell<ZipShared<T, U>>>,
    siblings: SourceSubscriptions<T>,
}

// Emits pairings while every buffer has a head. The combiner is user code
// and runs with no borrow held.
fn try_emit<T: 'static, U: 'static>(shared: &Rc<RefCell<ZipShared<T, U>>>) {
    loop {
        let emission = {
            let mut state = shared.borrow_mut();
            if state.errored || state.buffers.iter().any(VecDeque::is_empty) {
                None
            } else {
                let mut values = Vec::with_capacity(state.buffers.len());
                for buffer in &mut state.buffers {
                    match buffer.pop_front() {
                        Some(value) => values.push(value),
                        None => return,
                    }
                }
                Some((state.combiner.clone(), values, state.output.clone()))
            }
        };
        match emission {
            Some((combiner, values, output)) => output.submit(combiner(values)),
            None => break,
        }
    }
}

// State-based completion: once a completed source's buffer is empty, no
// further pairing can form, so the stream is done.
fn check_for_completion<T: 'static, U: 'static>(shared: &Rc<RefCell<ZipShared<T, U>>>) {
    let output = {
        let state = shared.borrow();
        let exhausted = state
            .completed
            .iter()
            .zip(&state.buffers)
            .any(|(completed, buffer)| *completed && buffer.is_empty());
        if exhausted && !state.errored && !state.output.is_closed() {
            Some(state.output.clone())
        } else {
            None
        }
    };
    if let Some(output) = output {
        output.close();
    }
}

impl<T: 'static, U: 'static> Subscriber<T> for ZipSource<T, U> {
    fn on_subscribe(&mut self, subscription: Subscription<T>) -> Result<()> {
        let output = self.shared.borrow().output.clone();
        subscription.executor().set_next(&output.executor())?;
        subscription.request(1);
        Ok(())
    }

    fn on_next(&mut self, item: T) -> Result<()> {
        self.shared.borrow_mut().buffers[self.index].push_back(item);
        try_emit(&self.shared);
        check_for_completion(&self.shared);
        Ok(())
    }

    fn on_completed(&mut self) -> Result<()> {
        self.shared.borrow_mut().completed[self.index] = true;
        check_for_completion(&self.shared);
        Ok(())
    }

    fn on_error(&mut self, error: TempoError) -> Result<()> {
        let output = {
            let mut shared = self.shared.borrow_mut();
            if shared.errored {
                return Ok(());
            }
            shared.errored = true;
            shared.output.clone()
        };
        output.fail(error);
        cancel_all(&self.siblings);
        Ok(())
    }
}

/// Combines `sources` element-wise: the n-th output is
/// `combiner(first_n, …, last_n)` over the n-th element of every source.
///
/// The output completes once any source completes with no unpaired
/// elements left; unpaired leftovers of longer sources are discarded.
/// Zipping an empty source list yields an immediately completed publisher.
///
/// # Errors
///
/// Fails when a source cannot be subscribed, e.g. its executor is already
/// chained into another pipeline.
pub fn zip<T: 'static, U: 'static, F>(
    sources: Vec<Publisher<T>>,
    combiner: F,
) -> Result<Publisher<U>>
where
    F: Fn(Vec<T>) -> U + 'static,
{
    let output = Publisher::new();
    let shared = Rc::new(RefCell::new(ZipShared {
        output: output.clone(),
        buffers: sources.iter().map(|_| VecDeque::new()).collect(),
        completed: vec![false; sources.len()],
        errored: false,
        combiner: Rc::new(combiner),
    }));
    let siblings: SourceSubscriptions<T> = Rc::new(RefCell::new(Vec::new()));
    {
        let siblings = siblings.clone();
        output.set_cancel_hook(move || cancel_all(&siblings));
    }
    for (index, source) in sources.iter().enumerate() {
        let helper = Rc::new(RefCell::new(ZipSource {
            index,
            shared: shared.clone(),
            siblings: siblings.clone(),
        }));
        let subscription = source.subscribe(helper)?;
        siblings.borrow_mut().push(subscription.downgrade());
    }
    if sources.is_empty() {
        output.close();
    }
    Ok(output)
}
