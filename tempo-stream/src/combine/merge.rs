// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Merge: interleaves every source into one stream.

use crate::combine::{cancel_all, SourceSubscriptions};
use crate::publisher::Publisher;
use crate::subscriber::Subscriber;
use crate::subscription::Subscription;
use std::cell::RefCell;
use std::rc::Rc;
use tempo_core::{Result, TempoError};

struct MergeShared<T: 'static> {
    output: Publisher<T>,
    remaining: usize,
    errored: bool,
}

struct MergeSource<T: 'static> {
    shared: Rc<RefCell<MergeShared<T>>>,
    siblings: SourceSubscriptions<T>,
}

impl<T: 'static> Subscriber<T> for MergeSource<T> {
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
        let output = {
            let mut shared = self.shared.borrow_mut();
            shared.remaining -= 1;
            if shared.remaining == 0 && !shared.errored {
                Some(shared.output.clone())
            } else {
                None
            }
        };
        if let Some(output) = output {
            output.close();
        }
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

/// Combines `sources` into one publisher that interleaves their elements.
///
/// The output completes once every source has completed. Merging an empty
/// source list yields an immediately completed publisher.
///
/// # Errors
///
/// Fails when a source cannot be subscribed, e.g. its executor is already
/// chained into another pipeline.
pub fn merge<T: 'static>(sources: Vec<Publisher<T>>) -> Result<Publisher<T>> {
    let output = Publisher::new();
    let shared = Rc::new(RefCell::new(MergeShared {
        output: output.clone(),
        remaining: sources.len(),
        errored: false,
    }));
    let siblings: SourceSubscriptions<T> = Rc::new(RefCell::new(Vec::new()));
    {
        let siblings = siblings.clone();
        output.set_cancel_hook(move || cancel_all(&siblings));
    }
    for source in &sources {
        let helper = Rc::new(RefCell::new(MergeSource {
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
