// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Drive helpers for multi-executor tests.

use tempo_core::{Executor, Result};

/// Runs every executor until the whole set is quiescent.
///
/// With multiple independent sources (merge/concat/zip tests), work drained
/// from one executor can enqueue onto another that already ran this round;
/// `settle` keeps cycling until no executor in the set has chain work left.
///
/// # Errors
///
/// Propagates the first callback error.
pub fn settle(executors: &[Executor]) -> Result<()> {
    loop {
        for executor in executors {
            executor.run()?;
        }
        if executors.iter().all(Executor::is_chain_done) {
            return Ok(());
        }
    }
}
