// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Outcome of a promise handler.

use crate::promise::Promise;

/// What a chaining handler produced for the derived promise.
///
/// Returning [`Completion::Pending`] defers the derived promise to another
/// promise: the derived promise adopts whatever that promise eventually
/// settles with. Because the inner promise can itself have been settled
/// through a chain, flattening is recursive and the derived promise only
/// ever sees base values.
pub enum Completion<T: Clone + 'static> {
    /// Settle the derived promise with this value.
    Value(T),
    /// Settle the derived promise with whatever this promise settles with.
    Pending(Promise<T>),
}

impl<T: Clone + std::fmt::Debug + 'static> std::fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Pending(_) => f.debug_tuple("Pending").finish(),
        }
    }
}
