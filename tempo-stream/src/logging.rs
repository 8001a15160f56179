// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Logging macro for the stream layer.
//!
//! The publisher warns on contract-adjacent no-ops (submit, close, or fail
//! on a closed publisher); that is the only level this crate emits. With
//! the `tracing` feature enabled the macro forwards to `tracing::warn!`;
//! without it, it falls back to stderr so the warnings stay visible in
//! plain builds.

#[cfg(feature = "tracing")]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        eprintln!($($arg)*)
    };
}
