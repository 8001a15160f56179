// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the tempo runtime.
//!
//! This module defines the root [`TempoError`] type shared by every crate in
//! the workspace. Errors carry a human-readable message and, where it helps,
//! an optional hint that is appended to the rendered message. There are no
//! error codes.
//!
//! # Examples
//!
//! ```
//! use tempo_core::{Result, TempoError};
//!
//! fn settle_twice() -> Result<()> {
//!     Err(TempoError::contract_violation("Cannot resolve an already settled promise"))
//! }
//! ```

/// Root error type for all tempo operations.
#[derive(Debug, thiserror::Error)]
pub enum TempoError {
    /// An API was used outside its contract.
    ///
    /// Raised for double-settling a promise, attaching a second subscription
    /// to a single-subscriber publisher, or re-chaining an executor that is
    /// already chained elsewhere.
    #[error("Contract violation: {context}{}", render_hint(.hint))]
    ContractViolation {
        /// Description of the violated contract
        context: String,
        /// Optional guidance appended to the rendered message
        hint: Option<String>,
    },

    /// A time-based operation exceeded its deadline.
    ///
    /// Delivered as a rejection through promise chains created by
    /// `Promise::timeout`.
    #[error("Timeout error: {context}")]
    Timeout {
        /// Context about the timeout (e.g. the delay that elapsed)
        context: String,
    },

    /// Custom error from user code.
    ///
    /// Wraps errors produced by user-provided callbacks so they can
    /// propagate out of a driving `run` call.
    #[error("User error: {0}")]
    User(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn render_hint(hint: &Option<String>) -> String {
    hint.as_ref()
        .map_or_else(String::new, |h| format!(" (hint: {h})"))
}

impl TempoError {
    /// Create a contract violation with the given context.
    pub fn contract_violation(context: impl Into<String>) -> Self {
        Self::ContractViolation {
            context: context.into(),
            hint: None,
        }
    }

    /// Create a contract violation carrying a hint for the caller.
    pub fn contract_violation_hint(context: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::ContractViolation {
            context: context.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create a timeout error with the given context.
    pub fn timeout_error(context: impl Into<String>) -> Self {
        Self::Timeout {
            context: context.into(),
        }
    }

    /// Wrap a user error.
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::User(Box::new(error))
    }

    /// Check whether this error is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check whether this error is a contract violation.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }
}

/// Specialized Result type for tempo operations.
pub type Result<T> = std::result::Result<T, TempoError>;

// A boxed user error cannot be cloned; its message survives instead.
#[derive(Debug)]
struct OpaqueUserError(String);

impl std::fmt::Display for OpaqueUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for OpaqueUserError {}

impl Clone for TempoError {
    fn clone(&self) -> Self {
        match self {
            Self::ContractViolation { context, hint } => Self::ContractViolation {
                context: context.clone(),
                hint: hint.clone(),
            },
            Self::Timeout { context } => Self::Timeout {
                context: context.clone(),
            },
            Self::User(e) => Self::User(Box::new(OpaqueUserError(e.to_string()))),
        }
    }
}
