// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error model.
//!
//! Every component crate defines its own `thiserror` enum for its failure
//! modes (mirroring the lead crate's `WalError`/`ExecuteError` split), then
//! converts into [`KiaraError`] at the boundary where callers need one
//! stable `kind()` plus a free-form details map rather than a matchable
//! per-crate enum.

use std::collections::HashMap;
use std::fmt;

/// Coarse classification of a [`KiaraError`], stable across every producing
/// crate. Callers that only need to branch on category (e.g. "was this a
/// configuration mistake or a runtime failure?") match on this instead of
/// threading every crate's concrete error type through the call stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A configuration value was missing, malformed, or violated a
    /// documented constraint (e.g. a strict-mode job submitted without a
    /// `comment`).
    Configuration,
    /// A value, alias, type, module, or operation lookup failed, or a
    /// payload failed to validate against its declared type.
    Data,
    /// A job or pipeline could not be scheduled or run to completion.
    Scheduling,
    /// An archive failed to read or write, or was asked to write while
    /// read-only.
    Storage,
    /// Any failure that does not fit the above (I/O, serialization,
    /// internal invariant violations).
    System,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Data => "data",
            ErrorKind::Scheduling => "scheduling",
            ErrorKind::Storage => "storage",
            ErrorKind::System => "system",
        };
        write!(f, "{s}")
    }
}

/// Aggregate error type for cross-crate boundaries.
///
/// Component crates keep their own `thiserror` enums for internal matching;
/// `KiaraError` is what escapes into `kiara-context` and the integration
/// tests, the same way the lead crate folds storage/engine errors into one
/// reportable shape at its outer edges.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct KiaraError {
    kind: ErrorKind,
    message: String,
    details: HashMap<String, String>,
}

impl KiaraError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Data, message)
    }

    pub fn scheduling(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Scheduling, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::System, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn details(&self) -> &HashMap<String, String> {
        &self.details
    }

    /// Attach a contextual key (e.g. `"job_id"`, `"value_id"`, `"step_id"`)
    /// and return `self` for chaining at the construction site.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
