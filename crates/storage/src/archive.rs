// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Archive` contract: a pluggable persistence backend for values,
//! aliases, job records, or metadata.

use crate::StorageError;
use kiara_core::ArchiveId;
use std::collections::HashSet;

/// A mountable persistence backend.
///
/// Concrete backends (filesystem, sqlite, object storage) are out of scope
/// for this crate — it ships only the contract and [`crate::InMemoryArchive`],
/// a reference implementation sufficient to exercise the data registry and
/// scheduler in tests.
pub trait Archive: Send + Sync {
    fn archive_id(&self) -> &ArchiveId;

    fn archive_name(&self) -> &str;

    fn is_writable(&self) -> bool;

    /// The kinds of item this archive accepts (e.g. `"value"`, `"alias"`,
    /// `"job_record"`).
    fn supported_item_types(&self) -> HashSet<String>;

    /// Write `payload` under `key`. Fails with `ArchiveReadOnly` if
    /// `is_writable()` is false.
    fn put(&self, key: &str, payload: serde_json::Value) -> Result<(), StorageError>;

    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

    /// Keys under `prefix` (or every key, if `prefix` is `None`).
    fn list(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError>;
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
