// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Value`: an immutable, content-addressed data object.

use crate::pedigree::Pedigree;
use kiara_core::{ArchiveId, Cid, ValueId};
use kiara_types::ValueSchema;
use serde::{Deserialize, Serialize};

/// The lifecycle state of a value's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueStatus {
    /// Not yet assigned in a pipeline slot.
    Unset,
    /// An optional field was explicitly left unprovided.
    NotSet,
    /// An explicit null, semantically distinct from `NotSet`.
    None,
    /// Filled in from the schema's declared default.
    Default,
    /// Holds real data; `data_hash` is computed.
    Set,
}

impl ValueStatus {
    pub fn has_data(&self) -> bool {
        matches!(self, ValueStatus::Set | ValueStatus::Default)
    }
}

/// An immutable, content-addressed value.
///
/// Two values with the same `(schema, data_hash)` are equivalent; the data
/// registry deduplicates them under one `value_id` (see
/// [`crate::registry::DataRegistry::register_data`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub value_id: ValueId,
    pub schema: ValueSchema,
    pub status: ValueStatus,
    pub data_hash: Option<Cid>,
    pub size: u64,
    pub pedigree: Pedigree,
    pub data: Option<serde_json::Value>,
}

impl Value {
    /// Whether `self` and `other` would be treated as the same value by the
    /// data registry's dedup rule.
    pub fn is_equivalent_to(&self, other: &Value) -> bool {
        self.schema == other.schema && self.data_hash == other.data_hash
    }
}

/// A value that has been promoted into at least one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedValue {
    pub value_id: ValueId,
    pub archive_id: ArchiveId,
    pub aliases: Vec<String>,
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
