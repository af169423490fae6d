// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory `Archive`, for tests and for embedding contexts that don't
//! need durability.

use crate::{Archive, StorageError};
use kiara_core::ArchiveId;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

pub struct InMemoryArchive {
    archive_id: ArchiveId,
    archive_name: String,
    writable: bool,
    supported_item_types: HashSet<String>,
    entries: RwLock<HashMap<String, serde_json::Value>>,
}

impl InMemoryArchive {
    pub fn new(archive_name: impl Into<String>, supported_item_types: HashSet<String>) -> Self {
        Self {
            archive_id: ArchiveId::new(uuid::Uuid::new_v4().to_string()),
            archive_name: archive_name.into(),
            writable: true,
            supported_item_types,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }
}

impl Archive for InMemoryArchive {
    fn archive_id(&self) -> &ArchiveId {
        &self.archive_id
    }

    fn archive_name(&self) -> &str {
        &self.archive_name
    }

    fn is_writable(&self) -> bool {
        self.writable
    }

    fn supported_item_types(&self) -> HashSet<String> {
        self.supported_item_types.clone()
    }

    fn put(&self, key: &str, payload: serde_json::Value) -> Result<(), StorageError> {
        if !self.writable {
            return Err(StorageError::ArchiveReadOnly {
                archive_name: self.archive_name.clone(),
            });
        }
        self.entries.write().insert(key.to_string(), payload);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn list(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.read();
        let mut keys: Vec<String> = entries
            .keys()
            .filter(|k| prefix.map(|p| k.starts_with(p)).unwrap_or(true))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
