// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Data Registry (C3): creates and deduplicates [`Value`]s, persists
//! them to a mounted archive, and maintains the alias table.
//!
//! A single `RwLock` guards the value map and a second guards the dedup
//! index, the same "one lock guards one map" layout the lead crate uses
//! for its storage/engine state, generalized from jobs to values.

use crate::alias::AliasTable;
use crate::error::DataError;
use crate::pedigree::{Pedigree, PedigreeDag, PedigreeNode};
use crate::value::{PersistedValue, Value, ValueStatus};
use kiara_bus::Producer;
use kiara_core::hash::Structural;
use kiara_core::{cid, Cid, Event, IdGen, UuidIdGen, ValueId};
use kiara_storage::Archive;
use kiara_types::{TypeRegistry, ValueSchema};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

type DedupKey = (Cid, Cid);

/// Owns every registered value, the alias table, and the archive(s) values
/// are persisted to.
pub struct DataRegistry {
    type_registry: Arc<TypeRegistry>,
    id_gen: Arc<dyn IdGen>,
    values: RwLock<HashMap<ValueId, Value>>,
    dedup: RwLock<HashMap<DedupKey, ValueId>>,
    aliases: AliasTable,
    storable_orphans: RwLock<HashSet<ValueId>>,
    archive: Arc<dyn Archive>,
    events: Producer,
}

impl DataRegistry {
    pub fn new(type_registry: Arc<TypeRegistry>, archive: Arc<dyn Archive>, events: Producer) -> Self {
        Self::with_id_gen(type_registry, archive, events, Arc::new(UuidIdGen))
    }

    pub fn with_id_gen(
        type_registry: Arc<TypeRegistry>,
        archive: Arc<dyn Archive>,
        events: Producer,
        id_gen: Arc<dyn IdGen>,
    ) -> Self {
        Self::with_options(type_registry, archive, events, id_gen, false)
    }

    /// Full constructor: `keep_alias_reverse_pointers` resolves spec.md §9's
    /// alias reverse-index open question (see `kiara_context::Environment`).
    pub fn with_options(
        type_registry: Arc<TypeRegistry>,
        archive: Arc<dyn Archive>,
        events: Producer,
        id_gen: Arc<dyn IdGen>,
        keep_alias_reverse_pointers: bool,
    ) -> Self {
        Self {
            type_registry,
            id_gen,
            values: RwLock::new(HashMap::new()),
            dedup: RwLock::new(HashMap::new()),
            aliases: AliasTable::new(keep_alias_reverse_pointers),
            storable_orphans: RwLock::new(HashSet::new()),
            archive,
            events,
        }
    }

    /// Register `payload` against `schema`, deduplicating against any
    /// existing equivalent value (same schema + data_hash).
    pub fn register_data(
        &self,
        payload: serde_json::Value,
        schema: ValueSchema,
        pedigree: Pedigree,
    ) -> Result<Value, DataError> {
        let handler = self.type_registry.get(&schema.type_name)?;
        handler
            .validate(&schema.type_config, &payload)
            .map_err(|e| match e {
                kiara_types::TypesError::TypeMismatch { type_name, reason } => {
                    DataError::SchemaViolation { type_name, reason }
                }
                other => DataError::Type(other),
            })?;

        let data_hash = handler.calculate_hash(&payload)?;
        let size = handler.calculate_size(&payload);
        let schema_hash = schema_hash(&schema);

        let dedup_key = (schema_hash, data_hash.clone());
        if let Some(existing_id) = self.dedup.read().get(&dedup_key).cloned() {
            let values = self.values.read();
            if let Some(existing) = values.get(&existing_id) {
                return Ok(existing.clone());
            }
        }

        let value_id = ValueId::new(self.id_gen.next());
        let value = Value {
            value_id: value_id.clone(),
            schema: schema.clone(),
            status: ValueStatus::Set,
            data_hash: Some(data_hash.clone()),
            size,
            pedigree,
            data: Some(payload),
        };

        self.values.write().insert(value_id.clone(), value.clone());
        self.dedup.write().insert(dedup_key, value_id.clone());

        self.events.emit(Event::ValueCreated {
            value_id: value_id.clone(),
            data_type: schema.type_name.clone(),
            data_hash: data_hash.to_string(),
        });

        Ok(value)
    }

    /// Look up a value by `value_id` or a bound alias (optionally
    /// version-suffixed, `"alias@N"`).
    pub fn get(&self, id_or_alias: &str) -> Result<Value, DataError> {
        let candidate = ValueId::new(id_or_alias);
        if let Some(value) = self.values.read().get(&candidate) {
            return Ok(value.clone());
        }
        let resolved = self
            .aliases
            .resolve(id_or_alias)
            .ok_or_else(|| DataError::AliasNotFound(id_or_alias.to_string()))?;
        self.get_by_id(&resolved)
    }

    fn get_by_id(&self, value_id: &ValueId) -> Result<Value, DataError> {
        self.values
            .read()
            .get(value_id)
            .cloned()
            .ok_or_else(|| DataError::ValueNotFound(value_id.as_str().to_string()))
    }

    /// Allow an orphan value to be stored even though it wasn't produced by
    /// a job (spec.md §4.3: "orphan values may be registered but cannot be
    /// stored unless explicitly marked storable").
    pub fn mark_storable(&self, value_id: &ValueId) {
        self.storable_orphans.write().insert(value_id.clone());
    }

    /// Promote `value_id` into the mounted archive, storing its pedigree
    /// inputs first (transitively) so a persisted value is always
    /// reproducible from persisted ancestors. Idempotent: storing the same
    /// `value_id` twice overwrites the same archive key with the same
    /// payload.
    pub fn store(
        &self,
        value_id: &ValueId,
        aliases: HashSet<String>,
    ) -> Result<PersistedValue, DataError> {
        let value = self.get_by_id(value_id)?;

        if value.pedigree.is_orphan() && !self.storable_orphans.read().contains(value_id) {
            return Err(DataError::OrphanNotStorable(value_id.as_str().to_string()));
        }

        for input_id in value.pedigree.input_value_ids() {
            self.store(&input_id, HashSet::new())?;
        }

        self.events.emit(Event::ValuePreStore {
            value_id: value_id.clone(),
        });

        let payload = serde_json::to_value(&value).map_err(|e| DataError::Storage(
            kiara_storage::StorageError::ArchiveWriteFailed {
                archive_name: self.archive.archive_name().to_string(),
                reason: e.to_string(),
            },
        ))?;
        self.archive.put(value_id.as_str(), payload)?;

        self.events.emit(Event::ValueStored {
            value_id: value_id.clone(),
            archive_id: self.archive.archive_id().to_string(),
        });

        for alias in &aliases {
            self.set_alias(alias, value_id.clone())?;
        }

        Ok(PersistedValue {
            value_id: value_id.clone(),
            archive_id: self.archive.archive_id().clone(),
            aliases: aliases.into_iter().collect(),
        })
    }

    /// Bind `alias` to `value_id`, appending a new version.
    pub fn set_alias(&self, alias: &str, value_id: ValueId) -> Result<u64, DataError> {
        // Confirm the value exists before publishing a binding to it.
        self.get_by_id(&value_id)?;

        self.events.emit(Event::AliasPreStore {
            alias: alias.to_string(),
            value_id: value_id.clone(),
        });

        let version = self.aliases.set_alias(alias, value_id.clone(), true)?;

        self.events.emit(Event::AliasStored {
            alias: alias.to_string(),
            value_id,
            version,
        });

        Ok(version)
    }

    pub fn find_aliases(&self, value_id: &ValueId) -> BTreeSet<String> {
        self.aliases.find_aliases(value_id)
    }

    /// The ancestor DAG reachable from `value_id` through `Pedigree::Job`
    /// inputs (itself included as the root node).
    pub fn resolve_pedigree(&self, value_id: &ValueId) -> Result<PedigreeDag, DataError> {
        let mut dag = PedigreeDag::default();
        let mut seen = HashSet::new();
        let mut stack = vec![value_id.clone()];

        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            let value = self.get_by_id(&current)?;
            for input_id in value.pedigree.input_value_ids() {
                dag.edges.push((current.clone(), input_id.clone()));
                stack.push(input_id);
            }
            dag.nodes.push(PedigreeNode {
                value_id: current,
                pedigree: value.pedigree,
            });
        }

        Ok(dag)
    }
}

/// Canonical hash of a [`ValueSchema`], used as half of the value dedup key.
fn schema_hash(schema: &ValueSchema) -> Cid {
    cid(&Structural::map([
        ("type_name".to_string(), schema.type_name.as_str().into()),
        (
            "type_config".to_string(),
            json_to_structural_lossy(&schema.type_config),
        ),
        ("optional".to_string(), schema.optional.into()),
    ]))
}

/// Best-effort structural reduction for schema hashing: floats collapse to
/// their string form rather than erroring, since a schema's `type_config` is
/// descriptive metadata, not hashed payload data.
fn json_to_structural_lossy(value: &serde_json::Value) -> Structural {
    match value {
        serde_json::Value::Null => Structural::Null,
        serde_json::Value::Bool(b) => Structural::Bool(*b),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Structural::Int)
            .unwrap_or_else(|| Structural::Str(n.to_string())),
        serde_json::Value::String(s) => Structural::Str(s.clone()),
        serde_json::Value::Array(items) => {
            Structural::List(items.iter().map(json_to_structural_lossy).collect())
        }
        serde_json::Value::Object(map) => Structural::map(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_structural_lossy(v))),
        ),
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
