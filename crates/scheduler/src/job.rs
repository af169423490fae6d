// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-shaped data: the resolved `JobConfig` a job runs from, its
//! fingerprint under the two cache strategies, and the `JobRecord`
//! persisted on success (spec.md §4.7).

use kiara_core::hash::Structural;
use kiara_core::{cid, Cid, JobId, ManifestRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How `execute` probes for a reusable prior result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCacheStrategy {
    /// Never probe; always run.
    NoCache,
    /// Match on `manifest_hash` plus the exact input `ValueId`s.
    ValueId,
    /// Match on `manifest_hash` plus sorted input data hashes — reuses a
    /// result across independently registered, data-equivalent inputs.
    DataHash,
}

/// Where a job currently sits in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Created,
    Started,
    Succeeded,
    Failed { reason: kiara_core::JobFailReason },
}

/// A module instance plus coerced input `ValueId`s, ready to hash and run.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub manifest_ref: ManifestRef,
    pub inputs: BTreeMap<String, kiara_core::ValueId>,
}

impl JobConfig {
    /// `job_hash` under `JobCacheStrategy::ValueId`: manifest_hash plus the
    /// exact sorted `(field, value_id)` pairs.
    pub fn value_id_hash(&self) -> Cid {
        let inputs = self
            .inputs
            .iter()
            .map(|(field, value_id)| {
                Structural::List(vec![
                    Structural::Str(field.clone()),
                    Structural::Str(value_id.as_str().to_string()),
                ])
            })
            .collect();
        cid(&Structural::map([
            (
                "manifest_hash".to_string(),
                Structural::Str(self.manifest_ref.manifest_hash.to_string()),
            ),
            ("inputs".to_string(), Structural::List(inputs)),
        ]))
    }

    /// `job_hash` under `JobCacheStrategy::DataHash`: manifest_hash plus
    /// sorted `(field, data_hash)` pairs, `data_hashes` supplying each
    /// input's current content hash.
    pub fn data_hash_hash(&self, data_hashes: &BTreeMap<String, Cid>) -> Cid {
        let inputs = self
            .inputs
            .keys()
            .map(|field| {
                Structural::List(vec![
                    Structural::Str(field.clone()),
                    Structural::Str(
                        data_hashes
                            .get(field)
                            .map(Cid::to_string)
                            .unwrap_or_default(),
                    ),
                ])
            })
            .collect();
        cid(&Structural::map([
            (
                "manifest_hash".to_string(),
                Structural::Str(self.manifest_ref.manifest_hash.to_string()),
            ),
            ("inputs".to_string(), Structural::List(inputs)),
        ]))
    }
}

/// Persisted on successful completion; never written for a failed job.
///
/// Carries the full CREATED→STARTED→SUCCESS timeline (spec.md §3) so a
/// reproducibility trace can recover not just the inputs/outputs but when
/// each lifecycle transition happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: JobId,
    pub manifest: ManifestRef,
    pub inputs: BTreeMap<String, kiara_core::ValueId>,
    pub outputs: BTreeMap<String, kiara_core::ValueId>,
    pub status: JobStatus,
    pub submitted_at_millis: i64,
    pub started_at_millis: i64,
    pub finished_at_millis: i64,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
