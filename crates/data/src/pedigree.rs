// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Pedigree`: the manifest and input value ids that produced a value, or
//! `Orphan` for externally registered values. Values are linked by id, not
//! by embedded object, so the Value/Pedigree/Manifest graph never forms an
//! ownership cycle — callers re-query the data registry for the referenced
//! objects.

use kiara_core::{ManifestRef, ValueId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provenance of a [`crate::Value`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Pedigree {
    /// Registered directly by a caller, not produced by a module.
    Orphan,
    /// Produced by running `manifest` over `inputs`, as output field
    /// `output_field`.
    Job {
        manifest: ManifestRef,
        inputs: BTreeMap<String, ValueId>,
        output_field: String,
    },
}

impl Pedigree {
    pub fn is_orphan(&self) -> bool {
        matches!(self, Pedigree::Orphan)
    }

    /// The input value ids this value was derived from, empty for orphans.
    pub fn input_value_ids(&self) -> Vec<ValueId> {
        match self {
            Pedigree::Orphan => Vec::new(),
            Pedigree::Job { inputs, .. } => inputs.values().cloned().collect(),
        }
    }
}

/// One node of a [`crate::registry::resolve_pedigree`] ancestry walk: the
/// value plus the pedigree that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PedigreeNode {
    pub value_id: ValueId,
    pub pedigree: Pedigree,
}

/// The ancestor DAG returned by `resolve_pedigree`: every ancestor value
/// reached transitively through `Pedigree::Job::inputs`, plus the edges
/// (`value_id -> input value_id`) that connect them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PedigreeDag {
    pub nodes: Vec<PedigreeNode>,
    pub edges: Vec<(ValueId, ValueId)>,
}

#[cfg(test)]
#[path = "pedigree_tests.rs"]
mod tests;
