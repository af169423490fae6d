// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `pipeline` module type (spec.md §4.4): "a module is a *pipeline
//! module* iff its config carries an embedded `PipelineBlueprint`; such
//! modules delegate `process` to the Pipeline Runtime."
//!
//! `kiara-modules` deliberately has no dependency on `kiara-data` (see its
//! crate doc), so this adapter — which needs the data registry to turn raw
//! input payloads into `Value`s and back — lives here instead, alongside
//! the rest of the C10 wiring.

use crate::pipeline_executor::run_to_completion;
use kiara_bus::EventBus;
use kiara_core::PipelineInstanceId;
use kiara_data::{DataRegistry, Pedigree};
use kiara_modules::{
    Characteristics, JobLog, Module, ModuleClass, ModuleError, ModuleInputs, ModuleOutputs, ModuleRegistry,
    ModulesError,
};
use kiara_pipeline::{build, PipelineBlueprint, PipelineStructure};
use kiara_scheduler::JobScheduler;
use kiara_types::{TypeRegistry, ValueSchema};
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// Shared, weakly-held references a constructed [`PipelineModule`] needs at
/// `process` time. Weak because the registry that owns this class's
/// instances (`modules`) would otherwise form a reference cycle back to
/// itself through every pipeline-module instance it caches.
#[derive(Clone)]
pub struct PipelineModuleDeps {
    pub modules: Weak<ModuleRegistry>,
    pub types: Arc<TypeRegistry>,
    pub data: Weak<DataRegistry>,
    pub scheduler: Weak<JobScheduler>,
    pub bus: Arc<EventBus>,
}

/// Registers every config-bearing manifest of module type `"pipeline"` as a
/// runnable sub-pipeline.
pub struct PipelineModuleClass {
    deps: PipelineModuleDeps,
}

impl PipelineModuleClass {
    pub fn new(deps: PipelineModuleDeps) -> Self {
        Self { deps }
    }
}

impl ModuleClass for PipelineModuleClass {
    fn module_type(&self) -> &str {
        "pipeline"
    }

    fn create(&self, module_config: &serde_json::Value) -> Result<Arc<dyn Module>, ModulesError> {
        let blueprint: PipelineBlueprint =
            serde_json::from_value(module_config.clone()).map_err(|e| ModulesError::InvalidManifest {
                module_type: "pipeline".to_string(),
                reason: format!("module_config is not a valid pipeline blueprint: {e}"),
            })?;

        let modules = self.deps.modules.upgrade().ok_or_else(|| ModulesError::InvalidManifest {
            module_type: "pipeline".to_string(),
            reason: "module registry no longer available".to_string(),
        })?;

        let structure = build(&blueprint, &modules, &self.deps.types).map_err(|e| ModulesError::InvalidManifest {
            module_type: "pipeline".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Arc::new(PipelineModule {
            structure,
            deps: self.deps.clone(),
        }))
    }
}

/// A module instance whose `process` runs a nested pipeline to completion.
pub struct PipelineModule {
    structure: PipelineStructure,
    deps: PipelineModuleDeps,
}

impl Module for PipelineModule {
    fn inputs_schema(&self) -> HashMap<String, ValueSchema> {
        self.structure
            .pipeline_inputs()
            .iter()
            .filter_map(|(alias, bindings)| {
                let (step_id, field) = bindings.first()?;
                let schema = self.structure.step_inputs_schema(step_id)?.get(field)?.clone();
                Some((alias.clone(), schema))
            })
            .collect()
    }

    fn outputs_schema(&self) -> HashMap<String, ValueSchema> {
        self.structure
            .pipeline_outputs()
            .iter()
            .filter_map(|(alias, (step_id, field))| {
                let schema = self.structure.step_outputs_schema(step_id)?.get(field)?.clone();
                Some((alias.clone(), schema))
            })
            .collect()
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics {
            is_pipeline: true,
            ..Characteristics::default()
        }
    }

    fn process(
        &self,
        inputs: &ModuleInputs,
        outputs: &mut ModuleOutputs,
        job_log: &mut JobLog,
    ) -> Result<(), ModuleError> {
        let data = self
            .deps
            .data
            .upgrade()
            .ok_or_else(|| ModuleError::new("data registry no longer available"))?;
        let scheduler = self
            .deps
            .scheduler
            .upgrade()
            .ok_or_else(|| ModuleError::new("job scheduler no longer available"))?;
        let producer = self.deps.bus.register_producer("pipeline-module");

        let schemas = self.inputs_schema();
        let mut pipeline_inputs = HashMap::new();
        for alias in self.structure.pipeline_inputs().keys() {
            if let Some(payload) = inputs.get(alias) {
                let schema = schemas.get(alias).cloned().unwrap_or_else(|| ValueSchema::new("any"));
                let value = data
                    .register_data(payload.clone(), schema, Pedigree::Orphan)
                    .map_err(|e| ModuleError::new(e.to_string()))?;
                pipeline_inputs.insert(alias.clone(), value.value_id);
            }
        }

        let runtime = run_to_completion(
            self.structure.clone(),
            PipelineInstanceId::default(),
            pipeline_inputs,
            &scheduler,
            &producer,
        )
        .map_err(|e| ModuleError::new(e.to_string()))?;

        for (alias, value_id) in runtime.get_pipeline_outputs() {
            match value_id {
                Some(value_id) => {
                    let value = data.get(value_id.as_str()).map_err(|e| ModuleError::new(e.to_string()))?;
                    if let Some(payload) = value.data {
                        outputs.set(alias, payload);
                    }
                }
                None => job_log.log(format!("pipeline output '{alias}' was never produced")),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "pipeline_module_tests.rs"]
mod tests;
