// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Context` (C10, spec.md §4.10): the process-local container that wires
//! C1-C9 together, owns the mounted archives, and is the one stable entry
//! point embedders call through.

use crate::environment::{Environment, RuntimeProfile};
use crate::error::ContextError;
use crate::pipeline_executor::run_to_completion;
use crate::pipeline_module::{PipelineModuleClass, PipelineModuleDeps};
use kiara_bus::EventBus;
use kiara_core::{Clock, IdGen, JobId, KiaraContextId, Manifest, PipelineInstanceId, SystemClock, UuidIdGen, ValueId};
use kiara_data::DataRegistry;
use kiara_modules::ModuleRegistry;
use kiara_operations::{OperationRegistry, OperationType};
use kiara_pipeline::{PipelineBlueprint, PipelineRuntime, PipelineStructure};
use kiara_scheduler::{JobScheduler, Processor, SequentialProcessor};
use kiara_storage::{Archive, InMemoryArchive};
use kiara_types::builtin::register_builtins;
use kiara_types::TypeRegistry;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Owns exactly one instance each of the module registry, data registry,
/// job scheduler, event bus, and operation registry (spec.md §4.10); two
/// contexts never share mutable state.
pub struct Context {
    kiara_id: KiaraContextId,
    name: String,
    environment: Environment,
    #[allow(dead_code)]
    clock: Arc<dyn Clock>,
    types: Arc<TypeRegistry>,
    modules: Arc<ModuleRegistry>,
    bus: Arc<EventBus>,
    data: Arc<DataRegistry>,
    scheduler: Arc<JobScheduler>,
    operations: Arc<OperationRegistry>,
    archives: RwLock<HashMap<String, Arc<dyn Archive>>>,
    pipelines: RwLock<HashMap<PipelineInstanceId, Arc<PipelineRuntime>>>,
}

impl Context {
    /// A context running its scheduler inline, on the caller's thread.
    pub fn new(name: impl Into<String>, environment: Environment) -> Result<Arc<Self>, ContextError> {
        Self::with_processor(name, environment, Arc::new(SequentialProcessor))
    }

    /// A context running its scheduler against a fixed-size worker pool.
    pub fn with_worker_pool(
        name: impl Into<String>,
        environment: Environment,
        worker_count: usize,
    ) -> Result<Arc<Self>, ContextError> {
        Self::with_processor(
            name,
            environment,
            Arc::new(kiara_scheduler::WorkerPoolProcessor::new(worker_count)),
        )
    }

    pub fn with_processor(
        name: impl Into<String>,
        environment: Environment,
        processor: Arc<dyn Processor>,
    ) -> Result<Arc<Self>, ContextError> {
        let kiara_id = KiaraContextId::new(UuidIdGen.next());
        let types = Arc::new(TypeRegistry::new());
        register_builtins(&types)?;

        let bus = Arc::new(EventBus::new(kiara_id.clone()));
        let modules = Arc::new(ModuleRegistry::new());

        let data_archive: Arc<dyn Archive> =
            Arc::new(InMemoryArchive::new("data", HashSet::from(["value".to_string()])));
        let job_archive: Arc<dyn Archive> =
            Arc::new(InMemoryArchive::new("job", HashSet::from(["job_record".to_string()])));

        let data = Arc::new(DataRegistry::with_options(
            Arc::clone(&types),
            Arc::clone(&data_archive),
            bus.register_producer("data_registry"),
            Arc::new(UuidIdGen),
            environment.keep_alias_reverse_pointers,
        ));

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let scheduler = Arc::new(JobScheduler::new(
            Arc::clone(&modules),
            Arc::clone(&data),
            Arc::clone(&job_archive),
            bus.register_producer("job_scheduler"),
            Arc::clone(&clock),
            processor,
            environment.job_cache,
        ));

        let operations = Arc::new(OperationRegistry::new());

        let pipeline_deps = PipelineModuleDeps {
            modules: Arc::downgrade(&modules),
            types: Arc::clone(&types),
            data: Arc::downgrade(&data),
            scheduler: Arc::downgrade(&scheduler),
            bus: Arc::clone(&bus),
        };
        modules.register_class(Arc::new(PipelineModuleClass::new(pipeline_deps)))?;

        let mut archives: HashMap<String, Arc<dyn Archive>> = HashMap::new();
        archives.insert("data".to_string(), data_archive);
        archives.insert("job".to_string(), job_archive);

        Ok(Arc::new(Self {
            kiara_id,
            name: name.into(),
            environment,
            clock,
            types,
            modules,
            bus,
            data,
            scheduler,
            operations,
            archives: RwLock::new(archives),
            pipelines: RwLock::new(HashMap::new()),
        }))
    }

    pub fn kiara_id(&self) -> &KiaraContextId {
        &self.kiara_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    pub fn modules(&self) -> &Arc<ModuleRegistry> {
        &self.modules
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn data(&self) -> &Arc<DataRegistry> {
        &self.data
    }

    pub fn scheduler(&self) -> &Arc<JobScheduler> {
        &self.scheduler
    }

    pub fn operations(&self) -> &Arc<OperationRegistry> {
        &self.operations
    }

    /// Mount an additional archive under `name` (e.g. `"alias"`,
    /// `"metadata"`, or a durable replacement for `"data"`/`"job"`).
    pub fn mount_archive(&self, name: impl Into<String>, archive: Arc<dyn Archive>) -> Result<(), ContextError> {
        let name = name.into();
        let mut archives = self.archives.write();
        if archives.contains_key(&name) {
            return Err(ContextError::DuplicateArchive(name));
        }
        archives.insert(name, archive);
        Ok(())
    }

    pub fn archive(&self, name: &str) -> Result<Arc<dyn Archive>, ContextError> {
        self.archives
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ContextError::NoSuchArchive(name.to_string()))
    }

    pub fn register_operation_type(&self, operation_type: Arc<dyn OperationType>) -> Result<(), ContextError> {
        Ok(self.operations.register_type(operation_type, &self.modules)?)
    }

    /// Submit `manifest` over `inputs` (spec.md §4.7). When
    /// `runtime_profile` is `strict`, `comment` must be a non-empty string
    /// or the submission fails before reaching the scheduler.
    pub fn execute(
        &self,
        manifest: Manifest,
        inputs: BTreeMap<String, ValueId>,
        wait: bool,
        timeout: Option<Duration>,
        comment: Option<&str>,
    ) -> Result<JobId, ContextError> {
        if self.environment.runtime_profile == RuntimeProfile::Strict
            && comment.map(str::trim).unwrap_or_default().is_empty()
        {
            return Err(ContextError::MissingComment);
        }
        Ok(self.scheduler.execute(manifest, inputs, wait, timeout)?)
    }

    /// Resolve a [`PipelineBlueprint`] into an executable [`PipelineStructure`]
    /// (spec.md §4.5).
    pub fn build_pipeline(&self, blueprint: &PipelineBlueprint) -> Result<PipelineStructure, ContextError> {
        Ok(kiara_pipeline::build(blueprint, &self.modules, &self.types)?)
    }

    /// Run `structure` to completion against `pipeline_inputs`, retaining
    /// the resulting runtime for later lookup via [`Context::pipeline`].
    pub fn run_pipeline(
        &self,
        structure: PipelineStructure,
        pipeline_inputs: HashMap<String, ValueId>,
    ) -> Result<Arc<PipelineRuntime>, ContextError> {
        let pipeline_id = PipelineInstanceId::new(UuidIdGen.next());
        let producer = self.bus.register_producer("pipeline_runtime");
        let runtime = Arc::new(run_to_completion(
            structure,
            pipeline_id.clone(),
            pipeline_inputs,
            &self.scheduler,
            &producer,
        )?);
        self.pipelines.write().insert(pipeline_id, Arc::clone(&runtime));
        Ok(runtime)
    }

    pub fn pipeline(&self, pipeline_id: &PipelineInstanceId) -> Option<Arc<PipelineRuntime>> {
        self.pipelines.read().get(pipeline_id).cloned()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
