use super::*;
use kiara_bus::EventBus;
use kiara_core::ValueId;
use kiara_data::{DataRegistry, Pedigree};
use kiara_modules::{
    Characteristics, JobLog, Module, ModuleClass, ModuleError, ModuleInputs, ModuleOutputs, ModuleRegistry,
    ModulesError,
};
use kiara_pipeline::{InputLink, PipelineBlueprint, StepSpec, StepStatus};
use kiara_scheduler::{JobCacheStrategy, SequentialProcessor};
use kiara_storage::InMemoryArchive;
use kiara_types::builtin::register_builtins;
use kiara_types::{TypeRegistry, ValueSchema};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

struct AndModule;

impl Module for AndModule {
    fn inputs_schema(&self) -> HashMap<String, ValueSchema> {
        HashMap::from([
            ("a".to_string(), ValueSchema::new("any")),
            ("b".to_string(), ValueSchema::new("any")),
        ])
    }

    fn outputs_schema(&self) -> HashMap<String, ValueSchema> {
        HashMap::from([("y".to_string(), ValueSchema::new("any"))])
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics { is_idempotent: true, ..Default::default() }
    }

    fn process(&self, inputs: &ModuleInputs, outputs: &mut ModuleOutputs, _log: &mut JobLog) -> Result<(), ModuleError> {
        let a = inputs.require("a")?.as_bool().unwrap_or(false);
        let b = inputs.require("b")?.as_bool().unwrap_or(false);
        outputs.set("y", serde_json::json!(a && b));
        Ok(())
    }
}

struct AndClass;

impl ModuleClass for AndClass {
    fn module_type(&self) -> &str {
        "logic.and"
    }

    fn create(&self, _module_config: &serde_json::Value) -> Result<Arc<dyn Module>, ModulesError> {
        Ok(Arc::new(AndModule))
    }
}

struct NotModule;

impl Module for NotModule {
    fn inputs_schema(&self) -> HashMap<String, ValueSchema> {
        HashMap::from([("value".to_string(), ValueSchema::new("any"))])
    }

    fn outputs_schema(&self) -> HashMap<String, ValueSchema> {
        HashMap::from([("value".to_string(), ValueSchema::new("any"))])
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics { is_idempotent: true, ..Default::default() }
    }

    fn process(&self, inputs: &ModuleInputs, outputs: &mut ModuleOutputs, _log: &mut JobLog) -> Result<(), ModuleError> {
        let value = inputs.require("value")?.as_bool().unwrap_or(false);
        outputs.set("value", serde_json::json!(!value));
        Ok(())
    }
}

struct NotClass;

impl ModuleClass for NotClass {
    fn module_type(&self) -> &str {
        "logic.not"
    }

    fn create(&self, _module_config: &serde_json::Value) -> Result<Arc<dyn Module>, ModulesError> {
        Ok(Arc::new(NotModule))
    }
}

/// A module that always fails, to exercise pipeline failure isolation.
struct FailModule;

impl Module for FailModule {
    fn inputs_schema(&self) -> HashMap<String, ValueSchema> {
        HashMap::from([("a".to_string(), ValueSchema::new("any")), ("b".to_string(), ValueSchema::new("any"))])
    }

    fn outputs_schema(&self) -> HashMap<String, ValueSchema> {
        HashMap::from([("y".to_string(), ValueSchema::new("any"))])
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::default()
    }

    fn process(&self, _inputs: &ModuleInputs, _outputs: &mut ModuleOutputs, _log: &mut JobLog) -> Result<(), ModuleError> {
        Err(ModuleError::new("always fails"))
    }
}

struct FailClass;

impl ModuleClass for FailClass {
    fn module_type(&self) -> &str {
        "test.fail"
    }

    fn create(&self, _module_config: &serde_json::Value) -> Result<Arc<dyn Module>, ModulesError> {
        Ok(Arc::new(FailModule))
    }
}

fn register_bool(data: &DataRegistry, value: bool) -> ValueId {
    data.register_data(serde_json::json!(value), ValueSchema::new("any"), Pedigree::Orphan)
        .unwrap()
        .value_id
}

fn and_then_not_blueprint() -> PipelineBlueprint {
    PipelineBlueprint {
        pipeline_name: "nand".to_string(),
        steps: vec![
            StepSpec {
                step_id: "and1".to_string(),
                module_type: "logic.and".to_string(),
                module_config: serde_json::Value::Null,
                input_links: HashMap::new(),
            },
            StepSpec {
                step_id: "not1".to_string(),
                module_type: "logic.not".to_string(),
                module_config: serde_json::Value::Null,
                input_links: HashMap::from([("value".to_string(), InputLink::One("and1.y".to_string()))]),
            },
        ],
        input_aliases: HashMap::new(),
        output_aliases: HashMap::new(),
        doc: None,
    }
}

#[test]
fn two_stage_pipeline_runs_to_completion_and_produces_nand_output() {
    let modules = Arc::new(ModuleRegistry::new());
    modules.register_class(Arc::new(AndClass)).unwrap();
    modules.register_class(Arc::new(NotClass)).unwrap();

    let types = Arc::new(TypeRegistry::new());
    register_builtins(&types).unwrap();

    let bus = Arc::new(EventBus::new(Default::default()));
    let data = Arc::new(DataRegistry::new(
        Arc::clone(&types),
        Arc::new(InMemoryArchive::new("values", HashSet::from(["value".to_string()]))),
        bus.register_producer("data-registry"),
    ));
    let job_archive = Arc::new(InMemoryArchive::new("jobs", HashSet::from(["job_record".to_string()])));
    let scheduler = JobScheduler::new(
        Arc::clone(&modules),
        Arc::clone(&data),
        job_archive,
        bus.register_producer("scheduler"),
        Arc::new(kiara_core::SystemClock),
        Arc::new(SequentialProcessor),
        JobCacheStrategy::ValueId,
    );

    let structure = kiara_pipeline::build(&and_then_not_blueprint(), &modules, &types).unwrap();
    assert_eq!(structure.stages().len(), 2, "and1 then not1 are two successive stages");

    let a = register_bool(&data, true);
    let b = register_bool(&data, false);
    let producer = bus.register_producer("test");
    let runtime = run_to_completion(
        structure,
        PipelineInstanceId::default(),
        HashMap::from([("a".to_string(), a), ("b".to_string(), b)]),
        &scheduler,
        &producer,
    )
    .unwrap();

    let outputs = runtime.get_pipeline_outputs();
    let not1_value_id = outputs.get("not1.value").cloned().flatten().expect("not1.value produced");
    let value = data.get(not1_value_id.as_str()).unwrap();
    assert_eq!(value.data, Some(serde_json::json!(true)), "NAND(true, false) == true");
}

#[test]
fn failed_step_leaves_downstream_stale_and_produces_no_pipeline_output() {
    let modules = Arc::new(ModuleRegistry::new());
    modules.register_class(Arc::new(FailClass)).unwrap();
    modules.register_class(Arc::new(NotClass)).unwrap();

    let types = Arc::new(TypeRegistry::new());
    register_builtins(&types).unwrap();

    let bus = Arc::new(EventBus::new(Default::default()));
    let data = Arc::new(DataRegistry::new(
        Arc::clone(&types),
        Arc::new(InMemoryArchive::new("values", HashSet::from(["value".to_string()]))),
        bus.register_producer("data-registry"),
    ));
    let job_archive = Arc::new(InMemoryArchive::new("jobs", HashSet::from(["job_record".to_string()])));
    let scheduler = JobScheduler::new(
        Arc::clone(&modules),
        Arc::clone(&data),
        job_archive,
        bus.register_producer("scheduler"),
        Arc::new(kiara_core::SystemClock),
        Arc::new(SequentialProcessor),
        JobCacheStrategy::ValueId,
    );

    let blueprint = PipelineBlueprint {
        pipeline_name: "failing".to_string(),
        steps: vec![
            StepSpec {
                step_id: "fail1".to_string(),
                module_type: "test.fail".to_string(),
                module_config: serde_json::Value::Null,
                input_links: HashMap::new(),
            },
            StepSpec {
                step_id: "not1".to_string(),
                module_type: "logic.not".to_string(),
                module_config: serde_json::Value::Null,
                input_links: HashMap::from([("value".to_string(), InputLink::One("fail1.y".to_string()))]),
            },
        ],
        input_aliases: HashMap::new(),
        output_aliases: HashMap::new(),
        doc: None,
    };
    let structure = kiara_pipeline::build(&blueprint, &modules, &types).unwrap();

    let a = register_bool(&data, true);
    let b = register_bool(&data, false);
    let producer = bus.register_producer("test");
    let runtime = run_to_completion(
        structure,
        PipelineInstanceId::default(),
        HashMap::from([("a".to_string(), a), ("b".to_string(), b)]),
        &scheduler,
        &producer,
    )
    .unwrap();

    assert_eq!(runtime.get_step_status("fail1"), Some(StepStatus::Failed));
    assert_eq!(runtime.get_step_status("not1"), Some(StepStatus::Stale));
    assert_eq!(runtime.get_pipeline_outputs().get("not1.value").cloned().flatten(), None);

    // The scheduler itself is unaffected by the failed job and keeps serving
    // unrelated work.
    let c = register_bool(&data, true);
    let job_id = scheduler
        .execute(
            kiara_core::Manifest::new("logic.not"),
            std::collections::BTreeMap::from([("value".to_string(), c)]),
            true,
            None,
        )
        .unwrap();
    assert_eq!(scheduler.status(&job_id).unwrap(), kiara_scheduler::JobStatus::Succeeded);
}
