use super::*;
use kiara_bus::EventBus;
use kiara_core::SystemClock;
use kiara_data::DataRegistry;
use kiara_modules::{Characteristics, JobLog, ModuleError, ModuleInputs, ModuleOutputs, ModulesError};
use kiara_scheduler::{JobCacheStrategy, SequentialProcessor};
use kiara_storage::InMemoryArchive;
use kiara_types::builtin::register_builtins;
use kiara_types::{TypeRegistry, ValueSchema};
use std::collections::HashSet;

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

fn build_deps() -> (Arc<ModuleRegistry>, Arc<TypeRegistry>, Arc<DataRegistry>, Arc<JobScheduler>, Arc<EventBus>) {
    let modules = Arc::new(ModuleRegistry::new());
    modules.register_class(Arc::new(AndClass)).unwrap();

    let types = Arc::new(TypeRegistry::new());
    register_builtins(&types).unwrap();

    let bus = Arc::new(EventBus::new(Default::default()));
    let data = Arc::new(DataRegistry::new(
        Arc::clone(&types),
        Arc::new(InMemoryArchive::new("values", HashSet::from(["value".to_string()]))),
        bus.register_producer("data-registry"),
    ));
    let job_archive = Arc::new(InMemoryArchive::new("jobs", HashSet::from(["job_record".to_string()])));
    let scheduler = Arc::new(JobScheduler::new(
        Arc::clone(&modules),
        Arc::clone(&data),
        job_archive,
        bus.register_producer("scheduler"),
        Arc::new(SystemClock),
        Arc::new(SequentialProcessor),
        JobCacheStrategy::ValueId,
    ));

    (modules, types, data, scheduler, bus)
}

fn and_blueprint() -> PipelineBlueprint {
    PipelineBlueprint {
        pipeline_name: "and_subpipeline".to_string(),
        steps: vec![kiara_pipeline::StepSpec {
            step_id: "and1".to_string(),
            module_type: "logic.and".to_string(),
            module_config: serde_json::Value::Null,
            input_links: HashMap::new(),
        }],
        input_aliases: HashMap::new(),
        output_aliases: HashMap::new(),
        doc: None,
    }
}

#[test]
fn pipeline_module_class_reports_module_type() {
    let (modules, types, data, scheduler, bus) = build_deps();
    let class = PipelineModuleClass::new(PipelineModuleDeps {
        modules: Arc::downgrade(&modules),
        types,
        data: Arc::downgrade(&data),
        scheduler: Arc::downgrade(&scheduler),
        bus,
    });
    assert_eq!(class.module_type(), "pipeline");
}

#[test]
fn pipeline_module_exposes_inner_pipeline_input_and_output_schemas() {
    let (modules, types, data, scheduler, bus) = build_deps();
    let class = PipelineModuleClass::new(PipelineModuleDeps {
        modules: Arc::downgrade(&modules),
        types,
        data: Arc::downgrade(&data),
        scheduler: Arc::downgrade(&scheduler),
        bus,
    });

    let config = serde_json::to_value(and_blueprint()).unwrap();
    let instance = class.create(&config).unwrap();

    assert!(instance.inputs_schema().contains_key("a"));
    assert!(instance.inputs_schema().contains_key("b"));
    assert!(instance.outputs_schema().contains_key("and1.y"));
    assert!(instance.characteristics().is_pipeline);
}

#[test]
fn pipeline_module_process_runs_the_nested_pipeline_and_fills_outputs() {
    let (modules, types, data, scheduler, bus) = build_deps();
    let class = PipelineModuleClass::new(PipelineModuleDeps {
        modules: Arc::downgrade(&modules),
        types,
        data: Arc::downgrade(&data),
        scheduler: Arc::downgrade(&scheduler),
        bus,
    });

    let config = serde_json::to_value(and_blueprint()).unwrap();
    let instance = class.create(&config).unwrap();

    let inputs = ModuleInputs::new(HashMap::from([
        ("a".to_string(), serde_json::json!(true)),
        ("b".to_string(), serde_json::json!(true)),
    ]));
    let mut outputs = ModuleOutputs::default();
    let mut log = JobLog::default();
    instance.process(&inputs, &mut outputs, &mut log).unwrap();

    assert_eq!(outputs.into_map().get("and1.y"), Some(&serde_json::json!(true)));
}

#[test]
fn invalid_module_config_is_rejected_with_pipeline_module_type() {
    let (modules, types, data, scheduler, bus) = build_deps();
    let class = PipelineModuleClass::new(PipelineModuleDeps {
        modules: Arc::downgrade(&modules),
        types,
        data: Arc::downgrade(&data),
        scheduler: Arc::downgrade(&scheduler),
        bus,
    });

    let err = class.create(&serde_json::json!({"not": "a blueprint"})).unwrap_err();
    match err {
        ModulesError::InvalidManifest { module_type, .. } => assert_eq!(module_type, "pipeline"),
        other => panic!("unexpected error: {other:?}"),
    }
}
