use super::*;
use kiara_modules::{Characteristics, JobLog, Module, ModuleClass, ModuleError, ModuleInputs, ModuleOutputs, ModulesError};
use kiara_types::ValueSchema;
use std::collections::HashMap as StdHashMap;

struct NoopModule;

impl Module for NoopModule {
    fn inputs_schema(&self) -> StdHashMap<String, ValueSchema> {
        StdHashMap::new()
    }

    fn outputs_schema(&self) -> StdHashMap<String, ValueSchema> {
        StdHashMap::new()
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::default()
    }

    fn process(&self, _inputs: &ModuleInputs, _outputs: &mut ModuleOutputs, _log: &mut JobLog) -> Result<(), ModuleError> {
        Ok(())
    }
}

struct NoopClass(&'static str);

impl ModuleClass for NoopClass {
    fn module_type(&self) -> &str {
        self.0
    }

    fn create(&self, _module_config: &serde_json::Value) -> Result<Arc<dyn Module>, ModulesError> {
        Ok(Arc::new(NoopModule))
    }
}

/// An operation type that only matches modules named "render.table_to_terminal",
/// exercising `find`'s source/target-type filtering.
struct RenderOperationType;

impl OperationType for RenderOperationType {
    fn operation_type_name(&self) -> &str {
        "render_value"
    }

    fn matches(&self, module_type: &str, module: &dyn Module) -> Option<OperationDetails> {
        if module_type == "render.table_to_terminal" {
            Some(OperationDetails::new("render_value", module).with_conversion("table", "terminal"))
        } else {
            None
        }
    }
}

fn test_modules() -> Arc<ModuleRegistry> {
    let modules = Arc::new(ModuleRegistry::new());
    modules.register_class(Arc::new(NoopClass("noop_one"))).unwrap();
    modules.register_class(Arc::new(NoopClass("noop_two"))).unwrap();
    modules.register_class(Arc::new(NoopClass("render.table_to_terminal"))).unwrap();
    modules
}

#[test]
fn custom_module_operation_type_indexes_every_registered_module() {
    let modules = test_modules();
    let registry = OperationRegistry::new();
    registry.register_type(Arc::new(CustomModuleOperationType), &modules).unwrap();

    let ops = registry.operations_by_type("custom_module");
    assert_eq!(ops.len(), 3);
}

#[test]
fn operation_by_id_round_trips() {
    let modules = test_modules();
    let registry = OperationRegistry::new();
    registry.register_type(Arc::new(CustomModuleOperationType), &modules).unwrap();

    let op = registry.operations_by_type("custom_module").into_iter().next().unwrap();
    let fetched = registry.operation_by_id(&op.operation_id).unwrap();
    assert_eq!(fetched.manifest.module_type, op.manifest.module_type);
}

#[test]
fn operation_by_id_rejects_unknown_id() {
    let registry = OperationRegistry::new();
    let err = registry.operation_by_id(&OperationId::new("does-not-exist")).unwrap_err();
    assert!(matches!(err, OperationsError::NoSuchOperation(_)));
}

#[test]
fn registering_the_same_operation_type_twice_is_rejected() {
    let modules = test_modules();
    let registry = OperationRegistry::new();
    registry.register_type(Arc::new(CustomModuleOperationType), &modules).unwrap();
    let err = registry.register_type(Arc::new(CustomModuleOperationType), &modules).unwrap_err();
    assert!(matches!(err, OperationsError::DuplicateOperationType(_)));
}

#[test]
fn find_filters_by_source_and_target_type() {
    let modules = test_modules();
    let registry = OperationRegistry::new();
    registry.register_type(Arc::new(RenderOperationType), &modules).unwrap();

    let all = registry.operations_by_type("render_value");
    assert_eq!(all.len(), 1);

    let matches = registry.find(Some("table"), Some("terminal"));
    assert_eq!(matches.len(), 1);

    let no_matches = registry.find(Some("table"), Some("html"));
    assert!(no_matches.is_empty());

    let source_only = registry.find(Some("table"), None);
    assert_eq!(source_only.len(), 1);
}

#[test]
fn operations_by_type_is_empty_for_an_unregistered_type() {
    let registry = OperationRegistry::new();
    assert!(registry.operations_by_type("nonexistent").is_empty());
}
