use super::*;
use kiara_modules::{Characteristics, JobLog, ModuleError, ModuleInputs, ModuleOutputs};
use kiara_types::ValueSchema;
use std::collections::HashMap;

struct NoopModule {
    is_internal: bool,
}

impl Module for NoopModule {
    fn inputs_schema(&self) -> HashMap<String, ValueSchema> {
        HashMap::new()
    }

    fn outputs_schema(&self) -> HashMap<String, ValueSchema> {
        HashMap::new()
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics {
            is_internal: self.is_internal,
            ..Default::default()
        }
    }

    fn process(&self, _inputs: &ModuleInputs, _outputs: &mut ModuleOutputs, _log: &mut JobLog) -> Result<(), ModuleError> {
        Ok(())
    }
}

#[test]
fn custom_module_operation_type_matches_every_module() {
    let op_type = CustomModuleOperationType;
    let module = NoopModule { is_internal: false };

    let details = op_type.matches("noop", &module).expect("custom_module always matches");
    assert_eq!(details.operation_type, "custom_module");
    assert!(!details.is_internal);
    assert!(details.doc.is_some());
}

#[test]
fn custom_module_operation_type_carries_internal_flag() {
    let op_type = CustomModuleOperationType;
    let module = NoopModule { is_internal: true };

    let details = op_type.matches("internal_noop", &module).expect("custom_module always matches");
    assert!(details.is_internal);
}

#[test]
fn custom_module_operation_type_contributes_no_included_configs() {
    let op_type = CustomModuleOperationType;
    assert!(op_type.included_configs().is_empty());
}
