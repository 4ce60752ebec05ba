//! Built-in insight registry

use crate::insight::Insight;
use crate::insights::{
    ExposureParentMaterialization, HasTests, MacroArgsHaveDesc, MacroHasDesc, ModelHasAllColumns,
    ModelParentsSchema,
};

/// Every built-in insight, in the order findings are reported
pub fn default_registry() -> Vec<Box<dyn Insight>> {
    vec![
        Box::new(MacroArgsHaveDesc),
        Box::new(MacroHasDesc),
        Box::new(HasTests::model_by_name()),
        Box::new(HasTests::model_by_type()),
        Box::new(HasTests::source_by_name()),
        Box::new(HasTests::source_by_type()),
        Box::new(ModelParentsSchema),
        Box::new(ExposureParentMaterialization),
        Box::new(ModelHasAllColumns),
    ]
}
