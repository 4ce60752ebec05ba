//! Built-in insights

pub mod exposure_materialization;
pub mod macro_docs;
pub mod model_columns;
pub mod parent_schemas;
pub mod test_coverage;

pub use exposure_materialization::ExposureParentMaterialization;
pub use macro_docs::{MacroArgsHaveDesc, MacroHasDesc};
pub use model_columns::ModelHasAllColumns;
pub use parent_schemas::ModelParentsSchema;
pub use test_coverage::HasTests;
