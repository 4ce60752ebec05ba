//! Macro documentation checks

use dagcheck_core::{Finding, InsightKind, Severity};
use dagcheck_dbt::ResourceType;
use crate::context::InsightContext;
use crate::error::InsightError;
use crate::insight::{Insight, InsightMeta};

/// Every declared macro argument must carry a description
pub struct MacroArgsHaveDesc;

static MACRO_ARGS_HAVE_DESC: InsightMeta = InsightMeta {
    name: "Check Macro Args Have Desc",
    alias: "check_macro_args_have_desc",
    description: "Checks that macros have descriptions for their arguments.",
    reason_to_flag: "Macros without argument descriptions are hard to call correctly \
        and slow down anyone reading the models that use them.",
    default_severity: Severity::Warn,
    kind: InsightKind::Check,
};

impl Insight for MacroArgsHaveDesc {
    fn meta(&self) -> &'static InsightMeta {
        &MACRO_ARGS_HAVE_DESC
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Result<Vec<Finding>, InsightError> {
        let mut findings = Vec::new();

        for node in ctx.candidates(&ResourceType::Macro) {
            let undocumented: Vec<&str> = node
                .arguments
                .iter()
                .filter(|arg| !arg.is_documented())
                .map(|arg| arg.name.as_str())
                .collect();

            if undocumented.is_empty() {
                continue;
            }

            let message = format!(
                "The macro `{}` has arguments without a description: {}.",
                node.unique_id,
                undocumented.join(", ")
            );

            findings.push(
                ctx.finding(node, message)
                    .with_recommendation("Add a description to every argument of the macro in its properties file.")
                    .with_metadata("undocumented_arguments", undocumented),
            );
        }

        Ok(findings)
    }
}

/// Every macro must carry a description
pub struct MacroHasDesc;

static MACRO_HAS_DESC: InsightMeta = InsightMeta {
    name: "Check Macro Has Desc",
    alias: "check_macro_has_desc",
    description: "Checks that macros have a description.",
    reason_to_flag: "Undocumented macros hide what they generate and make reuse risky.",
    default_severity: Severity::Warn,
    kind: InsightKind::Check,
};

impl Insight for MacroHasDesc {
    fn meta(&self) -> &'static InsightMeta {
        &MACRO_HAS_DESC
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Result<Vec<Finding>, InsightError> {
        Ok(ctx
            .candidates(&ResourceType::Macro)
            .into_iter()
            .filter(|node| node.description.trim().is_empty())
            .map(|node| {
                ctx.finding(node, format!("The macro `{}` does not have a description.", node.unique_id))
                    .with_recommendation("Add a description to the macro to explain what it generates.")
            })
            .collect())
    }
}
