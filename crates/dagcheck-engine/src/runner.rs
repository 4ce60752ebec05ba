//! Insight runner
//!
//! Validates configuration, resolves selection once, evaluates every
//! registered insight against the graph and aggregates the outcome into a
//! [`Report`]. Findings are ordered by insight registration order, then by
//! the order each insight discovered them, whether or not insights ran in
//! parallel.

use dagcheck_core::{Config, Finding, Report, SkipReason};
use dagcheck_dbt::{ProjectGraph, Selection};
use rayon::prelude::*;
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use crate::context::InsightContext;
use crate::error::RunError;
use crate::insight::{DataRequirement, Insight, InsightMeta};
use crate::registry::default_registry;
use crate::severity::SeverityResolver;
use crate::validation::{fragment_schema, validate, CommonOptions};

/// What happened to one insight
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Evaluated(Vec<Finding>),
    Skipped(SkipReason),
    Failed(String),
}

pub struct InsightRunner {
    insights: Vec<Box<dyn Insight>>,
    config: Config,
}

impl InsightRunner {
    pub fn new(insights: Vec<Box<dyn Insight>>, config: Config) -> Self {
        Self { insights, config }
    }

    /// Runner over every built-in insight
    pub fn with_default_registry(config: Config) -> Self {
        Self::new(default_registry(), config)
    }

    /// Registered insights, in registration order
    pub fn insights(&self) -> impl Iterator<Item = &'static InsightMeta> + '_ {
        self.insights.iter().map(|insight| insight.meta())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluate every insight and build the report
    pub fn run(&self, graph: &ProjectGraph) -> Result<Report, RunError> {
        self.check_aliases()?;

        let selection = Selection::resolve(graph, &self.config.selection);

        tracing::info!(
            insights = self.insights.len(),
            parallel = self.config.runner.parallel,
            "running insights"
        );

        let outcomes: Vec<Outcome> = if self.config.runner.parallel {
            self.insights
                .par_iter()
                .map(|insight| self.evaluate_one(insight.as_ref(), graph, &selection))
                .collect()
        } else {
            self.insights
                .iter()
                .map(|insight| self.evaluate_one(insight.as_ref(), graph, &selection))
                .collect()
        };

        let mut report = Report::new();
        report.summary.nodes_analyzed = graph
            .nodes()
            .filter(|node| selection.is_selected(&node.unique_id))
            .count();

        for (insight, outcome) in self.insights.iter().zip(outcomes) {
            let alias = insight.meta().alias;
            match outcome {
                Outcome::Evaluated(findings) => {
                    report.record_run();
                    for finding in findings {
                        report.add_finding(finding);
                    }
                }
                Outcome::Skipped(reason) => report.record_skip(alias, reason),
                Outcome::Failed(message) => report.record_failure(alias, message),
            }
        }

        Ok(report)
    }

    /// `[runner] only` must name registered insights; unknown fragments only warn
    fn check_aliases(&self) -> Result<(), RunError> {
        let known = |alias: &str| self.insights.iter().any(|i| i.meta().alias == alias);

        let unknown: Vec<String> = self
            .config
            .runner
            .only
            .iter()
            .filter(|alias| !known(alias.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(RunError::UnknownInsights(unknown));
        }

        for alias in self.config.insights.keys().filter(|alias| !known(alias.as_str())) {
            tracing::warn!(%alias, "configuration for unknown insight ignored");
        }

        Ok(())
    }

    /// Run one insight through precondition, validation and evaluation
    pub fn evaluate_one(&self, insight: &dyn Insight, graph: &ProjectGraph, selection: &Selection) -> Outcome {
        let meta = insight.meta();
        let outcome = self.evaluate_inner(insight, graph, selection);

        match &outcome {
            Outcome::Evaluated(findings) => {
                tracing::info!(insight = meta.alias, findings = findings.len(), "insight evaluated");
            }
            Outcome::Skipped(reason) => {
                tracing::warn!(insight = meta.alias, %reason, "insight skipped");
            }
            Outcome::Failed(message) => {
                tracing::warn!(insight = meta.alias, error = %message, "insight failed");
            }
        }

        outcome
    }

    fn evaluate_inner(&self, insight: &dyn Insight, graph: &ProjectGraph, selection: &Selection) -> Outcome {
        let meta = insight.meta();

        if !self.config.runner.is_enabled(meta.alias) {
            return Outcome::Skipped(SkipReason::Disabled("not listed in [runner] only".to_string()));
        }

        let fragment = self
            .config
            .fragment(meta.alias)
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));

        if let Err(errors) = validate(&fragment_schema(&insight.config_schema()), &fragment) {
            return Outcome::Skipped(SkipReason::InvalidConfig(errors));
        }

        let common = match CommonOptions::from_fragment(&fragment) {
            Ok(common) => common,
            Err(errors) => return Outcome::Skipped(SkipReason::InvalidConfig(errors)),
        };

        if !common.enabled {
            return Outcome::Skipped(SkipReason::Disabled("enabled = false".to_string()));
        }

        if let DataRequirement::Missing(reason) = insight.has_required_data(true, graph.has_catalog()) {
            return Outcome::Skipped(SkipReason::PreconditionUnmet(reason));
        }

        let severity = SeverityResolver::for_insight(
            meta.alias,
            meta.default_severity,
            &self.config,
            common.severity,
            common.node_severity,
        );
        let ctx = InsightContext::new(graph, selection, meta, fragment, severity);

        match catch_unwind(AssertUnwindSafe(|| insight.evaluate(&ctx))) {
            Ok(Ok(findings)) => Outcome::Evaluated(findings),
            Ok(Err(e)) => Outcome::Failed(e.to_string()),
            Err(payload) => Outcome::Failed(format!("panicked: {}", panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
