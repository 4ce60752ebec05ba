//! Severity resolution
//!
//! Precedence, highest first:
//! 1. per-node override from the insight fragment (`node_severity`);
//!    an exact id wins over a glob, then the longest glob wins
//! 2. the fragment's own `severity`
//! 3. the project-wide `[severity.overrides]` entry for the alias
//! 4. the insight's default severity

use dagcheck_core::{Config, GlobPattern, Severity};
use std::collections::BTreeMap;

/// Resolves the severity of a finding for a given node
#[derive(Debug, Clone)]
pub struct SeverityResolver {
    /// Literal node ids
    exact: BTreeMap<String, Severity>,

    /// Glob overrides, longest pattern first
    globs: Vec<(GlobPattern, Severity)>,

    fragment: Option<Severity>,
    project: Option<Severity>,
    default: Severity,
}

impl SeverityResolver {
    /// Resolver that always answers `default`
    pub fn new(default: Severity) -> Self {
        Self {
            exact: BTreeMap::new(),
            globs: Vec::new(),
            fragment: None,
            project: None,
            default,
        }
    }

    /// Resolver for one insight from project configuration and its parsed fragment
    pub fn for_insight(
        alias: &str,
        default: Severity,
        config: &Config,
        fragment_severity: Option<Severity>,
        node_overrides: Vec<(GlobPattern, Severity)>,
    ) -> Self {
        node_overrides.into_iter().fold(
            Self::new(default)
                .with_project(config.severity.override_for(alias))
                .with_fragment(fragment_severity),
            |resolver, (pattern, severity)| resolver.with_node_override(pattern, severity),
        )
    }

    pub fn with_project(mut self, severity: Option<Severity>) -> Self {
        self.project = severity;
        self
    }

    pub fn with_fragment(mut self, severity: Option<Severity>) -> Self {
        self.fragment = severity;
        self
    }

    /// Add a per-node override keyed by an id or id glob
    pub fn with_node_override(mut self, pattern: GlobPattern, severity: Severity) -> Self {
        if pattern.is_literal() {
            self.exact.insert(pattern.as_str().to_string(), severity);
        } else {
            self.globs.push((pattern, severity));
            self.globs.sort_by(|(a, _), (b, _)| {
                b.as_str()
                    .len()
                    .cmp(&a.as_str().len())
                    .then_with(|| a.as_str().cmp(b.as_str()))
            });
        }
        self
    }

    /// Severity for a finding about `node_id`
    pub fn resolve(&self, node_id: &str) -> Severity {
        self.node_override(node_id)
            .or(self.fragment)
            .or(self.project)
            .unwrap_or(self.default)
    }

    fn node_override(&self, node_id: &str) -> Option<Severity> {
        if let Some(severity) = self.exact.get(node_id) {
            return Some(*severity);
        }

        self.globs
            .iter()
            .find(|(pattern, _)| pattern.matches(node_id))
            .map(|(_, severity)| *severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(pattern: &str) -> GlobPattern {
        GlobPattern::new(pattern).unwrap()
    }

    #[test]
    fn falls_through_to_default() {
        let resolver = SeverityResolver::new(Severity::Warn);
        assert_eq!(resolver.resolve("model.shop.orders"), Severity::Warn);
    }

    #[test]
    fn precedence_order() {
        let resolver = SeverityResolver::new(Severity::Info).with_project(Some(Severity::Warn));
        assert_eq!(resolver.resolve("model.shop.orders"), Severity::Warn);

        let resolver = resolver.with_fragment(Some(Severity::Error));
        assert_eq!(resolver.resolve("model.shop.orders"), Severity::Error);

        let resolver = resolver.with_node_override(glob("model.shop.*"), Severity::Info);
        assert_eq!(resolver.resolve("model.shop.orders"), Severity::Info);
        assert_eq!(resolver.resolve("model.other.orders"), Severity::Error);
    }

    #[test]
    fn exact_id_beats_any_glob() {
        let resolver = SeverityResolver::new(Severity::Warn)
            .with_node_override(glob("model.shop.orders"), Severity::Info)
            .with_node_override(glob("model.shop.ord*"), Severity::Error);

        assert_eq!(resolver.resolve("model.shop.orders"), Severity::Info);
        assert_eq!(resolver.resolve("model.shop.order_items"), Severity::Error);
    }

    #[test]
    fn longest_glob_wins_regardless_of_insertion_order() {
        let forward = SeverityResolver::new(Severity::Warn)
            .with_node_override(glob("model.*"), Severity::Info)
            .with_node_override(glob("model.shop.*"), Severity::Error);
        let backward = SeverityResolver::new(Severity::Warn)
            .with_node_override(glob("model.shop.*"), Severity::Error)
            .with_node_override(glob("model.*"), Severity::Info);

        for resolver in [forward, backward] {
            assert_eq!(resolver.resolve("model.shop.orders"), Severity::Error);
            assert_eq!(resolver.resolve("model.utils.date_spine"), Severity::Info);
        }
    }

    #[test]
    fn for_insight_reads_project_overrides() {
        let mut config = Config::default();
        config
            .severity
            .overrides
            .insert("check_macro_has_desc".into(), Severity::Error);

        let resolver = SeverityResolver::for_insight("check_macro_has_desc", Severity::Warn, &config, None, Vec::new());
        assert_eq!(resolver.resolve("macro.shop.x"), Severity::Error);

        let other = SeverityResolver::for_insight("check_model_parents_schema", Severity::Warn, &config, None, Vec::new());
        assert_eq!(other.resolve("model.shop.x"), Severity::Warn);
    }

    #[test]
    fn resolution_is_deterministic() {
        let build = || {
            SeverityResolver::new(Severity::Warn)
                .with_node_override(glob("source.*"), Severity::Info)
                .with_node_override(glob("source.shop.*"), Severity::Error)
        };
        let first: Vec<Severity> = ["source.shop.raw.a", "source.x.y", "model.a"]
            .iter()
            .map(|id| build().resolve(id))
            .collect();
        let second: Vec<Severity> = ["source.shop.raw.a", "source.x.y", "model.a"]
            .iter()
            .map(|id| build().resolve(id))
            .collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![Severity::Error, Severity::Info, Severity::Warn]);
    }
}
