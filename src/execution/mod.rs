//! Query Execution Module
//!
//! Evaluates a [`Query`] against a [`DataSource`] and produces a [`BindingTable`].
//!
//! # Components
//!
//! - **pattern** - binds one pattern against a local source
//! - **join** / **group** - joins a group's pattern tables and applies its filters
//! - **combine** - schema-union append of group tables
//! - **federation** - per-member fan-out feeding the group join
//! - **endpoint** - one-round-trip delegation to a remote endpoint
//! - **modifiers** / **aggregate** - the fixed-order modifier pipeline
//! - **result_converter** - SPARQL results formats in and out
//!
//! # Architecture
//!
//! ```text
//! Query -> for each group: pattern tables -> join -> filters -> group table
//!       -> union append of all group tables -> modifier pipeline -> result
//! ```
//!
//! Evaluation is fail-soft: an absent source or an unreachable endpoint yields an
//! empty table, never an error.
//!
//! # Example
//!
//! ```ignore
//! use quarry::execution::QueryEngine;
//!
//! let engine = QueryEngine::default();
//! let table = engine.evaluate(&query, Some(&source));
//! println!("{}", table);
//! ```

pub mod aggregate;
pub mod combine;
pub mod context;
pub mod endpoint;
pub mod federation;
pub mod filter;
pub mod group;
pub mod join;
pub mod modifiers;
pub mod pattern;
pub mod result_converter;

use crate::config::EngineConfig;
use crate::core::BindingTable;
use crate::query::Query;
use crate::sources::DataSource;

pub use context::EvaluationContext;
pub use result_converter::{parse_sparql_xml, write_results, ResultFormat};

/// Evaluates queries. Holds configuration only; all per-query state lives in an
/// [`EvaluationContext`].
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    config: EngineConfig,
}

impl QueryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluates `query` with a fresh context. The result is named after the query's
    /// canonical rendering.
    pub fn evaluate(&self, query: &Query, source: Option<&DataSource>) -> BindingTable {
        let mut context = EvaluationContext::new();
        self.evaluate_in(&mut context, query, source)
    }

    /// Evaluates `query` in `context`, which is reset first.
    pub fn evaluate_in(
        &self,
        context: &mut EvaluationContext,
        query: &Query,
        source: Option<&DataSource>,
    ) -> BindingTable {
        context.reset();
        let name = query.to_sparql();

        let Some(source) = source else {
            log::debug!("No data source, returning an empty result");
            return BindingTable::new(query.output_columns()).with_name(name);
        };
        log::debug!("Evaluating against {}: {}", source.kind(), name);

        if let DataSource::Endpoint(endpoint) = source {
            return endpoint::delegate(query, endpoint).with_name(name);
        }

        for group in query.groups() {
            let table = match source {
                DataSource::Graph(local) | DataSource::Store(local) => {
                    group::evaluate_group(group, local.as_ref(), context, &self.config)
                }
                DataSource::Federation(federation) => {
                    federation::evaluate_group(group, federation, context, &self.config)
                }
                DataSource::Endpoint(_) => BindingTable::empty(),
            };
            context.store_group(group.name(), table);
        }

        let combined = combine::union_append(context.take_group_tables());
        log::debug!("Combined {} rows before modifiers", combined.len());
        modifiers::apply_modifiers(combined, query).with_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Term, Triple};
    use crate::query::{Pattern, PatternGroup};
    use crate::sources::Graph;

    fn ex(name: &str) -> Term {
        Term::resource(format!("http://example.org/{}", name))
    }

    fn query() -> Query {
        let mut group = PatternGroup::new("main");
        group.add_pattern(Pattern::new(Term::variable("s"), ex("p"), Term::variable("o")));
        let mut query = Query::new();
        query.add_group(group);
        query
    }

    #[test]
    fn test_absent_source_is_empty() {
        let table = QueryEngine::default().evaluate(&query(), None);
        assert!(table.is_empty());
        assert_eq!(table.columns(), ["s".to_string(), "o".to_string()]);
    }

    #[test]
    fn test_result_is_named_after_query() {
        let source = DataSource::from(
            vec![Triple::new(ex("a"), ex("p"), ex("b"))].into_iter().collect::<Graph>(),
        );
        let query = query();
        let table = QueryEngine::default().evaluate(&query, Some(&source));
        assert_eq!(table.name(), query.to_sparql());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_reused_context_is_reset() {
        let source = DataSource::from(
            vec![Triple::new(ex("a"), ex("p"), ex("b"))].into_iter().collect::<Graph>(),
        );
        let engine = QueryEngine::default();
        let mut context = EvaluationContext::new();
        let first = engine.evaluate_in(&mut context, &query(), Some(&source));
        let second = engine.evaluate_in(&mut context, &query(), Some(&source));
        assert_eq!(first, second);
        assert_eq!(context.pattern_rows(), [1]);
    }
}
