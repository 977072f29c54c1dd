//! Pattern group evaluation: bind each pattern, join, filter.

use crate::config::EngineConfig;
use crate::core::BindingTable;
use crate::execution::context::EvaluationContext;
use crate::execution::filter::apply_filters;
use crate::execution::join::join_all;
use crate::execution::pattern::evaluate_pattern;
use crate::query::PatternGroup;
use crate::sources::TripleSource;
use rayon::prelude::*;

/// Evaluates one group against a local source.
pub fn evaluate_group(
    group: &PatternGroup,
    source: &dyn TripleSource,
    context: &mut EvaluationContext,
    config: &EngineConfig,
) -> BindingTable {
    let tables: Vec<BindingTable> = if config.parallel {
        group.patterns().par_iter().map(|pattern| evaluate_pattern(pattern, source)).collect()
    } else {
        group.patterns().iter().map(|pattern| evaluate_pattern(pattern, source)).collect()
    };
    finish_group(group, tables, context)
}

/// Joins the per-pattern tables of `group` in declaration order and applies its
/// filters.
pub(crate) fn finish_group(
    group: &PatternGroup,
    tables: Vec<BindingTable>,
    context: &mut EvaluationContext,
) -> BindingTable {
    for table in &tables {
        context.record_pattern(table.len());
    }
    let joined = join_all(&tables);
    log::debug!("Group '{}' joined {} patterns into {} rows", group.name(), tables.len(), joined.len());
    apply_filters(joined, group.filters(), context.regexes())
}
