//! Fan-out of a pattern group over federation members.

use crate::config::EngineConfig;
use crate::core::BindingTable;
use crate::execution::combine::union_append;
use crate::execution::context::EvaluationContext;
use crate::execution::group::finish_group;
use crate::execution::pattern::evaluate_pattern;
use crate::query::{Pattern, PatternGroup};
use crate::sources::{Federation, TripleSource};
use rayon::prelude::*;
use std::sync::Arc;

/// Evaluates one group over a federation.
///
/// Each pattern is bound against every member in member order and the per-member
/// tables are appended before the group's join and filters run, so a join may pair
/// rows coming from different members. Members only ever add rows. A pattern without
/// variables holds if it holds in any member.
pub fn evaluate_group(
    group: &PatternGroup,
    federation: &Federation,
    context: &mut EvaluationContext,
    config: &EngineConfig,
) -> BindingTable {
    let tables: Vec<BindingTable> = group
        .patterns()
        .iter()
        .map(|pattern| evaluate_over_members(pattern, federation.members(), config))
        .collect();
    finish_group(group, tables, context)
}

fn evaluate_over_members(
    pattern: &Pattern,
    members: &[Arc<dyn TripleSource>],
    config: &EngineConfig,
) -> BindingTable {
    let per_member: Vec<BindingTable> = if config.parallel {
        members.par_iter().map(|member| evaluate_pattern(pattern, member.as_ref())).collect()
    } else {
        members.iter().map(|member| evaluate_pattern(pattern, member.as_ref())).collect()
    };

    if pattern.variables().is_empty() {
        return if per_member.iter().any(|t| !t.is_empty()) {
            BindingTable::unit()
        } else {
            BindingTable::empty()
        };
    }
    let merged = union_append(per_member);
    log::trace!("{} -> {} rows over {} members", pattern, merged.len(), members.len());
    merged
}
