//! Working state owned by one evaluation call.

use crate::core::BindingTable;
use crate::execution::filter::RegexCache;

/// Per-call storage for intermediate tables.
///
/// A context is created fresh for every evaluation, or reset before being reused, so
/// nothing leaks between evaluations of the same query.
#[derive(Debug, Default)]
pub struct EvaluationContext {
    group_tables: Vec<(String, BindingTable)>,
    pattern_rows: Vec<usize>,
    regexes: RegexCache,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every table from a previous run. The compiled regex cache survives.
    pub fn reset(&mut self) {
        self.group_tables.clear();
        self.pattern_rows.clear();
    }

    pub fn store_group(&mut self, name: &str, table: BindingTable) {
        self.group_tables.push((name.to_string(), table));
    }

    /// Case-insensitive lookup of a finished group table.
    pub fn group_table(&self, name: &str) -> Option<&BindingTable> {
        self.group_tables.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, t)| t)
    }

    /// Moves out all group tables in the order they were stored.
    pub fn take_group_tables(&mut self) -> Vec<BindingTable> {
        self.group_tables.drain(..).map(|(_, table)| table).collect()
    }

    pub(crate) fn record_pattern(&mut self, rows: usize) {
        self.pattern_rows.push(rows);
    }

    /// Row counts of every evaluated pattern, in evaluation order.
    pub fn pattern_rows(&self) -> &[usize] {
        &self.pattern_rows
    }

    pub(crate) fn regexes(&mut self) -> &mut RegexCache {
        &mut self.regexes
    }
}
