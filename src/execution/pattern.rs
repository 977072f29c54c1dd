//! Binds a single pattern against a local source.

use crate::core::{BindingTable, Row, Term, Triple};
use crate::query::Pattern;
use crate::sources::TripleSource;

/// One row per matching triple, binding every variable slot.
///
/// A variable repeated across slots only matches triples carrying the same term in
/// each of those slots. A variable in the context slot never matches default-graph
/// triples. A pattern without variables yields the zero-column unit table when any
/// triple matches and an empty table otherwise.
pub fn evaluate_pattern(pattern: &Pattern, source: &dyn TripleSource) -> BindingTable {
    let variables = pattern.variables();
    let triples = source.match_triples(&pattern.to_match());

    if variables.is_empty() {
        return if triples.is_empty() { BindingTable::empty() } else { BindingTable::unit() };
    }

    let columns: Vec<String> = variables.iter().map(|v| v.to_string()).collect();
    let mut table = BindingTable::new(columns);
    for triple in &triples {
        if let Some(row) = bind(pattern, &variables, triple) {
            table.push_row(row);
        }
    }
    log::trace!("{} -> {} rows from {} candidates", pattern, table.len(), triples.len());
    table
}

fn bind(pattern: &Pattern, variables: &[&str], triple: &Triple) -> Option<Row> {
    let mut row: Row = vec![None; variables.len()];
    let slots = [
        (&pattern.subject, Some(&triple.subject)),
        (&pattern.predicate, Some(&triple.predicate)),
        (&pattern.object, Some(&triple.object)),
    ];
    let context = pattern.context.as_ref().map(|c| (c, triple.context.as_ref()));

    for (slot, value) in slots.into_iter().chain(context) {
        let Some(name) = slot.as_variable() else {
            continue;
        };
        let value: &Term = value?;
        let index = variables.iter().position(|v| *v == name)?;
        match &row[index] {
            Some(bound) if bound != value => return None,
            Some(_) => {}
            None => row[index] = Some(value.clone()),
        }
    }
    Some(row)
}
