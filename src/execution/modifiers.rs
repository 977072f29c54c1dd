//! The solution modifier pipeline.
//!
//! Stages always run in this order, whatever order the modifiers were declared in:
//! GROUP BY + aggregation, DISTINCT, ORDER BY, OFFSET, LIMIT, then projection onto the
//! query's output columns.

use crate::core::{BindingTable, Numeric, Row, Term};
use crate::execution::aggregate::reduce_partition;
use crate::query::{GroupBy, OrderDirection, Query};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

pub fn apply_modifiers(table: BindingTable, query: &Query) -> BindingTable {
    let mut table = match query.group_by() {
        Some(group_by) => group(&table, group_by),
        None => table,
    };

    let output = query.output_columns();
    if query.is_distinct() {
        table = distinct(table, &output);
    }

    let order_by = query.order_by();
    if !order_by.is_empty() {
        table = order(table, &order_by);
    }

    table = slice(table, query.offset().unwrap_or(0), query.limit());

    if output.is_empty() {
        table
    } else {
        table.project(&output)
    }
}

/// Partitions rows by the grouping variables and emits one row per partition with the
/// grouping values followed by each aggregate. Partitions keep first-seen order.
/// Without grouping variables the whole input is one partition, even when empty.
pub fn group(table: &BindingTable, group_by: &GroupBy) -> BindingTable {
    let key_indexes: Vec<Option<usize>> =
        group_by.variables().iter().map(|v| table.column_index(v)).collect();

    let mut partitions: Vec<(Vec<Option<Term>>, Vec<usize>)> = Vec::new();
    let mut lookup: HashMap<Vec<Option<Term>>, usize> = HashMap::new();
    for (position, row) in table.rows().iter().enumerate() {
        let key: Vec<Option<Term>> =
            key_indexes.iter().map(|index| index.and_then(|i| row[i].clone())).collect();
        match lookup.get(&key) {
            Some(&partition) => partitions[partition].1.push(position),
            None => {
                lookup.insert(key.clone(), partitions.len());
                partitions.push((key, vec![position]));
            }
        }
    }
    if group_by.variables().is_empty() && partitions.is_empty() {
        partitions.push((Vec::new(), Vec::new()));
    }

    let source_indexes: Vec<Option<usize>> = group_by
        .aggregators()
        .iter()
        .map(|a| a.source.as_deref().and_then(|s| table.column_index(s)))
        .collect();

    let mut grouped = BindingTable::new(group_by.output_columns());
    for (key, members) in partitions {
        let mut row: Row = key;
        for (aggregator, source) in group_by.aggregators().iter().zip(&source_indexes) {
            let value = reduce_partition(aggregator, members.len(), |i| {
                source.and_then(|column| table.rows()[members[i]][column].as_ref())
            });
            row.push(value);
        }
        grouped.push_row(row);
    }
    log::debug!("GROUP BY produced {} partitions from {} rows", grouped.len(), table.len());
    grouped
}

/// Drops rows whose output cells repeat an earlier row's. First occurrence wins.
pub fn distinct(table: BindingTable, output: &[String]) -> BindingTable {
    let indexes: Vec<Option<usize>> = if output.is_empty() {
        (0..table.columns().len()).map(Some).collect()
    } else {
        output.iter().map(|c| table.column_index(c)).collect()
    };
    let (columns, rows) = table.into_parts();
    let mut seen: HashSet<Vec<Option<Term>>> = HashSet::new();
    let rows: Vec<Row> = rows
        .into_iter()
        .filter(|row| {
            let key = indexes.iter().map(|index| index.and_then(|i| row[i].clone())).collect();
            seen.insert(key)
        })
        .collect();
    BindingTable::from_rows(columns, rows)
}

/// Stable sort on the ORDER BY keys in declaration order.
pub fn order(table: BindingTable, keys: &[(&str, OrderDirection)]) -> BindingTable {
    let resolved: Vec<(Option<usize>, OrderDirection)> =
        keys.iter().map(|(variable, direction)| (table.column_index(variable), *direction)).collect();
    let (columns, mut rows) = table.into_parts();
    rows.sort_by(|a, b| {
        resolved
            .iter()
            .map(|(index, direction)| {
                let left = index.and_then(|i| a[i].as_ref());
                let right = index.and_then(|i| b[i].as_ref());
                compare_for_order(left, right, *direction)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    BindingTable::from_rows(columns, rows)
}

/// Total order used by ORDER BY.
///
/// Unbound sorts last in both directions. Among bound terms numbers come first and
/// compare by value, with NaN after every other number; everything else compares by
/// its N-Triples text.
pub fn compare_for_order(left: Option<&Term>, right: Option<&Term>, direction: OrderDirection) -> Ordering {
    let (left, right) = match (left, right) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(left), Some(right)) => (left, right),
    };
    let ordering = match (Numeric::from_term(left), Numeric::from_term(right)) {
        (Some(l), Some(r)) => l.total_cmp(r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.to_string().cmp(&right.to_string()),
    };
    match direction {
        OrderDirection::Ascending => ordering,
        OrderDirection::Descending => ordering.reverse(),
    }
}

/// OFFSET then LIMIT.
pub fn slice(table: BindingTable, offset: usize, limit: Option<usize>) -> BindingTable {
    if offset == 0 && limit.is_none() {
        return table;
    }
    let (columns, rows) = table.into_parts();
    let rows: Vec<Row> = rows.into_iter().skip(offset).take(limit.unwrap_or(usize::MAX)).collect();
    BindingTable::from_rows(columns, rows)
}
