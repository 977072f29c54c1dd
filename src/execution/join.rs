//! Natural inner join of binding tables.

use crate::core::{BindingTable, Row, Term};
use std::collections::HashMap;

/// Joins `left` and `right` on their shared columns.
///
/// Rows match when every shared column holds equal values; an unbound cell only
/// equals another unbound cell. Output columns are `left`'s followed by `right`'s new
/// ones. Rows come out in nested-loop order: each left row, in order, expanded by its
/// matching right rows, in order. The right side is indexed on the shared columns.
pub fn natural_join(left: &BindingTable, right: &BindingTable) -> BindingTable {
    let shared: Vec<(usize, usize)> = left
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(li, column)| right.column_index(column).map(|ri| (li, ri)))
        .collect();
    let extra: Vec<usize> = (0..right.columns().len())
        .filter(|ri| !shared.iter().any(|(_, r)| r == ri))
        .collect();

    let mut columns = left.columns().to_vec();
    columns.extend(extra.iter().map(|&ri| right.columns()[ri].clone()));

    let mut index: HashMap<Vec<&Option<Term>>, Vec<usize>> = HashMap::new();
    for (position, row) in right.rows().iter().enumerate() {
        let key = shared.iter().map(|&(_, ri)| &row[ri]).collect();
        index.entry(key).or_default().push(position);
    }

    let mut joined = BindingTable::new(columns);
    for left_row in left.rows() {
        let key: Vec<&Option<Term>> = shared.iter().map(|&(li, _)| &left_row[li]).collect();
        let Some(matches) = index.get(&key) else {
            continue;
        };
        for &position in matches {
            let right_row = &right.rows()[position];
            let mut row: Row = left_row.clone();
            row.extend(extra.iter().map(|&ri| right_row[ri].clone()));
            joined.push_row(row);
        }
    }
    joined
}

/// Folds [`natural_join`] over `tables` in order. No tables yields the empty table.
pub fn join_all(tables: &[BindingTable]) -> BindingTable {
    let Some((first, rest)) = tables.split_first() else {
        return BindingTable::empty();
    };
    let mut result = first.clone();
    for table in rest {
        if result.is_empty() {
            // nothing can match; keep accumulating the column set
            let mut columns = result.columns().to_vec();
            for column in table.columns() {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
            result = BindingTable::new(columns);
            continue;
        }
        result = natural_join(&result, table);
    }
    result
}
