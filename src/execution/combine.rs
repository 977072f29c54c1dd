//! Schema-union append of binding tables.

use crate::core::{BindingTable, Row};

/// Appends `tables` row-wise in order.
///
/// The result's columns are the union of all input columns in first-seen order; cells
/// a table has no column for come out unbound. Duplicate rows are kept.
pub fn union_append(tables: Vec<BindingTable>) -> BindingTable {
    let mut columns: Vec<String> = Vec::new();
    for table in &tables {
        for column in table.columns() {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
    }

    let mut combined = BindingTable::new(columns);
    for table in tables {
        let positions: Vec<Option<usize>> =
            combined.columns().iter().map(|c| table.column_index(c)).collect();
        for row in table.into_rows() {
            let padded: Row = positions
                .iter()
                .map(|position| position.and_then(|i| row[i].clone()))
                .collect();
            combined.push_row(padded);
        }
    }
    combined
}
