//! The binding table: the runtime currency of query evaluation.

use crate::core::term::Term;
use std::fmt;

/// One solution. Cells line up with the owning table's columns; `None` is unbound.
pub type Row = Vec<Option<Term>>;

/// An ordered sequence of rows over a named column set.
///
/// A table with zero columns and one row is the "existence" table produced by a
/// pattern without variables that matched; it is the identity for joins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl BindingTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self { name: String::new(), columns, rows: Vec::new() }
    }

    /// No columns, no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// No columns, one empty row.
    pub fn unit() -> Self {
        Self { name: String::new(), columns: Vec::new(), rows: vec![Vec::new()] }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self { name: String::new(), columns, rows }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The canonical rendering of the query that produced this table, if any.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.columns, self.rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn push_row(&mut self, row: Row) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// The value bound to `column` in row `row`, if both exist and the cell is bound.
    pub fn get(&self, row: usize, column: &str) -> Option<&Term> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_ref()
    }

    /// All cells of one column, top to bottom. Unknown columns read as unbound.
    pub fn column_values(&self, column: &str) -> Vec<Option<&Term>> {
        match self.column_index(column) {
            Some(index) => self.rows.iter().map(|row| row[index].as_ref()).collect(),
            None => vec![None; self.rows.len()],
        }
    }

    /// Reorders/restricts columns. Columns missing from this table come out unbound.
    pub fn project(&self, columns: &[String]) -> BindingTable {
        let indexes: Vec<Option<usize>> = columns.iter().map(|c| self.column_index(c)).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indexes.iter().map(|index| index.and_then(|i| row[i].clone())).collect())
            .collect();
        BindingTable { name: self.name.clone(), columns: columns.to_vec(), rows }
    }

    pub fn clear(&mut self) {
        self.columns.clear();
        self.rows.clear();
    }
}

impl fmt::Display for BindingTable {
    /// Renders an aligned text table, `?var` headers and unbound cells left blank.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<String> = self.columns.iter().map(|c| format!("?{}", c)).collect();
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter().map(|cell| cell.as_ref().map(Term::to_string).unwrap_or_default()).collect()
            })
            .collect();
        let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_line(f, &headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "|-{}-|", rule.join("-|-"))?;
        for row in &cells {
            write_line(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, values: &[String], widths: &[usize]) -> fmt::Result {
    let padded: Vec<String> = values
        .iter()
        .zip(widths)
        .map(|(value, width)| format!("{:<width$}", value, width = *width))
        .collect();
    writeln!(f, "| {} |", padded.join(" | "))
}
