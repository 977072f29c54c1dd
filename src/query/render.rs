//! Canonical textual form of a query.
//!
//! `SELECT [DISTINCT] <vars|*> WHERE { groups } [GROUP BY ..] [ORDER BY ..] [LIMIT n]
//! [OFFSET n]`, on a single line. Consecutive groups joined with `union_with_next` are
//! written as one bracketed `{ { A } UNION { B } }` block.

use crate::query::modifier::OrderDirection;
use crate::query::pattern::PatternGroup;
use crate::query::select::Query;
use std::fmt;

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        if self.is_distinct() {
            write!(f, "DISTINCT ")?;
        }
        write_projection(self, f)?;

        write!(f, " WHERE {{")?;
        for block in union_blocks(self) {
            match block.as_slice() {
                [single] => write!(f, " {}", single)?,
                members => {
                    let rendered: Vec<String> = members.iter().map(|g| g.to_string()).collect();
                    write!(f, " {{ {} }}", rendered.join(" UNION "))?;
                }
            }
        }
        write!(f, " }}")?;

        if let Some(group_by) = self.group_by() {
            if !group_by.variables().is_empty() {
                let keys: Vec<String> =
                    group_by.variables().iter().map(|v| format!("?{}", v)).collect();
                write!(f, " GROUP BY {}", keys.join(" "))?;
            }
        }

        let order_by = self.order_by();
        if !order_by.is_empty() {
            let keys: Vec<String> = order_by
                .iter()
                .map(|(variable, direction)| match direction {
                    OrderDirection::Ascending => format!("ASC(?{})", variable),
                    OrderDirection::Descending => format!("DESC(?{})", variable),
                })
                .collect();
            write!(f, " ORDER BY {}", keys.join(" "))?;
        }
        if let Some(limit) = self.limit() {
            write!(f, " LIMIT {}", limit)?;
        }
        if let Some(offset) = self.offset() {
            write!(f, " OFFSET {}", offset)?;
        }
        Ok(())
    }
}

fn write_projection(query: &Query, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let aggregators = query.group_by().map(|g| g.aggregators()).unwrap_or_default();
    let columns = if query.projection().is_empty() && query.group_by().is_none() {
        return write!(f, "*");
    } else {
        query.output_columns()
    };

    let items: Vec<String> = columns
        .iter()
        .map(|column| match aggregators.iter().find(|a| a.output.eq_ignore_ascii_case(column)) {
            Some(aggregator) => aggregator.to_string(),
            None => format!("?{}", column),
        })
        .collect();
    if items.is_empty() {
        write!(f, "*")
    } else {
        write!(f, "{}", items.join(" "))
    }
}

/// Splits the groups into runs chained by `union_with_next`.
fn union_blocks(query: &Query) -> Vec<Vec<&PatternGroup>> {
    let mut blocks: Vec<Vec<&PatternGroup>> = Vec::new();
    let mut chained = false;
    for group in query.groups() {
        match blocks.last_mut() {
            Some(block) if chained => block.push(group),
            _ => blocks.push(vec![group]),
        }
        chained = group.is_union_with_next();
    }
    blocks
}
