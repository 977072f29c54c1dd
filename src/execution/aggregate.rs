//! Aggregate reductions over one GROUP BY partition.

use crate::core::{Numeric, Term};
use crate::query::{AggregateFunction, Aggregator};

/// Reduces the source values of one partition.
///
/// `values` holds the aggregator's source cell for every row of the partition, in row
/// order (`None` = unbound). For `COUNT(*)` the caller passes one entry per row.
/// Numeric functions skip values that are not numeric. Every function except COUNT
/// yields `None` when it has no valid input.
pub fn reduce(function: AggregateFunction, values: &[Option<&Term>]) -> Option<Term> {
    let bound = values.iter().flatten().copied();
    match function {
        AggregateFunction::Count => Some(Term::integer(bound.count() as i64)),
        AggregateFunction::Sum => sum(bound).map(|(total, _)| total.to_term()),
        AggregateFunction::Avg => {
            sum(bound).map(|(total, count)| total.divide_by(count).to_term())
        }
        AggregateFunction::Min => extreme(bound, std::cmp::Ordering::Less),
        AggregateFunction::Max => extreme(bound, std::cmp::Ordering::Greater),
        AggregateFunction::Sample => values.iter().flatten().next().map(|t| (*t).clone()),
    }
}

/// Reduces a partition for `aggregator`, given a lookup of the source column.
pub fn reduce_partition<'a>(
    aggregator: &Aggregator,
    rows: usize,
    source: impl Fn(usize) -> Option<&'a Term>,
) -> Option<Term> {
    match &aggregator.source {
        None => Some(Term::integer(rows as i64)),
        Some(_) => {
            let values: Vec<Option<&Term>> = (0..rows).map(source).collect();
            reduce(aggregator.function, &values)
        }
    }
}

fn sum<'a>(values: impl Iterator<Item = &'a Term>) -> Option<(Numeric, usize)> {
    let mut total: Option<Numeric> = None;
    let mut count = 0;
    for value in values {
        let Some(number) = Numeric::from_term(value) else {
            log::trace!("Skipping non-numeric aggregate input {}", value);
            continue;
        };
        total = Some(match total {
            Some(total) => total.add(number),
            None => number,
        });
        count += 1;
    }
    total.map(|total| (total, count))
}

/// First numeric value that no later value beats in the `wanted` direction.
fn extreme<'a>(
    values: impl Iterator<Item = &'a Term>,
    wanted: std::cmp::Ordering,
) -> Option<Term> {
    let mut best: Option<(Numeric, &Term)> = None;
    for value in values {
        let Some(number) = Numeric::from_term(value) else {
            continue;
        };
        let replace = match best {
            None => true,
            Some((current, _)) => number.compare(current) == Some(wanted),
        };
        if replace {
            best = Some((number, value));
        }
    }
    best.map(|(_, term)| term.clone())
}
