//! Filter expression evaluation.
//!
//! Evaluation yields `Option<Term>`: `None` is the error value (unbound variable,
//! incomparable operands, bad argument). A filter keeps a row only when its effective
//! boolean value is `true`, so errors drop the row.

use crate::core::{BindingTable, Numeric, Row, Term};
use crate::query::{Expression, Filter};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Compiled REGEX patterns keyed by pattern and flags. Invalid patterns are cached
/// as `None`.
#[derive(Debug, Default)]
pub struct RegexCache {
    compiled: HashMap<(String, String), Option<Regex>>,
}

impl RegexCache {
    pub fn get(&mut self, pattern: &str, flags: &str) -> Option<&Regex> {
        self.compiled
            .entry((pattern.to_string(), flags.to_string()))
            .or_insert_with(|| compile(pattern, flags))
            .as_ref()
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

fn compile(pattern: &str, flags: &str) -> Option<Regex> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            other => {
                log::debug!("Unsupported regex flag '{}'", other);
                return None;
            }
        };
    }
    match builder.build() {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::debug!("Invalid regex {:?}: {}", pattern, e);
            None
        }
    }
}

/// Read access to the cells of one row by variable name.
#[derive(Clone, Copy)]
pub struct Bindings<'a> {
    columns: &'a [String],
    row: &'a Row,
}

impl<'a> Bindings<'a> {
    pub fn new(columns: &'a [String], row: &'a Row) -> Self {
        Self { columns, row }
    }

    pub fn get(&self, variable: &str) -> Option<&'a Term> {
        let index = self.columns.iter().position(|c| c == variable)?;
        self.row.get(index)?.as_ref()
    }
}

/// Keeps the rows for which every filter holds. Columns are unchanged.
pub fn apply_filters(
    table: BindingTable,
    filters: &[Filter],
    regexes: &mut RegexCache,
) -> BindingTable {
    if filters.is_empty() {
        return table;
    }
    let before = table.len();
    let (columns, rows) = table.into_parts();
    let kept: Vec<Row> = rows
        .into_iter()
        .filter(|row| {
            let bindings = Bindings::new(&columns, row);
            filters.iter().all(|f| holds(f.expression(), bindings, regexes))
        })
        .collect();
    log::debug!("Filters kept {} of {} rows", kept.len(), before);
    BindingTable::from_rows(columns, kept)
}

/// True only when the expression's effective boolean value is `true`.
pub fn holds(expression: &Expression, bindings: Bindings<'_>, regexes: &mut RegexCache) -> bool {
    evaluate(expression, bindings, regexes)
        .and_then(|value| effective_boolean_value(&value))
        .unwrap_or(false)
}

pub fn evaluate(
    expression: &Expression,
    bindings: Bindings<'_>,
    regexes: &mut RegexCache,
) -> Option<Term> {
    let mut eval = |e: &Expression| evaluate(e, bindings, regexes);
    match expression {
        Expression::Variable(name) => bindings.get(name).cloned(),
        Expression::Constant(Term::Variable(name)) => bindings.get(name).cloned(),
        Expression::Constant(term) => Some(term.clone()),
        Expression::Equal(l, r) => {
            let (l, r) = (eval(l)?, eval(r)?);
            equals(&l, &r).map(Term::boolean)
        }
        Expression::NotEqual(l, r) => {
            let (l, r) = (eval(l)?, eval(r)?);
            equals(&l, &r).map(|eq| Term::boolean(!eq))
        }
        Expression::Less(l, r) => compare_with(eval(l)?, eval(r)?, Ordering::is_lt),
        Expression::LessOrEqual(l, r) => compare_with(eval(l)?, eval(r)?, Ordering::is_le),
        Expression::Greater(l, r) => compare_with(eval(l)?, eval(r)?, Ordering::is_gt),
        Expression::GreaterOrEqual(l, r) => compare_with(eval(l)?, eval(r)?, Ordering::is_ge),
        Expression::And(l, r) => {
            let l = eval(l).and_then(|v| effective_boolean_value(&v));
            let r = eval(r).and_then(|v| effective_boolean_value(&v));
            match (l, r) {
                (Some(false), _) | (_, Some(false)) => Some(Term::boolean(false)),
                (Some(true), Some(true)) => Some(Term::boolean(true)),
                _ => None,
            }
        }
        Expression::Or(l, r) => {
            let l = eval(l).and_then(|v| effective_boolean_value(&v));
            let r = eval(r).and_then(|v| effective_boolean_value(&v));
            match (l, r) {
                (Some(true), _) | (_, Some(true)) => Some(Term::boolean(true)),
                (Some(false), Some(false)) => Some(Term::boolean(false)),
                _ => None,
            }
        }
        Expression::Not(inner) => {
            let value = effective_boolean_value(&eval(inner)?)?;
            Some(Term::boolean(!value))
        }
        Expression::Bound(name) => Some(Term::boolean(bindings.get(name).is_some())),
        Expression::IsIri(inner) => Some(Term::boolean(eval(inner)?.is_resource())),
        Expression::IsBlank(inner) => Some(Term::boolean(eval(inner)?.is_blank())),
        Expression::IsLiteral(inner) => Some(Term::boolean(eval(inner)?.is_literal())),
        Expression::IsNumeric(inner) => {
            let value = eval(inner)?;
            let numeric = matches!(value, Term::TypedLiteral { .. })
                && Numeric::from_term(&value).is_some();
            Some(Term::boolean(numeric))
        }
        Expression::Str(inner) => match eval(inner)? {
            Term::BlankNode(_) | Term::Variable(_) => None,
            value => Some(Term::literal(value.lexical_form())),
        },
        Expression::Lang(inner) => {
            let value = eval(inner)?;
            if !value.is_literal() {
                return None;
            }
            Some(Term::literal(value.language().unwrap_or("")))
        }
        Expression::Datatype(inner) => eval(inner)?.datatype().map(Term::resource),
        Expression::LangMatches(tag, range) => {
            let tag = eval(tag)?;
            let range = eval(range)?;
            Some(Term::boolean(lang_matches(tag.lexical_form(), range.lexical_form())))
        }
        Expression::Regex { text, pattern, flags } => {
            let text = eval(text)?;
            if !text.is_literal() {
                return None;
            }
            let regex = regexes.get(pattern, flags.as_deref().unwrap_or(""))?;
            Some(Term::boolean(regex.is_match(text.lexical_form())))
        }
        Expression::SameTerm(l, r) => {
            let (l, r) = (eval(l)?, eval(r)?);
            Some(Term::boolean(l == r))
        }
    }
}

/// Effective boolean value of a term; `None` when the term has none.
pub fn effective_boolean_value(term: &Term) -> Option<bool> {
    match term {
        Term::TypedLiteral { value, datatype } if datatype == crate::core::term::XSD_BOOLEAN => {
            match value.trim() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            }
        }
        Term::TypedLiteral { .. } if term.is_simple_string() => Some(!term.lexical_form().is_empty()),
        Term::TypedLiteral { .. } => Numeric::from_term(term).map(|n| !n.is_zero()),
        Term::PlainLiteral { value, language: None } => Some(!value.is_empty()),
        _ => None,
    }
}

/// Value equality: numbers by value, everything else by term identity.
fn equals(left: &Term, right: &Term) -> Option<bool> {
    if let (Some(l), Some(r)) = (numeric(left), numeric(right)) {
        return Some(l.compare(r) == Some(Ordering::Equal));
    }
    Some(left == right)
}

fn compare_with(left: Term, right: Term, test: fn(Ordering) -> bool) -> Option<Term> {
    compare(&left, &right).map(|ordering| Term::boolean(test(ordering)))
}

/// Ordering for `<`, `<=`, `>` and `>=`. Numbers compare by value; literals of the same
/// datatype and language compare by lexical form; anything else is an error.
fn compare(left: &Term, right: &Term) -> Option<Ordering> {
    if let (Some(l), Some(r)) = (numeric(left), numeric(right)) {
        return l.compare(r);
    }
    if left.is_literal()
        && right.is_literal()
        && left.datatype() == right.datatype()
        && left.language() == right.language()
    {
        return Some(left.lexical_form().cmp(right.lexical_form()));
    }
    None
}

/// Numeric view for comparisons. Plain literals stay strings here.
fn numeric(term: &Term) -> Option<Numeric> {
    match term {
        Term::TypedLiteral { .. } => Numeric::from_term(term),
        _ => None,
    }
}

fn lang_matches(tag: &str, range: &str) -> bool {
    if range == "*" {
        return !tag.is_empty();
    }
    let tag = tag.to_ascii_lowercase();
    let range = range.to_ascii_lowercase();
    tag == range || tag.strip_prefix(&range).is_some_and(|rest| rest.starts_with('-'))
}
