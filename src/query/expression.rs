//! Filter expressions.
//!
//! The expression tree is plain data; evaluation against a row lives in
//! `execution::filter`.

use crate::core::term::deserialize_variable_name;
use crate::core::Term;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    Variable(#[serde(deserialize_with = "deserialize_variable_name")] String),
    Constant(Term),
    Equal(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),
    Less(Box<Expression>, Box<Expression>),
    LessOrEqual(Box<Expression>, Box<Expression>),
    Greater(Box<Expression>, Box<Expression>),
    GreaterOrEqual(Box<Expression>, Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    Bound(#[serde(deserialize_with = "deserialize_variable_name")] String),
    IsIri(Box<Expression>),
    IsBlank(Box<Expression>),
    IsLiteral(Box<Expression>),
    IsNumeric(Box<Expression>),
    Str(Box<Expression>),
    Lang(Box<Expression>),
    Datatype(Box<Expression>),
    LangMatches(Box<Expression>, Box<Expression>),
    Regex {
        text: Box<Expression>,
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flags: Option<String>,
    },
    SameTerm(Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn var(name: impl AsRef<str>) -> Self {
        Expression::Variable(crate::core::term::strip_variable_sigil(name.as_ref()).to_string())
    }

    pub fn constant(term: Term) -> Self {
        Expression::Constant(term)
    }

    pub fn bound(name: impl AsRef<str>) -> Self {
        Expression::Bound(crate::core::term::strip_variable_sigil(name.as_ref()).to_string())
    }

    pub fn equal(left: Expression, right: Expression) -> Self {
        Expression::Equal(Box::new(left), Box::new(right))
    }

    pub fn not_equal(left: Expression, right: Expression) -> Self {
        Expression::NotEqual(Box::new(left), Box::new(right))
    }

    pub fn less(left: Expression, right: Expression) -> Self {
        Expression::Less(Box::new(left), Box::new(right))
    }

    pub fn less_or_equal(left: Expression, right: Expression) -> Self {
        Expression::LessOrEqual(Box::new(left), Box::new(right))
    }

    pub fn greater(left: Expression, right: Expression) -> Self {
        Expression::Greater(Box::new(left), Box::new(right))
    }

    pub fn greater_or_equal(left: Expression, right: Expression) -> Self {
        Expression::GreaterOrEqual(Box::new(left), Box::new(right))
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Expression) -> Self {
        Expression::Not(Box::new(inner))
    }

    pub fn regex(text: Expression, pattern: impl Into<String>, flags: Option<&str>) -> Self {
        Expression::Regex {
            text: Box::new(text),
            pattern: pattern.into(),
            flags: flags.map(str::to_string),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Variable(name) => write!(f, "?{}", name),
            Expression::Constant(term) => write!(f, "{}", term),
            Expression::Equal(l, r) => write!(f, "({} = {})", l, r),
            Expression::NotEqual(l, r) => write!(f, "({} != {})", l, r),
            Expression::Less(l, r) => write!(f, "({} < {})", l, r),
            Expression::LessOrEqual(l, r) => write!(f, "({} <= {})", l, r),
            Expression::Greater(l, r) => write!(f, "({} > {})", l, r),
            Expression::GreaterOrEqual(l, r) => write!(f, "({} >= {})", l, r),
            Expression::And(l, r) => write!(f, "({} && {})", l, r),
            Expression::Or(l, r) => write!(f, "({} || {})", l, r),
            Expression::Not(inner) => write!(f, "!{}", inner),
            Expression::Bound(name) => write!(f, "BOUND(?{})", name),
            Expression::IsIri(inner) => write!(f, "isIRI({})", inner),
            Expression::IsBlank(inner) => write!(f, "isBlank({})", inner),
            Expression::IsLiteral(inner) => write!(f, "isLiteral({})", inner),
            Expression::IsNumeric(inner) => write!(f, "isNumeric({})", inner),
            Expression::Str(inner) => write!(f, "STR({})", inner),
            Expression::Lang(inner) => write!(f, "LANG({})", inner),
            Expression::Datatype(inner) => write!(f, "DATATYPE({})", inner),
            Expression::LangMatches(l, r) => write!(f, "LANGMATCHES({}, {})", l, r),
            Expression::Regex { text, pattern, flags } => {
                write!(f, "REGEX({}, {}", text, Term::literal(pattern.as_str()))?;
                if let Some(flags) = flags {
                    write!(f, ", {}", Term::literal(flags.as_str()))?;
                }
                write!(f, ")")
            }
            Expression::SameTerm(l, r) => write!(f, "sameTerm({}, {})", l, r),
        }
    }
}

/// A boolean predicate owned by one pattern group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    expression: Expression,
}

impl Filter {
    pub fn new(expression: Expression) -> Self {
        Self { expression }
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }
}

impl From<Expression> for Filter {
    fn from(expression: Expression) -> Self {
        Filter::new(expression)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expression {
            // already parenthesized
            Expression::Equal(..)
            | Expression::NotEqual(..)
            | Expression::Less(..)
            | Expression::LessOrEqual(..)
            | Expression::Greater(..)
            | Expression::GreaterOrEqual(..)
            | Expression::And(..)
            | Expression::Or(..) => write!(f, "FILTER {}", self.expression),
            other => write!(f, "FILTER ({})", other),
        }
    }
}
