//! The SELECT query model: patterns, groups, filters and modifiers.
//!
//! Queries are built programmatically or described in JSON; evaluation lives in
//! [`crate::execution`].

pub mod expression;
pub mod modifier;
pub mod pattern;
mod render;
pub mod select;

pub use expression::{Expression, Filter};
pub use modifier::{AggregateFunction, Aggregator, GroupBy, Modifier, OrderDirection};
pub use pattern::{Pattern, PatternGroup};
pub use select::{Query, QueryMember};
