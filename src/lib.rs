//! # Quarry
//!
//! Quarry evaluates SPARQL-style SELECT queries: triple patterns organised in
//! pattern groups, filtered, combined by schema-union append and post-processed by a
//! fixed-order modifier pipeline (GROUP BY with aggregation, DISTINCT, ORDER BY,
//! OFFSET, LIMIT).
//!
//! Queries run against a single graph, a multi-graph store, a federation of local
//! sources or a remote SPARQL endpoint.
//!
//! ## Features
//!
//! - Natural-join evaluation of pattern groups with filter expressions
//! - Federation of several sources merged additively
//! - Fail-soft delegation to remote endpoints over HTTP with SPARQL XML results
//! - COUNT, SUM, AVG, MIN, MAX and SAMPLE aggregates
//! - Results as text, SPARQL JSON, CSV, TSV or SPARQL XML
//!
//! ## Example
//!
//! ```rust
//! use quarry::core::{Term, Triple};
//! use quarry::execution::QueryEngine;
//! use quarry::query::{Pattern, PatternGroup, Query};
//! use quarry::sources::{DataSource, Graph};
//!
//! let ex = |name: &str| Term::resource(format!("http://example.org/{}", name));
//! let graph: Graph = vec![Triple::new(ex("alice"), ex("knows"), ex("bob"))].into_iter().collect();
//!
//! let mut group = PatternGroup::new("people");
//! group.add_pattern(Pattern::new(Term::variable("x"), ex("knows"), Term::variable("y")));
//! let mut query = Query::new();
//! query.add_projection("y").add_group(group);
//!
//! let table = QueryEngine::default().evaluate(&query, Some(&DataSource::from(graph)));
//! assert_eq!(table.get(0, "y"), Some(&ex("bob")));
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unnecessary_map_or)]
#![allow(clippy::new_without_default)]

/// Core data structures: terms, triples, numbers and binding tables
pub mod core;

/// Query model and its canonical rendering
pub mod query;

/// Data sources: graphs, stores, federations, endpoints
pub mod sources;

/// Query evaluation and result formats
pub mod execution;

/// Module for parsing data files and query descriptions
pub mod parsing;

/// Module for configuration management
pub mod config;

pub mod error;

// Re-export commonly used types
pub use config::EngineConfig;
pub use error::{QuarryError, Result};
pub use execution::QueryEngine;
