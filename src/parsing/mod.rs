//! Input parsing: N-Triples/N-Quads data files and JSON query descriptions.

pub mod rdf_parser;

use crate::core::Triple;
use crate::error::Result;
use crate::query::Query;
use crate::sources::{Graph, Store};
use std::path::Path;

pub use rdf_parser::{parse_rdf_line, read_file, read_triples, ParsedInput};

/// Loads a data file into a single graph; graph names in the file are ignored.
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph> {
    Ok(read_file(path)?.triples.into_iter().collect())
}

/// Loads a data file into a store, keeping graph names.
pub fn load_store(path: impl AsRef<Path>) -> Result<Store> {
    Ok(read_file(path)?.triples.into_iter().collect())
}

/// Reads a JSON query description.
pub fn load_query(path: impl AsRef<Path>) -> Result<Query> {
    let json = std::fs::read_to_string(path)?;
    Query::from_json(&json)
}

/// True when any statement carries a graph name.
pub fn has_named_graphs(triples: &[Triple]) -> bool {
    triples.iter().any(|t| t.context.is_some())
}
