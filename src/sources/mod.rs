//! Data sources queried by the engine.
//!
//! Every local source exposes the single [`TripleSource`] capability: enumerate the
//! triples matching a partially bound lookup. [`DataSource`] is the closed set of
//! source shapes the engine dispatches on.

pub mod endpoint;
pub mod federation;
pub mod graph;
pub mod oxigraph_adapter;
pub mod store;

use crate::core::{Triple, TripleMatch};
use std::sync::Arc;

pub use endpoint::{Endpoint, EndpointConfig};
pub use federation::Federation;
pub use graph::Graph;
pub use oxigraph_adapter::OxigraphSource;
pub use store::Store;

/// Read-only triple enumeration.
///
/// Implementations must not be mutated while an evaluation is running; the engine
/// performs no locking of its own.
pub trait TripleSource: Send + Sync {
    /// Triples matching `lookup`, in a stable order for an unchanged source.
    fn match_triples(&self, lookup: &TripleMatch<'_>) -> Vec<Triple>;

    /// Number of triples, when cheaply known.
    fn len(&self) -> Option<usize> {
        None
    }
}

/// The source a query is evaluated against.
#[derive(Clone)]
pub enum DataSource {
    /// A single triple set.
    Graph(Arc<dyn TripleSource>),
    /// Several named triple sets behind one lookup.
    Store(Arc<dyn TripleSource>),
    /// An ordered collection of sources merged additively.
    Federation(Federation),
    /// A remote service reached over HTTP.
    Endpoint(Endpoint),
}

impl DataSource {
    pub fn graph(graph: impl TripleSource + 'static) -> Self {
        DataSource::Graph(Arc::new(graph))
    }

    pub fn store(store: impl TripleSource + 'static) -> Self {
        DataSource::Store(Arc::new(store))
    }

    /// The local triple source, for Graph and Store.
    pub fn as_triple_source(&self) -> Option<&dyn TripleSource> {
        match self {
            DataSource::Graph(source) | DataSource::Store(source) => Some(source.as_ref()),
            DataSource::Federation(_) | DataSource::Endpoint(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DataSource::Graph(_) => "graph",
            DataSource::Store(_) => "store",
            DataSource::Federation(_) => "federation",
            DataSource::Endpoint(_) => "endpoint",
        }
    }
}

impl From<Graph> for DataSource {
    fn from(graph: Graph) -> Self {
        DataSource::graph(graph)
    }
}

impl From<Store> for DataSource {
    fn from(store: Store) -> Self {
        DataSource::store(store)
    }
}

impl From<Federation> for DataSource {
    fn from(federation: Federation) -> Self {
        DataSource::Federation(federation)
    }
}

impl From<Endpoint> for DataSource {
    fn from(endpoint: Endpoint) -> Self {
        DataSource::Endpoint(endpoint)
    }
}

impl std::fmt::Debug for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Endpoint(endpoint) => {
                f.debug_tuple("Endpoint").field(&endpoint.config().url).finish()
            }
            DataSource::Federation(federation) => {
                f.debug_tuple("Federation").field(&federation.len()).finish()
            }
            other => f.debug_tuple(other.kind()).finish(),
        }
    }
}
