//! Oxigraph-backed triple source.
//!
//! Exposes an [`oxigraph::store::Store`] through [`TripleSource`] so that data held in
//! Oxigraph (in memory or on disk) can be queried by the engine like any local graph.
//!
//! # Example
//!
//! ```ignore
//! use quarry::core::{Term, Triple};
//! use quarry::sources::{DataSource, OxigraphSource};
//!
//! let source = OxigraphSource::new()?;
//! source.insert(&Triple::new(
//!     Term::resource("http://example.org/alice"),
//!     Term::resource("http://example.org/knows"),
//!     Term::resource("http://example.org/bob"),
//! ))?;
//! let data = DataSource::store(source);
//! ```

use crate::core::term::from_literal_parts;
use crate::core::{Term, Triple, TripleMatch};
use crate::error::{QuarryError, Result};
use crate::sources::TripleSource;
use oxigraph::model::{
    BlankNode, GraphName, GraphNameRef, Literal, NamedNode, Quad, Term as OxTerm,
};
use oxigraph::store::Store;

pub struct OxigraphSource {
    store: Store,
}

impl OxigraphSource {
    /// An empty in-memory store.
    pub fn new() -> Result<Self> {
        Ok(Self { store: Store::new()? })
    }

    pub fn from_store(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn insert(&self, triple: &Triple) -> Result<bool> {
        let subject = to_oxigraph(&triple.subject)?;
        let predicate = match to_oxigraph(&triple.predicate)? {
            OxTerm::NamedNode(node) => node,
            _ => return Err(QuarryError::InvalidTerm(format!("{} is not an IRI", triple.predicate))),
        };
        let object = to_oxigraph(&triple.object)?;
        let graph = match &triple.context {
            None => GraphName::DefaultGraph,
            Some(context) => match to_oxigraph(context)? {
                OxTerm::NamedNode(node) => GraphName::NamedNode(node),
                OxTerm::BlankNode(node) => GraphName::BlankNode(node),
                _ => return Err(QuarryError::InvalidTerm(format!("{} is not a graph name", context))),
            },
        };
        let quad = match subject {
            OxTerm::NamedNode(node) => Quad::new(node, predicate, object, graph),
            OxTerm::BlankNode(node) => Quad::new(node, predicate, object, graph),
            _ => return Err(QuarryError::InvalidTerm(format!("{} is not a subject", triple.subject))),
        };
        Ok(self.store.insert(&quad)?)
    }

    pub fn extend<I: IntoIterator<Item = Triple>>(&self, triples: I) -> Result<usize> {
        let mut inserted = 0;
        for triple in triples {
            if self.insert(&triple)? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

impl TripleSource for OxigraphSource {
    fn match_triples(&self, lookup: &TripleMatch<'_>) -> Vec<Triple> {
        // A slot that cannot be expressed in Oxigraph cannot match any stored quad.
        let Ok(fixed) = FixedSlots::from_match(lookup) else {
            return Vec::new();
        };

        let subject = match &fixed.subject {
            Some(OxTerm::NamedNode(node)) => Some(node.as_ref().into()),
            Some(OxTerm::BlankNode(node)) => Some(node.as_ref().into()),
            Some(_) => return Vec::new(),
            None => None,
        };
        let predicate = match &fixed.predicate {
            Some(OxTerm::NamedNode(node)) => Some(node.as_ref()),
            Some(_) => return Vec::new(),
            None => None,
        };
        let object = fixed.object.as_ref().map(OxTerm::as_ref);
        let graph = match &fixed.context {
            Some(OxTerm::NamedNode(node)) => Some(GraphNameRef::NamedNode(node.as_ref())),
            Some(OxTerm::BlankNode(node)) => Some(GraphNameRef::BlankNode(node.as_ref())),
            Some(_) => return Vec::new(),
            None => None,
        };

        let mut triples = Vec::new();
        for quad in self.store.quads_for_pattern(subject, predicate, object, graph) {
            match quad {
                Ok(quad) => {
                    let mut triple = Triple::new(
                        from_oxigraph(OxTerm::from(quad.subject)),
                        from_oxigraph(OxTerm::from(quad.predicate)),
                        from_oxigraph(quad.object),
                    );
                    triple.context = match quad.graph_name {
                        GraphName::NamedNode(node) => Some(Term::Resource(node.into_string())),
                        GraphName::BlankNode(node) => Some(Term::BlankNode(node.into_string())),
                        GraphName::DefaultGraph => None,
                    };
                    triples.push(triple);
                }
                Err(e) => log::warn!("Skipping unreadable quad: {}", e),
            }
        }
        triples
    }

    fn len(&self) -> Option<usize> {
        self.store.len().ok()
    }
}

struct FixedSlots {
    subject: Option<OxTerm>,
    predicate: Option<OxTerm>,
    object: Option<OxTerm>,
    context: Option<OxTerm>,
}

impl FixedSlots {
    fn from_match(lookup: &TripleMatch<'_>) -> Result<Self> {
        Ok(Self {
            subject: lookup.subject.map(to_oxigraph).transpose()?,
            predicate: lookup.predicate.map(to_oxigraph).transpose()?,
            object: lookup.object.map(to_oxigraph).transpose()?,
            context: lookup.context.map(to_oxigraph).transpose()?,
        })
    }
}

fn to_oxigraph(term: &Term) -> Result<OxTerm> {
    let invalid = |e: String| QuarryError::InvalidTerm(e);
    Ok(match term {
        Term::Resource(iri) => NamedNode::new(iri.as_str()).map_err(|e| invalid(e.to_string()))?.into(),
        Term::BlankNode(id) => BlankNode::new(id.as_str()).map_err(|e| invalid(e.to_string()))?.into(),
        Term::PlainLiteral { value, language: None } => Literal::new_simple_literal(value.as_str()).into(),
        Term::PlainLiteral { value, language: Some(lang) } => {
            Literal::new_language_tagged_literal(value.as_str(), lang.as_str())
                .map_err(|e| invalid(e.to_string()))?
                .into()
        }
        Term::TypedLiteral { value, datatype } => Literal::new_typed_literal(
            value.as_str(),
            NamedNode::new(datatype.as_str()).map_err(|e| invalid(e.to_string()))?,
        )
        .into(),
        Term::Variable(name) => return Err(invalid(format!("unbound variable ?{}", name))),
    })
}

fn from_oxigraph(term: OxTerm) -> Term {
    match term {
        OxTerm::NamedNode(node) => Term::Resource(node.into_string()),
        OxTerm::BlankNode(node) => Term::BlankNode(node.into_string()),
        OxTerm::Literal(literal) => {
            from_literal_parts(literal.value(), literal.language(), literal.datatype().as_str())
        }
        #[allow(unreachable_patterns)]
        other => Term::literal(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(name: &str) -> Term {
        Term::resource(format!("http://example.org/{}", name))
    }

    fn source() -> OxigraphSource {
        let source = OxigraphSource::new().unwrap();
        source
            .extend(vec![
                Triple::new(ex("alice"), ex("knows"), ex("bob")),
                Triple::new(ex("alice"), ex("name"), Term::lang_literal("Alice", "en")),
                Triple::new(ex("bob"), ex("age"), Term::integer(42)).in_context(ex("g")),
            ])
            .unwrap();
        source
    }

    #[test]
    fn test_match_by_subject() {
        let alice = ex("alice");
        let lookup = TripleMatch { subject: Some(&alice), ..TripleMatch::any() };
        assert_eq!(source().match_triples(&lookup).len(), 2);
    }

    #[test]
    fn test_literals_round_trip() {
        let name = ex("name");
        let lookup = TripleMatch { predicate: Some(&name), ..TripleMatch::any() };
        let found = source().match_triples(&lookup);
        assert_eq!(found[0].object, Term::lang_literal("Alice", "en"));
    }

    #[test]
    fn test_named_graph_context() {
        let graph = ex("g");
        let lookup = TripleMatch { context: Some(&graph), ..TripleMatch::any() };
        let found = source().match_triples(&lookup);
        assert_eq!(found, vec![Triple::new(ex("bob"), ex("age"), Term::integer(42)).in_context(ex("g"))]);
    }

    #[test]
    fn test_literal_subject_matches_nothing() {
        let subject = Term::literal("x");
        let lookup = TripleMatch { subject: Some(&subject), ..TripleMatch::any() };
        assert!(source().match_triples(&lookup).is_empty());
    }

    #[test]
    fn test_literal_subject_is_rejected_on_insert() {
        let source = OxigraphSource::new().unwrap();
        let bad = Triple::new(Term::literal("x"), ex("p"), ex("o"));
        assert!(source.insert(&bad).is_err());
    }
}
