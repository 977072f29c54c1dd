//! In-memory triple set.

use crate::core::{Term, Triple, TripleMatch};
use crate::sources::TripleSource;
use std::collections::{HashMap, HashSet};

/// A single set of triples with per-slot indexes.
///
/// Triples keep insertion order; inserting a duplicate is a no-op. Contexts are
/// dropped on insert since a graph is one unnamed triple set.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
    by_subject: HashMap<Term, Vec<usize>>,
    by_predicate: HashMap<Term, Vec<usize>>,
    by_object: HashMap<Term, Vec<usize>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the triple was already present.
    pub fn insert(&mut self, mut triple: Triple) -> bool {
        triple.context = None;
        if self.seen.contains(&triple) {
            return false;
        }
        let index = self.triples.len();
        self.by_subject.entry(triple.subject.clone()).or_default().push(index);
        self.by_predicate.entry(triple.predicate.clone()).or_default().push(index);
        self.by_object.entry(triple.object.clone()).or_default().push(index);
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    pub fn add(&mut self, subject: Term, predicate: Term, object: Term) -> bool {
        self.insert(Triple::new(subject, predicate, object))
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Candidate positions from the most selective bound slot, in insertion order.
    fn candidates(&self, lookup: &TripleMatch<'_>) -> Option<&[usize]> {
        let slots = [
            (lookup.subject, &self.by_subject),
            (lookup.predicate, &self.by_predicate),
            (lookup.object, &self.by_object),
        ];
        let mut best: Option<&[usize]> = None;
        for (term, index) in slots {
            if let Some(term) = term {
                let hits = index.get(term).map_or(&[][..], Vec::as_slice);
                if best.map_or(true, |b| hits.len() < b.len()) {
                    best = Some(hits);
                }
            }
        }
        best
    }
}

impl TripleSource for Graph {
    fn match_triples(&self, lookup: &TripleMatch<'_>) -> Vec<Triple> {
        // a graph only holds default-graph triples
        if lookup.context.is_some() {
            return Vec::new();
        }
        match self.candidates(lookup) {
            Some(positions) => positions
                .iter()
                .map(|&i| &self.triples[i])
                .filter(|t| lookup.matches(t))
                .cloned()
                .collect(),
            None => self.triples.clone(),
        }
    }

    fn len(&self) -> Option<usize> {
        Some(self.triples.len())
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Graph::new();
        for triple in iter {
            graph.insert(triple);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(name: &str) -> Term {
        Term::resource(format!("http://example.org/{}", name))
    }

    #[test]
    fn test_insert_deduplicates() {
        let mut graph = Graph::new();
        assert!(graph.add(ex("a"), ex("p"), ex("b")));
        assert!(!graph.add(ex("a"), ex("p"), ex("b")));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_match_uses_fixed_slots() {
        let graph: Graph = vec![
            Triple::new(ex("a"), ex("p"), ex("b")),
            Triple::new(ex("b"), ex("p"), ex("c")),
            Triple::new(ex("a"), ex("q"), ex("c")),
        ]
        .into_iter()
        .collect();

        let subject = ex("a");
        let lookup = TripleMatch { subject: Some(&subject), ..TripleMatch::any() };
        assert_eq!(graph.match_triples(&lookup).len(), 2);

        let predicate = ex("p");
        let object = ex("c");
        let lookup =
            TripleMatch { predicate: Some(&predicate), object: Some(&object), ..TripleMatch::any() };
        assert_eq!(graph.match_triples(&lookup), vec![Triple::new(ex("b"), ex("p"), ex("c"))]);

        let missing = ex("zzz");
        let lookup = TripleMatch { subject: Some(&missing), ..TripleMatch::any() };
        assert!(graph.match_triples(&lookup).is_empty());
    }

    #[test]
    fn test_match_keeps_insertion_order() {
        let mut graph = Graph::new();
        graph.add(ex("c"), ex("p"), ex("x"));
        graph.add(ex("a"), ex("p"), ex("x"));
        graph.add(ex("b"), ex("p"), ex("x"));
        let subjects: Vec<Term> =
            graph.match_triples(&TripleMatch::any()).into_iter().map(|t| t.subject).collect();
        assert_eq!(subjects, vec![ex("c"), ex("a"), ex("b")]);
    }

    #[test]
    fn test_context_lookup_matches_nothing() {
        let mut graph = Graph::new();
        graph.add(ex("a"), ex("p"), ex("b"));
        let context = ex("g");
        let lookup = TripleMatch { context: Some(&context), ..TripleMatch::any() };
        assert!(graph.match_triples(&lookup).is_empty());
    }
}
