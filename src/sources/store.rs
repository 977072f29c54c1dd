//! Multi-graph triple store.

use crate::core::{Term, Triple, TripleMatch};
use crate::sources::graph::Graph;
use crate::sources::TripleSource;

/// Named graphs plus a default graph.
///
/// Graphs are kept in the order they were first written to; the default graph
/// (context `None`) is always first. Triples returned from a named graph carry
/// that graph's name as their context.
#[derive(Debug, Clone, Default)]
pub struct Store {
    default_graph: Graph,
    named: Vec<(Term, Graph)>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts into the triple's context graph, or the default graph when it has none.
    pub fn insert(&mut self, triple: Triple) -> bool {
        match triple.context.clone() {
            None => self.default_graph.insert(triple),
            Some(name) => self.graph_mut(name).insert(triple),
        }
    }

    /// The named graph, created empty on first use.
    pub fn graph_mut(&mut self, name: Term) -> &mut Graph {
        let position = match self.named.iter().position(|(n, _)| *n == name) {
            Some(position) => position,
            None => {
                self.named.push((name, Graph::new()));
                self.named.len() - 1
            }
        };
        &mut self.named[position].1
    }

    pub fn graph(&self, name: Option<&Term>) -> Option<&Graph> {
        match name {
            None => Some(&self.default_graph),
            Some(name) => self.named.iter().find(|(n, _)| n == name).map(|(_, g)| g),
        }
    }

    pub fn graph_names(&self) -> impl Iterator<Item = &Term> {
        self.named.iter().map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.default_graph.len() + self.named.iter().map(|(_, g)| g.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TripleSource for Store {
    fn match_triples(&self, lookup: &TripleMatch<'_>) -> Vec<Triple> {
        let inner = TripleMatch { context: None, ..*lookup };
        let mut found = Vec::new();
        if lookup.context.is_none() {
            found.extend(self.default_graph.match_triples(&inner));
        }
        for (name, graph) in &self.named {
            if lookup.context.is_some_and(|wanted| wanted != name) {
                continue;
            }
            found.extend(
                graph.match_triples(&inner).into_iter().map(|t| t.in_context(name.clone())),
            );
        }
        found
    }

    fn len(&self) -> Option<usize> {
        Some(Store::len(self))
    }
}

impl FromIterator<Triple> for Store {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut store = Store::new();
        for triple in iter {
            store.insert(triple);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(name: &str) -> Term {
        Term::resource(format!("http://example.org/{}", name))
    }

    fn store() -> Store {
        vec![
            Triple::new(ex("a"), ex("p"), ex("b")),
            Triple::new(ex("a"), ex("p"), ex("c")).in_context(ex("g1")),
            Triple::new(ex("a"), ex("p"), ex("d")).in_context(ex("g2")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_unrestricted_context_spans_all_graphs() {
        let found = store().match_triples(&TripleMatch::any());
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].context, None);
        assert_eq!(found[1].context, Some(ex("g1")));
        assert_eq!(found[2].context, Some(ex("g2")));
    }

    #[test]
    fn test_context_restricts_to_one_graph() {
        let g2 = ex("g2");
        let lookup = TripleMatch { context: Some(&g2), ..TripleMatch::any() };
        let found = store().match_triples(&lookup);
        assert_eq!(found, vec![Triple::new(ex("a"), ex("p"), ex("d")).in_context(ex("g2"))]);
    }

    #[test]
    fn test_graph_names_in_first_write_order() {
        let store = store();
        let names: Vec<&Term> = store.graph_names().collect();
        assert_eq!(names, vec![&ex("g1"), &ex("g2")]);
        assert_eq!(store.len(), 3);
    }
}
