use crate::core::term::Term;
use std::fmt;

/// A concrete triple, optionally placed in a named graph (its context).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub context: Option<Term>,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self { subject, predicate, object, context: None }
    }

    pub fn in_context(mut self, context: Term) -> Self {
        self.context = Some(context);
        self
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Some(context) = &self.context {
            write!(f, " {}", context)?;
        }
        write!(f, " .")
    }
}

/// A partially bound triple lookup: `None` in a slot matches anything.
///
/// A `None` context matches triples in every graph, including the default graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct TripleMatch<'a> {
    pub subject: Option<&'a Term>,
    pub predicate: Option<&'a Term>,
    pub object: Option<&'a Term>,
    pub context: Option<&'a Term>,
}

impl<'a> TripleMatch<'a> {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn matches(&self, triple: &Triple) -> bool {
        slot_matches(self.subject, &triple.subject)
            && slot_matches(self.predicate, &triple.predicate)
            && slot_matches(self.object, &triple.object)
            && match self.context {
                None => true,
                Some(context) => triple.context.as_ref() == Some(context),
            }
    }
}

fn slot_matches(wanted: Option<&Term>, actual: &Term) -> bool {
    wanted.map_or(true, |term| term == actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(name: &str) -> Term {
        Term::resource(format!("http://example.org/{}", name))
    }

    #[test]
    fn test_match_fixed_slots() {
        let triple = Triple::new(ex("a"), ex("p"), ex("b"));
        let a = ex("a");
        let c = ex("c");
        assert!(TripleMatch::any().matches(&triple));
        assert!(TripleMatch { subject: Some(&a), ..TripleMatch::any() }.matches(&triple));
        assert!(!TripleMatch { object: Some(&c), ..TripleMatch::any() }.matches(&triple));
    }

    #[test]
    fn test_match_context() {
        let g = ex("g");
        let default_triple = Triple::new(ex("a"), ex("p"), ex("b"));
        let named_triple = default_triple.clone().in_context(g.clone());
        let in_g = TripleMatch { context: Some(&g), ..TripleMatch::any() };
        assert!(!in_g.matches(&default_triple));
        assert!(in_g.matches(&named_triple));
        assert!(TripleMatch::any().matches(&named_triple));
    }

    #[test]
    fn test_display() {
        let triple = Triple::new(ex("a"), ex("p"), Term::literal("x")).in_context(ex("g"));
        assert_eq!(
            triple.to_string(),
            "<http://example.org/a> <http://example.org/p> \"x\" <http://example.org/g> ."
        );
    }
}
