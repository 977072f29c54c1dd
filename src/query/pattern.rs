use crate::core::{Term, TripleMatch};
use crate::query::expression::Filter;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A triple template. Each slot is either a fixed term or a `Term::Variable`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Term>,
}

impl Pattern {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self { subject, predicate, object, context: None }
    }

    pub fn with_context(mut self, context: Term) -> Self {
        self.context = Some(context);
        self
    }

    /// Slots in subject, predicate, object, context order.
    pub fn slots(&self) -> impl Iterator<Item = &Term> {
        [&self.subject, &self.predicate, &self.object].into_iter().chain(self.context.as_ref())
    }

    /// Distinct variable names in slot order.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.slots().filter_map(Term::as_variable) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// The lookup for this pattern's fixed slots; variable slots match anything.
    pub fn to_match(&self) -> TripleMatch<'_> {
        TripleMatch {
            subject: Some(&self.subject).filter(|t| !t.is_variable()),
            predicate: Some(&self.predicate).filter(|t| !t.is_variable()),
            object: Some(&self.object).filter(|t| !t.is_variable()),
            context: self.context.as_ref().filter(|t| !t.is_variable()),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(
                f,
                "GRAPH {} {{ {} {} {} . }}",
                context, self.subject, self.predicate, self.object
            ),
            None => write!(f, "{} {} {} .", self.subject, self.predicate, self.object),
        }
    }
}

/// A conjunctive block of patterns plus the filters applied after their join.
///
/// `union_with_next` only changes how the group is rendered: the group and the next
/// one are written as `{ A } UNION { B }`. At runtime every group is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternGroup {
    name: String,
    #[serde(default)]
    patterns: Vec<Pattern>,
    #[serde(default)]
    filters: Vec<Filter>,
    #[serde(default)]
    union_with_next: bool,
}

impl PatternGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), patterns: Vec::new(), filters: Vec::new(), union_with_next: false }
    }

    pub fn add_pattern(&mut self, pattern: Pattern) -> &mut Self {
        self.patterns.push(pattern);
        self
    }

    pub fn add_filter(&mut self, filter: Filter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    pub fn set_union_with_next(&mut self, union: bool) -> &mut Self {
        self.union_with_next = union;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn is_union_with_next(&self) -> bool {
        self.union_with_next
    }

    /// Distinct variable names over all patterns, first occurrence first.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.patterns.iter().flat_map(Pattern::variables) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

impl fmt::Display for PatternGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for pattern in &self.patterns {
            write!(f, " {}", pattern)?;
        }
        for filter in &self.filters {
            write!(f, " {}", filter)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(name: &str) -> Term {
        Term::resource(format!("http://example.org/{}", name))
    }

    #[test]
    fn test_variables_are_distinct_in_slot_order() {
        let pattern = Pattern::new(Term::variable("x"), ex("p"), Term::variable("x"));
        assert_eq!(pattern.variables(), vec!["x"]);

        let pattern = Pattern::new(Term::variable("s"), Term::variable("p"), Term::variable("o"))
            .with_context(Term::variable("g"));
        assert_eq!(pattern.variables(), vec!["s", "p", "o", "g"]);
    }

    #[test]
    fn test_to_match_only_binds_fixed_slots() {
        let pattern = Pattern::new(Term::variable("x"), ex("p"), ex("o"));
        let lookup = pattern.to_match();
        assert!(lookup.subject.is_none());
        assert_eq!(lookup.predicate, Some(&ex("p")));
        assert_eq!(lookup.object, Some(&ex("o")));
        assert!(lookup.context.is_none());
    }

    #[test]
    fn test_group_rendering() {
        let mut group = PatternGroup::new("g1");
        group.add_pattern(Pattern::new(Term::variable("x"), ex("p"), Term::variable("y")));
        assert_eq!(group.to_string(), "{ ?x <http://example.org/p> ?y . }");
    }

    #[test]
    fn test_graph_pattern_rendering() {
        let pattern = Pattern::new(Term::variable("x"), ex("p"), ex("o")).with_context(ex("g"));
        assert_eq!(
            pattern.to_string(),
            "GRAPH <http://example.org/g> { ?x <http://example.org/p> <http://example.org/o> . }"
        );
    }

    #[test]
    fn test_group_variables() {
        let mut group = PatternGroup::new("g");
        group
            .add_pattern(Pattern::new(Term::variable("x"), ex("knows"), Term::variable("y")))
            .add_pattern(Pattern::new(Term::variable("y"), ex("knows"), Term::variable("z")));
        assert_eq!(group.variables(), vec!["x", "y", "z"]);
    }
}
