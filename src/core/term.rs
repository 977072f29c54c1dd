//! RDF terms and query variables.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
pub const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// A term occupying one slot of a triple or pattern.
///
/// Equality is exact: resources compare by IRI string, plain literals by value and
/// language tag, typed literals by value and datatype IRI. No datatype
/// canonicalization happens here, so `"01"^^xsd:integer` and `"1"^^xsd:integer` are
/// different terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// An IRI
    Resource(String),
    /// A blank node label, without the `_:` prefix
    BlankNode(String),
    /// A literal without datatype, optionally language tagged
    PlainLiteral { value: String, language: Option<String> },
    /// A literal with an explicit datatype IRI
    TypedLiteral { value: String, datatype: String },
    /// A named placeholder, without the leading `?`
    Variable(#[serde(deserialize_with = "deserialize_variable_name")] String),
}

impl Term {
    pub fn resource(iri: impl Into<String>) -> Self {
        Term::Resource(iri.into())
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Term::BlankNode(id.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::PlainLiteral { value: value.into(), language: None }
    }

    /// Language tags are stored lowercased.
    pub fn lang_literal(value: impl Into<String>, language: &str) -> Self {
        Term::PlainLiteral { value: value.into(), language: Some(language.to_ascii_lowercase()) }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::TypedLiteral { value: value.into(), datatype: datatype.into() }
    }

    pub fn integer(value: i64) -> Self {
        Term::typed(value.to_string(), XSD_INTEGER)
    }

    pub fn boolean(value: bool) -> Self {
        Term::typed(value.to_string(), XSD_BOOLEAN)
    }

    /// Accepts the name with or without a leading `?` or `$`.
    pub fn variable(name: impl AsRef<str>) -> Self {
        Term::Variable(strip_variable_sigil(name.as_ref()).to_string())
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Term::Variable(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, Term::Resource(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::PlainLiteral { .. } | Term::TypedLiteral { .. })
    }

    /// The lexical value of a literal, the IRI of a resource, the label of a blank node
    /// or the name of a variable.
    pub fn lexical_form(&self) -> &str {
        match self {
            Term::Resource(iri) => iri,
            Term::BlankNode(id) => id,
            Term::PlainLiteral { value, .. } | Term::TypedLiteral { value, .. } => value,
            Term::Variable(name) => name,
        }
    }

    pub fn language(&self) -> Option<&str> {
        match self {
            Term::PlainLiteral { language, .. } => language.as_deref(),
            _ => None,
        }
    }

    /// Datatype IRI of a literal. Plain literals report `xsd:string` or
    /// `rdf:langString`.
    pub fn datatype(&self) -> Option<&str> {
        match self {
            Term::PlainLiteral { language: Some(_), .. } => Some(RDF_LANG_STRING),
            Term::PlainLiteral { language: None, .. } => Some(XSD_STRING),
            Term::TypedLiteral { datatype, .. } => Some(datatype),
            _ => None,
        }
    }

    /// True for plain literals without language tag and `xsd:string` typed literals.
    pub fn is_simple_string(&self) -> bool {
        match self {
            Term::PlainLiteral { language: None, .. } => true,
            Term::TypedLiteral { datatype, .. } => datatype == XSD_STRING,
            _ => false,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Resource(iri) => write!(f, "<{}>", iri),
            Term::BlankNode(id) => write!(f, "_:{}", id),
            Term::PlainLiteral { value, language: None } => write!(f, "\"{}\"", escape(value)),
            Term::PlainLiteral { value, language: Some(lang) } => {
                write!(f, "\"{}\"@{}", escape(value), lang)
            }
            Term::TypedLiteral { value, datatype } => {
                write!(f, "\"{}\"^^<{}>", escape(value), datatype)
            }
            Term::Variable(name) => write!(f, "?{}", name),
        }
    }
}

pub(crate) fn strip_variable_sigil(name: &str) -> &str {
    name.strip_prefix('?').or_else(|| name.strip_prefix('$')).unwrap_or(name)
}

/// Reads a variable name from a query description, dropping any leading `?` or `$`.
pub(crate) fn deserialize_variable_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(strip_variable_sigil(&name).to_string())
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl From<oxrdf::Term> for Term {
    fn from(term: oxrdf::Term) -> Self {
        match term {
            oxrdf::Term::NamedNode(node) => Term::Resource(node.into_string()),
            oxrdf::Term::BlankNode(node) => Term::BlankNode(node.into_string()),
            oxrdf::Term::Literal(literal) => from_literal_parts(
                literal.value(),
                literal.language(),
                literal.datatype().as_str(),
            ),
            #[allow(unreachable_patterns)]
            other => Term::literal(other.to_string()),
        }
    }
}

impl TryFrom<&Term> for oxrdf::Term {
    type Error = crate::QuarryError;

    fn try_from(term: &Term) -> Result<Self, Self::Error> {
        let invalid = |e: &dyn fmt::Display| crate::QuarryError::InvalidTerm(e.to_string());
        Ok(match term {
            Term::Resource(iri) => {
                oxrdf::NamedNode::new(iri.as_str()).map_err(|e| invalid(&e))?.into()
            }
            Term::BlankNode(id) => oxrdf::BlankNode::new(id.as_str()).map_err(|e| invalid(&e))?.into(),
            Term::PlainLiteral { value, language: None } => {
                oxrdf::Literal::new_simple_literal(value.as_str()).into()
            }
            Term::PlainLiteral { value, language: Some(lang) } => {
                oxrdf::Literal::new_language_tagged_literal(value.as_str(), lang.as_str())
                    .map_err(|e| invalid(&e))?
                    .into()
            }
            Term::TypedLiteral { value, datatype } => oxrdf::Literal::new_typed_literal(
                value.as_str(),
                oxrdf::NamedNode::new(datatype.as_str()).map_err(|e| invalid(&e))?,
            )
            .into(),
            Term::Variable(name) => {
                return Err(crate::QuarryError::InvalidTerm(format!(
                    "variable ?{} cannot be serialized as a result term",
                    name
                )))
            }
        })
    }
}

/// Builds a literal term from its parts, folding `xsd:string` into a plain literal.
pub(crate) fn from_literal_parts(value: &str, language: Option<&str>, datatype: &str) -> Term {
    match language {
        Some(lang) => Term::lang_literal(value, lang),
        None if datatype == XSD_STRING => Term::literal(value),
        None => Term::typed(value, datatype),
    }
}
