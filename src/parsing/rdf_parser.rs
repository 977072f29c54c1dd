//! Line-based N-Triples / N-Quads reader.
//!
//! Each non-empty, non-comment line holds one statement: subject, predicate, object and
//! an optional graph name, terminated by `.`. Subjects and graph names are IRIs or blank
//! nodes; objects may also be plain, language-tagged or typed literals.

use crate::core::term::from_literal_parts;
use crate::core::{Term, Triple};
use crate::error::{QuarryError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Statements read from one input plus the number of lines that could not be parsed.
#[derive(Debug, Default)]
pub struct ParsedInput {
    pub triples: Vec<Triple>,
    pub skipped: usize,
}

/// Parses one line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_rdf_line(line: &str) -> Result<Option<Triple>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (subject, remaining) = parse_node(trimmed, "subject")?;
    let (predicate, remaining) = parse_iri(remaining, "predicate")?;
    let (object, remaining) = parse_object(remaining)?;

    let remaining = remaining.trim_start();
    let (graph, remaining) = if remaining.starts_with('<') || remaining.starts_with("_:") {
        let (graph, rest) = parse_node(remaining, "graph")?;
        (Some(graph), rest)
    } else {
        (None, remaining)
    };

    let remaining = remaining.trim();
    if remaining != "." {
        return Err(parse_error(format!("Expected '.' at end of statement, got: {}", remaining)));
    }

    let triple = Triple::new(subject, predicate, object);
    Ok(Some(match graph {
        Some(graph) => triple.in_context(graph),
        None => triple,
    }))
}

/// Reads every line of `reader`; malformed lines are logged and skipped.
pub fn read_triples<R: BufRead>(reader: R, origin: &str) -> Result<ParsedInput> {
    let mut parsed = ParsedInput::default();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_rdf_line(&line) {
            Ok(Some(triple)) => parsed.triples.push(triple),
            Ok(None) => {}
            Err(e) => {
                log::warn!("{}:{}: skipping line: {}", origin, number + 1, e);
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}

/// Reads an N-Triples or N-Quads file.
pub fn read_file(path: impl AsRef<Path>) -> Result<ParsedInput> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let parsed = read_triples(BufReader::new(file), &path.display().to_string())?;
    log::info!(
        "Loaded {} statements from {} ({} skipped)",
        parsed.triples.len(),
        path.display(),
        parsed.skipped
    );
    Ok(parsed)
}

fn parse_error(message: String) -> QuarryError {
    QuarryError::ParseError(message)
}

/// An IRI or a blank node.
fn parse_node<'a>(input: &'a str, field_name: &str) -> Result<(Term, &'a str)> {
    let input = input.trim_start();
    if let Some(rest) = input.strip_prefix("_:") {
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '<' || c == '"')
            .unwrap_or(rest.len());
        let label = rest[..end].trim_end_matches('.');
        let end = label.len();
        if label.is_empty() {
            return Err(parse_error(format!("Empty blank node label for {}", field_name)));
        }
        return Ok((Term::blank(label), &rest[end..]));
    }
    parse_iri(input, field_name)
}

fn parse_iri<'a>(input: &'a str, field_name: &str) -> Result<(Term, &'a str)> {
    let (iri, rest) = parse_bracketed(input, field_name)?;
    Ok((Term::resource(iri), rest))
}

fn parse_bracketed<'a>(input: &'a str, field_name: &str) -> Result<(String, &'a str)> {
    let input = input.trim_start();
    let Some(body) = input.strip_prefix('<') else {
        return Err(parse_error(format!("Expected '<' for {} IRI, got: {}", field_name, input)));
    };
    let end = body
        .find('>')
        .ok_or_else(|| parse_error(format!("Missing closing '>' for {} IRI", field_name)))?;
    let iri = &body[..end];
    if iri.is_empty() || iri.contains(char::is_whitespace) {
        return Err(parse_error(format!("Invalid {} IRI: <{}>", field_name, iri)));
    }
    Ok((iri.to_string(), &body[end + 1..]))
}

fn parse_object(input: &str) -> Result<(Term, &str)> {
    let input = input.trim_start();
    if input.starts_with('"') {
        parse_literal(input)
    } else {
        parse_node(input, "object")
    }
}

/// A quoted literal followed by an optional `@lang` or `^^<datatype>`.
fn parse_literal(input: &str) -> Result<(Term, &str)> {
    let mut value = String::new();
    let mut chars = input.char_indices().skip(1);
    let mut end = None;
    while let Some((index, c)) = chars.next() {
        match c {
            '"' => {
                end = Some(index);
                break;
            }
            '\\' => {
                let (_, escaped) = chars
                    .next()
                    .ok_or_else(|| parse_error("Dangling escape in literal".to_string()))?;
                match escaped {
                    't' => value.push('\t'),
                    'n' => value.push('\n'),
                    'r' => value.push('\r'),
                    'b' => value.push('\u{8}'),
                    'f' => value.push('\u{c}'),
                    '"' => value.push('"'),
                    '\'' => value.push('\''),
                    '\\' => value.push('\\'),
                    'u' | 'U' => {
                        let width = if escaped == 'u' { 4 } else { 8 };
                        let hex: String = (0..width).filter_map(|_| chars.next().map(|(_, h)| h)).collect();
                        let decoded = u32::from_str_radix(&hex, 16)
                            .ok()
                            .filter(|_| hex.len() == width)
                            .and_then(char::from_u32)
                            .ok_or_else(|| parse_error(format!("Invalid unicode escape \\{}{}", escaped, hex)))?;
                        value.push(decoded);
                    }
                    other => return Err(parse_error(format!("Unknown escape \\{}", other))),
                }
            }
            c => value.push(c),
        }
    }
    let end = end.ok_or_else(|| parse_error("Missing closing quote for literal".to_string()))?;
    let after_quote = &input[end + 1..];

    if let Some(rest) = after_quote.strip_prefix("^^") {
        let (datatype, rest) = parse_bracketed(rest, "datatype")?;
        return Ok((from_literal_parts(&value, None, &datatype), rest));
    }
    if let Some(rest) = after_quote.strip_prefix('@') {
        let lang_end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(rest.len());
        if lang_end == 0 {
            return Err(parse_error("Empty language tag".to_string()));
        }
        return Ok((Term::lang_literal(value, &rest[..lang_end]), &rest[lang_end..]));
    }
    Ok((Term::literal(value), after_quote))
}
