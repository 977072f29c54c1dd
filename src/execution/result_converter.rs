//! Result Converter Utilities
//!
//! Converts between [`BindingTable`] and the SPARQL results wire formats.
//!
//! # Supported Conversions
//!
//! - SPARQL XML results → `BindingTable` (remote endpoint responses)
//! - `BindingTable` → aligned text, SPARQL JSON, CSV, TSV or SPARQL XML
//!
//! # Example
//!
//! ```ignore
//! use quarry::execution::result_converter::{write_results, ResultFormat};
//!
//! let table = engine.evaluate(&query, Some(&source));
//! write_results(&table, ResultFormat::Csv, std::io::stdout())?;
//! ```

use crate::core::{BindingTable, Row, Term};
use crate::error::{QuarryError, Result};
use serde_json::{json, Map, Value};
use sparesults::{
    QueryResultsFormat, QueryResultsParser, QueryResultsSerializer, ReaderQueryResultsParserOutput,
};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Output format for a result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ResultFormat {
    /// Aligned text table
    #[default]
    Table,
    /// SPARQL 1.1 Query Results JSON
    Json,
    /// SPARQL 1.1 Query Results CSV
    Csv,
    /// SPARQL 1.1 Query Results TSV
    Tsv,
    /// SPARQL Query Results XML
    Xml,
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultFormat::Table => "table",
            ResultFormat::Json => "json",
            ResultFormat::Csv => "csv",
            ResultFormat::Tsv => "tsv",
            ResultFormat::Xml => "xml",
        };
        f.write_str(name)
    }
}

impl FromStr for ResultFormat {
    type Err = QuarryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" | "text" => Ok(ResultFormat::Table),
            "json" | "srj" => Ok(ResultFormat::Json),
            "csv" => Ok(ResultFormat::Csv),
            "tsv" => Ok(ResultFormat::Tsv),
            "xml" | "srx" => Ok(ResultFormat::Xml),
            other => Err(QuarryError::ConfigError(format!("Unknown result format: {}", other))),
        }
    }
}

/// Parses a SPARQL XML results document. Columns follow the document's head variables.
pub fn parse_sparql_xml(payload: &[u8]) -> Result<BindingTable> {
    let parsed = QueryResultsParser::from_format(QueryResultsFormat::Xml).for_reader(payload)?;
    let ReaderQueryResultsParserOutput::Solutions(solutions) = parsed else {
        return Err(QuarryError::ResultsError(
            "expected solutions, got a boolean result".to_string(),
        ));
    };

    let columns: Vec<String> =
        solutions.variables().iter().map(|v| v.as_str().to_string()).collect();
    let mut table = BindingTable::new(columns.clone());
    for solution in solutions {
        let solution = solution?;
        let row: Row = columns
            .iter()
            .map(|column| solution.get(column.as_str()).cloned().map(Term::from))
            .collect();
        table.push_row(row);
    }
    Ok(table)
}

/// Writes `table` to `writer` in `format`.
pub fn write_results<W: Write>(table: &BindingTable, format: ResultFormat, mut writer: W) -> Result<()> {
    match format {
        ResultFormat::Table => {
            write!(writer, "{}", table)?;
            writeln!(writer, "{} row(s)", table.len())?;
        }
        ResultFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &to_sparql_json(table))?;
            writeln!(writer)?;
        }
        ResultFormat::Csv => write_csv(table, writer)?,
        ResultFormat::Tsv => write_tsv(table, writer)?,
        ResultFormat::Xml => write_sparql_xml(table, writer)?,
    }
    Ok(())
}

/// The SPARQL 1.1 JSON results document for `table`.
pub fn to_sparql_json(table: &BindingTable) -> Value {
    let bindings: Vec<Value> = table
        .rows()
        .iter()
        .map(|row| {
            let mut binding = Map::new();
            for (column, cell) in table.columns().iter().zip(row) {
                if let Some(term) = cell {
                    binding.insert(column.clone(), json_term(term));
                }
            }
            Value::Object(binding)
        })
        .collect();
    json!({
        "head": { "vars": table.columns() },
        "results": { "bindings": bindings },
    })
}

fn json_term(term: &Term) -> Value {
    match term {
        Term::Resource(iri) => json!({ "type": "uri", "value": iri }),
        Term::BlankNode(id) => json!({ "type": "bnode", "value": id }),
        Term::PlainLiteral { value, language: None } => json!({ "type": "literal", "value": value }),
        Term::PlainLiteral { value, language: Some(lang) } => {
            json!({ "type": "literal", "value": value, "xml:lang": lang })
        }
        Term::TypedLiteral { value, datatype } => {
            json!({ "type": "literal", "value": value, "datatype": datatype })
        }
        Term::Variable(name) => json!({ "type": "literal", "value": format!("?{}", name) }),
    }
}

/// CSV cells carry bare values: IRIs without brackets, literals without quotes.
fn write_csv<W: Write>(table: &BindingTable, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(table.columns())?;
    for row in table.rows() {
        csv.write_record(row.iter().map(|cell| match cell {
            Some(Term::BlankNode(id)) => format!("_:{}", id),
            Some(term) => term.lexical_form().to_string(),
            None => String::new(),
        }))?;
    }
    csv.flush()?;
    Ok(())
}

/// TSV cells are N-Triples encoded; headers keep their `?`.
fn write_tsv<W: Write>(table: &BindingTable, writer: W) -> Result<()> {
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);
    tsv.write_record(table.columns().iter().map(|c| format!("?{}", c)))?;
    for row in table.rows() {
        tsv.write_record(row.iter().map(|cell| cell.as_ref().map(Term::to_string).unwrap_or_default()))?;
    }
    tsv.flush()?;
    Ok(())
}

fn write_sparql_xml<W: Write>(table: &BindingTable, writer: W) -> Result<()> {
    let variables = table
        .columns()
        .iter()
        .map(|c| oxrdf::Variable::new(c.as_str()).map_err(|e| QuarryError::InvalidTerm(e.to_string())))
        .collect::<Result<Vec<_>>>()?;

    let mut serializer = QueryResultsSerializer::from_format(QueryResultsFormat::Xml)
        .serialize_solutions_to_writer(writer, variables.clone())?;
    for row in table.rows() {
        let mut solution: Vec<(oxrdf::VariableRef<'_>, oxrdf::Term)> = Vec::new();
        for (variable, cell) in variables.iter().zip(row) {
            if let Some(term) = cell {
                solution.push((variable.as_ref(), oxrdf::Term::try_from(term)?));
            }
        }
        serializer.serialize(solution.iter().map(|(variable, term)| (*variable, term)))?;
    }
    serializer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<?xml version="1.0"?>
<sparql xmlns="http://www.w3.org/2005/sparql-results#">
  <head><variable name="s"/><variable name="label"/></head>
  <results>
    <result>
      <binding name="s"><uri>http://example.org/a</uri></binding>
      <binding name="label"><literal xml:lang="en">Alpha</literal></binding>
    </result>
    <result>
      <binding name="s"><bnode>b0</bnode></binding>
    </result>
  </results>
</sparql>"#;

    fn sample() -> BindingTable {
        BindingTable::from_rows(
            vec!["s".to_string(), "n".to_string()],
            vec![
                vec![Some(Term::resource("http://example.org/a")), Some(Term::integer(3))],
                vec![Some(Term::literal("x,y")), None],
            ],
        )
    }

    #[test]
    fn test_parse_sparql_xml() {
        let table = parse_sparql_xml(XML.as_bytes()).unwrap();
        assert_eq!(table.columns(), ["s".to_string(), "label".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "label"), Some(&Term::lang_literal("Alpha", "en")));
        assert_eq!(table.get(1, "s"), Some(&Term::blank("b0")));
        assert_eq!(table.get(1, "label"), None);
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(parse_sparql_xml(b"<html>not results</html>").is_err());
    }

    #[test]
    fn test_xml_output_parses_back() {
        let mut buffer = Vec::new();
        write_results(&sample(), ResultFormat::Xml, &mut buffer).unwrap();
        let table = parse_sparql_xml(&buffer).unwrap();
        assert_eq!(table, sample());
    }

    #[test]
    fn test_json_output() {
        let value = to_sparql_json(&sample());
        assert_eq!(value["head"]["vars"], json!(["s", "n"]));
        assert_eq!(value["results"]["bindings"][0]["s"]["type"], "uri");
        assert_eq!(
            value["results"]["bindings"][0]["n"]["datatype"],
            "http://www.w3.org/2001/XMLSchema#integer"
        );
        assert!(value["results"]["bindings"][1].get("n").is_none());
    }

    #[test]
    fn test_csv_and_tsv_output() {
        let mut csv = Vec::new();
        write_results(&sample(), ResultFormat::Csv, &mut csv).unwrap();
        assert_eq!(String::from_utf8(csv).unwrap(), "s,n\nhttp://example.org/a,3\n\"x,y\",\n");

        let mut tsv = Vec::new();
        write_results(&sample(), ResultFormat::Tsv, &mut tsv).unwrap();
        let tsv = String::from_utf8(tsv).unwrap();
        assert!(tsv.starts_with("?s\t?n\n<http://example.org/a>\t"));
    }

    #[test]
    fn test_format_names() {
        assert_eq!("CSV".parse::<ResultFormat>().unwrap(), ResultFormat::Csv);
        assert_eq!(ResultFormat::Xml.to_string(), "xml");
        assert!("yaml".parse::<ResultFormat>().is_err());
    }
}
