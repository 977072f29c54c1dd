//! Solution modifiers and aggregate declarations.

use crate::core::term::strip_variable_sigil;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    Sample,
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Sample => "SAMPLE",
        };
        f.write_str(name)
    }
}

/// One reduction under GROUP BY: reads `source`, writes `output`.
///
/// `source == None` is the `COUNT(*)` cardinality form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregator {
    pub function: AggregateFunction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub output: String,
}

impl Aggregator {
    pub fn new(function: AggregateFunction, source: &str, output: &str) -> Self {
        Self {
            function,
            source: Some(strip_variable_sigil(source).to_string()),
            output: strip_variable_sigil(output).to_string(),
        }
    }

    pub fn count_all(output: &str) -> Self {
        Self {
            function: AggregateFunction::Count,
            source: None,
            output: strip_variable_sigil(output).to_string(),
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "({}(?{}) AS ?{})", self.function, source, self.output),
            None => write!(f, "({}(*) AS ?{})", self.function, self.output),
        }
    }
}

/// Grouping variables plus the aggregators computed per partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GroupByDescription")]
pub struct GroupBy {
    variables: Vec<String>,
    aggregators: Vec<Aggregator>,
}

#[derive(Deserialize)]
struct GroupByDescription {
    #[serde(default)]
    variables: Vec<String>,
    #[serde(default)]
    aggregators: Vec<Aggregator>,
}

impl From<GroupByDescription> for GroupBy {
    fn from(description: GroupByDescription) -> Self {
        let mut group_by = GroupBy::default();
        for variable in &description.variables {
            group_by.add_variable(variable);
        }
        for aggregator in description.aggregators {
            group_by.add_aggregator(aggregator);
        }
        group_by
    }
}

impl GroupBy {
    pub fn new<S: AsRef<str>>(variables: &[S]) -> Self {
        let mut group_by = GroupBy::default();
        for variable in variables {
            group_by.add_variable(variable.as_ref());
        }
        group_by
    }

    /// Duplicate (case-insensitive) or empty names are ignored.
    pub fn add_variable(&mut self, variable: &str) -> &mut Self {
        let variable = strip_variable_sigil(variable);
        if !variable.is_empty() && !self.names_in_use().any(|n| n.eq_ignore_ascii_case(variable)) {
            self.variables.push(variable.to_string());
        }
        self
    }

    /// Ignored when the output is empty or already names a grouping variable or
    /// another aggregate. Source and output lose any leading `?` or `$`.
    pub fn add_aggregator(&mut self, mut aggregator: Aggregator) -> &mut Self {
        if let Some(source) = aggregator.source.as_mut() {
            *source = strip_variable_sigil(source).to_string();
        }
        aggregator.output = strip_variable_sigil(&aggregator.output).to_string();
        let output = aggregator.output.as_str();
        let empty_source = aggregator.source.as_deref().is_some_and(str::is_empty);
        if !output.is_empty()
            && !empty_source
            && !self.names_in_use().any(|n| n.eq_ignore_ascii_case(output))
        {
            self.aggregators.push(aggregator);
        }
        self
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn aggregators(&self) -> &[Aggregator] {
        &self.aggregators
    }

    /// Grouping variables followed by aggregate outputs.
    pub fn output_columns(&self) -> Vec<String> {
        self.names_in_use().map(str::to_string).collect()
    }

    fn names_in_use(&self) -> impl Iterator<Item = &str> {
        self.variables
            .iter()
            .map(String::as_str)
            .chain(self.aggregators.iter().map(|a| a.output.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Distinct,
    Limit(usize),
    Offset(usize),
    OrderBy {
        variable: String,
        #[serde(default)]
        direction: OrderDirection,
    },
    GroupBy(GroupBy),
}

impl Modifier {
    pub fn order_by(variable: &str, direction: OrderDirection) -> Self {
        Modifier::OrderBy { variable: strip_variable_sigil(variable).to_string(), direction }
    }
}
