//! The SELECT query model and its builder operations.
//!
//! Every builder operation follows the same contract: a mutation that would break an
//! invariant (duplicate group name, second DISTINCT/LIMIT/OFFSET/GROUP BY, second ORDER
//! BY on a variable, duplicate projection variable, empty name) is silently ignored and
//! the query is returned unchanged.

use crate::core::term::strip_variable_sigil;
use crate::error::Result;
use crate::query::modifier::{GroupBy, Modifier, OrderDirection};
use crate::query::pattern::PatternGroup;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMember {
    Group(PatternGroup),
    Modifier(Modifier),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "QueryDescription")]
pub struct Query {
    projection: Vec<String>,
    members: Vec<QueryMember>,
}

/// Wire shape of a query. Deserialized queries are replayed through the builder so
/// they obey the same no-op rules as hand-built ones.
#[derive(Deserialize)]
struct QueryDescription {
    #[serde(default)]
    projection: Vec<String>,
    #[serde(default)]
    members: Vec<QueryMember>,
}

impl From<QueryDescription> for Query {
    fn from(description: QueryDescription) -> Self {
        let mut query = Query::new();
        for variable in &description.projection {
            query.add_projection(variable);
        }
        for member in description.members {
            query.add_member(member);
        }
        query
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Query> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Appends a projected variable; its output ordinal is its position.
    pub fn add_projection(&mut self, variable: &str) -> &mut Self {
        let variable = strip_variable_sigil(variable);
        if !variable.is_empty() && !self.projection.iter().any(|v| v.eq_ignore_ascii_case(variable))
        {
            self.projection.push(variable.to_string());
        }
        self
    }

    pub fn add_group(&mut self, group: PatternGroup) -> &mut Self {
        let name = group.name();
        if !name.is_empty() && self.group(name).is_none() {
            self.members.push(QueryMember::Group(group));
        }
        self
    }

    pub fn add_modifier(&mut self, modifier: Modifier) -> &mut Self {
        let modifier = match modifier {
            Modifier::OrderBy { variable, direction } => Modifier::order_by(&variable, direction),
            other => other,
        };
        let accepted = match &modifier {
            Modifier::Distinct => !self.is_distinct(),
            Modifier::Limit(_) => self.limit().is_none(),
            Modifier::Offset(_) => self.offset().is_none(),
            Modifier::OrderBy { variable, .. } => {
                !variable.is_empty()
                    && !self.order_by().iter().any(|(v, _)| v.eq_ignore_ascii_case(variable))
            }
            Modifier::GroupBy(_) => self.group_by().is_none(),
        };
        if accepted {
            self.members.push(QueryMember::Modifier(modifier));
        }
        self
    }

    pub fn add_member(&mut self, member: QueryMember) -> &mut Self {
        match member {
            QueryMember::Group(group) => self.add_group(group),
            QueryMember::Modifier(modifier) => self.add_modifier(modifier),
        }
    }

    pub fn add_distinct(&mut self) -> &mut Self {
        self.add_modifier(Modifier::Distinct)
    }

    pub fn add_limit(&mut self, limit: usize) -> &mut Self {
        self.add_modifier(Modifier::Limit(limit))
    }

    pub fn add_offset(&mut self, offset: usize) -> &mut Self {
        self.add_modifier(Modifier::Offset(offset))
    }

    pub fn add_order_by(&mut self, variable: &str, direction: OrderDirection) -> &mut Self {
        self.add_modifier(Modifier::order_by(variable, direction))
    }

    pub fn add_group_by(&mut self, group_by: GroupBy) -> &mut Self {
        self.add_modifier(Modifier::GroupBy(group_by))
    }

    pub fn projection(&self) -> &[String] {
        &self.projection
    }

    pub fn members(&self) -> &[QueryMember] {
        &self.members
    }

    /// Pattern groups in declaration order.
    pub fn groups(&self) -> impl Iterator<Item = &PatternGroup> {
        self.members.iter().filter_map(|member| match member {
            QueryMember::Group(group) => Some(group),
            QueryMember::Modifier(_) => None,
        })
    }

    /// Case-insensitive lookup by group name.
    pub fn group(&self, name: &str) -> Option<&PatternGroup> {
        self.groups().find(|group| group.name().eq_ignore_ascii_case(name))
    }

    pub fn modifiers(&self) -> impl Iterator<Item = &Modifier> {
        self.members.iter().filter_map(|member| match member {
            QueryMember::Modifier(modifier) => Some(modifier),
            QueryMember::Group(_) => None,
        })
    }

    pub fn is_distinct(&self) -> bool {
        self.modifiers().any(|m| matches!(m, Modifier::Distinct))
    }

    pub fn limit(&self) -> Option<usize> {
        self.modifiers().find_map(|m| match m {
            Modifier::Limit(n) => Some(*n),
            _ => None,
        })
    }

    pub fn offset(&self) -> Option<usize> {
        self.modifiers().find_map(|m| match m {
            Modifier::Offset(n) => Some(*n),
            _ => None,
        })
    }

    /// ORDER BY keys in declaration order.
    pub fn order_by(&self) -> Vec<(&str, OrderDirection)> {
        self.modifiers()
            .filter_map(|m| match m {
                Modifier::OrderBy { variable, direction } => Some((variable.as_str(), *direction)),
                _ => None,
            })
            .collect()
    }

    pub fn group_by(&self) -> Option<&GroupBy> {
        self.modifiers().find_map(|m| match m {
            Modifier::GroupBy(group_by) => Some(group_by),
            _ => None,
        })
    }

    /// Columns of the final result: the projection, or every variable the query
    /// produces when nothing was projected.
    pub fn output_columns(&self) -> Vec<String> {
        if !self.projection.is_empty() {
            return self.projection.clone();
        }
        if let Some(group_by) = self.group_by() {
            return group_by.output_columns();
        }
        let mut columns: Vec<String> = Vec::new();
        for name in self.groups().flat_map(PatternGroup::variables) {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
        columns
    }

    /// The canonical SPARQL rendering, also used as the result table name.
    pub fn to_sparql(&self) -> String {
        self.to_string()
    }
}
