//! # Filter Parser
//!
//! Turns a flat filter expression into grouped field-equality constraints.
//!
//! ## Grammar
//!
//! ```text
//! expression = token *( " " token )
//! token      = field ":" value
//! ```
//!
//! A token is split at its first colon, so values may contain colons
//! (`url:https://example.com`). Extra spaces between, before or after tokens
//! are ignored. There is no quoting or escaping: a value cannot contain a
//! space.
//!
//! Fields keep the order of their first appearance and repeated fields
//! accumulate their values in token order:
//!
//! ```
//! use core_sync::filter::FilterSet;
//!
//! let filters = FilterSet::parse("a:1 b:2 a:3").unwrap();
//! let fields: Vec<_> = filters.fields().map(|(field, _)| field).collect();
//! assert_eq!(fields, vec!["a", "b"]);
//! assert_eq!(filters.values("a"), vec!["1", "3"]);
//! ```

use bridge_traits::collections::{FacetFilter, FacetFilterValue, RelationType};
use std::str::FromStr;
use thiserror::Error;

/// Rejected filter token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterParseError {
    #[error("token '{token}' is not of the form field:value")]
    MissingSeparator { token: String },

    #[error("token '{token}' has an empty field name")]
    EmptyField { token: String },

    #[error("token '{token}' has an empty value")]
    EmptyValue { token: String },
}

/// A single field-equality constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub field: String,
    pub value: String,
    pub relation: RelationType,
}

impl FilterClause {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            relation: RelationType::Equals,
        }
    }

    fn parse_token(token: &str) -> Result<Self, FilterParseError> {
        let (field, value) =
            token
                .split_once(':')
                .ok_or_else(|| FilterParseError::MissingSeparator {
                    token: token.to_string(),
                })?;

        if field.is_empty() {
            return Err(FilterParseError::EmptyField {
                token: token.to_string(),
            });
        }
        if value.is_empty() {
            return Err(FilterParseError::EmptyValue {
                token: token.to_string(),
            });
        }

        Ok(Self::equals(field, value))
    }
}

/// Filter expression grouped by field, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    fields: Vec<(String, Vec<FilterClause>)>,
}

impl FilterSet {
    /// Parse a space-separated list of `field:value` tokens.
    ///
    /// The empty expression yields an empty set.
    pub fn parse(expression: &str) -> Result<Self, FilterParseError> {
        let mut set = Self::default();
        for token in expression.split(' ').filter(|t| !t.is_empty()) {
            set.push(FilterClause::parse_token(token)?);
        }
        Ok(set)
    }

    /// Append a clause, grouping it under its field
    pub fn push(&mut self, clause: FilterClause) {
        match self
            .fields
            .iter_mut()
            .find(|(field, _)| *field == clause.field)
        {
            Some((_, clauses)) => clauses.push(clause),
            None => self.fields.push((clause.field.clone(), vec![clause])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of distinct fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[FilterClause])> {
        self.fields
            .iter()
            .map(|(field, clauses)| (field.as_str(), clauses.as_slice()))
    }

    /// Values constrained for a field, in token order
    pub fn values(&self, field: &str) -> Vec<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, clauses)| clauses.iter().map(|c| c.value.as_str()).collect())
            .unwrap_or_default()
    }

    /// Facet filters for a search request, one per field
    pub fn to_facet_filters(&self) -> Vec<FacetFilter> {
        self.fields
            .iter()
            .map(|(field, clauses)| FacetFilter {
                field_name: field.clone(),
                values: clauses
                    .iter()
                    .map(|clause| FacetFilterValue {
                        value: clause.value.clone(),
                        relation_type: clause.relation,
                    })
                    .collect(),
            })
            .collect()
    }
}

impl FromStr for FilterSet {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
