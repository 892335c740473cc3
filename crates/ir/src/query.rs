// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Query Representation
//!
//! A [`Query`] is one SOQL SELECT statement:
//!
//! ```sql
//! SELECT fields
//! FROM object [alias]
//! [USING SCOPE scope]
//! [WHERE conditions]
//! [WITH SECURITY_ENFORCED | USER_MODE | SYSTEM_MODE | DATA CATEGORY ...]
//! [GROUP BY targets] [HAVING conditions]
//! [ORDER BY targets [ASC|DESC] [NULLS FIRST|LAST]]
//! [LIMIT n] [OFFSET n]
//! [FOR VIEW|REFERENCE|UPDATE] [UPDATE TRACKING|VIEWSTAT]
//! ```
//!
//! ## Subqueries
//!
//! Child-relationship subqueries live inside the SELECT list as
//! [`Field::Subquery`]; each owns a [`Subquery`], which is a [`Query`] named
//! by its relationship instead of an object. Semi-join subqueries appear as
//! condition values in WHERE. [`Query::subqueries`] lists both kinds.
//!
//! ## Example
//!
//! ```sql
//! SELECT Id, Name, (SELECT LastName FROM Contacts)
//! FROM Account
//! WHERE Industry = 'Tech' AND Id IN (SELECT AccountId FROM Opportunity)
//! ORDER BY Name DESC NULLS LAST
//! LIMIT 10
//! ```

use serde::{Deserialize, Serialize};

use crate::condition::{FieldOrFunction, HavingClause, WhereClause};
use crate::field::Field;
use crate::span::{Span, Spanned};

/// A SOQL SELECT statement
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub fields: Vec<Field>,

    /// Queried object (or child relationship, inside a subquery)
    pub s_object: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub s_object_alias: Option<String>,

    /// Leading dotted segments of the FROM name
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub s_object_prefix: Vec<String>,

    /// Object name through the alias, when present
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub s_object_span: Option<Span>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub using_scope: Option<String>,

    #[serde(rename = "where", skip_serializing_if = "Option::is_none", default)]
    pub where_clause: Option<WhereClause>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub with_clause: Option<WithClause>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub group_by: Vec<GroupByClause>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub having: Option<HavingClause>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub order_by: Vec<OrderByClause>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub limit: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub offset: Option<u64>,

    #[serde(rename = "for", skip_serializing_if = "Option::is_none", default)]
    pub for_clause: Option<ForClause>,

    #[serde(rename = "update", skip_serializing_if = "Option::is_none", default)]
    pub update_clause: Option<UpdateClause>,

    /// Whole statement
    pub span: Span,
}

/// A subquery found anywhere in a query's own clauses
#[derive(Debug, Clone, Copy)]
pub struct SubqueryRef<'a> {
    /// Relationship name for projection subqueries, object name for
    /// semi-joins
    pub name: &'a str,
    pub query: &'a Query,
    /// Enclosing parentheses
    pub span: Span,
}

impl Query {
    pub fn new(s_object: impl Into<String>) -> Self {
        Self {
            s_object: s_object.into(),
            ..Self::default()
        }
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn has_object(&self) -> bool {
        !self.s_object.is_empty()
    }

    /// Neither fields nor an object name, as left behind by text that did
    /// not get far enough to build anything useful
    pub fn is_blank(&self) -> bool {
        self.fields.is_empty() && !self.has_object()
    }

    /// Direct subqueries: projection subqueries first, then WHERE and
    /// HAVING semi-joins, each group in source order
    pub fn subqueries(&self) -> Vec<SubqueryRef<'_>> {
        let projection = self.fields.iter().filter_map(|f| {
            f.as_subquery().map(|sq| SubqueryRef {
                name: &sq.subquery.relationship_name,
                query: &sq.subquery.query,
                span: sq.span,
            })
        });
        let semi_joins = self
            .where_clause
            .iter()
            .chain(self.having.iter())
            .flat_map(|clause| clause.subqueries())
            .map(|(query, span)| SubqueryRef {
                name: &query.s_object,
                query,
                span,
            });
        projection.chain(semi_joins).collect()
    }

    /// Number of subqueries at any depth
    pub fn subquery_count(&self) -> usize {
        self.subqueries()
            .iter()
            .map(|sq| 1 + sq.query.subquery_count())
            .sum()
    }
}

impl AsRef<Query> for Query {
    fn as_ref(&self) -> &Query {
        self
    }
}

impl Spanned for Query {
    fn span(&self) -> Span {
        self.span
    }
}

/// Child-relationship query nested in a SELECT list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subquery {
    pub relationship_name: String,
    pub query: Query,
}

impl Subquery {
    pub fn new(query: Query) -> Self {
        Self {
            relationship_name: query.s_object.clone(),
            query,
        }
    }
}

impl AsRef<Query> for Subquery {
    fn as_ref(&self) -> &Query {
        &self.query
    }
}

/// WITH filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WithClause {
    SecurityEnforced,
    UserMode,
    SystemMode,
    DataCategory { conditions: Vec<DataCategoryCondition> },
}

/// `group AT|ABOVE|BELOW|ABOVE_OR_BELOW value | (values)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCategoryCondition {
    pub group_name: String,
    pub selector: DataCategorySelector,
    pub parameters: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataCategorySelector {
    At,
    Above,
    Below,
    AboveOrBelow,
}

impl DataCategorySelector {
    pub fn parse(image: &str) -> Option<Self> {
        match image.to_ascii_uppercase().as_str() {
            "AT" => Some(Self::At),
            "ABOVE" => Some(Self::Above),
            "BELOW" => Some(Self::Below),
            "ABOVE_OR_BELOW" => Some(Self::AboveOrBelow),
            _ => None,
        }
    }
}

/// One GROUP BY target (a field, or a function such as `ROLLUP(...)`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupByClause {
    pub target: FieldOrFunction,
}

impl Spanned for GroupByClause {
    fn span(&self) -> Span {
        self.target.span()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NullsOrder {
    First,
    Last,
}

/// One ORDER BY item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByClause {
    pub target: FieldOrFunction,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nulls: Option<NullsOrder>,
    /// Target through the last modifier
    pub span: Span,
}

impl Spanned for OrderByClause {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ForClause {
    View,
    Reference,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpdateClause {
    Tracking,
    Viewstat,
}
