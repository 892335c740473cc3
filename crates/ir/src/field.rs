// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Projection Fields
//!
//! Items of a SELECT list. Each slot is exactly one [`Field`] variant:
//!
//! ```sql
//! SELECT Id,                              -- Field
//!        Owner.Name,                      -- FieldRelationship
//!        COUNT(Id) cnt,                   -- FieldFunctionExpression
//!        (SELECT Id FROM Contacts),       -- FieldSubquery
//!        TYPEOF What WHEN Account THEN Phone ELSE Name END  -- FieldTypeof
//! FROM Account
//! ```
//!
//! Spans are byte ranges into the source. For plain and relationship fields
//! the span ends at the alias when one is present; a subquery field's span
//! covers its enclosing parentheses.

use serde::{Deserialize, Serialize};

use crate::query::Subquery;
use crate::span::{Span, Spanned};

/// One item of a SELECT list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Field {
    #[serde(rename = "Field")]
    Simple(SimpleField),
    #[serde(rename = "FieldRelationship")]
    Relationship(FieldRelationship),
    #[serde(rename = "FieldFunctionExpression")]
    Function(FunctionExpression),
    #[serde(rename = "FieldSubquery")]
    Subquery(FieldSubquery),
    #[serde(rename = "FieldTypeof")]
    Typeof(FieldTypeof),
}

impl Field {
    /// Display name of the field: the column, the dotted path, the function
    /// call text, or the child relationship of a subquery
    pub fn name(&self) -> &str {
        match self {
            Field::Simple(f) => &f.field,
            Field::Relationship(f) => &f.raw_value,
            Field::Function(f) => &f.raw_value,
            Field::Subquery(f) => &f.subquery.relationship_name,
            Field::Typeof(f) => &f.field,
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            Field::Simple(f) => f.alias.as_deref(),
            Field::Relationship(f) => f.alias.as_deref(),
            Field::Function(f) => f.alias.as_deref(),
            Field::Subquery(_) | Field::Typeof(_) => None,
        }
    }

    pub fn is_subquery(&self) -> bool {
        matches!(self, Field::Subquery(_))
    }

    pub fn as_subquery(&self) -> Option<&FieldSubquery> {
        match self {
            Field::Subquery(f) => Some(f),
            _ => None,
        }
    }
}

impl Spanned for Field {
    fn span(&self) -> Span {
        match self {
            Field::Simple(f) => f.span,
            Field::Relationship(f) => f.span,
            Field::Function(f) => f.span,
            Field::Subquery(f) => f.span,
            Field::Typeof(f) => f.span,
        }
    }
}

/// Plain column reference: `Name`, `Name n`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleField {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alias: Option<String>,
    pub span: Span,
}

/// Dotted relationship traversal: `Account.Owner.Name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRelationship {
    /// Final segment (`Name`)
    pub field: String,
    /// Leading segments (`["Account", "Owner"]`), never empty
    pub relationships: Vec<String>,
    /// The full dotted path as written
    pub raw_value: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alias: Option<String>,
    pub span: Span,
}

impl FieldRelationship {
    /// Object the final field is read from, i.e. the last relationship
    pub fn target_object(&self) -> Option<&str> {
        self.relationships.last().map(String::as_str)
    }
}

/// Function call, in a projection or anywhere else a field may appear
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionExpression {
    pub function_name: String,
    pub parameters: Vec<FunctionParameter>,
    pub is_aggregate_fn: bool,
    /// Re-stringified call: `NAME(arg, arg)`
    pub raw_value: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alias: Option<String>,
    pub span: Span,
}

/// Argument of a function call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunctionParameter {
    Value(String),
    Function(FunctionExpression),
}

impl FunctionParameter {
    /// Text used when re-stringifying the enclosing call
    pub fn raw_value(&self) -> &str {
        match self {
            FunctionParameter::Value(v) => v,
            FunctionParameter::Function(f) => &f.raw_value,
        }
    }
}

/// Parenthesized child-relationship query in a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSubquery {
    pub subquery: Subquery,
    /// From the opening to the closing parenthesis, inclusive
    pub span: Span,
}

/// `TYPEOF field WHEN Type THEN fields ... ELSE fields END`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTypeof {
    pub field: String,
    pub conditions: Vec<TypeofCondition>,
    pub span: Span,
}

/// One branch of a TYPEOF projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum TypeofCondition {
    #[serde(rename_all = "camelCase")]
    When {
        object_type: String,
        field_list: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Else { field_list: Vec<String> },
}

impl TypeofCondition {
    pub fn field_list(&self) -> &[String] {
        match self {
            TypeofCondition::When { field_list, .. } | TypeofCondition::Else { field_list } => {
                field_list
            }
        }
    }
}
