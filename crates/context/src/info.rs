// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Context descriptors
//!
//! [`ContextInfo`] is what the resolver reports for a cursor offset: the kind
//! of element under the cursor, where that element sits in the source, and
//! how deeply nested in subqueries it is.

use serde::{Deserialize, Serialize};
use soql_lsp_ir::Span;
use std::fmt;

/// Kind of element the cursor is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// A field in a SELECT list, a condition subject, or the gap between
    /// two fields, e.g. `SELECT Id, | FROM Account`
    Field,

    /// The FROM object name, e.g. `SELECT Id FROM Acc|`
    SObject,

    /// A subquery, outside any more specific element
    Subquery,

    /// A condition value, e.g. `WHERE Name = 'Ac|me'`
    Where,

    /// A function call in a SELECT list or condition subject
    Function,

    /// Nothing recognizable under the cursor
    Unknown,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Field => "field",
            NodeType::SObject => "sobject",
            NodeType::Subquery => "subquery",
            NodeType::Where => "where",
            NodeType::Function => "function",
            NodeType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic context at a cursor offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextInfo {
    pub node_type: NodeType,

    /// Field (or function) the context belongs to
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field_name: Option<String>,

    /// Object in play: the FROM object, a subquery's relationship, or the
    /// object a relationship field traverses to
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub s_object: Option<String>,

    pub is_in_subquery: bool,

    /// Subquery depth counted from the root query
    pub nesting_level: usize,

    /// Matched source region
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub span: Option<Span>,

    pub cursor_offset: usize,
}

impl ContextInfo {
    pub fn new(node_type: NodeType, cursor_offset: usize) -> Self {
        Self {
            node_type,
            field_name: None,
            s_object: None,
            is_in_subquery: false,
            nesting_level: 0,
            span: None,
            cursor_offset,
        }
    }

    /// Nothing matched
    pub fn unknown(cursor_offset: usize) -> Self {
        Self::new(NodeType::Unknown, cursor_offset)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    pub fn with_s_object(mut self, name: impl Into<String>) -> Self {
        self.s_object = Some(name.into());
        self
    }

    /// Place the context `level` subqueries below the root
    pub fn at_level(mut self, level: usize) -> Self {
        self.nesting_level = level;
        self.is_in_subquery = level > 0;
        self
    }

    pub fn is_unknown(&self) -> bool {
        self.node_type == NodeType::Unknown
    }

    /// Length of the matched region; unbounded when there is none
    pub(crate) fn span_len(&self) -> usize {
        self.span.map_or(usize::MAX, |span| span.len())
    }
}
