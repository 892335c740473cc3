// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Concrete syntax tree
//!
//! The parser produces a tree of [`SyntaxNode`]s in the style of a
//! tree-sitter tree: every node has a kind, a byte span, the source text it
//! covers, and ordered children, some of which are addressable by field
//! name. Tokens appear as leaf nodes. Punctuation leaves are anonymous
//! (`is_named() == false`); keywords are named leaves of kind
//! [`kind::KEYWORD`].

use soql_lsp_ir::Span;
use std::fmt::Write;

/// Node kinds produced by the parser
pub mod kind {
    pub const SELECT_STATEMENT: &str = "select_statement";
    pub const SELECT_LIST: &str = "select_list";
    pub const FIELD_REF: &str = "field_ref";
    pub const FUNCTION_CALL: &str = "function_call";
    pub const SUBQUERY: &str = "subquery";
    pub const TYPEOF_EXPRESSION: &str = "typeof_expression";
    pub const WHEN_BRANCH: &str = "when_branch";
    pub const ELSE_BRANCH: &str = "else_branch";
    pub const FROM_CLAUSE: &str = "from_clause";
    pub const USING_SCOPE_CLAUSE: &str = "using_scope_clause";
    pub const WHERE_CLAUSE: &str = "where_clause";
    pub const WITH_CLAUSE: &str = "with_clause";
    pub const DATA_CATEGORY_FILTER: &str = "data_category_filter";
    pub const DATA_CATEGORY_CONDITION: &str = "data_category_condition";
    pub const GROUP_BY_CLAUSE: &str = "group_by_clause";
    pub const HAVING_CLAUSE: &str = "having_clause";
    pub const ORDER_BY_CLAUSE: &str = "order_by_clause";
    pub const ORDER_BY_ITEM: &str = "order_by_item";
    pub const LIMIT_CLAUSE: &str = "limit_clause";
    pub const OFFSET_CLAUSE: &str = "offset_clause";
    pub const FOR_CLAUSE: &str = "for_clause";
    pub const UPDATE_CLAUSE: &str = "update_clause";

    pub const BOOLEAN_EXPRESSION: &str = "boolean_expression";
    pub const NEGATED_EXPRESSION: &str = "negated_expression";
    pub const PARENTHESIZED_EXPRESSION: &str = "parenthesized_expression";
    pub const CONDITION: &str = "condition";
    pub const COMPARISON_OPERATOR: &str = "comparison_operator";
    pub const VALUE_LIST: &str = "value_list";
    pub const DATE_N_LITERAL: &str = "date_n_literal";
    pub const BIND_VARIABLE: &str = "bind_variable";

    pub const IDENTIFIER: &str = "identifier";
    pub const KEYWORD: &str = "keyword";
    pub const STRING_LITERAL: &str = "string_literal";
    pub const INTEGER_LITERAL: &str = "integer_literal";
    pub const DECIMAL_LITERAL: &str = "decimal_literal";
    pub const DATE_LITERAL: &str = "date_literal";
    pub const DATETIME_LITERAL: &str = "datetime_literal";
    pub const CURRENCY_INTEGER_LITERAL: &str = "currency_integer_literal";
    pub const CURRENCY_DECIMAL_LITERAL: &str = "currency_decimal_literal";

    /// Tokens skipped during error recovery
    pub const ERROR: &str = "ERROR";
}

/// Field names used to address children
pub mod field {
    pub const SELECT_LIST: &str = "select_list";
    pub const FROM_CLAUSE: &str = "from_clause";
    pub const USING_SCOPE_CLAUSE: &str = "using_scope_clause";
    pub const WHERE_CLAUSE: &str = "where_clause";
    pub const WITH_CLAUSE: &str = "with_clause";
    pub const GROUP_BY_CLAUSE: &str = "group_by_clause";
    pub const HAVING_CLAUSE: &str = "having_clause";
    pub const ORDER_BY_CLAUSE: &str = "order_by_clause";
    pub const LIMIT_CLAUSE: &str = "limit_clause";
    pub const OFFSET_CLAUSE: &str = "offset_clause";
    pub const FOR_CLAUSE: &str = "for_clause";
    pub const UPDATE_CLAUSE: &str = "update_clause";

    pub const ITEM: &str = "item";
    pub const NAME: &str = "name";
    pub const ALIAS: &str = "alias";
    pub const ARGUMENT: &str = "argument";
    pub const LPAREN: &str = "lparen";
    pub const RPAREN: &str = "rparen";
    pub const QUERY: &str = "query";
    pub const FIELD: &str = "field";
    pub const BRANCH: &str = "branch";
    pub const OBJECT_TYPE: &str = "object_type";
    pub const OBJECT: &str = "object";
    pub const SCOPE: &str = "scope";
    pub const CONDITION: &str = "condition";
    pub const FILTER: &str = "filter";
    pub const GROUP: &str = "group";
    pub const SELECTOR: &str = "selector";
    pub const VALUE: &str = "value";
    pub const EXPRESSION: &str = "expression";
    pub const DIRECTION: &str = "direction";
    pub const NULLS: &str = "nulls";
    pub const MODE: &str = "mode";
    pub const OPERAND: &str = "operand";
    pub const OPERATOR: &str = "operator";
    pub const SUBJECT: &str = "subject";
    pub const VARIABLE: &str = "variable";
}

/// A node of the concrete syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    kind: &'static str,
    span: Span,
    text: String,
    named: bool,
    children: Vec<SyntaxNode>,
    fields: Vec<(&'static str, usize)>,
}

impl SyntaxNode {
    /// Leaf node for a single token
    pub fn leaf(kind: &'static str, span: Span, text: impl Into<String>, named: bool) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
            named,
            children: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn start_byte(&self) -> usize {
        self.span.start
    }

    pub fn end_byte(&self) -> usize {
        self.span.end
    }

    /// Source text covered by this node
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_named(&self) -> bool {
        self.named
    }

    pub fn is_error(&self) -> bool {
        self.kind == kind::ERROR
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    /// Children stored under `field`, in source order
    pub fn children_by_field<'a, 'f>(
        &'a self,
        field: &'f str,
    ) -> impl Iterator<Item = &'a SyntaxNode> + use<'a, 'f> {
        self.fields
            .iter()
            .filter(move |(name, _)| *name == field)
            .filter_map(|(_, idx)| self.children.get(*idx))
    }

    pub fn child_by_field(&self, field: &str) -> Option<&SyntaxNode> {
        self.children_by_field(field).next()
    }

    /// Field name of the child at `index`, if it has one
    pub fn field_of(&self, index: usize) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|(_, idx)| *idx == index)
            .map(|(name, _)| *name)
    }

    /// Whether this node or any descendant is an error node
    pub fn has_error(&self) -> bool {
        self.is_error() || self.children.iter().any(SyntaxNode::has_error)
    }

    /// Deepest named descendant whose span contains `offset`
    pub fn named_descendant_at(&self, offset: usize) -> Option<&SyntaxNode> {
        if !self.span.contains(offset) {
            return None;
        }
        self.children
            .iter()
            .filter(|c| c.named)
            .find_map(|c| c.named_descendant_at(offset))
            .or(Some(self))
    }

    /// S-expression rendering of the named structure, for tests and debugging
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(None, &mut out);
        out
    }

    fn write_sexp(&self, field: Option<&str>, out: &mut String) {
        if let Some(field) = field {
            let _ = write!(out, "{field}: ");
        }
        let _ = write!(out, "({}", self.kind);
        for (idx, child) in self.children.iter().enumerate() {
            if !child.named {
                continue;
            }
            out.push(' ');
            child.write_sexp(self.field_of(idx), out);
        }
        out.push(')');
    }
}

/// Accumulates children for an interior node
#[derive(Debug)]
pub(crate) struct NodeBuilder {
    kind: &'static str,
    children: Vec<SyntaxNode>,
    fields: Vec<(&'static str, usize)>,
}

impl NodeBuilder {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self {
            kind,
            children: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, child: SyntaxNode) {
        self.children.push(child);
    }

    pub(crate) fn push_field(&mut self, field: &'static str, child: SyntaxNode) {
        self.fields.push((field, self.children.len()));
        self.children.push(child);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Finish the node. Its span runs from the first child to the last; a
    /// node without children gets a zero-width span at `fallback`.
    pub(crate) fn finish(self, source: &str, fallback: usize) -> SyntaxNode {
        let span = match (self.children.first(), self.children.last()) {
            (Some(first), Some(last)) => Span::new(first.span.start, last.span.end),
            _ => Span::empty(fallback),
        };
        SyntaxNode {
            kind: self.kind,
            span,
            text: span.slice(source).unwrap_or_default().to_string(),
            named: true,
            children: self.children,
            fields: self.fields,
        }
    }
}
