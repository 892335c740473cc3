// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock CST builder for testing the lowering layer
//!
//! Provides a fluent API for building CST trees by hand, including trees the
//! grammar would never produce (missing children, wrong kinds).

use soql_grammar::{field, kind};
use soql_lsp_lowering::CstNode;
use std::collections::HashMap;

/// Mock CST node for testing
#[derive(Debug, Clone)]
pub struct MockCstNode {
    pub kind: String,
    pub children: Vec<MockCstNode>,
    pub field_map: HashMap<String, Vec<usize>>,
    pub start_byte: usize,
    pub end_byte: usize,
    pub text: Option<String>,
    pub named: bool,
}

impl MockCstNode {
    /// Create a new mock CST node
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            children: Vec::new(),
            field_map: HashMap::new(),
            start_byte: 0,
            end_byte: 0,
            text: None,
            named: true,
        }
    }

    /// Anonymous punctuation leaf
    pub fn punct(text: &str, start: usize) -> Self {
        let mut node = Self::new(text).with_text(text).with_range(start, start + text.len());
        node.named = false;
        node
    }

    /// Add a child node with an optional field name
    pub fn with_child(mut self, field: Option<&str>, child: MockCstNode) -> Self {
        let idx = self.children.len();
        if let Some(field_name) = field {
            self.field_map
                .entry(field_name.to_string())
                .or_default()
                .push(idx);
        }
        self.children.push(child);
        self
    }

    /// Set the byte range
    pub fn with_range(mut self, start: usize, end: usize) -> Self {
        self.start_byte = start;
        self.end_byte = end;
        self
    }

    /// Set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl CstNode for MockCstNode {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn children(&self, field: &str) -> Vec<&Self> {
        self.field_map
            .get(field)
            .map(|indices| indices.iter().filter_map(|&i| self.children.get(i)).collect())
            .unwrap_or_default()
    }

    fn all_children(&self) -> Vec<&Self> {
        self.children.iter().collect()
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn start_byte(&self) -> usize {
        self.start_byte
    }

    fn end_byte(&self) -> usize {
        self.end_byte
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn is_named(&self) -> bool {
        self.named
    }
}

/// Fluent builder for creating CST trees
pub struct MockCstBuilder {
    current: MockCstNode,
}

impl MockCstBuilder {
    /// Start building a new CST node
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            current: MockCstNode::new(kind),
        }
    }

    /// Add a child node with a field name
    pub fn with_field(mut self, field: &str, child: MockCstNode) -> Self {
        self.current = self.current.with_child(Some(field), child);
        self
    }

    /// Add a child without a field name
    pub fn with_child(mut self, child: MockCstNode) -> Self {
        self.current = self.current.with_child(None, child);
        self
    }

    /// Set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.current.text = Some(text.into());
        self
    }

    /// Set the byte range
    pub fn with_range(mut self, start: usize, end: usize) -> Self {
        self.current.start_byte = start;
        self.current.end_byte = end;
        self
    }

    /// Build the final CST node
    pub fn build(self) -> MockCstNode {
        self.current
    }
}

/// Helpers for creating SOQL CST structures with the grammar's node kinds.
///
/// Offsets are given explicitly so tests can check span propagation.
pub struct SoqlCstHelpers;

impl SoqlCstHelpers {
    /// Identifier leaf at `start`
    pub fn identifier(text: &str, start: usize) -> MockCstNode {
        MockCstNode::new(kind::IDENTIFIER)
            .with_text(text)
            .with_range(start, start + text.len())
    }

    /// Keyword leaf at `start`
    pub fn keyword(text: &str, start: usize) -> MockCstNode {
        MockCstNode::new(kind::KEYWORD)
            .with_text(text)
            .with_range(start, start + text.len())
    }

    /// `field_ref` with a `name` child
    pub fn field_ref(name: &str, start: usize) -> MockCstNode {
        MockCstNode::new(kind::FIELD_REF)
            .with_child(Some(field::NAME), Self::identifier(name, start))
            .with_text(name)
            .with_range(start, start + name.len())
    }

    /// `from_clause` for `FROM object`, with the keyword at `start`
    pub fn from_clause(object: &str, start: usize) -> MockCstNode {
        let object_start = start + "FROM ".len();
        MockCstNode::new(kind::FROM_CLAUSE)
            .with_child(None, Self::keyword("FROM", start))
            .with_child(Some(field::OBJECT), Self::identifier(object, object_start))
            .with_range(start, object_start + object.len())
    }

    /// `SELECT f1, f2 FROM object` laid out with single spaces, as the
    /// grammar would produce it
    pub fn simple_select(fields: &[&str], object: &str) -> MockCstNode {
        let mut offset = "SELECT ".len();
        let mut list = MockCstNode::new(kind::SELECT_LIST);
        let list_start = offset;
        for (i, name) in fields.iter().enumerate() {
            if i > 0 {
                list = list.with_child(None, MockCstNode::punct(",", offset));
                offset += ", ".len();
            }
            list = list.with_child(Some(field::ITEM), Self::field_ref(name, offset));
            offset += name.len();
        }
        list = list.with_range(list_start, offset);

        let from = Self::from_clause(object, offset + 1);
        let end = from.end_byte;
        MockCstNode::new(kind::SELECT_STATEMENT)
            .with_child(None, Self::keyword("SELECT", 0))
            .with_child(Some(field::SELECT_LIST), list)
            .with_child(Some(field::FROM_CLAUSE), from)
            .with_range(0, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_select_layout() {
        let node = SoqlCstHelpers::simple_select(&["Id", "Name"], "Account");
        let source = "SELECT Id, Name FROM Account";

        assert_eq!(node.kind(), kind::SELECT_STATEMENT);
        assert_eq!(node.end_byte(), source.len());

        let list = node.children(field::SELECT_LIST)[0];
        let items = list.children(field::ITEM);
        assert_eq!(items.len(), 2);
        assert_eq!(&source[items[1].start_byte()..items[1].end_byte()], "Name");

        let from = node.children(field::FROM_CLAUSE)[0];
        let object = from.children(field::OBJECT)[0];
        assert_eq!(&source[object.start_byte()..object.end_byte()], "Account");
    }

    #[test]
    fn test_builder_pattern() {
        let node = MockCstBuilder::new(kind::SELECT_STATEMENT)
            .with_field(
                field::SELECT_LIST,
                MockCstBuilder::new(kind::SELECT_LIST)
                    .with_field(field::ITEM, SoqlCstHelpers::field_ref("Id", 7))
                    .build(),
            )
            .with_child(SoqlCstHelpers::keyword("FROM", 10))
            .with_range(0, 14)
            .build();

        assert_eq!(node.kind(), kind::SELECT_STATEMENT);
        assert_eq!(node.child_count(), 2);
        assert!(node.children(field::FROM_CLAUSE).is_empty());
    }

    #[test]
    fn test_punct_is_anonymous() {
        let comma = MockCstNode::punct(",", 9);
        assert!(!comma.is_named());
        assert_eq!(comma.end_byte(), 10);
    }
}
