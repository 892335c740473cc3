// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Generic CST node abstraction
//!
//! The builder is written against [`CstNode`] rather than a concrete tree so
//! it can lower the grammar's [`SyntaxNode`] as well as hand-built trees in
//! tests (see `soql-lsp-test-utils`'s `MockCstNode`).

use soql_grammar::SyntaxNode;
use soql_lsp_ir::Span;
use std::fmt;

/// Generic CST node trait
///
/// Provides a unified interface for the lowering layer to work with.
pub trait CstNode: fmt::Debug {
    /// Get the kind of node (e.g., "select_statement", "field_ref")
    fn kind(&self) -> &str;

    /// Get child nodes by field name
    fn children(&self, field: &str) -> Vec<&Self>
    where
        Self: Sized;

    /// Get all child nodes (regardless of field)
    fn all_children(&self) -> Vec<&Self>
    where
        Self: Sized;

    /// Get the number of children
    fn child_count(&self) -> usize;

    /// Get the byte offset of this node in the source
    fn start_byte(&self) -> usize;

    /// Get the byte end offset of this node in the source
    fn end_byte(&self) -> usize;

    /// Get the text content of this node (if source is available)
    fn text(&self) -> Option<&str>;

    /// Check if this node is named (vs. anonymous nodes like parentheses)
    fn is_named(&self) -> bool;

    /// Byte span of this node
    fn span(&self) -> Span {
        Span::new(self.start_byte(), self.end_byte())
    }
}

impl CstNode for SyntaxNode {
    fn kind(&self) -> &str {
        SyntaxNode::kind(self)
    }

    fn children(&self, field: &str) -> Vec<&Self> {
        self.children_by_field(field).collect()
    }

    fn all_children(&self) -> Vec<&Self> {
        SyntaxNode::children(self).iter().collect()
    }

    fn child_count(&self) -> usize {
        SyntaxNode::children(self).len()
    }

    fn start_byte(&self) -> usize {
        SyntaxNode::start_byte(self)
    }

    fn end_byte(&self) -> usize {
        SyntaxNode::end_byte(self)
    }

    fn text(&self) -> Option<&str> {
        Some(SyntaxNode::text(self))
    }

    fn is_named(&self) -> bool {
        SyntaxNode::is_named(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soql_grammar::{field, kind, parse};

    #[test]
    fn test_syntax_node_field_access() {
        let output = parse("SELECT Id, Name FROM Account");
        let root = &output.root;

        assert_eq!(CstNode::kind(root), kind::SELECT_STATEMENT);
        let lists = CstNode::children(root, field::SELECT_LIST);
        assert_eq!(lists.len(), 1);
        assert_eq!(CstNode::children(lists[0], field::ITEM).len(), 2);
        assert!(CstNode::children(root, field::WHERE_CLAUSE).is_empty());
    }

    #[test]
    fn test_syntax_node_range_and_text() {
        let output = parse("SELECT Id FROM Account");
        let from = CstNode::children(&output.root, field::FROM_CLAUSE)[0];
        let object = CstNode::children(from, field::OBJECT)[0];

        assert_eq!(object.start_byte(), 15);
        assert_eq!(object.end_byte(), 22);
        assert_eq!(CstNode::text(object), Some("Account"));
        assert_eq!(CstNode::span(object), Span::new(15, 22));
    }

    #[test]
    fn test_anonymous_punctuation() {
        let output = parse("SELECT Id, Name FROM Account");
        let list = CstNode::children(&output.root, field::SELECT_LIST)[0];
        let all = list.all_children();
        assert_eq!(all.len(), 3);
        assert!(!CstNode::is_named(all[1]));
        assert_eq!(list.child_count(), 3);
    }
}
