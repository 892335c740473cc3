// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Text fallback
//!
//! Half-typed queries often build to a blank AST. For those, the context is
//! read off the raw text instead: the last clause keyword before the cursor
//! decides it.
//!
//! ```text
//! SELECT Id, |                 → field
//! SELECT Id FROM |             → sobject
//! SELECT Id FROM Account WHERE | → where
//! ```
//!
//! Keywords are tracked per parenthesis level, so `(SELECT |` inside a field
//! list starts over at `field` one level down, and string literals never
//! count.

use soql_grammar::{Token, TokenKind, lex_significant};

use crate::info::{ContextInfo, NodeType};

/// Where the scan stands at one parenthesis level
#[derive(Debug, Clone, Copy)]
struct Frame {
    node_type: NodeType,
    /// The level opened with `SELECT`
    is_query: bool,
}

impl Frame {
    const ROOT: Frame = Frame {
        node_type: NodeType::Field,
        is_query: false,
    };
}

fn clause_context(token: &Token, source: &str) -> Option<NodeType> {
    if token.is_keyword(source, "SELECT") {
        Some(NodeType::Field)
    } else if token.is_keyword(source, "FROM") {
        Some(NodeType::SObject)
    } else if token.is_keyword(source, "WHERE") || token.is_keyword(source, "HAVING") {
        Some(NodeType::Where)
    } else {
        None
    }
}

/// Classify `cursor` in `source` by the clause keywords before it
pub fn classify_text(source: &str, cursor: usize) -> ContextInfo {
    let mut frames = vec![Frame::ROOT];

    for token in lex_significant(source)
        .iter()
        .take_while(|t| t.span.end <= cursor)
    {
        match token.kind {
            TokenKind::LParen => {
                let inherited = frames.last().copied().unwrap_or(Frame::ROOT);
                frames.push(Frame {
                    is_query: false,
                    ..inherited
                });
            }
            TokenKind::RParen if frames.len() > 1 => {
                frames.pop();
            }
            _ => {
                let Some(node_type) = clause_context(token, source) else {
                    continue;
                };
                if let Some(frame) = frames.last_mut() {
                    if node_type == NodeType::Field {
                        frame.is_query = true;
                    }
                    // WHERE sticks until the level closes
                    if frame.node_type != NodeType::Where || node_type == NodeType::Field {
                        frame.node_type = node_type;
                    }
                }
            }
        }
    }

    let level = frames.iter().skip(1).filter(|f| f.is_query).count();
    let node_type = frames.last().map_or(NodeType::Field, |f| f.node_type);
    tracing::trace!(cursor, %node_type, level, "classified cursor from raw text");
    ContextInfo::new(node_type, cursor).at_level(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(input: &str) -> ContextInfo {
        let cursor = input.find('|').expect("cursor marker");
        let source = input.replacen('|', "", 1);
        classify_text(&source, cursor)
    }

    #[test]
    fn test_before_from_is_field() {
        assert_eq!(classify("SELECT |").node_type, NodeType::Field);
        assert_eq!(classify("SELECT Id, |").node_type, NodeType::Field);
        assert_eq!(classify("|").node_type, NodeType::Field);
    }

    #[test]
    fn test_after_from_is_sobject() {
        assert_eq!(classify("SELECT Id FROM |").node_type, NodeType::SObject);
        assert_eq!(classify("select Id from Acc|").node_type, NodeType::SObject);
    }

    #[test]
    fn test_after_where_is_where() {
        let info = classify("SELECT Id FROM Account WHERE |");
        assert_eq!(info.node_type, NodeType::Where);
        assert_eq!(info.nesting_level, 0);

        let info = classify("SELECT Id FROM Account WHERE Name = 'x' ORDER BY |");
        assert_eq!(info.node_type, NodeType::Where);
    }

    #[test]
    fn test_keyword_inside_string_is_ignored() {
        let info = classify("SELECT Id FROM Account WHERE Name = 'SELECT FROM' AND |");
        assert_eq!(info.node_type, NodeType::Where);
    }

    #[test]
    fn test_subquery_level() {
        let info = classify("SELECT Id, (SELECT |");
        assert_eq!(info.node_type, NodeType::Field);
        assert!(info.is_in_subquery);
        assert_eq!(info.nesting_level, 1);

        let info = classify("SELECT Id, (SELECT Id FROM |");
        assert_eq!(info.node_type, NodeType::SObject);
        assert_eq!(info.nesting_level, 1);
    }

    #[test]
    fn test_closed_subquery_returns_to_outer_level() {
        let info = classify("SELECT Id, (SELECT Id FROM Contacts) FROM |");
        assert_eq!(info.node_type, NodeType::SObject);
        assert!(!info.is_in_subquery);
    }

    #[test]
    fn test_value_list_keeps_where() {
        let info = classify("SELECT Id FROM Account WHERE Name IN ('a', |");
        assert_eq!(info.node_type, NodeType::Where);
        assert_eq!(info.nesting_level, 0);
    }

    #[test]
    fn test_no_span_reported() {
        let info = classify("SELECT Id FROM |");
        assert!(info.span.is_none());
        assert_eq!(info.cursor_offset, 15);
    }
}
