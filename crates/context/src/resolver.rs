// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Cursor context resolution
//!
//! [`resolve`] maps a byte offset in the query text to the innermost
//! semantic element covering it. Resolution order:
//!
//! 1. Blank AST with raw text available: classify from the text
//!    ([`crate::fallback`]).
//! 2. A non-subquery field containing the cursor.
//! 3. The best subquery match at any depth: deepest nesting level first,
//!    then the smallest span, then the first found.
//! 4. The gap between two fields.
//! 5. The object name, up to one byte past its end.
//! 6. WHERE, then HAVING: condition subjects and values.
//! 7. Otherwise [`NodeType::Unknown`].
//!
//! Inside a subquery, steps 2 and 4 to 6 run against the subquery; when none
//! of them match, the subquery itself is the match.

use soql_lsp_ir::{
    ConditionValue, Field, FieldOrFunction, Query, Span, Spanned, SubqueryRef, WhereClause,
};

use crate::fallback::classify_text;
use crate::info::{ContextInfo, NodeType};

/// Resolve the context at `cursor` (a byte offset into the query text).
///
/// `ast` is a [`Query`] or a [`soql_lsp_ir::Subquery`]. `raw_text` is only
/// consulted when the AST is blank. Never fails: an unmatched cursor gives
/// [`NodeType::Unknown`].
pub fn resolve(ast: &impl AsRef<Query>, cursor: usize, raw_text: Option<&str>) -> ContextInfo {
    let query = ast.as_ref();
    tracing::debug!(
        cursor,
        s_object = %query.s_object,
        fields = query.fields.len(),
        "resolving cursor context"
    );

    if query.is_blank()
        && let Some(text) = raw_text
    {
        return classify_text(text, cursor);
    }

    if let Some(info) = match_field(query, cursor, 0) {
        return info;
    }
    if let Some(info) = best_subquery_match(query, cursor, 0, None) {
        return info;
    }
    match_local(query, cursor, 0).unwrap_or_else(|| ContextInfo::unknown(cursor))
}

/// Deepest level wins, then the smaller span; ties keep `best`
fn better(best: Option<ContextInfo>, candidate: ContextInfo) -> ContextInfo {
    match best {
        Some(best)
            if best.nesting_level > candidate.nesting_level
                || (best.nesting_level == candidate.nesting_level
                    && best.span_len() <= candidate.span_len()) =>
        {
            best
        }
        _ => candidate,
    }
}

/// Fold every subquery of `query` containing `cursor`, at every depth, into
/// `best`. `level` is the nesting level of `query` itself.
fn best_subquery_match(
    query: &Query,
    cursor: usize,
    level: usize,
    best: Option<ContextInfo>,
) -> Option<ContextInfo> {
    query
        .subqueries()
        .into_iter()
        .filter(|sq| sq.span.contains(cursor))
        .fold(best, |best, sq| {
            let child_level = level + 1;
            let candidate = match_field(sq.query, cursor, child_level)
                .or_else(|| match_local(sq.query, cursor, child_level))
                .unwrap_or_else(|| subquery_context(&sq, cursor, child_level));
            tracing::trace!(
                subquery = sq.name,
                level = child_level,
                node_type = %candidate.node_type,
                "subquery candidate"
            );
            let best = Some(better(best, candidate));
            best_subquery_match(sq.query, cursor, child_level, best)
        })
}

fn subquery_context(sq: &SubqueryRef<'_>, cursor: usize, level: usize) -> ContextInfo {
    ContextInfo::new(NodeType::Subquery, cursor)
        .with_s_object(sq.name)
        .with_span(sq.span)
        .at_level(level)
}

/// Gap, object name, then conditions
fn match_local(query: &Query, cursor: usize, level: usize) -> Option<ContextInfo> {
    match_gap(query, cursor, level)
        .or_else(|| match_object(query, cursor, level))
        .or_else(|| match_conditions(query, cursor, level))
}

fn match_field(query: &Query, cursor: usize, level: usize) -> Option<ContextInfo> {
    let field = query
        .fields
        .iter()
        .filter(|f| !f.is_subquery())
        .find(|f| f.span().contains(cursor))?;

    let info = match field {
        Field::Function(func) => ContextInfo::new(NodeType::Function, cursor)
            .with_field_name(func.raw_value.as_str()),
        Field::Relationship(rel) => {
            let info =
                ContextInfo::new(NodeType::Field, cursor).with_field_name(rel.raw_value.as_str());
            match rel.target_object() {
                Some(object) => info.with_s_object(object),
                None => info,
            }
        }
        Field::Simple(_) | Field::Typeof(_) | Field::Subquery(_) => {
            ContextInfo::new(NodeType::Field, cursor).with_field_name(field.name())
        }
    };
    Some(info.with_span(field.span()).at_level(level))
}

fn match_gap(query: &Query, cursor: usize, level: usize) -> Option<ContextInfo> {
    query.fields.windows(2).find_map(|pair| {
        let gap = Span::new(pair[0].span().end, pair[1].span().start);
        gap.contains(cursor).then(|| {
            ContextInfo::new(NodeType::Field, cursor)
                .with_span(gap)
                .at_level(level)
        })
    })
}

fn match_object(query: &Query, cursor: usize, level: usize) -> Option<ContextInfo> {
    let span = query.s_object_span?;
    span.touches(cursor).then(|| {
        ContextInfo::new(NodeType::SObject, cursor)
            .with_s_object(query.s_object.as_str())
            .with_span(span)
            .at_level(level)
    })
}

fn match_conditions(query: &Query, cursor: usize, level: usize) -> Option<ContextInfo> {
    query
        .where_clause
        .iter()
        .chain(query.having.iter())
        .find_map(|clause| match_clause(clause, cursor))
        .map(|info| info.at_level(level))
}

fn match_clause(clause: &WhereClause, cursor: usize) -> Option<ContextInfo> {
    clause.conditions().find_map(|condition| {
        let subject = &condition.subject;
        if subject.span().contains(cursor) {
            let node_type = match subject {
                FieldOrFunction::Field { .. } => NodeType::Field,
                FieldOrFunction::Function(_) => NodeType::Function,
            };
            return Some(
                ContextInfo::new(node_type, cursor)
                    .with_field_name(subject.name())
                    .with_span(subject.span()),
            );
        }

        let value_span = match &condition.value {
            ConditionValue::Literal(literal) => Some(literal.span),
            ConditionValue::List { items, span } => items
                .iter()
                .map(|item| item.span)
                .find(|item| item.contains(cursor))
                .or(Some(*span)),
            // semi-joins are matched as subqueries
            ConditionValue::Subquery { .. } => None,
        }?;

        value_span.contains(cursor).then(|| {
            ContextInfo::new(NodeType::Where, cursor)
                .with_field_name(subject.name())
                .with_span(value_span)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use soql_lsp_ir::{FieldSubquery, SimpleField, Subquery};

    fn simple(name: &str, start: usize) -> Field {
        Field::Simple(SimpleField {
            field: name.to_string(),
            alias: None,
            span: Span::new(start, start + name.len()),
        })
    }

    fn subquery(query: Query, span: Span) -> Field {
        Field::Subquery(FieldSubquery {
            subquery: Subquery::new(query),
            span,
        })
    }

    #[test]
    fn test_better_prefers_depth_then_size() {
        let shallow = ContextInfo::new(NodeType::Subquery, 5)
            .with_span(Span::new(0, 10))
            .at_level(1);
        let deep = ContextInfo::new(NodeType::Subquery, 5)
            .with_span(Span::new(0, 50))
            .at_level(2);
        let tight = ContextInfo::new(NodeType::Field, 5)
            .with_span(Span::new(4, 6))
            .at_level(2);

        assert_eq!(better(Some(shallow.clone()), deep.clone()), deep);
        assert_eq!(better(Some(deep.clone()), shallow), deep);
        assert_eq!(better(Some(deep.clone()), tight.clone()), tight);
        assert_eq!(better(Some(tight.clone()), deep), tight);
    }

    #[test]
    fn test_better_keeps_first_on_full_tie() {
        let first = ContextInfo::new(NodeType::Subquery, 5)
            .with_s_object("First")
            .with_span(Span::new(0, 10))
            .at_level(1);
        let second = ContextInfo::new(NodeType::Subquery, 5)
            .with_s_object("Second")
            .with_span(Span::new(0, 10))
            .at_level(1);
        assert_eq!(better(Some(first.clone()), second), first);
        assert_eq!(better(None, first.clone()), first);
    }

    #[test]
    fn test_deeper_wins_regardless_of_order() {
        // Hand-built trees where a wide shallow subquery is listed after a
        // narrow one holding a deeper match.
        let inner = Query::new("Cases").with_fields(vec![simple("Subject", 40)]);
        let middle = Query::new("Contacts").with_fields(vec![subquery(inner, Span::new(30, 60))]);
        let root = Query::new("Account").with_fields(vec![
            subquery(middle, Span::new(20, 70)),
            subquery(Query::new("Notes"), Span::new(10, 80)),
        ]);

        let info = resolve(&root, 42, None);
        assert_eq!(info.node_type, NodeType::Field);
        assert_eq!(info.field_name.as_deref(), Some("Subject"));
        assert_eq!(info.nesting_level, 2);
    }

    #[test]
    fn test_blank_query_without_text_is_unknown() {
        let info = resolve(&Query::default(), 3, None);
        assert!(info.is_unknown());
        assert_eq!(info.cursor_offset, 3);
    }

    #[test]
    fn test_blank_query_uses_text() {
        let info = resolve(&Query::default(), 15, Some("SELECT Id FROM "));
        assert_eq!(info.node_type, NodeType::SObject);
    }
}
