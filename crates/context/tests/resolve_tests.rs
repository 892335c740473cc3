// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Resolver tests over queries built from text

use std::path::PathBuf;

use soql_lsp_context::{
    ContextInfo, NodeType, Position, char_offset_to_byte_offset, position_to_offset, resolve,
};
use soql_lsp_ir::{Field, Query, Span};
use soql_lsp_lowering::{BuildOptions, build_query};
use soql_lsp_test_utils::{TestCase, init_test_tracing, parse_test_file, split_cursor};

fn build(source: &str) -> Query {
    init_test_tracing();
    build_query(source, &BuildOptions::best_effort())
        .unwrap_or_else(|e| panic!("failed to build {source:?}: {e}"))
        .query
}

/// Build the marked query and resolve at the marker
fn resolve_marked(marked: &str) -> (String, ContextInfo) {
    let (source, cursor) = split_cursor(marked).expect("cursor marker");
    let query = build(&source);
    let info = resolve(&query, cursor, Some(&source));
    (source, info)
}

#[test]
fn test_cursor_in_subquery_object() {
    let (_, info) = resolve_marked("SELECT Name, (SELECT Id FROM Cont|acts) FROM Account");

    assert_eq!(info.node_type, NodeType::SObject);
    assert_eq!(info.s_object.as_deref(), Some("Contacts"));
    assert!(info.is_in_subquery);
    assert_eq!(info.nesting_level, 1);
}

#[test]
fn test_cursor_in_where_literal() {
    let (source, info) = resolve_marked("SELECT Id FROM Account WHERE Name = 'Ac|me'");

    assert_eq!(info.node_type, NodeType::Where);
    let span = info.span.expect("matched span");
    assert_eq!(span.slice(&source), Some("'Acme'"));
    assert_eq!(info.cursor_offset, 39);
}

#[test]
fn test_innermost_subquery_wins() {
    let (source, info) = resolve_marked(
        "SELECT Id, (SELECT Id, (SELECT Sub|ject FROM Cases) FROM Contacts) FROM Account",
    );

    assert_eq!(info.nesting_level, 2);
    assert!(info.is_in_subquery);
    assert_eq!(info.node_type, NodeType::Field);
    assert_eq!(info.span.and_then(|s| s.slice(&source)), Some("Subject"));

    // the level-1 subquery also covers the cursor
    let query = build(&source);
    let Field::Subquery(outer) = &query.fields[1] else {
        panic!("expected subquery");
    };
    assert!(outer.span.contains(info.cursor_offset));
}

#[test]
fn test_subquery_context_spans_parentheses() {
    let (source, info) = resolve_marked("SELECT Id, (SEL|ECT LastName FROM Contacts) FROM Account");

    assert_eq!(info.node_type, NodeType::Subquery);
    assert_eq!(
        info.span.and_then(|s| s.slice(&source)),
        Some("(SELECT LastName FROM Contacts)")
    );
}

#[test]
fn test_gap_span() {
    let (source, info) = resolve_marked("SELECT Id,   |  Name FROM Account");

    assert_eq!(info.node_type, NodeType::Field);
    assert!(info.field_name.is_none());
    assert_eq!(info.span.and_then(|s| s.slice(&source)), Some(",     "));
}

#[test]
fn test_resolve_on_subquery_node() {
    let source = "SELECT Id, (SELECT LastName FROM Contacts) FROM Account";
    let query = build(source);
    let Field::Subquery(field) = &query.fields[1] else {
        panic!("expected subquery");
    };

    // A subquery resolved on its own is its own root
    let cursor = source.find("Contacts").expect("object") + 2;
    let info = resolve(&field.subquery, cursor, None);
    assert_eq!(info.node_type, NodeType::SObject);
    assert_eq!(info.nesting_level, 0);
}

#[test]
fn test_fallback_only_for_blank_ast() {
    let source = "SELECT Id FROM ";
    let query = build(source);
    assert!(!query.is_blank());

    let info = resolve(&query, source.len(), Some(source));
    assert!(info.is_unknown());

    let info = resolve(&Query::default(), source.len(), Some(source));
    assert_eq!(info.node_type, NodeType::SObject);
}

#[test]
fn test_every_offset_resolves() {
    let source = "SELECT Id, (SELECT Id FROM Contacts WHERE Name != null) FROM Account WHERE Id IN (SELECT AccountId FROM Case) LIMIT 5";
    let query = build(source);
    for cursor in 0..=source.len() + 2 {
        let info = resolve(&query, cursor, Some(source));
        assert_eq!(info.cursor_offset, cursor);
        if let Some(span) = info.span {
            assert!(span.touches(cursor), "{cursor}: {info:?}");
            assert!(span.end <= source.len());
        }
        assert_eq!(info.is_in_subquery, info.nesting_level > 0);
    }
}

#[test]
fn test_resolve_from_threads() {
    let source = "SELECT Id, (SELECT LastName FROM Contacts) FROM Account";
    let query = build(source);
    let cursor = source.find("LastName").expect("field");

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| resolve(&query, cursor, None)))
            .collect();
        for handle in handles {
            let info = handle.join().expect("resolver thread");
            assert_eq!(info.field_name.as_deref(), Some("LastName"));
        }
    });
}

#[test]
fn test_editor_positions() {
    let source = "SELECT Id\nFROM Account\nWHERE Name = 'Zoë'";
    let query = build(source);

    let offset = position_to_offset(source, Position::new(1, 7));
    let info = resolve(&query, offset, Some(source));
    assert_eq!(info.node_type, NodeType::SObject);
    assert_eq!(info.span, Some(Span::new(15, 22)));

    // closing quote, one byte further along than its char index
    let offset = position_to_offset(source, Position::new(2, 17));
    assert_eq!(offset, 41);
    let info = resolve(&query, offset, Some(source));
    assert_eq!(info.node_type, NodeType::Where);
    assert_eq!(info.span, Some(Span::new(36, 42)));

    let chars = source.chars().position(|c| c == '\'').expect("quote");
    let info = resolve(&query, char_offset_to_byte_offset(source, chars + 1), Some(source));
    assert_eq!(info.node_type, NodeType::Where);
}

#[test]
fn test_json_output() {
    let (_, info) = resolve_marked("SELECT Name, (SELECT Id FROM Cont|acts) FROM Account");
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["nodeType"], "sobject");
    assert_eq!(json["sObject"], "Contacts");
    assert_eq!(json["isInSubquery"], true);
    assert_eq!(json["nestingLevel"], 1);
}

fn check_case(case: &TestCase) {
    let query = build(&case.input);
    let info = resolve(&query, case.cursor, Some(&case.input));
    let expected = &case.expected;
    let label = &case.description;

    assert_eq!(info.node_type.as_str(), expected.node_type, "{label}: {info:?}");
    if let Some(field_name) = &expected.field_name {
        assert_eq!(info.field_name.as_ref(), Some(field_name), "{label}");
    }
    if let Some(s_object) = &expected.s_object {
        assert_eq!(info.s_object.as_ref(), Some(s_object), "{label}");
    }
    if let Some(is_in_subquery) = expected.is_in_subquery {
        assert_eq!(info.is_in_subquery, is_in_subquery, "{label}");
    }
    if let Some(nesting_level) = expected.nesting_level {
        assert_eq!(info.nesting_level, nesting_level, "{label}");
    }
}

#[test]
fn test_context_case_file() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/context_cases.txt");
    let cases = parse_test_file(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()));
    assert!(cases.len() >= 20);

    for case in &cases {
        check_case(case);
    }
}
