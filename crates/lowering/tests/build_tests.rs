// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end tests: text → grammar → Query

use soql_lsp_ir::{
    ConditionValue, Field, FieldOrFunction, LiteralType, Query, Span, Spanned, TypeofCondition,
    WhereClause,
};
use soql_lsp_lowering::{BuildError, BuildOptions, LoweringError, build_query};
use soql_lsp_test_utils::{SoqlAssertions, SoqlFixtures, init_test_tracing};

fn build(source: &str) -> Query {
    init_test_tracing();
    let output = build_query(source, &BuildOptions::default())
        .unwrap_or_else(|e| panic!("failed to build {source:?}: {e}"));
    assert!(output.is_complete(), "{source:?}: {:?}", output.outcome);
    output.query
}

// ===== Reference queries =====

#[test]
fn test_two_simple_fields() {
    let source = "SELECT Id, Name FROM Account";
    let query = build(source);

    assert_eq!(query.fields.len(), 2);
    SoqlAssertions::assert_simple_field(&query.fields[0], "Id");
    SoqlAssertions::assert_simple_field(&query.fields[1], "Name");
    assert_eq!(query.s_object, "Account");
    assert!(query.where_clause.is_none());
    assert!(query.subqueries().is_empty());
}

#[test]
fn test_child_subquery_field() {
    let source = "SELECT Name, (SELECT Id FROM Contacts) FROM Account";
    let query = build(source);

    assert_eq!(query.fields.len(), 2);
    SoqlAssertions::assert_simple_field(&query.fields[0], "Name");
    let Field::Subquery(sub) = &query.fields[1] else {
        panic!("expected subquery, got {:?}", query.fields[1]);
    };
    assert_eq!(sub.subquery.query.s_object, "Contacts");
    assert_eq!(sub.subquery.relationship_name, "Contacts");
    assert_eq!(sub.span.slice(source), Some("(SELECT Id FROM Contacts)"));
    assert_eq!(query.s_object, "Account");
}

#[test]
fn test_where_string_literal() {
    let source = "SELECT Id FROM Account WHERE Name = 'Acme'";
    let query = build(source);

    let clause = query.where_clause.expect("where clause");
    let condition = &clause.terms[0].condition;
    SoqlAssertions::assert_subject_field(&condition.subject, "Name");
    let ConditionValue::Literal(literal) = &condition.value else {
        panic!("expected literal value");
    };
    SoqlAssertions::assert_literal(literal, LiteralType::String, "'Acme'");
    SoqlAssertions::assert_span_text(literal, source, "'Acme'");
}

// ===== Field classification =====

#[test]
fn test_relationship_fields() {
    let source = SoqlFixtures::relationship_fields();
    let query = build(source);

    SoqlAssertions::assert_simple_field(&query.fields[0], "Id");
    SoqlAssertions::assert_relationship(&query.fields[1], "Account.Name");
    SoqlAssertions::assert_relationship(&query.fields[2], "Account.Owner.Email");

    let Field::Relationship(rel) = &query.fields[2] else {
        panic!("expected relationship");
    };
    assert_eq!(rel.relationships, ["Account", "Owner"]);
    assert_eq!(rel.field, "Email");
}

#[test]
fn test_alias_extends_field_span() {
    let source = "SELECT Name n, Owner.Name ownerName FROM Account";
    let query = build(source);

    assert_eq!(query.fields[0].alias(), Some("n"));
    SoqlAssertions::assert_span_text(&query.fields[0], source, "Name n");
    SoqlAssertions::assert_span_text(&query.fields[1], source, "Owner.Name ownerName");
}

#[test]
fn test_aggregate_and_plain_functions() {
    let source = SoqlFixtures::group_by_having();
    let query = build(source);

    SoqlAssertions::assert_function(&query.fields[1], "COUNT", true);
    assert_eq!(query.fields[1].name(), "COUNT(Id)");
    assert_eq!(query.fields[1].alias(), Some("total"));

    let having = query.having.expect("having");
    let subject = &having.terms[0].condition.subject;
    let FieldOrFunction::Function(func) = subject else {
        panic!("expected function subject");
    };
    assert!(func.is_aggregate_fn);
    assert_eq!(func.raw_value, "COUNT(Id)");
}

#[test]
fn test_nested_function_raw_value() {
    let source = "SELECT FORMAT(convertCurrency(Amount)) FROM Opportunity";
    let query = build(source);

    let Field::Function(func) = &query.fields[0] else {
        panic!("expected function");
    };
    assert_eq!(func.raw_value, "FORMAT(convertCurrency(Amount))");
    assert_eq!(func.parameters[0].raw_value(), "convertCurrency(Amount)");
}

#[test]
fn test_order_by_function_is_not_aggregate() {
    let source = "SELECT Name FROM Account ORDER BY COUNT(Id) DESC";
    let query = build(source);

    let func = query.order_by[0].target.as_function().expect("function");
    assert_eq!(func.function_name, "COUNT");
    assert!(!func.is_aggregate_fn);
}

#[test]
fn test_typeof_span_runs_to_end_keyword() {
    let source = SoqlFixtures::typeof_projection();
    let query = build(source);

    let Field::Typeof(typeof_field) = &query.fields[0] else {
        panic!("expected TYPEOF");
    };
    assert_eq!(typeof_field.field, "What");
    assert_eq!(typeof_field.conditions.len(), 3);
    assert!(matches!(
        &typeof_field.conditions[2],
        TypeofCondition::Else { field_list } if field_list == &["Name".to_string()]
    ));
    let text = typeof_field.span.slice(source).expect("in bounds");
    assert!(text.starts_with("TYPEOF"));
    assert!(text.ends_with("END"));
}

// ===== FROM clause =====

#[test]
fn test_object_prefix_and_alias() {
    let source = "SELECT Id FROM ns.Widget__c w";
    let query = build(source);

    assert_eq!(query.s_object, "Widget__c");
    assert_eq!(query.s_object_prefix, ["ns"]);
    assert_eq!(query.s_object_alias.as_deref(), Some("w"));
    let span = query.s_object_span.expect("object span");
    assert_eq!(span.slice(source), Some("ns.Widget__c w"));
}

#[test]
fn test_order_and_group_objects() {
    let source = SoqlFixtures::order_object();
    let query = build(source);
    assert_eq!(query.s_object, "Order");
    assert_eq!(query.s_object_span.and_then(|s| s.slice(source)), Some("Order"));
    assert_eq!(query.order_by.len(), 1);

    let source = SoqlFixtures::group_object();
    let query = build(source);
    assert_eq!(query.s_object, "Group");
    let span = query.s_object_span.expect("object span");
    assert_eq!(span, Span::new(21, 26));
    assert!(query.where_clause.is_some());
}

// ===== Conditions =====

#[test]
fn test_date_literals_and_variables() {
    let query = build(SoqlFixtures::date_literals());
    let clause = query.where_clause.expect("where");

    let ConditionValue::Literal(first) = &clause.terms[0].condition.value else {
        panic!("expected literal");
    };
    assert_eq!(first.literal_type, LiteralType::DateLiteral);

    let ConditionValue::Literal(second) = &clause.terms[1].condition.value else {
        panic!("expected literal");
    };
    assert_eq!(second.literal_type, LiteralType::DateNLiteral);
    assert_eq!(second.date_literal_variable, Some(30));
}

#[test]
fn test_nested_conditions_keep_paren_balance() {
    let query = build(SoqlFixtures::nested_conditions());
    let clause = query.where_clause.expect("where");

    assert_eq!(clause.terms.len(), 3);
    assert!(clause.validate_parens().is_ok());
    assert_eq!(clause.terms[0].open_paren(), 1);
    assert!(clause.terms[1].is_negated());
    assert_eq!(clause.terms[1].close_paren, 1);
}

#[test]
fn test_semi_join_is_listed_as_subquery() {
    let source = SoqlFixtures::semi_join();
    let query = build(source);

    let subs = query.subqueries();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].name, "Opportunity");
    let text = subs[0].span.slice(source).expect("in bounds");
    assert!(text.starts_with('('));
    assert!(text.ends_with(')'));
}

#[test]
fn test_bind_variable_keeps_colon() {
    let query = build(SoqlFixtures::bind_variable());
    let clause = query.where_clause.expect("where");
    let ConditionValue::Literal(literal) = &clause.terms[0].condition.value else {
        panic!("expected literal");
    };
    assert_eq!(literal.value, ":accountId");
}

// ===== Invariants over the fixture corpus =====

fn check_condition_spans(clause: &WhereClause, source: &str) {
    SoqlAssertions::assert_span_in_bounds(clause.span, source);
    for condition in clause.conditions() {
        let subject_text = condition.subject.span().slice(source).expect("in bounds");
        assert!(
            subject_text.starts_with(condition.subject.name()),
            "{subject_text:?} vs {:?}",
            condition.subject.name()
        );
        match &condition.value {
            ConditionValue::Literal(literal) => {
                assert_eq!(literal.span.slice(source), Some(literal.value.as_str()));
            }
            ConditionValue::List { items, span } => {
                SoqlAssertions::assert_span_in_bounds(*span, source);
                for item in items {
                    assert_eq!(item.span.slice(source), Some(item.value.as_str()));
                }
            }
            ConditionValue::Subquery { query, span } => {
                assert_eq!(span.slice(source).and_then(|s| s.chars().next()), Some('('));
                check_query_spans(query, source);
            }
        }
    }
}

fn check_query_spans(query: &Query, source: &str) {
    if let Some(span) = query.s_object_span {
        let text = span.slice(source).expect("in bounds");
        assert!(text.contains(query.s_object.as_str()), "{text:?}");
    }

    for field in &query.fields {
        let text = field.span().slice(source).expect("field span in bounds");
        match field {
            Field::Simple(_) | Field::Relationship(_) | Field::Function(_) => {
                assert!(text.starts_with(field.name()), "{text:?} vs {:?}", field.name());
            }
            Field::Subquery(sub) => {
                assert!(text.starts_with('(') && text.ends_with(')'), "{text:?}");
                check_query_spans(&sub.subquery.query, source);
            }
            Field::Typeof(_) => {
                assert!(text.starts_with("TYPEOF") && text.ends_with("END"), "{text:?}");
            }
        }
    }

    for clause in query.where_clause.iter().chain(query.having.iter()) {
        check_condition_spans(clause, source);
    }
}

#[test]
fn test_spans_slice_back_to_source() {
    for source in SoqlFixtures::valid() {
        let query = build(source);
        assert_eq!(query.span.slice(source), Some(source));
        check_query_spans(&query, source);
    }
}

fn check_relationships(query: &Query, source: &str) {
    for field in &query.fields {
        match field {
            Field::Simple(simple) => assert!(!simple.field.contains('.'), "{source}"),
            Field::Relationship(rel) => {
                assert!(!rel.relationships.is_empty(), "{source}");
                assert!(rel.raw_value.contains('.'), "{source}");
            }
            Field::Subquery(sub) => check_relationships(&sub.subquery.query, source),
            Field::Function(_) | Field::Typeof(_) => {}
        }
    }
}

#[test]
fn test_relationships_iff_dotted() {
    for source in SoqlFixtures::valid() {
        check_relationships(&build(source), source);
    }
}

// ===== Syntax error policy =====

#[test]
fn test_syntax_errors_refuse_strict_build() {
    init_test_tracing();
    for source in SoqlFixtures::invalid() {
        let err = build_query(source, &BuildOptions::default()).unwrap_err();
        assert!(err.is_syntax(), "{source:?}: {err}");
        assert!(!err.syntax_errors().is_empty());
    }
}

#[test]
fn test_best_effort_builds_despite_syntax_errors() {
    init_test_tracing();
    let output = build_query(
        SoqlFixtures::error_trailing_comma(),
        &BuildOptions::best_effort(),
    )
    .unwrap();

    assert!(!output.is_complete());
    assert!(!output.syntax_errors.is_empty());
    assert_eq!(output.query.s_object, "Account");
    SoqlAssertions::assert_simple_field(&output.query.fields[0], "Id");
}

#[test]
fn test_best_effort_drops_missing_from() {
    init_test_tracing();
    let output = build_query(
        SoqlFixtures::error_missing_from(),
        &BuildOptions::best_effort(),
    )
    .unwrap();

    assert_eq!(output.query.fields.len(), 2);
    assert!(!output.query.has_object());
    assert!(output.query.s_object_span.is_none());
    assert!(
        output
            .dropped()
            .iter()
            .any(|e| matches!(e, LoweringError::MissingChild { expected, .. } if expected == "from_clause"))
    );
}

#[test]
fn test_invalid_options_are_rejected() {
    let options = BuildOptions {
        max_subquery_depth: 0,
        ..BuildOptions::default()
    };
    let err = build_query("SELECT Id FROM Account", &options).unwrap_err();
    assert!(matches!(err, BuildError::Config(_)));
}

#[test]
fn test_subquery_depth_limit() {
    let options = BuildOptions {
        max_subquery_depth: 1,
        ..BuildOptions::best_effort()
    };
    let err = build_query(SoqlFixtures::nested_subquery(), &options).unwrap_err();
    assert!(matches!(
        err,
        BuildError::Malformed(LoweringError::RecursionLimitExceeded { .. })
    ));

    let output = build_query(SoqlFixtures::child_subquery(), &options).unwrap();
    assert_eq!(output.query.subquery_count(), 1);
}

#[test]
fn test_query_json_shape() {
    let query = build(SoqlFixtures::child_subquery());
    let json = serde_json::to_value(&query).unwrap();

    assert_eq!(json["sObject"], "Account");
    assert_eq!(json["fields"][0]["type"], "Field");
    assert_eq!(json["fields"][2]["type"], "FieldSubquery");
    assert_eq!(
        json["fields"][2]["subquery"]["relationshipName"],
        "Contacts"
    );
}
