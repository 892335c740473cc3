// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SOQL-specific test helpers and custom assertions

use soql_lsp_ir::{Field, FieldOrFunction, Literal, LiteralType, Span, Spanned};

/// Custom assertion helpers for SOQL testing
pub struct SoqlAssertions;

impl SoqlAssertions {
    /// Assert that a field is a plain field with the given name
    pub fn assert_simple_field(field: &Field, name: &str) {
        match field {
            Field::Simple(f) => {
                assert_eq!(f.field, name, "Expected field '{}', found '{}'", name, f.field);
            }
            _ => panic!("Expected simple Field, found {:?}", field),
        }
    }

    /// Assert that a field is a relationship field with the given path
    pub fn assert_relationship(field: &Field, path: &str) {
        match field {
            Field::Relationship(f) => {
                assert_eq!(f.raw_value, path, "Relationship path mismatch");
                assert!(!f.relationships.is_empty(), "Relationship without segments");
            }
            _ => panic!("Expected FieldRelationship, found {:?}", field),
        }
    }

    /// Assert that a field is a function call with the given name
    pub fn assert_function(field: &Field, name: &str, is_aggregate: bool) {
        match field {
            Field::Function(f) => {
                assert_eq!(f.function_name, name, "Function name mismatch");
                assert_eq!(f.is_aggregate_fn, is_aggregate, "Aggregate flag mismatch for {name}");
            }
            _ => panic!("Expected FieldFunctionExpression, found {:?}", field),
        }
    }

    /// Assert that a condition subject is the plain field `name`
    pub fn assert_subject_field(subject: &FieldOrFunction, name: &str) {
        match subject {
            FieldOrFunction::Field { field, .. } => assert_eq!(field, name),
            FieldOrFunction::Function(f) => {
                panic!("Expected field '{}', found function {}", name, f.raw_value)
            }
        }
    }

    /// Assert that a literal has the given type and image
    pub fn assert_literal(literal: &Literal, literal_type: LiteralType, value: &str) {
        assert_eq!(literal.literal_type, literal_type, "Literal type mismatch");
        assert_eq!(literal.value, value, "Literal value mismatch");
    }

    /// Assert that `node`'s span slices `source` to `expected`
    pub fn assert_span_text<T: Spanned + std::fmt::Debug>(node: &T, source: &str, expected: &str) {
        let span = node.span();
        assert_eq!(
            span.slice(source),
            Some(expected),
            "Span {:?} of {:?} does not cover '{}'",
            span,
            node,
            expected
        );
    }

    /// Assert that a span lies within `source`
    pub fn assert_span_in_bounds(span: Span, source: &str) {
        assert!(
            span.start <= span.end && span.end <= source.len(),
            "Span {:?} out of bounds for source of length {}",
            span,
            source.len()
        );
    }
}
