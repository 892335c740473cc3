// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # WHERE / HAVING Conditions
//!
//! A condition chain is stored flat, in source order, as a list of
//! [`WhereTerm`]s:
//!
//! ```sql
//! WHERE Name = 'Acme' AND (NOT Industry = 'Tech' OR Rating IN ('Hot', 'Warm'))
//! ```
//!
//! becomes
//!
//! | operator | prefix           | condition                   | close_paren |
//! |----------|------------------|-----------------------------|-------------|
//! | -        | -                | `Name = 'Acme'`             | 0           |
//! | AND      | `(`, `NOT`       | `Industry = 'Tech'`         | 0           |
//! | OR       | -                | `Rating IN ('Hot', 'Warm')` | 1           |
//!
//! Parentheses are counted on the terms that open and close them, so the
//! grouping of the original text can be reconstructed and checked with
//! [`WhereClause::validate_parens`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::field::FunctionExpression;
use crate::literal::{Literal, LiteralType};
use crate::query::Query;
use crate::span::{Span, Spanned};

/// Ordered WHERE (or HAVING) chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    pub terms: Vec<WhereTerm>,
    /// Condition expression only, without the WHERE keyword
    pub span: Span,
}

/// HAVING shares the WHERE representation
pub type HavingClause = WhereClause;

/// Errors reported by [`WhereClause::validate_parens`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParenBalanceError {
    #[error("Term {term} closes more parentheses than are open")]
    UnexpectedClose { term: usize },

    #[error("{depth} parenthes(es) left open at end of condition")]
    Unclosed { depth: u32 },
}

impl WhereClause {
    pub fn new(terms: Vec<WhereTerm>, span: Span) -> Self {
        Self { terms, span }
    }

    /// Check that parentheses open before they close and all get closed
    pub fn validate_parens(&self) -> Result<(), ParenBalanceError> {
        let mut depth: u32 = 0;
        for (idx, term) in self.terms.iter().enumerate() {
            depth += term.open_paren();
            depth = depth
                .checked_sub(term.close_paren)
                .ok_or(ParenBalanceError::UnexpectedClose { term: idx })?;
        }
        if depth == 0 {
            Ok(())
        } else {
            Err(ParenBalanceError::Unclosed { depth })
        }
    }

    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.terms.iter().map(|t| &t.condition)
    }

    /// Semi-join subqueries used as condition values, in source order
    pub fn subqueries(&self) -> impl Iterator<Item = (&Query, Span)> {
        self.conditions().filter_map(|c| match &c.value {
            ConditionValue::Subquery { query, span } => Some((query.as_ref(), *span)),
            _ => None,
        })
    }
}

impl Spanned for WhereClause {
    fn span(&self) -> Span {
        self.span
    }
}

/// `AND` / `OR` joining a term to the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

/// Token standing in front of a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TermPrefix {
    OpenParen,
    Not,
}

/// One condition of a chain plus the punctuation around it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereTerm {
    /// `None` on the first term
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operator: Option<LogicalOperator>,
    /// `(` and `NOT` tokens in source order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub prefix: Vec<TermPrefix>,
    pub condition: Condition,
    /// `)` tokens directly after the condition
    #[serde(skip_serializing_if = "is_zero", default)]
    pub close_paren: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl WhereTerm {
    pub fn new(condition: Condition) -> Self {
        Self {
            operator: None,
            prefix: Vec::new(),
            condition,
            close_paren: 0,
        }
    }

    pub fn open_paren(&self) -> u32 {
        self.prefix
            .iter()
            .filter(|p| matches!(p, TermPrefix::OpenParen))
            .count() as u32
    }

    /// An odd number of `NOT`s in front of the condition
    pub fn is_negated(&self) -> bool {
        self.prefix
            .iter()
            .filter(|p| matches!(p, TermPrefix::Not))
            .count()
            % 2
            == 1
    }
}

/// Left-hand side of a condition, or a GROUP BY / ORDER BY target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldOrFunction {
    Field { field: String, span: Span },
    Function(FunctionExpression),
}

impl FieldOrFunction {
    pub fn name(&self) -> &str {
        match self {
            FieldOrFunction::Field { field, .. } => field,
            FieldOrFunction::Function(f) => &f.raw_value,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionExpression> {
        match self {
            FieldOrFunction::Function(f) => Some(f),
            FieldOrFunction::Field { .. } => None,
        }
    }
}

impl Spanned for FieldOrFunction {
    fn span(&self) -> Span {
        match self {
            FieldOrFunction::Field { span, .. } => *span,
            FieldOrFunction::Function(f) => f.span,
        }
    }
}

/// Comparison operator of a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
    #[serde(rename = "INCLUDES")]
    Includes,
    #[serde(rename = "EXCLUDES")]
    Excludes,
}

impl Operator {
    /// Parse an operator image. Keywords match case-insensitively and
    /// `NOT IN` tolerates any whitespace between its words.
    pub fn parse(image: &str) -> Option<Operator> {
        let op = match image {
            "=" => Operator::Eq,
            "!=" | "<>" => Operator::NotEq,
            "<" => Operator::Lt,
            "<=" => Operator::Le,
            ">" => Operator::Gt,
            ">=" => Operator::Ge,
            _ => {
                let upper: Vec<String> = image
                    .split_whitespace()
                    .map(str::to_ascii_uppercase)
                    .collect();
                let words: Vec<&str> = upper.iter().map(String::as_str).collect();
                match words.as_slice() {
                    ["LIKE"] => Operator::Like,
                    ["IN"] => Operator::In,
                    ["NOT", "IN"] => Operator::NotIn,
                    ["INCLUDES"] => Operator::Includes,
                    ["EXCLUDES"] => Operator::Excludes,
                    _ => return None,
                }
            }
        };
        Some(op)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Includes => "INCLUDES",
            Operator::Excludes => "EXCLUDES",
        }
    }

    /// Operators whose right-hand side is a parenthesized list or subquery
    pub fn takes_set(&self) -> bool {
        matches!(
            self,
            Operator::In | Operator::NotIn | Operator::Includes | Operator::Excludes
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConditionValue {
    Literal(Literal),
    List { items: Vec<Literal>, span: Span },
    /// Semi-join / anti-join: `Id IN (SELECT AccountId FROM Contact)`
    Subquery { query: Box<Query>, span: Span },
}

impl Spanned for ConditionValue {
    fn span(&self) -> Span {
        match self {
            ConditionValue::Literal(lit) => lit.span,
            ConditionValue::List { span, .. } | ConditionValue::Subquery { span, .. } => *span,
        }
    }
}

/// Literal type of a condition value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralTypes {
    Single(LiteralType),
    PerElement(Vec<LiteralType>),
}

/// Date-literal `n` of a condition value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateLiteralVariable {
    Single(i32),
    PerElement(Vec<Option<i32>>),
}

/// A single comparison: `subject operator value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub subject: FieldOrFunction,
    pub operator: Operator,
    pub value: ConditionValue,
    pub span: Span,
}

impl Condition {
    /// Name of the field or function on the left-hand side
    pub fn field_name(&self) -> &str {
        self.subject.name()
    }

    /// Type of the value. A list reports one type when all of its elements
    /// agree, and one type per element otherwise.
    pub fn literal_type(&self) -> LiteralTypes {
        match &self.value {
            ConditionValue::Literal(lit) => LiteralTypes::Single(lit.literal_type),
            ConditionValue::List { items, .. } => match items.split_first() {
                Some((first, rest))
                    if rest.iter().all(|l| l.literal_type == first.literal_type) =>
                {
                    LiteralTypes::Single(first.literal_type)
                }
                _ => LiteralTypes::PerElement(items.iter().map(|l| l.literal_type).collect()),
            },
            ConditionValue::Subquery { .. } => LiteralTypes::Single(LiteralType::Subquery),
        }
    }

    /// `n` of any `NAME:n` date literal in the value. For lists this is
    /// reported per element, and only when at least one element has one.
    pub fn date_literal_variable(&self) -> Option<DateLiteralVariable> {
        match &self.value {
            ConditionValue::Literal(lit) => {
                lit.date_literal_variable.map(DateLiteralVariable::Single)
            }
            ConditionValue::List { items, .. } => {
                if items.iter().any(|l| l.date_literal_variable.is_some()) {
                    Some(DateLiteralVariable::PerElement(
                        items.iter().map(|l| l.date_literal_variable).collect(),
                    ))
                } else {
                    None
                }
            }
            ConditionValue::Subquery { .. } => None,
        }
    }
}

impl Spanned for Condition {
    fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_condition(name: &str, value: ConditionValue) -> Condition {
        Condition {
            subject: FieldOrFunction::Field {
                field: name.to_string(),
                span: Span::new(0, name.len()),
            },
            operator: Operator::Eq,
            value,
            span: Span::new(0, 20),
        }
    }

    fn lit(value: &str, ty: LiteralType) -> Literal {
        Literal::new(value, ty, Span::new(0, value.len()))
    }

    fn term(prefix: Vec<TermPrefix>, close_paren: u32) -> WhereTerm {
        let mut term = WhereTerm::new(field_condition(
            "Name",
            ConditionValue::Literal(lit("'x'", LiteralType::String)),
        ));
        term.prefix = prefix;
        term.close_paren = close_paren;
        term
    }

    #[test]
    fn test_validate_parens_balanced() {
        let clause = WhereClause::new(
            vec![
                term(vec![], 0),
                term(vec![TermPrefix::OpenParen, TermPrefix::Not], 0),
                term(vec![], 1),
            ],
            Span::new(0, 40),
        );
        assert!(clause.validate_parens().is_ok());
    }

    #[test]
    fn test_validate_parens_unclosed() {
        let clause = WhereClause::new(
            vec![term(vec![TermPrefix::OpenParen, TermPrefix::OpenParen], 1)],
            Span::new(0, 20),
        );
        assert_eq!(
            clause.validate_parens(),
            Err(ParenBalanceError::Unclosed { depth: 1 })
        );
    }

    #[test]
    fn test_validate_parens_close_before_open() {
        let clause = WhereClause::new(
            vec![term(vec![], 1), term(vec![TermPrefix::OpenParen], 0)],
            Span::new(0, 20),
        );
        assert_eq!(
            clause.validate_parens(),
            Err(ParenBalanceError::UnexpectedClose { term: 0 })
        );
    }

    #[test]
    fn test_is_negated_counts_nots() {
        assert!(term(vec![TermPrefix::Not], 0).is_negated());
        assert!(!term(vec![TermPrefix::Not, TermPrefix::Not], 0).is_negated());
        assert_eq!(
            term(vec![TermPrefix::OpenParen, TermPrefix::Not], 0).open_paren(),
            1
        );
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!(Operator::parse("<>"), Some(Operator::NotEq));
        assert_eq!(Operator::parse("like"), Some(Operator::Like));
        assert_eq!(Operator::parse("not   IN"), Some(Operator::NotIn));
        assert_eq!(Operator::parse("BETWEEN"), None);
        assert!(Operator::Includes.takes_set());
        assert!(!Operator::Like.takes_set());
    }

    #[test]
    fn test_list_literal_type_collapses_when_uniform() {
        let cond = field_condition(
            "Rating",
            ConditionValue::List {
                items: vec![
                    lit("'Hot'", LiteralType::String),
                    lit("'Warm'", LiteralType::String),
                ],
                span: Span::new(0, 15),
            },
        );
        assert_eq!(cond.literal_type(), LiteralTypes::Single(LiteralType::String));
        assert_eq!(cond.date_literal_variable(), None);
    }

    #[test]
    fn test_list_literal_type_per_element_when_mixed() {
        let cond = field_condition(
            "CreatedDate",
            ConditionValue::List {
                items: vec![
                    lit("TODAY", LiteralType::DateLiteral),
                    lit("LAST_N_DAYS:3", LiteralType::DateNLiteral).with_date_literal_variable(3),
                ],
                span: Span::new(0, 25),
            },
        );
        assert_eq!(
            cond.literal_type(),
            LiteralTypes::PerElement(vec![LiteralType::DateLiteral, LiteralType::DateNLiteral])
        );
        assert_eq!(
            cond.date_literal_variable(),
            Some(DateLiteralVariable::PerElement(vec![None, Some(3)]))
        );
    }

    #[test]
    fn test_single_date_n_literal_variable() {
        let cond = field_condition(
            "CreatedDate",
            ConditionValue::Literal(
                lit("NEXT_N_DAYS:7", LiteralType::DateNLiteral).with_date_literal_variable(7),
            ),
        );
        assert_eq!(
            cond.date_literal_variable(),
            Some(DateLiteralVariable::Single(7))
        );
    }

    #[test]
    fn test_subquery_value_type() {
        let cond = field_condition(
            "Id",
            ConditionValue::Subquery {
                query: Box::default(),
                span: Span::new(6, 40),
            },
        );
        assert_eq!(
            cond.literal_type(),
            LiteralTypes::Single(LiteralType::Subquery)
        );
        assert_eq!(cond.value.span(), Span::new(6, 40));
    }
}
