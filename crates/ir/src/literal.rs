// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Literals
//!
//! Values on the right-hand side of a WHERE/HAVING condition.
//!
//! A [`Literal`] keeps the exact source image (quotes included for strings)
//! and the [`LiteralType`] the builder assigned to it. Date literals come in
//! two shapes:
//!
//! - Fixed ranges such as `TODAY` or `LAST_FISCAL_YEAR` ([`DATE_LITERALS`])
//! - Parameterized ranges such as `LAST_N_DAYS:30` ([`DATE_N_LITERALS`]),
//!   which also carry the `n` as [`Literal::date_literal_variable`]

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::span::{Span, Spanned};

/// Fixed relative date ranges
pub const DATE_LITERALS: &[&str] = &[
    "YESTERDAY",
    "TODAY",
    "TOMORROW",
    "LAST_WEEK",
    "THIS_WEEK",
    "NEXT_WEEK",
    "LAST_MONTH",
    "THIS_MONTH",
    "NEXT_MONTH",
    "LAST_90_DAYS",
    "NEXT_90_DAYS",
    "THIS_QUARTER",
    "LAST_QUARTER",
    "NEXT_QUARTER",
    "THIS_YEAR",
    "LAST_YEAR",
    "NEXT_YEAR",
    "THIS_FISCAL_QUARTER",
    "LAST_FISCAL_QUARTER",
    "NEXT_FISCAL_QUARTER",
    "THIS_FISCAL_YEAR",
    "LAST_FISCAL_YEAR",
    "NEXT_FISCAL_YEAR",
];

/// Relative date ranges taking an integer parameter (`NAME:n`)
pub const DATE_N_LITERALS: &[&str] = &[
    "NEXT_N_DAYS",
    "LAST_N_DAYS",
    "N_DAYS_AGO",
    "NEXT_N_WEEKS",
    "LAST_N_WEEKS",
    "N_WEEKS_AGO",
    "NEXT_N_MONTHS",
    "LAST_N_MONTHS",
    "N_MONTHS_AGO",
    "NEXT_N_QUARTERS",
    "LAST_N_QUARTERS",
    "N_QUARTERS_AGO",
    "NEXT_N_YEARS",
    "LAST_N_YEARS",
    "N_YEARS_AGO",
    "NEXT_N_FISCAL_QUARTERS",
    "LAST_N_FISCAL_QUARTERS",
    "N_FISCAL_QUARTERS_AGO",
    "NEXT_N_FISCAL_YEARS",
    "LAST_N_FISCAL_YEARS",
    "N_FISCAL_YEARS_AGO",
];

/// Case-insensitive membership in [`DATE_LITERALS`]
pub fn is_date_literal(name: &str) -> bool {
    DATE_LITERALS.iter().any(|lit| lit.eq_ignore_ascii_case(name))
}

/// Case-insensitive membership in [`DATE_N_LITERALS`]
pub fn is_date_n_literal(name: &str) -> bool {
    DATE_N_LITERALS
        .iter()
        .any(|lit| lit.eq_ignore_ascii_case(name))
}

/// Type tag attached to every literal value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiteralType {
    String,
    Integer,
    Decimal,
    IntegerWithCurrencyPrefix,
    DecimalWithCurrencyPrefix,
    Boolean,
    Null,
    #[serde(rename = "DATETIME")]
    DateTime,
    Date,
    DateLiteral,
    DateNLiteral,
    ApexBindVariable,
    Subquery,
}

impl LiteralType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiteralType::String => "STRING",
            LiteralType::Integer => "INTEGER",
            LiteralType::Decimal => "DECIMAL",
            LiteralType::IntegerWithCurrencyPrefix => "INTEGER_WITH_CURRENCY_PREFIX",
            LiteralType::DecimalWithCurrencyPrefix => "DECIMAL_WITH_CURRENCY_PREFIX",
            LiteralType::Boolean => "BOOLEAN",
            LiteralType::Null => "NULL",
            LiteralType::DateTime => "DATETIME",
            LiteralType::Date => "DATE",
            LiteralType::DateLiteral => "DATE_LITERAL",
            LiteralType::DateNLiteral => "DATE_N_LITERAL",
            LiteralType::ApexBindVariable => "APEX_BIND_VARIABLE",
            LiteralType::Subquery => "SUBQUERY",
        }
    }

    /// Whether values of this type are numbers
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            LiteralType::Integer
                | LiteralType::Decimal
                | LiteralType::IntegerWithCurrencyPrefix
                | LiteralType::DecimalWithCurrencyPrefix
        )
    }

    /// Whether values of this type denote a date or a date range
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            LiteralType::Date
                | LiteralType::DateTime
                | LiteralType::DateLiteral
                | LiteralType::DateNLiteral
        )
    }
}

impl fmt::Display for LiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single literal value with its source image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Literal {
    /// Source image, e.g. `'Acme'`, `42`, `LAST_N_DAYS:3`, `:accountId`
    pub value: String,
    pub literal_type: LiteralType,
    /// The `n` of a `NAME:n` date literal
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_literal_variable: Option<i32>,
    pub span: Span,
}

impl Literal {
    pub fn new(value: impl Into<String>, literal_type: LiteralType, span: Span) -> Self {
        Self {
            value: value.into(),
            literal_type,
            date_literal_variable: None,
            span,
        }
    }

    pub fn with_date_literal_variable(mut self, n: i32) -> Self {
        self.date_literal_variable = Some(n);
        self
    }

    /// String contents without the surrounding quotes, for string literals
    pub fn unquoted(&self) -> Option<&str> {
        if self.literal_type != LiteralType::String {
            return None;
        }
        self.value
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
    }
}

impl Spanned for Literal {
    fn span(&self) -> Span {
        self.span
    }
}
