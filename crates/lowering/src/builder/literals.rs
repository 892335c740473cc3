// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Literal typing

use soql_grammar::{field, kind};
use soql_lsp_ir::literal::is_date_literal;
use soql_lsp_ir::{Literal, LiteralType};

use super::SoqlLowering;
use super::base::LoweringBase;
use crate::{CstNode, LoweringError, LoweringResult};

/// Literal type of each literal leaf kind
const LITERAL_KINDS: &[(&str, LiteralType)] = &[
    (kind::STRING_LITERAL, LiteralType::String),
    (kind::INTEGER_LITERAL, LiteralType::Integer),
    (kind::DECIMAL_LITERAL, LiteralType::Decimal),
    (kind::DATE_LITERAL, LiteralType::Date),
    (kind::DATETIME_LITERAL, LiteralType::DateTime),
    (
        kind::CURRENCY_INTEGER_LITERAL,
        LiteralType::IntegerWithCurrencyPrefix,
    ),
    (
        kind::CURRENCY_DECIMAL_LITERAL,
        LiteralType::DecimalWithCurrencyPrefix,
    ),
];

fn literal_type_of_kind(node_kind: &str) -> Option<LiteralType> {
    LITERAL_KINDS
        .iter()
        .find(|(k, _)| *k == node_kind)
        .map(|(_, ty)| *ty)
}

/// Type of a bare identifier in value position
pub(crate) fn identifier_literal_type(image: &str) -> LiteralType {
    if image.eq_ignore_ascii_case("TRUE") || image.eq_ignore_ascii_case("FALSE") {
        LiteralType::Boolean
    } else if image.eq_ignore_ascii_case("NULL") {
        LiteralType::Null
    } else if is_date_literal(image) {
        LiteralType::DateLiteral
    } else {
        LiteralType::String
    }
}

impl SoqlLowering {
    /// Lower a value node: a literal leaf, identifier, `NAME:n` date literal
    /// or `:name` bind variable
    pub(crate) fn lower_literal<N: CstNode>(&self, node: &N) -> LoweringResult<Literal> {
        let span = node.span();
        match node.kind() {
            kind::IDENTIFIER => {
                let image = self.node_text(node)?;
                Ok(Literal::new(image, identifier_literal_type(image), span))
            }
            kind::DATE_N_LITERAL => {
                let name = self.child_text(node, field::NAME)?;
                let variable = self.child_text(node, field::VARIABLE)?;
                let n: i32 = variable.parse().map_err(|_| LoweringError::InvalidLiteral {
                    value: variable.to_string(),
                    type_name: "date literal variable".to_string(),
                })?;
                let image = node
                    .text()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{name}:{n}"));
                Ok(Literal::new(image, LiteralType::DateNLiteral, span)
                    .with_date_literal_variable(n))
            }
            kind::BIND_VARIABLE => {
                let name = self.child_text(node, field::NAME)?;
                Ok(Literal::new(
                    format!(":{name}"),
                    LiteralType::ApexBindVariable,
                    span,
                ))
            }
            other => match literal_type_of_kind(other) {
                Some(literal_type) => Ok(Literal::new(self.node_text(node)?, literal_type, span)),
                None => Err(LoweringError::UnexpectedNodeType {
                    expected: "literal".to_string(),
                    found: other.to_string(),
                }),
            },
        }
    }
}
