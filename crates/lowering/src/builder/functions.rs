// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Function calls, and the field-or-function targets of conditions,
//! GROUP BY and ORDER BY

use soql_grammar::{field, kind};
use soql_lsp_ir::{FieldOrFunction, FunctionExpression, FunctionParameter, Span};

use super::SoqlLowering;
use super::base::LoweringBase;
use crate::{CstNode, LoweringContext, LoweringError, LoweringResult};

/// Aggregate functions
pub const AGGREGATE_FUNCTIONS: &[&str] = &[
    "AVG",
    "COUNT",
    "COUNT_DISTINCT",
    "MIN",
    "MAX",
    "SUM",
    "GROUPING",
];

/// Date functions, usable wherever aggregates are
pub const DATE_FUNCTIONS: &[&str] = &[
    "CALENDAR_MONTH",
    "CALENDAR_QUARTER",
    "CALENDAR_YEAR",
    "DAY_IN_MONTH",
    "DAY_IN_WEEK",
    "DAY_IN_YEAR",
    "DAY_ONLY",
    "FISCAL_MONTH",
    "FISCAL_QUARTER",
    "FISCAL_YEAR",
    "HOUR_IN_DAY",
    "WEEK_IN_MONTH",
    "WEEK_IN_YEAR",
];

/// Whether `name` is an aggregate or date function
pub fn is_aggregate_function(name: &str) -> bool {
    AGGREGATE_FUNCTIONS
        .iter()
        .chain(DATE_FUNCTIONS)
        .any(|f| f.eq_ignore_ascii_case(name))
}

impl SoqlLowering {
    /// Lower a `function_call` node.
    ///
    /// `aggregate_context` is set at call sites where aggregates are allowed
    /// (SELECT list, WHERE and HAVING subjects, GROUP BY); only there does an
    /// aggregate or date function get `is_aggregate_fn`.
    pub(crate) fn lower_function<N: CstNode>(
        &self,
        ctx: &mut LoweringContext,
        node: &N,
        aggregate_context: bool,
    ) -> LoweringResult<FunctionExpression> {
        self.expect_kind(node, kind::FUNCTION_CALL)?;
        let name = self.child_text(node, field::NAME)?;

        let mut parameters = Vec::new();
        for argument in node.children(field::ARGUMENT) {
            let parameter = if argument.kind() == kind::FUNCTION_CALL {
                FunctionParameter::Function(self.lower_function(ctx, argument, aggregate_context)?)
            } else {
                FunctionParameter::Value(self.node_text(argument)?.to_string())
            };
            parameters.push(parameter);
        }

        let raw_value = format!(
            "{}({})",
            name,
            parameters
                .iter()
                .map(FunctionParameter::raw_value)
                .collect::<Vec<_>>()
                .join(", ")
        );
        let alias = self
            .optional_child(node, field::ALIAS)
            .map(|alias| self.node_text(alias))
            .transpose()?
            .map(str::to_string);

        Ok(FunctionExpression {
            function_name: name.to_string(),
            parameters,
            is_aggregate_fn: aggregate_context && is_aggregate_function(name),
            raw_value,
            alias,
            span: node.span(),
        })
    }

    /// Lower an identifier or function call used as a condition subject or a
    /// grouping/ordering target
    pub(crate) fn lower_field_or_function<N: CstNode>(
        &self,
        ctx: &mut LoweringContext,
        node: &N,
        aggregate_context: bool,
    ) -> LoweringResult<FieldOrFunction> {
        match node.kind() {
            kind::FUNCTION_CALL => Ok(FieldOrFunction::Function(self.lower_function(
                ctx,
                node,
                aggregate_context,
            )?)),
            kind::IDENTIFIER => Ok(FieldOrFunction::Field {
                field: self.node_text(node)?.to_string(),
                span: Span::new(node.start_byte(), node.end_byte()),
            }),
            other => Err(LoweringError::UnexpectedNodeType {
                expected: "field or function".to_string(),
                found: other.to_string(),
            }),
        }
    }
}
