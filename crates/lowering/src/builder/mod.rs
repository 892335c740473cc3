// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SOQL CST → AST builder
//!
//! [`SoqlLowering`] walks a `select_statement` tree clause by clause. Every
//! AST node takes its span from the CST node it was built from, so spans
//! always slice back to the original text.
//!
//! Malformed trees are handled per [`LoweringContext`]: in strict mode the
//! first structural error aborts the build, in best-effort mode the item
//! that owns it (a field, a clause, a grouping/ordering target) is dropped.

mod base;
mod clauses;
mod conditions;
mod fields;
mod functions;
mod literals;

pub use base::LoweringBase;
pub use functions::{AGGREGATE_FUNCTIONS, DATE_FUNCTIONS, is_aggregate_function};

use soql_grammar::{field, kind};
use soql_lsp_ir::{Field, Query, Span};

use crate::{CstNode, Lowering, LoweringContext, LoweringResult};

/// Node kinds the builder knows how to lower
const SUPPORTED_KINDS: &[&str] = &[
    kind::SELECT_STATEMENT,
    kind::FIELD_REF,
    kind::FUNCTION_CALL,
    kind::SUBQUERY,
    kind::TYPEOF_EXPRESSION,
];

/// Builder from the SOQL grammar's CST to [`Query`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SoqlLowering;

impl SoqlLowering {
    pub fn new() -> Self {
        Self
    }

    fn lower_select_statement<N: CstNode>(
        &self,
        ctx: &mut LoweringContext,
        node: &N,
    ) -> LoweringResult<Query> {
        self.expect_kind(node, kind::SELECT_STATEMENT)?;
        let mut query = Query::default().with_span(node.span());

        let fields = self.lower_select_list(ctx, node);
        if let Some(fields) = ctx.recover(fields)? {
            query.fields = fields;
        }

        let from = self.lower_from_clause(node);
        if let Some(from) = ctx.recover(from)? {
            query.s_object = from.s_object;
            query.s_object_prefix = from.prefix;
            query.s_object_alias = from.alias;
            query.s_object_span = Some(from.span);
        }

        if let Some(clause) = self.optional_child(node, field::USING_SCOPE_CLAUSE) {
            let scope = self.lower_using_scope(clause);
            query.using_scope = ctx.recover(scope)?;
        }

        if let Some(clause) = self.optional_child(node, field::WHERE_CLAUSE) {
            let where_clause = self.lower_condition_clause(ctx, clause, "WHERE");
            query.where_clause = ctx.recover(where_clause)?;
        }

        if let Some(clause) = self.optional_child(node, field::WITH_CLAUSE) {
            let with_clause = self.lower_with_clause(clause);
            query.with_clause = ctx.recover(with_clause)?;
        }

        if let Some(clause) = self.optional_child(node, field::GROUP_BY_CLAUSE) {
            query.group_by = self.lower_group_by(ctx, clause)?;
        }

        if let Some(clause) = self.optional_child(node, field::HAVING_CLAUSE) {
            let having = self.lower_condition_clause(ctx, clause, "HAVING");
            query.having = ctx.recover(having)?;
        }

        if let Some(clause) = self.optional_child(node, field::ORDER_BY_CLAUSE) {
            query.order_by = self.lower_order_by(ctx, clause)?;
        }

        if let Some(clause) = self.optional_child(node, field::LIMIT_CLAUSE) {
            let limit = self.lower_integer_clause(clause, "LIMIT");
            query.limit = ctx.recover(limit)?;
        }

        if let Some(clause) = self.optional_child(node, field::OFFSET_CLAUSE) {
            let offset = self.lower_integer_clause(clause, "OFFSET");
            query.offset = ctx.recover(offset)?;
        }

        if let Some(clause) = self.optional_child(node, field::FOR_CLAUSE) {
            let for_clause = self.lower_for_clause(clause);
            query.for_clause = ctx.recover(for_clause)?;
        }

        if let Some(clause) = self.optional_child(node, field::UPDATE_CLAUSE) {
            let update_clause = self.lower_update_clause(clause);
            query.update_clause = ctx.recover(update_clause)?;
        }

        tracing::trace!(
            s_object = %query.s_object,
            fields = query.fields.len(),
            depth = ctx.depth(),
            "lowered select statement"
        );
        Ok(query)
    }

    /// Lower a parenthesized `subquery` node. The returned span covers the
    /// parentheses.
    pub(crate) fn lower_nested_query<N: CstNode>(
        &self,
        ctx: &mut LoweringContext,
        node: &N,
    ) -> LoweringResult<(Query, Span)> {
        self.expect_kind(node, kind::SUBQUERY)?;
        let lparen = self.require_child(node, field::LPAREN)?;
        let rparen = self.require_child(node, field::RPAREN)?;
        let statement = self.require_child(node, field::QUERY)?;

        ctx.enter_recursive_context()?;
        let query = self.lower_select_statement(ctx, statement);
        ctx.exit_recursive_context();

        Ok((query?, Span::new(lparen.start_byte(), rparen.end_byte())))
    }
}

impl<N> LoweringBase<N> for SoqlLowering where N: CstNode {}

impl<N> Lowering<N> for SoqlLowering
where
    N: CstNode,
{
    fn lower_query(&self, ctx: &mut LoweringContext, node: &N) -> LoweringResult<Query> {
        self.lower_select_statement(ctx, node)
    }

    fn lower_field(&self, ctx: &mut LoweringContext, node: &N) -> LoweringResult<Field> {
        self.lower_select_item(ctx, node)
    }

    fn supports_node(&self, node: &N) -> bool {
        SUPPORTED_KINDS.contains(&node.kind())
    }
}
