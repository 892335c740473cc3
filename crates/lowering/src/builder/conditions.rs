// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! WHERE and HAVING
//!
//! The condition expression tree is flattened left to right into
//! [`WhereTerm`]s. Pending `AND`/`OR` operators and `(`/`NOT` prefixes are
//! carried onto the next condition, and each `)` is counted on the last term
//! emitted before it.

use soql_grammar::{field, kind};
use soql_lsp_ir::{
    Condition, ConditionValue, LogicalOperator, Operator, Span, TermPrefix, WhereClause, WhereTerm,
};

use super::SoqlLowering;
use super::base::LoweringBase;
use crate::{CstNode, LoweringContext, LoweringError, LoweringResult};

#[derive(Debug, Default)]
struct TermChain {
    terms: Vec<WhereTerm>,
    operator: Option<LogicalOperator>,
    prefix: Vec<TermPrefix>,
}

impl TermChain {
    fn push(&mut self, condition: Condition) {
        self.terms.push(WhereTerm {
            operator: self.operator.take(),
            prefix: std::mem::take(&mut self.prefix),
            condition,
            close_paren: 0,
        });
    }

    fn close_paren(&mut self) -> bool {
        match self.terms.last_mut() {
            Some(term) => {
                term.close_paren += 1;
                true
            }
            None => false,
        }
    }
}

fn logical_operator(image: &str) -> Option<LogicalOperator> {
    if image.eq_ignore_ascii_case("AND") {
        Some(LogicalOperator::And)
    } else if image.eq_ignore_ascii_case("OR") {
        Some(LogicalOperator::Or)
    } else {
        None
    }
}

impl SoqlLowering {
    /// Lower a `where_clause` or `having_clause` node. `clause` names the
    /// clause in errors.
    pub(crate) fn lower_condition_clause<N: CstNode>(
        &self,
        ctx: &mut LoweringContext,
        node: &N,
        clause: &str,
    ) -> LoweringResult<WhereClause> {
        let expression = self.require_child(node, field::CONDITION)?;
        let mut chain = TermChain::default();
        self.flatten_expression(ctx, expression, &mut chain)?;

        let where_clause = WhereClause::new(chain.terms, node.span());
        where_clause
            .validate_parens()
            .map_err(|err| LoweringError::unbalanced(clause, err))?;
        tracing::trace!(clause, terms = where_clause.terms.len(), "lowered condition clause");
        Ok(where_clause)
    }

    fn flatten_expression<N: CstNode>(
        &self,
        ctx: &mut LoweringContext,
        node: &N,
        chain: &mut TermChain,
    ) -> LoweringResult<()> {
        match node.kind() {
            kind::CONDITION => {
                let condition = self.lower_condition(ctx, node)?;
                chain.push(condition);
            }
            kind::BOOLEAN_EXPRESSION => {
                let operands = node.children(field::OPERAND);
                let operators = node.children(field::OPERATOR);
                let Some((first, rest)) = operands.split_first() else {
                    return Err(LoweringError::missing(node.kind(), field::OPERAND));
                };
                if operators.len() != rest.len() {
                    return Err(LoweringError::missing(node.kind(), field::OPERATOR));
                }
                self.flatten_expression(ctx, *first, chain)?;
                for (operator, operand) in operators.iter().zip(rest) {
                    let image = self.node_text(*operator)?;
                    let op = logical_operator(image).ok_or_else(|| {
                        LoweringError::UnexpectedNodeType {
                            expected: "AND or OR".to_string(),
                            found: image.to_string(),
                        }
                    })?;
                    chain.operator = Some(op);
                    self.flatten_expression(ctx, *operand, chain)?;
                }
            }
            kind::NEGATED_EXPRESSION => {
                let operand = self.require_child(node, field::OPERAND)?;
                chain.prefix.push(TermPrefix::Not);
                self.flatten_expression(ctx, operand, chain)?;
            }
            kind::PARENTHESIZED_EXPRESSION => {
                let inner = self.require_child(node, field::EXPRESSION)?;
                chain.prefix.push(TermPrefix::OpenParen);
                self.flatten_expression(ctx, inner, chain)?;
                if !chain.close_paren() {
                    return Err(LoweringError::missing(node.kind(), kind::CONDITION));
                }
            }
            other => {
                return Err(LoweringError::UnexpectedNodeType {
                    expected: "condition expression".to_string(),
                    found: other.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Lower a single `condition` node
    pub(crate) fn lower_condition<N: CstNode>(
        &self,
        ctx: &mut LoweringContext,
        node: &N,
    ) -> LoweringResult<Condition> {
        let subject = self.require_child(node, field::SUBJECT)?;
        let subject = self.lower_field_or_function(ctx, subject, true)?;

        let operator_node = self.require_child(node, field::OPERATOR)?;
        let image = self.node_text(operator_node)?;
        let operator = Operator::parse(image).ok_or_else(|| LoweringError::InvalidLiteral {
            value: image.to_string(),
            type_name: "comparison operator".to_string(),
        })?;

        let value_node = self.require_child(node, field::VALUE)?;
        let value = match value_node.kind() {
            kind::SUBQUERY => {
                let (query, span) = self.lower_nested_query(ctx, value_node)?;
                ConditionValue::Subquery {
                    query: Box::new(query),
                    span,
                }
            }
            kind::VALUE_LIST => {
                let mut items = Vec::new();
                for item in value_node.children(field::ITEM) {
                    items.push(self.lower_literal(item)?);
                }
                if items.is_empty() {
                    return Err(LoweringError::missing(value_node.kind(), field::ITEM));
                }
                ConditionValue::List {
                    items,
                    span: value_node.span(),
                }
            }
            _ => ConditionValue::Literal(self.lower_literal(value_node)?),
        };

        let span = Span::new(node.start_byte(), node.end_byte());
        Ok(Condition {
            subject,
            operator,
            value,
            span,
        })
    }
}
