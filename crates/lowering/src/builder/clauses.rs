// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! FROM and the clauses that follow WHERE

use soql_grammar::{field, kind};
use soql_lsp_ir::{
    DataCategoryCondition, DataCategorySelector, ForClause, GroupByClause, NullsOrder,
    OrderByClause, SortOrder, Span, UpdateClause, WithClause,
};

use super::SoqlLowering;
use super::base::LoweringBase;
use crate::{CstNode, LoweringContext, LoweringError, LoweringResult};

/// Lowered FROM clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FromTarget {
    pub s_object: String,
    pub prefix: Vec<String>,
    pub alias: Option<String>,
    /// Object name through the alias
    pub span: Span,
}

fn invalid(value: &str, type_name: &str) -> LoweringError {
    LoweringError::InvalidLiteral {
        value: value.to_string(),
        type_name: type_name.to_string(),
    }
}

impl SoqlLowering {
    /// Lower the statement's `from_clause`
    pub(crate) fn lower_from_clause<N: CstNode>(&self, statement: &N) -> LoweringResult<FromTarget> {
        let clause = self.require_child(statement, field::FROM_CLAUSE)?;
        let object = self.require_child(clause, field::OBJECT)?;
        let name = self.node_text(object)?;
        let alias_node = self.optional_child(clause, field::ALIAS);
        let alias = alias_node
            .map(|alias| self.node_text(alias))
            .transpose()?
            .map(str::to_string);

        let mut segments: Vec<String> = name.split('.').map(str::to_string).collect();
        let s_object = segments.pop().unwrap_or_default();
        if s_object.is_empty() || segments.iter().any(String::is_empty) {
            return Err(invalid(name, "object name"));
        }

        let end = alias_node.map_or(object.end_byte(), |alias| alias.end_byte());
        Ok(FromTarget {
            s_object,
            prefix: segments,
            alias,
            span: Span::new(object.start_byte(), end),
        })
    }

    pub(crate) fn lower_using_scope<N: CstNode>(&self, node: &N) -> LoweringResult<String> {
        Ok(self.child_text(node, field::SCOPE)?.to_string())
    }

    pub(crate) fn lower_with_clause<N: CstNode>(&self, node: &N) -> LoweringResult<WithClause> {
        let filter = self.require_child(node, field::FILTER)?;
        if filter.kind() == kind::DATA_CATEGORY_FILTER {
            let conditions = filter
                .children(field::CONDITION)
                .into_iter()
                .map(|c| self.lower_data_category_condition(c))
                .collect::<LoweringResult<Vec<_>>>()?;
            if conditions.is_empty() {
                return Err(LoweringError::missing(filter.kind(), field::CONDITION));
            }
            return Ok(WithClause::DataCategory { conditions });
        }

        let image = self.node_text(filter)?;
        match image.to_ascii_uppercase().as_str() {
            "SECURITY_ENFORCED" => Ok(WithClause::SecurityEnforced),
            "USER_MODE" => Ok(WithClause::UserMode),
            "SYSTEM_MODE" => Ok(WithClause::SystemMode),
            _ => Err(invalid(image, "WITH filter")),
        }
    }

    fn lower_data_category_condition<N: CstNode>(
        &self,
        node: &N,
    ) -> LoweringResult<DataCategoryCondition> {
        let group_name = self.child_text(node, field::GROUP)?.to_string();
        let selector_image = self.child_text(node, field::SELECTOR)?;
        let selector = DataCategorySelector::parse(selector_image)
            .ok_or_else(|| invalid(selector_image, "data category selector"))?;
        let parameters = node
            .children(field::VALUE)
            .into_iter()
            .map(|v| self.node_text(v).map(str::to_string))
            .collect::<LoweringResult<Vec<_>>>()?;
        if parameters.is_empty() {
            return Err(LoweringError::missing(node.kind(), field::VALUE));
        }
        Ok(DataCategoryCondition {
            group_name,
            selector,
            parameters,
        })
    }

    pub(crate) fn lower_group_by<N: CstNode>(
        &self,
        ctx: &mut LoweringContext,
        node: &N,
    ) -> LoweringResult<Vec<GroupByClause>> {
        let items = node.children(field::ITEM);
        self.lower_children(ctx, &items, |ctx, item| {
            let target = self.lower_field_or_function(ctx, item, true)?;
            Ok(GroupByClause { target })
        })
    }

    pub(crate) fn lower_order_by<N: CstNode>(
        &self,
        ctx: &mut LoweringContext,
        node: &N,
    ) -> LoweringResult<Vec<OrderByClause>> {
        let items = node.children(field::ITEM);
        self.lower_children(ctx, &items, |ctx, item| self.lower_order_by_item(ctx, item))
    }

    fn lower_order_by_item<N: CstNode>(
        &self,
        ctx: &mut LoweringContext,
        node: &N,
    ) -> LoweringResult<OrderByClause> {
        let expression = self.require_child(node, field::EXPRESSION)?;
        let target = self.lower_field_or_function(ctx, expression, false)?;

        let order = match self.optional_child(node, field::DIRECTION) {
            Some(direction) => {
                let image = self.node_text(direction)?;
                match image.to_ascii_uppercase().as_str() {
                    "ASC" => Some(SortOrder::Asc),
                    "DESC" => Some(SortOrder::Desc),
                    _ => return Err(invalid(image, "sort direction")),
                }
            }
            None => None,
        };
        let nulls = match self.optional_child(node, field::NULLS) {
            Some(nulls) => {
                let image = self.node_text(nulls)?;
                match image.to_ascii_uppercase().as_str() {
                    "FIRST" => Some(NullsOrder::First),
                    "LAST" => Some(NullsOrder::Last),
                    _ => return Err(invalid(image, "NULLS ordering")),
                }
            }
            None => None,
        };

        Ok(OrderByClause {
            target,
            order,
            nulls,
            span: node.span(),
        })
    }

    /// LIMIT / OFFSET value
    pub(crate) fn lower_integer_clause<N: CstNode>(
        &self,
        node: &N,
        clause: &str,
    ) -> LoweringResult<u64> {
        let image = self.child_text(node, field::VALUE)?;
        image.parse().map_err(|_| invalid(image, clause))
    }

    pub(crate) fn lower_for_clause<N: CstNode>(&self, node: &N) -> LoweringResult<ForClause> {
        let image = self.child_text(node, field::MODE)?;
        match image.to_ascii_uppercase().as_str() {
            "VIEW" => Ok(ForClause::View),
            "REFERENCE" => Ok(ForClause::Reference),
            "UPDATE" => Ok(ForClause::Update),
            _ => Err(invalid(image, "FOR mode")),
        }
    }

    pub(crate) fn lower_update_clause<N: CstNode>(
        &self,
        node: &N,
    ) -> LoweringResult<UpdateClause> {
        let image = self.child_text(node, field::MODE)?;
        match image.to_ascii_uppercase().as_str() {
            "TRACKING" => Ok(UpdateClause::Tracking),
            "VIEWSTAT" => Ok(UpdateClause::Viewstat),
            _ => Err(invalid(image, "UPDATE mode")),
        }
    }
}
