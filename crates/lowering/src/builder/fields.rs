// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SELECT list items

use soql_grammar::{field, kind};
use soql_lsp_ir::{
    Field, FieldRelationship, FieldSubquery, FieldTypeof, SimpleField, Span, Subquery,
    TypeofCondition,
};

use super::SoqlLowering;
use super::base::LoweringBase;
use crate::{CstNode, LoweringContext, LoweringError, LoweringResult};

impl SoqlLowering {
    /// Lower the statement's `select_list`
    pub(crate) fn lower_select_list<N: CstNode>(
        &self,
        ctx: &mut LoweringContext,
        statement: &N,
    ) -> LoweringResult<Vec<Field>> {
        let list = self.require_child(statement, field::SELECT_LIST)?;
        let items = list.children(field::ITEM);
        self.lower_children(ctx, &items, |ctx, item| self.lower_select_item(ctx, item))
    }

    pub(crate) fn lower_select_item<N: CstNode>(
        &self,
        ctx: &mut LoweringContext,
        node: &N,
    ) -> LoweringResult<Field> {
        match node.kind() {
            kind::FIELD_REF => self.lower_field_ref(node),
            kind::FUNCTION_CALL => Ok(Field::Function(self.lower_function(ctx, node, true)?)),
            kind::SUBQUERY => {
                let (query, span) = self.lower_nested_query(ctx, node)?;
                Ok(Field::Subquery(FieldSubquery {
                    subquery: Subquery::new(query),
                    span,
                }))
            }
            kind::TYPEOF_EXPRESSION => self.lower_typeof(node),
            other => Err(LoweringError::UnexpectedNodeType {
                expected: "field".to_string(),
                found: other.to_string(),
            }),
        }
    }

    /// Plain or dotted field reference; the span runs through the alias
    fn lower_field_ref<N: CstNode>(&self, node: &N) -> LoweringResult<Field> {
        let name_node = self.require_child(node, field::NAME)?;
        let name = self.node_text(name_node)?;
        let alias_node = self.optional_child(node, field::ALIAS);
        let alias = alias_node
            .map(|alias| self.node_text(alias))
            .transpose()?
            .map(str::to_string);
        let end = alias_node.map_or(name_node.end_byte(), |alias| alias.end_byte());
        let span = Span::new(name_node.start_byte(), end);

        let segments: Vec<&str> = name.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(LoweringError::InvalidLiteral {
                value: name.to_string(),
                type_name: "field name".to_string(),
            });
        }

        match segments.split_last() {
            Some((last, relationships)) if !relationships.is_empty() => {
                Ok(Field::Relationship(FieldRelationship {
                    field: last.to_string(),
                    relationships: relationships.iter().map(|s| s.to_string()).collect(),
                    raw_value: name.to_string(),
                    alias,
                    span,
                }))
            }
            _ => Ok(Field::Simple(SimpleField {
                field: name.to_string(),
                alias,
                span,
            })),
        }
    }

    /// `TYPEOF field WHEN type THEN fields ... [ELSE fields] END`
    fn lower_typeof<N: CstNode>(&self, node: &N) -> LoweringResult<Field> {
        let polymorphic = self.child_text(node, field::FIELD)?;

        let mut conditions = Vec::new();
        for branch in node.children(field::BRANCH) {
            let field_list = branch
                .children(field::FIELD)
                .into_iter()
                .map(|f| self.node_text(f).map(str::to_string))
                .collect::<LoweringResult<Vec<_>>>()?;
            if field_list.is_empty() {
                return Err(LoweringError::missing(branch.kind(), field::FIELD));
            }
            let condition = match branch.kind() {
                kind::WHEN_BRANCH => TypeofCondition::When {
                    object_type: self.child_text(branch, field::OBJECT_TYPE)?.to_string(),
                    field_list,
                },
                kind::ELSE_BRANCH => TypeofCondition::Else { field_list },
                other => {
                    return Err(LoweringError::UnexpectedNodeType {
                        expected: "WHEN or ELSE branch".to_string(),
                        found: other.to_string(),
                    });
                }
            };
            conditions.push(condition);
        }

        if !conditions
            .iter()
            .any(|c| matches!(c, TypeofCondition::When { .. }))
        {
            return Err(LoweringError::missing(node.kind(), kind::WHEN_BRANCH));
        }

        Ok(Field::Typeof(FieldTypeof {
            field: polymorphic.to_string(),
            conditions,
            span: node.span(),
        }))
    }
}
