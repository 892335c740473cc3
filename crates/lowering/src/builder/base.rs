// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Shared helpers for walking CST nodes

use crate::{CstNode, LoweringContext, LoweringError, LoweringResult};

/// Helper methods shared by every part of the builder
pub trait LoweringBase<N>
where
    N: CstNode,
{
    /// Extract a required child node, returning an error if not found
    fn require_child<'a>(&self, node: &'a N, field: &str) -> LoweringResult<&'a N> {
        node.children(field)
            .first()
            .copied()
            .ok_or_else(|| LoweringError::missing(node.kind(), field))
    }

    /// Extract an optional child node, returning None if not found
    fn optional_child<'a>(&self, node: &'a N, field: &str) -> Option<&'a N> {
        node.children(field).first().copied()
    }

    /// Source text of a node. Empty text counts as missing.
    fn node_text<'a>(&self, node: &'a N) -> LoweringResult<&'a str> {
        match node.text() {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(LoweringError::missing(node.kind(), "source text")),
        }
    }

    /// Text of a required child
    fn child_text<'a>(&self, node: &'a N, field: &str) -> LoweringResult<&'a str> {
        let child = self.require_child(node, field)?;
        self.node_text(child)
    }

    fn expect_kind(&self, node: &N, expected: &str) -> LoweringResult<()> {
        if node.kind() == expected {
            Ok(())
        } else {
            Err(LoweringError::UnexpectedNodeType {
                expected: expected.to_string(),
                found: node.kind().to_string(),
            })
        }
    }

    /// Lower a list of items. In best-effort mode, items that fail with a
    /// recoverable error are dropped.
    fn lower_children<T, F>(
        &self,
        ctx: &mut LoweringContext,
        nodes: &[&N],
        mut lower_fn: F,
    ) -> LoweringResult<Vec<T>>
    where
        F: FnMut(&mut LoweringContext, &N) -> LoweringResult<T>,
    {
        let mut results = Vec::with_capacity(nodes.len());
        for &node in nodes {
            let result = lower_fn(ctx, node);
            if let Some(value) = ctx.recover(result)? {
                results.push(value);
            }
        }
        Ok(results)
    }
}
