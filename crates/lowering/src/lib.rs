// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SOQL LSP - Lowering Layer
//!
//! This crate turns the SOQL grammar's concrete syntax tree into the typed
//! AST of `soql-lsp-ir`, and provides the query validity check.
//!
//! ## Lowering Process
//!
//! ```text
//! Text → soql-grammar CST → Lowering → Query AST → Cursor Context
//! ```
//!
//! ## Error Handling Strategy
//!
//! - **Syntax errors** come from the grammar. [`build_query`] refuses to
//!   build from a tree with syntax errors unless best-effort mode is on.
//! - **Structural errors** ([`LoweringError`]) mean the tree is missing a
//!   piece the builder needs. They are fatal in strict mode; in best-effort
//!   mode the affected item is dropped and the error recorded, and the
//!   outcome is [`LoweringOutcome::Partial`].
//!
//! ## Usage
//!
//! ```rust
//! use soql_lsp_lowering::{BuildOptions, build_query, is_valid};
//!
//! let output = build_query("SELECT Id, Name FROM Account", &BuildOptions::default()).unwrap();
//! assert_eq!(output.query.s_object, "Account");
//! assert!(output.is_complete());
//!
//! assert!(!is_valid("SELECT Id FROM"));
//! ```

pub mod builder;
pub mod config;
pub mod context;
pub mod cst;
pub mod error;
pub mod validity;

pub use builder::SoqlLowering;
pub use config::{BuildOptions, ConfigError, DEFAULT_MAX_SUBQUERY_DEPTH};
pub use context::LoweringContext;
pub use cst::CstNode;
pub use error::{BuildError, ErrorSeverity, LoweringError, LoweringOutcome, LoweringResult};
pub use validity::is_valid;

use soql_grammar::SyntaxError;
use soql_lsp_ir::{Field, Query};

/// Core trait for lowering a CST to the AST
///
/// # Type Parameters
///
/// - `N`: The CST node type ([`soql_grammar::SyntaxNode`], or a mock tree in
///   tests)
///
/// # Error Handling
///
/// - **For structural errors** (missing required children): return
///   `Err(LoweringError)` in strict mode
/// - **In best-effort mode**: drop the item that owns the error, record the
///   error on the [`LoweringContext`], and keep going. No placeholder nodes
///   are ever emitted.
pub trait Lowering<N>
where
    N: CstNode,
{
    /// Lower a `select_statement` node to a [`Query`]
    fn lower_query(&self, ctx: &mut LoweringContext, node: &N) -> LoweringResult<Query>;

    /// Lower one SELECT list item
    fn lower_field(&self, ctx: &mut LoweringContext, node: &N) -> LoweringResult<Field>;

    /// Check whether this node is one the builder lowers directly
    fn supports_node(&self, node: &N) -> bool;
}

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub query: Query,

    /// `Partial` when best-effort mode dropped items
    pub outcome: LoweringOutcome,

    /// Syntax errors the build went ahead despite (best-effort mode only)
    pub syntax_errors: Vec<SyntaxError>,
}

impl BuildOutput {
    /// Built from an error-free tree with nothing dropped
    pub fn is_complete(&self) -> bool {
        self.syntax_errors.is_empty() && self.outcome == LoweringOutcome::Success
    }

    /// Errors for the items that were dropped
    pub fn dropped(&self) -> &[LoweringError] {
        match &self.outcome {
            LoweringOutcome::Partial(errors) => errors,
            _ => &[],
        }
    }
}

/// Build a [`Query`] from a parsed tree
pub fn build<N: CstNode>(root: &N, options: &BuildOptions) -> Result<BuildOutput, BuildError> {
    options.validate()?;
    let mut ctx = LoweringContext::from_options(options);
    let query = SoqlLowering::new().lower_query(&mut ctx, root)?;
    Ok(BuildOutput {
        query,
        outcome: ctx.outcome(),
        syntax_errors: Vec::new(),
    })
}

/// Parse `text` and build its [`Query`]
///
/// Syntax errors fail the build with [`BuildError::Syntax`] unless
/// `options.best_effort` is set, in which case the partial tree is built and
/// the errors are returned alongside it.
pub fn build_query(text: &str, options: &BuildOptions) -> Result<BuildOutput, BuildError> {
    options.validate()?;
    let parsed = soql_grammar::parse(text);
    tracing::debug!(
        len = text.len(),
        syntax_errors = parsed.errors.len(),
        best_effort = options.best_effort,
        "building SOQL query"
    );

    if !parsed.errors.is_empty() && !options.best_effort {
        return Err(BuildError::Syntax(parsed.errors));
    }

    let mut output = build(&parsed.root, options)?;
    output.syntax_errors = parsed.errors;
    Ok(output)
}
