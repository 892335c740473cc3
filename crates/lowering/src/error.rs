// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types and handling strategy for the lowering layer

use serde::Serialize;
use soql_grammar::SyntaxError;
use soql_lsp_ir::ParenBalanceError;

use crate::config::ConfigError;

/// Result type alias for lowering operations
pub type LoweringResult<T> = Result<T, LoweringError>;

/// Outcome of a lowering operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoweringOutcome {
    /// Complete success - all nodes converted successfully
    Success,

    /// Partial success - some items were dropped
    /// Contains the errors that caused them to be dropped
    Partial(Vec<LoweringError>),

    /// Complete failure - critical error prevented conversion
    Failed(LoweringError),
}

/// Errors that can occur during CST → AST lowering
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum LoweringError {
    /// The CST node is missing a required child
    #[error("Missing required child node: expected '{expected}', but not found in {context}")]
    MissingChild { context: String, expected: String },

    /// Unexpected node type encountered
    #[error("Unexpected node type: expected '{expected}', found '{found}'")]
    UnexpectedNodeType { expected: String, found: String },

    /// Invalid literal value
    #[error("Invalid literal value: {value} cannot be parsed as {type_name}")]
    InvalidLiteral { value: String, type_name: String },

    /// Syntax the builder has no AST representation for
    #[error("Syntax not supported: {feature}. {suggestion}")]
    UnsupportedSyntax { feature: String, suggestion: String },

    /// WHERE/HAVING parentheses do not balance
    #[error("Unbalanced parentheses in {context}: {details}")]
    UnbalancedParentheses { context: String, details: String },

    /// Recursion limit exceeded (deeply nested subqueries)
    #[error("Recursion limit exceeded: {context} (depth: {depth}, limit: {limit})")]
    RecursionLimitExceeded {
        context: String,
        depth: usize,
        limit: usize,
    },

    /// Generic lowering error for other cases
    #[error("Lowering error: {message}")]
    Generic { message: String },
}

impl LoweringError {
    pub(crate) fn missing(context: &str, expected: &str) -> Self {
        LoweringError::MissingChild {
            context: context.to_string(),
            expected: expected.to_string(),
        }
    }

    pub(crate) fn unbalanced(context: &str, err: ParenBalanceError) -> Self {
        LoweringError::UnbalancedParentheses {
            context: context.to_string(),
            details: err.to_string(),
        }
    }

    /// Check if this error is confined to one item, so that best-effort
    /// building can drop the item and continue
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LoweringError::MissingChild { .. }
                | LoweringError::UnexpectedNodeType { .. }
                | LoweringError::InvalidLiteral { .. }
                | LoweringError::UnsupportedSyntax { .. }
                | LoweringError::UnbalancedParentheses { .. }
        )
    }

    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LoweringError::MissingChild { .. } => ErrorSeverity::Error,
            LoweringError::UnexpectedNodeType { .. } => ErrorSeverity::Error,
            LoweringError::UnbalancedParentheses { .. } => ErrorSeverity::Error,
            LoweringError::RecursionLimitExceeded { .. } => ErrorSeverity::Error,
            LoweringError::UnsupportedSyntax { .. } => ErrorSeverity::Warning,
            LoweringError::InvalidLiteral { .. } => ErrorSeverity::Warning,
            LoweringError::Generic { .. } => ErrorSeverity::Error,
        }
    }
}

/// Severity level for lowering errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational note
    Info,
    /// Warning (e.g., a literal that was skipped)
    Warning,
    /// Error (e.g., critical structural issue)
    Error,
}

/// Failure of [`crate::build_query`]
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The grammar reported syntax errors and best-effort building is off
    #[error("Query has {} syntax error(s); first: {}", .0.len(), first_message(.0))]
    Syntax(Vec<SyntaxError>),

    /// The parse tree did not have the shape the builder expects
    #[error("Malformed parse tree: {0}")]
    Malformed(#[from] LoweringError),

    #[error("Invalid build options: {0}")]
    Config(#[from] ConfigError),
}

fn first_message(errors: &[SyntaxError]) -> String {
    errors
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

impl BuildError {
    pub fn is_syntax(&self) -> bool {
        matches!(self, BuildError::Syntax(_))
    }

    pub fn syntax_errors(&self) -> &[SyntaxError] {
        match self {
            BuildError::Syntax(errors) => errors,
            _ => &[],
        }
    }
}
