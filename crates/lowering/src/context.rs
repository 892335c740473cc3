// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Lowering context for tracking state during conversion

use crate::config::BuildOptions;
use crate::error::{LoweringError, LoweringOutcome, LoweringResult};

/// Context for tracking state during CST → AST lowering
///
/// The context maintains:
/// - Accumulated errors for best-effort mode
/// - Subquery recursion depth tracking
pub struct LoweringContext {
    /// Accumulated errors for dropped items
    errors: Vec<LoweringError>,

    /// Drop malformed items instead of failing
    best_effort: bool,

    /// Current subquery depth
    recursion_depth: usize,

    /// Maximum subquery depth allowed
    max_recursion_depth: usize,
}

impl Default for LoweringContext {
    fn default() -> Self {
        Self::new()
    }
}

impl LoweringContext {
    /// Create a strict lowering context with default limits
    pub fn new() -> Self {
        Self::from_options(&BuildOptions::default())
    }

    pub fn from_options(options: &BuildOptions) -> Self {
        Self {
            errors: Vec::new(),
            best_effort: options.best_effort,
            recursion_depth: 0,
            max_recursion_depth: options.max_subquery_depth,
        }
    }

    /// Create a lowering context with custom max subquery depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_recursion_depth: max_depth,
            ..Self::new()
        }
    }

    pub fn is_best_effort(&self) -> bool {
        self.best_effort
    }

    /// Add an error to the context
    pub fn add_error(&mut self, error: LoweringError) {
        self.errors.push(error);
    }

    /// Get all accumulated errors
    pub fn errors(&self) -> &[LoweringError] {
        &self.errors
    }

    /// Check if any errors were accumulated
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Take the accumulated errors, leaving the context empty
    pub fn take_errors(&mut self) -> Vec<LoweringError> {
        std::mem::take(&mut self.errors)
    }

    /// Get the lowering outcome based on accumulated errors
    pub fn outcome(&self) -> LoweringOutcome {
        if self.errors.is_empty() {
            LoweringOutcome::Success
        } else {
            LoweringOutcome::Partial(self.errors.clone())
        }
    }

    /// Apply the malformed-tree policy to the result of lowering one item.
    ///
    /// Strict mode passes errors through. Best-effort mode records a
    /// recoverable error and yields `None` so the caller drops the item.
    pub fn recover<T>(&mut self, result: LoweringResult<T>) -> LoweringResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.best_effort && err.is_recoverable() => {
                tracing::warn!(error = %err, "dropping malformed item");
                self.add_error(err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Increment subquery depth and check for overflow
    pub fn enter_recursive_context(&mut self) -> Result<(), LoweringError> {
        self.recursion_depth += 1;
        if self.recursion_depth > self.max_recursion_depth {
            let error = LoweringError::RecursionLimitExceeded {
                context: "subquery lowering".to_string(),
                depth: self.recursion_depth,
                limit: self.max_recursion_depth,
            };
            self.recursion_depth -= 1;
            self.add_error(error.clone());
            Err(error)
        } else {
            Ok(())
        }
    }

    /// Decrement subquery depth when exiting a recursive context
    pub fn exit_recursive_context(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.recursion_depth
    }
}
