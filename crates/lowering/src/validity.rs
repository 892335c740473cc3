// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Query validity check
//!
//! A query is valid when the grammar accepts it without a single syntax
//! error. No AST is built.

use std::panic::{AssertUnwindSafe, catch_unwind};

/// Whether `text` is a syntactically valid SOQL query.
///
/// Never panics: a panic inside the parser is reported as `false`.
pub fn is_valid(text: &str) -> bool {
    match catch_unwind(AssertUnwindSafe(|| soql_grammar::parse(text).errors)) {
        Ok(errors) => {
            if let Some(first) = errors.first() {
                tracing::debug!(errors = errors.len(), first = %first, "query is not valid");
            }
            errors.is_empty()
        }
        Err(_) => {
            tracing::debug!("parser panicked; treating query as invalid");
            false
        }
    }
}
