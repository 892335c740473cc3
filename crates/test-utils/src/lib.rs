// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for the SOQL LSP crates
//!
//! This crate provides common testing components including:
//! - CST node builders for lowering tests
//! - SOQL-specific test helpers and assertions
//! - Test fixtures and sample queries
//! - Cursor markers and the text format for cursor-context cases

pub mod assertions;
pub mod cursor;
pub mod fixtures;
pub mod mock_cst;
pub mod test_case_parser;

// Re-exports for convenience
pub use assertions::SoqlAssertions;
pub use cursor::{CURSOR_MARKER, get_cursor_position, remove_cursor_marker, split_cursor};
pub use fixtures::SoqlFixtures;
pub use mock_cst::{MockCstBuilder, MockCstNode, SoqlCstHelpers};
pub use test_case_parser::{
    ExpectedContext, ParseError, TestCase, parse_test_content, parse_test_file,
};

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test-friendly tracing subscriber, once per process.
///
/// Honors `RUST_LOG`; defaults to `warn`.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
