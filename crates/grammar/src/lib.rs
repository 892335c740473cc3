// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SOQL Grammar
//!
//! This crate provides the SOQL lexer and an error-recovering parser that
//! produces a concrete syntax tree of [`SyntaxNode`]s.
//!
//! ## Usage
//!
//! ```rust
//! use soql_grammar::{field, parse};
//!
//! let output = parse("SELECT Id FROM Account");
//! assert!(output.errors.is_empty());
//!
//! let from = output.root.child_by_field(field::FROM_CLAUSE).unwrap();
//! assert_eq!(from.child_by_field(field::OBJECT).unwrap().text(), "Account");
//! ```

pub mod error;
pub mod keywords;
pub mod lexer;
pub mod parser;
pub mod syntax;

pub use error::SyntaxError;
pub use lexer::{Token, TokenKind, lex, lex_significant, token_text};
pub use parser::{MAX_NESTING_DEPTH, MAX_SUBQUERY_DEPTH, ParseOutput, parse};
pub use syntax::{SyntaxNode, field, kind};
