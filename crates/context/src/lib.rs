// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SOQL LSP - Cursor Context Layer
//!
//! This crate answers "what is the cursor in?" for a SOQL query, the basis
//! for completion and query editing.
//!
//! ## Overview
//!
//! [`resolve`] walks the AST built by `soql-lsp-lowering` and reports a
//! [`ContextInfo`]: the element kind under the cursor ([`NodeType`]), its
//! span, and its subquery nesting level. When the text is too broken to
//! build anything, the raw text is classified by keyword position instead.
//!
//! Offsets are bytes. Use [`position_to_offset`] or
//! [`char_offset_to_byte_offset`] to convert editor positions first.
//!
//! ## Examples
//!
//! ```rust
//! use soql_lsp_context::{NodeType, resolve};
//! use soql_lsp_lowering::{BuildOptions, build_query};
//!
//! let source = "SELECT Id, (SELECT Id FROM Contacts) FROM Account";
//! let output = build_query(source, &BuildOptions::default()).unwrap();
//!
//! let info = resolve(&output.query, 29, Some(source));
//! assert_eq!(info.node_type, NodeType::SObject);
//! assert_eq!(info.s_object.as_deref(), Some("Contacts"));
//! assert_eq!(info.nesting_level, 1);
//! ```

pub mod fallback;
pub mod info;
pub mod position;
pub mod resolver;

// Re-export commonly used types
pub use fallback::classify_text;
pub use info::{ContextInfo, NodeType};
pub use position::{Position, char_offset_to_byte_offset, offset_to_position, position_to_offset};
pub use resolver::resolve;
