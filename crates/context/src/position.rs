// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Position conversion
//!
//! The AST and the resolver work in byte offsets. Editors send
//! `(line, character)` positions or character offsets; these helpers convert
//! between the two. Out-of-range input is clamped to the end of the text.

/// Position in a document (line, character)
///
/// This mirrors `lsp_types::Position` but is defined here to avoid the
/// dependency on an LSP crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Line position in a document (zero-based)
    pub line: u32,
    /// Character offset on a line (zero-based, in `char`s)
    pub character: u32,
}

impl Position {
    /// Create a new position
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Convert a character offset into a byte offset
///
/// # Examples
///
/// ```
/// use soql_lsp_context::char_offset_to_byte_offset;
///
/// let source = "SELECT Café, Id FROM Account";
/// assert_eq!(char_offset_to_byte_offset(source, 11), 12);
/// assert_eq!(char_offset_to_byte_offset(source, 100), source.len());
/// ```
pub fn char_offset_to_byte_offset(source: &str, char_offset: usize) -> usize {
    source
        .char_indices()
        .nth(char_offset)
        .map_or(source.len(), |(byte, _)| byte)
}

/// Convert a `(line, character)` position into a byte offset
///
/// A character past the end of its line lands on the line end.
///
/// # Examples
///
/// ```
/// use soql_lsp_context::{Position, position_to_offset};
///
/// let source = "SELECT Id\nFROM Account";
/// assert_eq!(position_to_offset(source, Position::new(1, 5)), 15);
/// ```
pub fn position_to_offset(source: &str, position: Position) -> usize {
    let mut line_start = 0;
    for _ in 0..position.line {
        match source[line_start..].find('\n') {
            Some(newline) => line_start += newline + 1,
            None => return source.len(),
        }
    }

    let line = &source[line_start..];
    let line = line.find('\n').map_or(line, |end| &line[..end]);
    line_start + char_offset_to_byte_offset(line, position.character as usize)
}

/// Convert a byte offset into a `(line, character)` position
///
/// # Examples
///
/// ```
/// use soql_lsp_context::{Position, offset_to_position};
///
/// let source = "SELECT Id\nFROM Account";
/// assert_eq!(offset_to_position(source, 10), Position::new(1, 0));
/// ```
pub fn offset_to_position(source: &str, byte_offset: usize) -> Position {
    let safe_offset = byte_offset.min(source.len());

    let mut line = 0;
    let mut character = 0;
    for (byte, ch) in source.char_indices() {
        if byte >= safe_offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            character = 0;
        } else {
            character += 1;
        }
    }

    Position::new(line, character)
}
