// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Cursor markers in test input

/// Cursor marker used in test input
pub const CURSOR_MARKER: char = '|';

/// Get cursor position from input SOQL
///
/// Finds the cursor marker `|` and returns its byte offset. Returns None if
/// no cursor marker is found.
pub fn get_cursor_position(input: &str) -> Option<usize> {
    input.find(CURSOR_MARKER)
}

/// Remove cursor marker from input SOQL
pub fn remove_cursor_marker(input: &str) -> String {
    input.replacen(CURSOR_MARKER, "", 1)
}

/// Split marked input into the query text and the cursor offset
pub fn split_cursor(input: &str) -> Option<(String, usize)> {
    let cursor = get_cursor_position(input)?;
    Some((remove_cursor_marker(input), cursor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_helpers() {
        assert_eq!(get_cursor_position("SELECT |"), Some(7));
        assert_eq!(get_cursor_position("SELECT Id"), None);
        assert_eq!(remove_cursor_marker("SELECT I|d FROM Account"), "SELECT Id FROM Account");
        assert_eq!(
            split_cursor("SELECT Id FROM |"),
            Some(("SELECT Id FROM ".to_string(), 15))
        );
    }
}
