// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SOQL keyword tables
//!
//! Keywords are ordinary identifier tokens; these tables decide when an
//! identifier is acting as a keyword.

/// Words that can never be a field name or an alias
pub const RESERVED_WORDS: &[&str] = &[
    "AND", "ASC", "BY", "DESC", "ELSE", "END", "EXCLUDES", "FIRST", "FOR", "FROM", "GROUP",
    "HAVING", "IN", "INCLUDES", "LAST", "LIKE", "LIMIT", "NOT", "NULLS", "OFFSET", "OR",
    "ORDER", "SELECT", "THEN", "TYPEOF", "UPDATE", "USING", "WHEN", "WHERE", "WITH",
];

/// Words that start a clause of a SELECT statement, in clause order
pub const CLAUSE_KEYWORDS: &[&str] = &[
    "FROM", "USING", "WHERE", "WITH", "GROUP", "HAVING", "ORDER", "LIMIT", "OFFSET", "FOR",
    "UPDATE",
];

/// Reserved words that are also standard object names when `BY` does not
/// follow
pub const OBJECT_KEYWORDS: &[&str] = &["GROUP", "ORDER"];

/// `WITH` filters that are a single keyword
pub const WITH_FILTERS: &[&str] = &["SECURITY_ENFORCED", "USER_MODE", "SYSTEM_MODE"];

/// Data category selectors
pub const DATA_CATEGORY_SELECTORS: &[&str] = &["AT", "ABOVE", "BELOW", "ABOVE_OR_BELOW"];

pub const FOR_MODES: &[&str] = &["VIEW", "REFERENCE", "UPDATE"];

pub const UPDATE_MODES: &[&str] = &["TRACKING", "VIEWSTAT"];

fn contains(table: &[&str], word: &str) -> bool {
    table.iter().any(|kw| kw.eq_ignore_ascii_case(word))
}

pub fn is_reserved(word: &str) -> bool {
    contains(RESERVED_WORDS, word)
}

pub fn is_clause_keyword(word: &str) -> bool {
    contains(CLAUSE_KEYWORDS, word)
}

/// Index of `word` in [`CLAUSE_KEYWORDS`]
pub fn clause_order(word: &str) -> Option<usize> {
    CLAUSE_KEYWORDS
        .iter()
        .position(|kw| kw.eq_ignore_ascii_case(word))
}

pub fn is_one_of(table: &[&str], word: &str) -> bool {
    contains(table, word)
}
