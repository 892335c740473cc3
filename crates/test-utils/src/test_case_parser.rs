// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Text-based test case format parser
//!
//! Cursor-context cases are separated by `---`. Each case has unindented
//! `key:` fields; a field's value is either inline or the indented lines
//! that follow `key: |`.
//!
//! ```text
//! ---
//! description: cursor on an object name
//! input: SELECT Id FROM Acc|ount
//! expected: |
//!   node_type = sobject
//!   nesting_level = 0
//! ```
//!
//! Lines starting with `#` in the first column are comments.
//!
//! `input` marks the cursor with `|`. `expected` lines are `key = value`
//! pairs; keys not listed are not checked.

use std::path::Path;
use thiserror::Error;

use crate::cursor::{get_cursor_position, remove_cursor_marker};

/// A single test case definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub description: String,
    /// Query text with the cursor marker removed
    pub input: String,
    /// Byte offset of the cursor marker
    pub cursor: usize,
    pub expected: ExpectedContext,
}

/// Expected resolver output. `None` fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedContext {
    pub node_type: String,
    pub field_name: Option<String>,
    pub s_object: Option<String>,
    pub is_in_subquery: Option<bool>,
    pub nesting_level: Option<usize>,
}

/// Parse errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required field '{field}' in case ending at line {line}")]
    MissingField { field: &'static str, line: usize },

    #[error("Invalid syntax at line {line}: {message}")]
    InvalidSyntax { line: usize, message: String },

    #[error("Empty test case file")]
    EmptyFile,

    #[error("Invalid expected entry: {0}")]
    InvalidExpected(String),
}

/// Parse a test case file
pub fn parse_test_file(path: &Path) -> Result<Vec<TestCase>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_test_content(&content)
}

/// Parse test case content from a string
pub fn parse_test_content(content: &str) -> Result<Vec<TestCase>, ParseError> {
    let mut cases = Vec::new();
    let mut current_case = TestCaseBuilder::default();
    let mut current_field: Option<String> = None;
    let mut current_value: Vec<String> = Vec::new();
    let mut line_num = 0;

    for line in content.lines() {
        line_num += 1;
        let trimmed = line.trim();

        if (trimmed.is_empty() && current_field.is_none()) || line.starts_with('#') {
            continue;
        }

        if trimmed == "---" {
            if let Some(field) = current_field.take() {
                current_case.set_field(&field, &current_value);
            }
            if current_case.has_fields() {
                cases.push(std::mem::take(&mut current_case).build(line_num)?);
            }
            current_value.clear();
            continue;
        }

        // Field declarations start in the first column
        let unindented = !line.starts_with(char::is_whitespace);
        if unindented && let Some((key, value)) = trimmed.split_once(':') {
            if let Some(field) = current_field.take() {
                current_case.set_field(&field, &current_value);
            }
            current_field = Some(key.trim().to_string());
            current_value.clear();

            let value = value.trim();
            if !value.is_empty() && value != "|" {
                current_value.push(value.to_string());
            }
            continue;
        }

        if current_field.is_some() {
            current_value.push(line.to_string());
        } else {
            return Err(ParseError::InvalidSyntax {
                line: line_num,
                message: format!("content outside of a field: '{trimmed}'"),
            });
        }
    }

    if let Some(field) = &current_field {
        current_case.set_field(field, &current_value);
    }
    if current_case.has_fields() {
        cases.push(current_case.build(line_num)?);
    }

    if cases.is_empty() {
        return Err(ParseError::EmptyFile);
    }

    Ok(cases)
}

/// Builder for constructing test cases incrementally
#[derive(Default)]
struct TestCaseBuilder {
    description: Option<String>,
    input: Option<String>,
    expected: Option<Vec<String>>,
}

impl TestCaseBuilder {
    fn has_fields(&self) -> bool {
        self.description.is_some() || self.input.is_some()
    }

    fn set_field(&mut self, field: &str, value: &[String]) {
        match field {
            "description" => {
                self.description = Some(value.join("\n").trim().to_string());
            }
            "input" => {
                self.input = Some(dedent(value));
            }
            "expected" => {
                let items: Vec<String> = value
                    .iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if !items.is_empty() {
                    self.expected = Some(items);
                }
            }
            _ => {}
        }
    }

    fn build(self, line: usize) -> Result<TestCase, ParseError> {
        let description = self.description.ok_or(ParseError::MissingField {
            field: "description",
            line,
        })?;
        let marked = self
            .input
            .ok_or(ParseError::MissingField { field: "input", line })?;
        let cursor = get_cursor_position(&marked).ok_or_else(|| ParseError::InvalidSyntax {
            line,
            message: format!("input of '{description}' has no cursor marker"),
        })?;
        let entries = self.expected.ok_or(ParseError::MissingField {
            field: "expected",
            line,
        })?;

        Ok(TestCase {
            description,
            input: remove_cursor_marker(&marked),
            cursor,
            expected: parse_expected(&entries)?,
        })
    }
}

/// Remove common leading whitespace from multi-line text
fn dedent(lines: &[String]) -> String {
    let min_indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| line.get(min_indent..).unwrap_or(line.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn parse_expected(entries: &[String]) -> Result<ExpectedContext, ParseError> {
    let mut expected = ExpectedContext::default();
    for entry in entries {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| ParseError::InvalidExpected(entry.clone()))?;
        let value = value.trim();
        let invalid = || ParseError::InvalidExpected(entry.clone());
        match key.trim() {
            "node_type" => expected.node_type = value.to_string(),
            "field_name" => expected.field_name = Some(value.to_string()),
            "s_object" => expected.s_object = Some(value.to_string()),
            "is_in_subquery" => {
                expected.is_in_subquery = Some(value.parse().map_err(|_| invalid())?)
            }
            "nesting_level" => {
                expected.nesting_level = Some(value.parse().map_err(|_| invalid())?)
            }
            _ => return Err(invalid()),
        }
    }
    if expected.node_type.is_empty() {
        return Err(ParseError::InvalidExpected("missing node_type".to_string()));
    }
    Ok(expected)
}
