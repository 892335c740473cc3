// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Lexer for SOQL
//!
//! Produces span-based tokens; text is sliced from the source only when
//! needed. Keywords are not separate token kinds: SOQL keywords are
//! case-insensitive and most of them are legal field names, so they are
//! lexed as [`TokenKind::Identifier`] and recognized by the parser.
//!
//! ## Error handling
//!
//! Consecutive unrecognized characters are coalesced into a single
//! [`TokenKind::Garbage`] token instead of one error per character.

use logos::Logos;
use soql_lsp_ir::Span;

/// All token kinds produced by [`lex`]
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    /// A dot not absorbed into a dotted identifier (`Account.` while typing)
    #[token(".")]
    Dot,

    #[token("=")]
    Equal,

    #[token("!=")]
    #[token("<>")]
    NotEqual,

    #[token("<")]
    Less,

    #[token("<=")]
    LessEqual,

    #[token(">")]
    Greater,

    #[token(">=")]
    GreaterEqual,

    #[regex(r"'(?:[^'\\]|\\.)*'")]
    StringLiteral,

    #[regex(r"[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?(?:Z|[+-][0-9]{2}:?[0-9]{2})")]
    DateTimeLiteral,

    #[regex(r"[0-9]{4}-[0-9]{2}-[0-9]{2}")]
    DateLiteral,

    #[regex(r"[+-]?[0-9]+\.[0-9]+")]
    DecimalLiteral,

    #[regex(r"[+-]?[0-9]+")]
    IntegerLiteral,

    /// `USD100.50`; the integer form `USD100` lexes as an identifier and is
    /// reclassified by the parser in value position
    #[regex(r"[a-zA-Z]{3}[0-9]+\.[0-9]+")]
    CurrencyDecimalLiteral,

    /// Identifier, possibly dotted (`Account.Owner.Name`)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*")]
    Identifier,

    #[regex(r"[ \t\f]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    /// Coalesced unrecognized characters
    Garbage,
}

impl TokenKind {
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }

    /// Human-readable name used in diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Dot => "'.'",
            TokenKind::Equal => "'='",
            TokenKind::NotEqual => "'!='",
            TokenKind::Less => "'<'",
            TokenKind::LessEqual => "'<='",
            TokenKind::Greater => "'>'",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::StringLiteral => "string literal",
            TokenKind::DateTimeLiteral => "datetime literal",
            TokenKind::DateLiteral => "date literal",
            TokenKind::DecimalLiteral => "decimal literal",
            TokenKind::IntegerLiteral => "integer literal",
            TokenKind::CurrencyDecimalLiteral => "currency literal",
            TokenKind::Identifier => "identifier",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "newline",
            TokenKind::Garbage => "unrecognized input",
        }
    }
}

/// Zero-copy token: kind + span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Whether this token is the given keyword (case-insensitive)
    pub fn is_keyword(&self, source: &str, keyword: &str) -> bool {
        self.kind == TokenKind::Identifier && token_text(source, self).eq_ignore_ascii_case(keyword)
    }
}

/// Tokenizes source into span-based tokens, trivia included.
///
/// Consecutive lexer errors are coalesced into single `Garbage` tokens.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = lexer.span().start;
                    tokens.push(Token::new(TokenKind::Garbage, Span::new(start, end)));
                }
                tokens.push(Token::new(kind, lexer.span().into()));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        TokenKind::Garbage,
                        Span::new(start, source.len()),
                    ));
                }
                break;
            }
        }
    }

    tokens
}

/// Tokens with whitespace and newlines removed
pub fn lex_significant(source: &str) -> Vec<Token> {
    lex(source)
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .collect()
}

/// Retrieves the text slice for a token
#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    source.get(token.span.start..token.span.end).unwrap_or("")
}
