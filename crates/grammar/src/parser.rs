// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Recursive-descent parser for SOQL SELECT statements
//!
//! The parser never fails: it always returns a tree, and reports problems as
//! [`SyntaxError`]s. When a clause cannot be parsed, the tokens up to the
//! next clause keyword (or `,` inside a list) are wrapped in an
//! [`kind::ERROR`] node and parsing resumes from there, so a half-typed query
//! still yields a usable partial tree.

use soql_lsp_ir::Span;
use soql_lsp_ir::literal::is_date_n_literal;

use crate::error::SyntaxError;
use crate::keywords;
use crate::lexer::{Token, TokenKind, lex, token_text};
use crate::syntax::{NodeBuilder, SyntaxNode, field, kind};

/// Maximum nesting of subqueries, parentheses and `NOT`s
pub const MAX_NESTING_DEPTH: usize = 64;

/// Maximum nesting of subqueries inside one another
pub const MAX_SUBQUERY_DEPTH: usize = 16;

/// Result of parsing a query
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub root: SyntaxNode,
    pub errors: Vec<SyntaxError>,
}

impl ParseOutput {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a single SOQL SELECT statement
pub fn parse(source: &str) -> ParseOutput {
    let mut parser = Parser::new(source);
    let root = parser.parse_root();
    tracing::trace!(
        errors = parser.errors.len(),
        tokens = parser.tokens.len(),
        "parsed SOQL"
    );
    ParseOutput {
        root,
        errors: parser.errors,
    }
}

/// Clauses of a SELECT statement after the field list, in required order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Clause {
    From,
    Using,
    Where,
    With,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
    For,
    Update,
}

impl Clause {
    fn from_keyword(word: &str) -> Option<Clause> {
        let clause = match keywords::clause_order(word)? {
            0 => Clause::From,
            1 => Clause::Using,
            2 => Clause::Where,
            3 => Clause::With,
            4 => Clause::GroupBy,
            5 => Clause::Having,
            6 => Clause::OrderBy,
            7 => Clause::Limit,
            8 => Clause::Offset,
            9 => Clause::For,
            _ => Clause::Update,
        };
        Some(clause)
    }

    /// First clause allowed after this one; `None` after UPDATE
    fn next(&self) -> Option<Clause> {
        let next = match self {
            Clause::From => Clause::Using,
            Clause::Using => Clause::Where,
            Clause::Where => Clause::With,
            Clause::With => Clause::GroupBy,
            Clause::GroupBy => Clause::Having,
            Clause::Having => Clause::OrderBy,
            Clause::OrderBy => Clause::Limit,
            Clause::Limit => Clause::Offset,
            Clause::Offset => Clause::For,
            Clause::For => Clause::Update,
            Clause::Update => return None,
        };
        Some(next)
    }

    fn field(&self) -> &'static str {
        match self {
            Clause::From => field::FROM_CLAUSE,
            Clause::Using => field::USING_SCOPE_CLAUSE,
            Clause::Where => field::WHERE_CLAUSE,
            Clause::With => field::WITH_CLAUSE,
            Clause::GroupBy => field::GROUP_BY_CLAUSE,
            Clause::Having => field::HAVING_CLAUSE,
            Clause::OrderBy => field::ORDER_BY_CLAUSE,
            Clause::Limit => field::LIMIT_CLAUSE,
            Clause::Offset => field::OFFSET_CLAUSE,
            Clause::For => field::FOR_CLAUSE,
            Clause::Update => field::UPDATE_CLAUSE,
        }
    }
}

struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    /// Nesting of subqueries, parentheses and `NOT`s
    depth: usize,
    /// Number of enclosing subquery parentheses
    subquery_depth: usize,
    errors: Vec<SyntaxError>,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        let mut errors = Vec::new();
        let tokens = lex(source)
            .into_iter()
            .filter(|t| {
                if t.kind == TokenKind::Garbage {
                    errors.push(SyntaxError::new(
                        format!("Unrecognized input '{}'", token_text(source, t)),
                        t.span,
                    ));
                }
                !t.kind.is_trivia() && t.kind != TokenKind::Garbage
            })
            .collect();
        Self {
            source,
            tokens,
            pos: 0,
            depth: 0,
            subquery_depth: 0,
            errors,
        }
    }

    // ===== Token access =====

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_nth(&self, n: usize) -> Option<Token> {
        self.tokens.get(self.pos + n).copied()
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn nth_at(&self, n: usize, kind: TokenKind) -> bool {
        self.peek_nth(n).is_some_and(|t| t.kind == kind)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.nth_is_keyword(0, keyword)
    }

    fn nth_is_keyword(&self, n: usize, keyword: &str) -> bool {
        self.peek_nth(n)
            .is_some_and(|t| t.is_keyword(self.source, keyword))
    }

    fn at_one_of(&self, table: &[&str]) -> bool {
        self.peek().is_some_and(|t| {
            t.kind == TokenKind::Identifier && keywords::is_one_of(table, self.text(&t))
        })
    }

    /// Identifier that is not a reserved word
    fn at_name(&self) -> bool {
        self.peek().is_some_and(|t| self.is_name(&t))
    }

    fn is_name(&self, token: &Token) -> bool {
        token.kind == TokenKind::Identifier && !keywords::is_reserved(self.text(token))
    }

    fn at_clause_keyword(&self) -> bool {
        self.peek().is_some_and(|t| {
            t.kind == TokenKind::Identifier && keywords::is_clause_keyword(self.text(&t))
        })
    }

    fn at_statement_end(&self) -> bool {
        match self.peek() {
            None => true,
            Some(t) => t.kind == TokenKind::RParen && self.subquery_depth > 0,
        }
    }

    fn text(&self, token: &Token) -> &'s str {
        token_text(self.source, token)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn current_span(&self) -> Span {
        self.peek()
            .map(|t| t.span)
            .unwrap_or_else(|| Span::empty(self.source.len()))
    }

    fn current_offset(&self) -> usize {
        self.current_span().start
    }

    fn describe_current(&self) -> String {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Identifier => format!("'{}'", self.text(&t)),
            Some(t) => t.kind.describe().to_string(),
            None => "end of input".to_string(),
        }
    }

    // ===== Errors =====

    fn error_here(&mut self, message: impl Into<String>) {
        let span = self.current_span();
        self.errors.push(SyntaxError::new(message, span));
    }

    fn error_expected(&mut self, what: &str) {
        let found = self.describe_current();
        self.error_here(format!("Expected {what}, found {found}"));
    }

    // ===== Leaves =====

    fn leaf(&self, token: Token, kind: &'static str) -> SyntaxNode {
        SyntaxNode::leaf(kind, token.span, self.text(&token), true)
    }

    fn punct(&self, token: Token) -> SyntaxNode {
        let kind = match token.kind {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            _ => "token",
        };
        SyntaxNode::leaf(kind, token.span, self.text(&token), false)
    }

    /// Consume the current token as a keyword leaf
    fn bump_keyword(&mut self, builder: &mut NodeBuilder, field: Option<&'static str>) {
        if let Some(token) = self.bump() {
            let node = self.leaf(token, kind::KEYWORD);
            match field {
                Some(field) => builder.push_field(field, node),
                None => builder.push(node),
            }
        }
    }

    fn expect_keyword(&mut self, keyword: &str, builder: &mut NodeBuilder) -> bool {
        if self.at_keyword(keyword) {
            self.bump_keyword(builder, None);
            true
        } else {
            self.error_expected(keyword);
            false
        }
    }

    fn expect_punct(
        &mut self,
        kind: TokenKind,
        builder: &mut NodeBuilder,
        field: Option<&'static str>,
    ) -> bool {
        if self.at(kind) {
            if let Some(token) = self.bump() {
                let node = self.punct(token);
                match field {
                    Some(field) => builder.push_field(field, node),
                    None => builder.push(node),
                }
            }
            true
        } else {
            self.error_expected(kind.describe());
            false
        }
    }

    /// Consume a non-reserved identifier into `field`
    fn expect_name(&mut self, what: &str, builder: &mut NodeBuilder, field: &'static str) -> bool {
        match self.peek() {
            Some(token) if self.is_name(&token) => {
                self.pos += 1;
                builder.push_field(field, self.leaf(token, kind::IDENTIFIER));
                true
            }
            _ => {
                self.error_expected(what);
                false
            }
        }
    }

    /// Optional alias after a field or function call
    fn parse_alias(&mut self, builder: &mut NodeBuilder) {
        if let Some(token) = self.peek()
            && self.is_name(&token)
            && !self.text(&token).contains('.')
            && !self.nth_at(1, TokenKind::LParen)
        {
            self.pos += 1;
            builder.push_field(field::ALIAS, self.leaf(token, kind::IDENTIFIER));
        }
    }

    // ===== Recovery =====

    /// Run `f` one nesting level deeper, refusing past [`MAX_NESTING_DEPTH`]
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            self.error_here(format!(
                "Query nesting exceeds {MAX_NESTING_DEPTH} levels"
            ));
            return None;
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Skip tokens up to the next clause keyword (or `,` when
    /// `stop_at_comma`) at the current parenthesis level.
    fn recover(&mut self, stop_at_comma: bool) -> Option<SyntaxNode> {
        let start = self.current_offset();
        let mut error = NodeBuilder::new(kind::ERROR);
        let mut parens = 0usize;
        while let Some(token) = self.peek() {
            if parens == 0 {
                if self.at_statement_end()
                    || self.at_clause_keyword()
                    || (stop_at_comma && token.kind == TokenKind::Comma)
                {
                    break;
                }
            }
            match token.kind {
                TokenKind::LParen => parens += 1,
                TokenKind::RParen => parens = parens.saturating_sub(1),
                _ => {}
            }
            self.pos += 1;
            error.push(SyntaxNode::leaf(
                token.kind.describe(),
                token.span,
                self.text(&token),
                false,
            ));
        }
        if error.is_empty() {
            None
        } else {
            Some(error.finish(self.source, start))
        }
    }

    // ===== Statement =====

    fn parse_root(&mut self) -> SyntaxNode {
        if self.tokens.is_empty() {
            if self.errors.is_empty() {
                self.errors
                    .push(SyntaxError::new("Empty query", Span::empty(0)));
            }
            return NodeBuilder::new(kind::SELECT_STATEMENT).finish(self.source, 0);
        }
        self.parse_select_statement()
    }

    fn parse_select_statement(&mut self) -> SyntaxNode {
        let start = self.current_offset();
        let mut node = NodeBuilder::new(kind::SELECT_STATEMENT);

        self.expect_keyword("SELECT", &mut node);

        let list = self.parse_select_list();
        node.push_field(field::SELECT_LIST, list);

        if !self.at_keyword("FROM") {
            self.error_expected("FROM");
        }

        let mut next_allowed = Some(Clause::From);
        while !self.at_statement_end() {
            let clause = self
                .peek()
                .filter(|t| t.kind == TokenKind::Identifier)
                .and_then(|t| Clause::from_keyword(self.text(&t)));
            match clause {
                Some(clause) if next_allowed.is_some_and(|next| clause >= next) => {
                    next_allowed = clause.next();
                    if let Some(parsed) = self.parse_clause(clause) {
                        node.push_field(clause.field(), parsed);
                    }
                }
                Some(_) => {
                    let found = self.describe_current();
                    self.error_here(format!("Clause {found} is out of order"));
                    self.skip_one(&mut node);
                }
                None => {
                    let found = self.describe_current();
                    self.error_here(format!("Unexpected {found}"));
                    self.skip_one(&mut node);
                }
            }
        }

        node.finish(self.source, start)
    }

    /// Consume the current token, and anything up to the next clause, as an
    /// error node
    fn skip_one(&mut self, node: &mut NodeBuilder) {
        let start = self.current_offset();
        let mut error = NodeBuilder::new(kind::ERROR);
        if let Some(token) = self.bump() {
            error.push(SyntaxNode::leaf(
                token.kind.describe(),
                token.span,
                self.text(&token),
                false,
            ));
        }
        if let Some(rest) = self.recover(false) {
            error.push(rest);
        }
        if !error.is_empty() {
            node.push(error.finish(self.source, start));
        }
    }

    fn parse_clause(&mut self, clause: Clause) -> Option<SyntaxNode> {
        let start = self.current_offset();
        let mut node = match clause {
            Clause::From => self.parse_from_clause(),
            Clause::Using => self.parse_using_scope_clause(),
            Clause::Where => self.parse_condition_clause(kind::WHERE_CLAUSE),
            Clause::With => self.parse_with_clause(),
            Clause::GroupBy => self.parse_group_by_clause(),
            Clause::Having => self.parse_condition_clause(kind::HAVING_CLAUSE),
            Clause::OrderBy => self.parse_order_by_clause(),
            Clause::Limit => self.parse_integer_clause(kind::LIMIT_CLAUSE),
            Clause::Offset => self.parse_integer_clause(kind::OFFSET_CLAUSE),
            Clause::For => self.parse_mode_clause(kind::FOR_CLAUSE, keywords::FOR_MODES),
            Clause::Update => self.parse_mode_clause(kind::UPDATE_CLAUSE, keywords::UPDATE_MODES),
        };
        if !self.at_statement_end() && !self.at_clause_keyword() {
            let found = self.describe_current();
            self.error_here(format!("Unexpected {found}"));
            if let Some(error) = self.recover(false) {
                node.push(error);
            }
        }
        if node.is_empty() {
            None
        } else {
            Some(node.finish(self.source, start))
        }
    }

    // ===== SELECT list =====

    fn parse_select_list(&mut self) -> SyntaxNode {
        let start = self.current_offset();
        let mut list = NodeBuilder::new(kind::SELECT_LIST);
        loop {
            if self.at_statement_end() || self.at_keyword("FROM") {
                self.error_expected("field");
                break;
            }
            match self.parse_select_item() {
                Some(item) => list.push_field(field::ITEM, item),
                None => {
                    if let Some(error) = self.recover(true) {
                        list.push(error);
                    }
                }
            }
            if !self.expect_list_separator(&mut list) {
                break;
            }
        }
        list.finish(self.source, start)
    }

    /// Consume `,` if present. A missing comma between two items is
    /// reported but the list continues.
    fn expect_list_separator(&mut self, list: &mut NodeBuilder) -> bool {
        if self.at(TokenKind::Comma) {
            self.expect_punct(TokenKind::Comma, list, None);
            return true;
        }
        if self.at_name() || self.at(TokenKind::LParen) {
            self.error_expected("','");
            return true;
        }
        false
    }

    fn parse_select_item(&mut self) -> Option<SyntaxNode> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::LParen => self.parse_subquery(),
            TokenKind::Identifier
                if token.is_keyword(self.source, "TYPEOF")
                    && self.peek_nth(1).is_some_and(|t| self.is_name(&t)) =>
            {
                self.parse_typeof()
            }
            TokenKind::Identifier if self.nth_at(1, TokenKind::LParen) => {
                self.parse_function_call(true)
            }
            TokenKind::Identifier if self.is_name(&token) => {
                let start = token.span.start;
                let mut node = NodeBuilder::new(kind::FIELD_REF);
                self.pos += 1;
                node.push_field(field::NAME, self.leaf(token, kind::IDENTIFIER));
                self.parse_alias(&mut node);
                Some(node.finish(self.source, start))
            }
            _ => {
                self.error_expected("field");
                None
            }
        }
    }

    fn parse_subquery(&mut self) -> Option<SyntaxNode> {
        self.nested(|p| {
            let start = p.current_offset();
            let mut node = NodeBuilder::new(kind::SUBQUERY);
            if p.subquery_depth >= MAX_SUBQUERY_DEPTH {
                p.error_here(format!(
                    "Subquery nesting exceeds {MAX_SUBQUERY_DEPTH} levels"
                ));
            }
            p.expect_punct(TokenKind::LParen, &mut node, Some(field::LPAREN));
            p.subquery_depth += 1;
            let query = p.parse_select_statement();
            p.subquery_depth -= 1;
            node.push_field(field::QUERY, query);
            p.expect_punct(TokenKind::RParen, &mut node, Some(field::RPAREN));
            Some(node.finish(p.source, start))
        })
    }

    fn parse_typeof(&mut self) -> Option<SyntaxNode> {
        let start = self.current_offset();
        let mut node = NodeBuilder::new(kind::TYPEOF_EXPRESSION);
        self.bump_keyword(&mut node, None);
        self.expect_name("polymorphic field", &mut node, field::FIELD);

        let mut branches = 0;
        while self.at_keyword("WHEN") {
            let branch_start = self.current_offset();
            let mut branch = NodeBuilder::new(kind::WHEN_BRANCH);
            self.bump_keyword(&mut branch, None);
            let ok = self.expect_name("object type", &mut branch, field::OBJECT_TYPE)
                && self.expect_keyword("THEN", &mut branch)
                && self.parse_name_list(&mut branch);
            node.push_field(field::BRANCH, branch.finish(self.source, branch_start));
            branches += 1;
            if !ok {
                return None;
            }
        }
        if branches == 0 {
            self.error_expected("WHEN");
            return None;
        }
        if self.at_keyword("ELSE") {
            let branch_start = self.current_offset();
            let mut branch = NodeBuilder::new(kind::ELSE_BRANCH);
            self.bump_keyword(&mut branch, None);
            let ok = self.parse_name_list(&mut branch);
            node.push_field(field::BRANCH, branch.finish(self.source, branch_start));
            if !ok {
                return None;
            }
        }
        if !self.expect_keyword("END", &mut node) {
            return None;
        }
        Some(node.finish(self.source, start))
    }

    /// `name (, name)*` into `field` children of `builder`
    fn parse_name_list(&mut self, builder: &mut NodeBuilder) -> bool {
        loop {
            if !self.expect_name("field", builder, field::FIELD) {
                return false;
            }
            if !self.at(TokenKind::Comma) {
                return true;
            }
            self.expect_punct(TokenKind::Comma, builder, None);
        }
    }

    fn parse_function_call(&mut self, allow_alias: bool) -> Option<SyntaxNode> {
        self.nested(|p| {
            let start = p.current_offset();
            let mut node = NodeBuilder::new(kind::FUNCTION_CALL);
            let name = p.bump()?;
            node.push_field(field::NAME, p.leaf(name, kind::IDENTIFIER));
            if !p.expect_punct(TokenKind::LParen, &mut node, Some(field::LPAREN)) {
                return None;
            }
            if !p.at(TokenKind::RParen) {
                loop {
                    let argument = p.parse_function_argument()?;
                    node.push_field(field::ARGUMENT, argument);
                    if !p.at(TokenKind::Comma) {
                        break;
                    }
                    p.expect_punct(TokenKind::Comma, &mut node, None);
                }
            }
            if !p.expect_punct(TokenKind::RParen, &mut node, Some(field::RPAREN)) {
                return None;
            }
            if allow_alias {
                p.parse_alias(&mut node);
            }
            Some(node.finish(p.source, start))
        })
    }

    fn parse_function_argument(&mut self) -> Option<SyntaxNode> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Identifier if self.nth_at(1, TokenKind::LParen) => {
                self.parse_function_call(false)
            }
            TokenKind::Identifier => {
                self.pos += 1;
                Some(self.leaf(token, kind::IDENTIFIER))
            }
            _ => match literal_kind(token.kind) {
                Some(kind) => {
                    self.pos += 1;
                    Some(self.leaf(token, kind))
                }
                None => {
                    self.error_expected("function argument");
                    None
                }
            },
        }
    }

    // ===== FROM / USING SCOPE =====

    fn parse_from_clause(&mut self) -> NodeBuilder {
        let mut node = NodeBuilder::new(kind::FROM_CLAUSE);
        self.bump_keyword(&mut node, None);
        if self.at_object_keyword() {
            if let Some(token) = self.bump() {
                node.push_field(field::OBJECT, self.leaf(token, kind::IDENTIFIER));
            }
            self.parse_alias(&mut node);
        } else if self.expect_name("object name", &mut node, field::OBJECT) {
            self.parse_alias(&mut node);
        }
        node
    }

    /// `Group` and `Order` are objects unless `BY` follows
    fn at_object_keyword(&self) -> bool {
        self.at_one_of(keywords::OBJECT_KEYWORDS) && !self.nth_is_keyword(1, "BY")
    }

    fn parse_using_scope_clause(&mut self) -> NodeBuilder {
        let mut node = NodeBuilder::new(kind::USING_SCOPE_CLAUSE);
        self.bump_keyword(&mut node, None);
        if self.expect_keyword("SCOPE", &mut node) {
            self.expect_name("scope", &mut node, field::SCOPE);
        }
        node
    }

    // ===== WHERE / HAVING =====

    fn parse_condition_clause(&mut self, clause_kind: &'static str) -> NodeBuilder {
        let mut node = NodeBuilder::new(clause_kind);
        self.bump_keyword(&mut node, None);
        match self.parse_expression() {
            Some(expression) => node.push_field(field::CONDITION, expression),
            None => {
                if let Some(error) = self.recover(false) {
                    node.push(error);
                }
            }
        }
        node
    }

    fn parse_expression(&mut self) -> Option<SyntaxNode> {
        let start = self.current_offset();
        let first = self.parse_unary()?;
        if !self.at_keyword("AND") && !self.at_keyword("OR") {
            return Some(first);
        }
        let mut node = NodeBuilder::new(kind::BOOLEAN_EXPRESSION);
        node.push_field(field::OPERAND, first);
        while self.at_keyword("AND") || self.at_keyword("OR") {
            self.bump_keyword(&mut node, Some(field::OPERATOR));
            let operand = self.parse_unary()?;
            node.push_field(field::OPERAND, operand);
        }
        Some(node.finish(self.source, start))
    }

    fn parse_unary(&mut self) -> Option<SyntaxNode> {
        if self.at_keyword("NOT") {
            return self.nested(|p| {
                let start = p.current_offset();
                let mut node = NodeBuilder::new(kind::NEGATED_EXPRESSION);
                p.bump_keyword(&mut node, None);
                let operand = p.parse_unary()?;
                node.push_field(field::OPERAND, operand);
                Some(node.finish(p.source, start))
            });
        }
        if self.at(TokenKind::LParen) {
            return self.nested(|p| {
                let start = p.current_offset();
                let mut node = NodeBuilder::new(kind::PARENTHESIZED_EXPRESSION);
                p.expect_punct(TokenKind::LParen, &mut node, None);
                let inner = p.parse_expression()?;
                node.push_field(field::EXPRESSION, inner);
                if !p.expect_punct(TokenKind::RParen, &mut node, None) {
                    return None;
                }
                Some(node.finish(p.source, start))
            });
        }
        self.parse_condition()
    }

    fn parse_condition(&mut self) -> Option<SyntaxNode> {
        let start = self.current_offset();
        let mut node = NodeBuilder::new(kind::CONDITION);

        let subject = self.parse_field_or_function("field name")?;
        node.push_field(field::SUBJECT, subject);

        let (operator, takes_set) = self.parse_comparison_operator()?;
        node.push_field(field::OPERATOR, operator);

        let value = if takes_set && self.at(TokenKind::LParen) {
            if self.nth_is_keyword(1, "SELECT") {
                self.parse_subquery()?
            } else {
                self.parse_value_list()?
            }
        } else {
            self.parse_literal()?
        };
        node.push_field(field::VALUE, value);

        Some(node.finish(self.source, start))
    }

    /// Field name or function call, as in a condition subject or a GROUP BY
    /// / ORDER BY target
    fn parse_field_or_function(&mut self, what: &str) -> Option<SyntaxNode> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Identifier && self.nth_at(1, TokenKind::LParen) => {
                self.parse_function_call(false)
            }
            Some(token) if self.is_name(&token) => {
                self.pos += 1;
                Some(self.leaf(token, kind::IDENTIFIER))
            }
            _ => {
                self.error_expected(what);
                None
            }
        }
    }

    /// Returns the operator node and whether it takes a list or subquery
    fn parse_comparison_operator(&mut self) -> Option<(SyntaxNode, bool)> {
        let token = self.peek()?;
        let symbolic = matches!(
            token.kind,
            TokenKind::Equal
                | TokenKind::NotEqual
                | TokenKind::Less
                | TokenKind::LessEqual
                | TokenKind::Greater
                | TokenKind::GreaterEqual
        );
        if symbolic {
            self.pos += 1;
            return Some((self.leaf(token, kind::COMPARISON_OPERATOR), false));
        }
        if self.at_keyword("LIKE") {
            self.pos += 1;
            return Some((self.leaf(token, kind::COMPARISON_OPERATOR), false));
        }
        if self.at_keyword("IN") || self.at_keyword("INCLUDES") || self.at_keyword("EXCLUDES") {
            self.pos += 1;
            return Some((self.leaf(token, kind::COMPARISON_OPERATOR), true));
        }
        if self.at_keyword("NOT") && self.nth_is_keyword(1, "IN") {
            let mut node = NodeBuilder::new(kind::COMPARISON_OPERATOR);
            self.bump_keyword(&mut node, None);
            self.bump_keyword(&mut node, None);
            return Some((node.finish(self.source, token.span.start), true));
        }
        self.error_expected("comparison operator");
        None
    }

    fn parse_value_list(&mut self) -> Option<SyntaxNode> {
        let start = self.current_offset();
        let mut node = NodeBuilder::new(kind::VALUE_LIST);
        self.expect_punct(TokenKind::LParen, &mut node, None);
        loop {
            let item = self.parse_literal()?;
            node.push_field(field::ITEM, item);
            if !self.at(TokenKind::Comma) {
                break;
            }
            self.expect_punct(TokenKind::Comma, &mut node, None);
        }
        if !self.expect_punct(TokenKind::RParen, &mut node, None) {
            return None;
        }
        Some(node.finish(self.source, start))
    }

    fn parse_literal(&mut self) -> Option<SyntaxNode> {
        let Some(token) = self.peek() else {
            self.error_expected("value");
            return None;
        };
        match token.kind {
            TokenKind::Colon => {
                let start = token.span.start;
                let mut node = NodeBuilder::new(kind::BIND_VARIABLE);
                self.expect_punct(TokenKind::Colon, &mut node, None);
                match self.peek() {
                    Some(name) if name.kind == TokenKind::Identifier && name.span.start == token.span.end => {
                        self.pos += 1;
                        node.push_field(field::NAME, self.leaf(name, kind::IDENTIFIER));
                        Some(node.finish(self.source, start))
                    }
                    _ => {
                        self.error_expected("bind variable name");
                        None
                    }
                }
            }
            TokenKind::Identifier if keywords::is_reserved(self.text(&token)) => {
                self.error_expected("value");
                None
            }
            TokenKind::Identifier if is_date_n_literal(self.text(&token)) => {
                self.parse_date_n_literal(token)
            }
            TokenKind::Identifier => {
                self.pos += 1;
                let kind = if is_currency_integer(self.text(&token)) {
                    kind::CURRENCY_INTEGER_LITERAL
                } else {
                    kind::IDENTIFIER
                };
                Some(self.leaf(token, kind))
            }
            other => match literal_kind(other) {
                Some(kind) => {
                    self.pos += 1;
                    Some(self.leaf(token, kind))
                }
                None => {
                    self.error_expected("value");
                    None
                }
            },
        }
    }

    /// `NAME:n` with no whitespace around the colon
    fn parse_date_n_literal(&mut self, name: Token) -> Option<SyntaxNode> {
        let adjacent = |a: Option<Token>, b: Option<Token>| match (a, b) {
            (Some(a), Some(b)) => a.span.end == b.span.start,
            _ => false,
        };
        let colon = self.peek_nth(1).filter(|t| t.kind == TokenKind::Colon);
        let number = self
            .peek_nth(2)
            .filter(|t| t.kind == TokenKind::IntegerLiteral);
        if colon.is_none() || number.is_none() || !adjacent(Some(name), colon) || !adjacent(colon, number) {
            let text = self.text(&name).to_string();
            self.pos += 1;
            self.error_here(format!("Expected ':n' after {text}"));
            return None;
        }
        let mut node = NodeBuilder::new(kind::DATE_N_LITERAL);
        self.pos += 1;
        node.push_field(field::NAME, self.leaf(name, kind::IDENTIFIER));
        self.expect_punct(TokenKind::Colon, &mut node, None);
        let number = self.bump()?;
        let variable = self.text(&number);
        if variable.parse::<i32>().is_err() {
            let message = format!("'{variable}' is not a valid date literal variable");
            self.errors.push(SyntaxError::new(message, number.span));
            return None;
        }
        node.push_field(field::VARIABLE, self.leaf(number, kind::INTEGER_LITERAL));
        Some(node.finish(self.source, name.span.start))
    }

    // ===== WITH =====

    fn parse_with_clause(&mut self) -> NodeBuilder {
        let mut node = NodeBuilder::new(kind::WITH_CLAUSE);
        self.bump_keyword(&mut node, None);
        if self.at_one_of(keywords::WITH_FILTERS) {
            self.bump_keyword(&mut node, Some(field::FILTER));
        } else if self.at_keyword("DATA") {
            if let Some(filter) = self.parse_data_category_filter() {
                node.push_field(field::FILTER, filter);
            }
        } else {
            self.error_expected("SECURITY_ENFORCED, USER_MODE, SYSTEM_MODE or DATA CATEGORY");
        }
        node
    }

    fn parse_data_category_filter(&mut self) -> Option<SyntaxNode> {
        let start = self.current_offset();
        let mut node = NodeBuilder::new(kind::DATA_CATEGORY_FILTER);
        self.bump_keyword(&mut node, None);
        if !self.expect_keyword("CATEGORY", &mut node) {
            return None;
        }
        loop {
            let condition = self.parse_data_category_condition()?;
            node.push_field(field::CONDITION, condition);
            if !self.at_keyword("AND") {
                break;
            }
            self.bump_keyword(&mut node, None);
        }
        Some(node.finish(self.source, start))
    }

    fn parse_data_category_condition(&mut self) -> Option<SyntaxNode> {
        let start = self.current_offset();
        let mut node = NodeBuilder::new(kind::DATA_CATEGORY_CONDITION);
        if !self.expect_name("data category group", &mut node, field::GROUP) {
            return None;
        }
        if !self.at_one_of(keywords::DATA_CATEGORY_SELECTORS) {
            self.error_expected("AT, ABOVE, BELOW or ABOVE_OR_BELOW");
            return None;
        }
        self.bump_keyword(&mut node, Some(field::SELECTOR));
        if self.at(TokenKind::LParen) {
            self.expect_punct(TokenKind::LParen, &mut node, None);
            loop {
                if !self.expect_name("data category", &mut node, field::VALUE) {
                    return None;
                }
                if !self.at(TokenKind::Comma) {
                    break;
                }
                self.expect_punct(TokenKind::Comma, &mut node, None);
            }
            if !self.expect_punct(TokenKind::RParen, &mut node, None) {
                return None;
            }
        } else if !self.expect_name("data category", &mut node, field::VALUE) {
            return None;
        }
        Some(node.finish(self.source, start))
    }

    // ===== GROUP BY / ORDER BY =====

    fn parse_group_by_clause(&mut self) -> NodeBuilder {
        let mut node = NodeBuilder::new(kind::GROUP_BY_CLAUSE);
        self.bump_keyword(&mut node, None);
        if !self.expect_keyword("BY", &mut node) {
            return node;
        }
        loop {
            match self.parse_field_or_function("grouping field") {
                Some(item) => node.push_field(field::ITEM, item),
                None => break,
            }
            if !self.at(TokenKind::Comma) {
                break;
            }
            self.expect_punct(TokenKind::Comma, &mut node, None);
        }
        node
    }

    fn parse_order_by_clause(&mut self) -> NodeBuilder {
        let mut node = NodeBuilder::new(kind::ORDER_BY_CLAUSE);
        self.bump_keyword(&mut node, None);
        if !self.expect_keyword("BY", &mut node) {
            return node;
        }
        loop {
            match self.parse_order_by_item() {
                Some(item) => node.push_field(field::ITEM, item),
                None => break,
            }
            if !self.at(TokenKind::Comma) {
                break;
            }
            self.expect_punct(TokenKind::Comma, &mut node, None);
        }
        node
    }

    fn parse_order_by_item(&mut self) -> Option<SyntaxNode> {
        let start = self.current_offset();
        let mut node = NodeBuilder::new(kind::ORDER_BY_ITEM);
        let target = self.parse_field_or_function("ordering field")?;
        node.push_field(field::EXPRESSION, target);
        if self.at_keyword("ASC") || self.at_keyword("DESC") {
            self.bump_keyword(&mut node, Some(field::DIRECTION));
        }
        if self.at_keyword("NULLS") {
            self.bump_keyword(&mut node, None);
            if self.at_keyword("FIRST") || self.at_keyword("LAST") {
                self.bump_keyword(&mut node, Some(field::NULLS));
            } else {
                self.error_expected("FIRST or LAST");
                return None;
            }
        }
        Some(node.finish(self.source, start))
    }

    // ===== LIMIT / OFFSET / FOR / UPDATE =====

    fn parse_integer_clause(&mut self, clause_kind: &'static str) -> NodeBuilder {
        let mut node = NodeBuilder::new(clause_kind);
        self.bump_keyword(&mut node, None);
        match self.peek() {
            Some(token)
                if token.kind == TokenKind::IntegerLiteral
                    && self.text(&token).parse::<u64>().is_ok() =>
            {
                self.pos += 1;
                node.push_field(field::VALUE, self.leaf(token, kind::INTEGER_LITERAL));
            }
            _ => self.error_expected("non-negative integer"),
        }
        node
    }

    fn parse_mode_clause(&mut self, clause_kind: &'static str, modes: &[&str]) -> NodeBuilder {
        let mut node = NodeBuilder::new(clause_kind);
        self.bump_keyword(&mut node, None);
        if self.at_one_of(modes) {
            self.bump_keyword(&mut node, Some(field::MODE));
        } else {
            self.error_expected(&modes.join(" or "));
        }
        node
    }
}

/// Leaf kind for literal tokens
fn literal_kind(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::StringLiteral => Some(kind::STRING_LITERAL),
        TokenKind::IntegerLiteral => Some(kind::INTEGER_LITERAL),
        TokenKind::DecimalLiteral => Some(kind::DECIMAL_LITERAL),
        TokenKind::DateLiteral => Some(kind::DATE_LITERAL),
        TokenKind::DateTimeLiteral => Some(kind::DATETIME_LITERAL),
        TokenKind::CurrencyDecimalLiteral => Some(kind::CURRENCY_DECIMAL_LITERAL),
        _ => None,
    }
}

/// Three-letter ISO code followed by digits: `USD100`
fn is_currency_integer(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() > 3
        && bytes[..3].iter().all(u8::is_ascii_alphabetic)
        && bytes[3..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sexp(source: &str) -> String {
        let output = parse(source);
        assert!(output.is_ok(), "unexpected errors: {:?}", output.errors);
        output.root.to_sexp()
    }

    #[test]
    fn test_simple_select() {
        assert_eq!(
            sexp("SELECT Id, Name FROM Account"),
            "(select_statement (keyword) select_list: (select_list item: (field_ref name: (identifier)) \
             item: (field_ref name: (identifier))) from_clause: (from_clause (keyword) object: (identifier)))"
        );
    }

    #[test]
    fn test_alias_is_not_a_keyword() {
        let output = parse("SELECT COUNT(Id) total FROM Account a WHERE Name = 'x'");
        assert!(output.is_ok(), "{:?}", output.errors);
        let from = output.root.child_by_field(field::FROM_CLAUSE).unwrap();
        assert_eq!(from.child_by_field(field::ALIAS).unwrap().text(), "a");
        let item = output
            .root
            .child_by_field(field::SELECT_LIST)
            .and_then(|l| l.child_by_field(field::ITEM))
            .unwrap();
        assert_eq!(item.kind(), kind::FUNCTION_CALL);
        assert_eq!(item.child_by_field(field::ALIAS).unwrap().text(), "total");
    }

    #[test]
    fn test_not_in_operator_node() {
        let source = "SELECT Id FROM Account WHERE Id NOT IN ('1', '2')";
        let output = parse(source);
        assert!(output.is_ok(), "{:?}", output.errors);
        let condition = output
            .root
            .child_by_field(field::WHERE_CLAUSE)
            .and_then(|w| w.child_by_field(field::CONDITION))
            .unwrap();
        assert_eq!(condition.kind(), kind::CONDITION);
        let op = condition.child_by_field(field::OPERATOR).unwrap();
        assert_eq!(op.text(), "NOT IN");
        let value = condition.child_by_field(field::VALUE).unwrap();
        assert_eq!(value.kind(), kind::VALUE_LIST);
        assert_eq!(value.children_by_field(field::ITEM).count(), 2);
    }

    #[test]
    fn test_semi_join_value_is_subquery() {
        let output = parse("SELECT Id FROM Account WHERE Id IN (SELECT AccountId FROM Contact)");
        assert!(output.is_ok(), "{:?}", output.errors);
        let value = output
            .root
            .child_by_field(field::WHERE_CLAUSE)
            .and_then(|w| w.child_by_field(field::CONDITION))
            .and_then(|c| c.child_by_field(field::VALUE))
            .unwrap();
        assert_eq!(value.kind(), kind::SUBQUERY);
    }

    #[test]
    fn test_date_n_literal_requires_adjacent_colon() {
        assert!(parse("SELECT Id FROM Account WHERE CreatedDate = LAST_N_DAYS:30").is_ok());
        assert!(!parse("SELECT Id FROM Account WHERE CreatedDate = LAST_N_DAYS : 30").is_ok());
        assert!(!parse("SELECT Id FROM Account WHERE CreatedDate = LAST_N_DAYS").is_ok());
    }

    #[test]
    fn test_currency_integer_reclassified() {
        let output = parse("SELECT Id FROM Opportunity WHERE Amount > USD5000");
        assert!(output.is_ok(), "{:?}", output.errors);
        let value = output
            .root
            .child_by_field(field::WHERE_CLAUSE)
            .and_then(|w| w.child_by_field(field::CONDITION))
            .and_then(|c| c.child_by_field(field::VALUE))
            .unwrap();
        assert_eq!(value.kind(), kind::CURRENCY_INTEGER_LITERAL);
    }

    #[test]
    fn test_all_trailing_clauses() {
        let output = parse(
            "SELECT Name, COUNT(Id) FROM Account USING SCOPE mine WHERE Name != null \
             WITH SECURITY_ENFORCED GROUP BY Name HAVING COUNT(Id) > 1 \
             ORDER BY Name DESC NULLS LAST LIMIT 10 OFFSET 5 FOR VIEW UPDATE TRACKING",
        );
        assert!(output.is_ok(), "{:?}", output.errors);
        for field in [
            field::USING_SCOPE_CLAUSE,
            field::WHERE_CLAUSE,
            field::WITH_CLAUSE,
            field::GROUP_BY_CLAUSE,
            field::HAVING_CLAUSE,
            field::ORDER_BY_CLAUSE,
            field::LIMIT_CLAUSE,
            field::OFFSET_CLAUSE,
            field::FOR_CLAUSE,
            field::UPDATE_CLAUSE,
        ] {
            assert!(output.root.child_by_field(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn test_for_update() {
        let output = parse("SELECT Id FROM Account FOR UPDATE");
        assert!(output.is_ok(), "{:?}", output.errors);
        let mode = output
            .root
            .child_by_field(field::FOR_CLAUSE)
            .and_then(|f| f.child_by_field(field::MODE))
            .unwrap();
        assert_eq!(mode.text(), "UPDATE");
    }

    #[test]
    fn test_out_of_order_clause() {
        let output = parse("SELECT Id FROM Account LIMIT 5 WHERE Name = 'x'");
        assert!(!output.is_ok());
        assert!(output.errors[0].message.contains("out of order"));
    }

    #[test]
    fn test_missing_from_is_reported_with_partial_tree() {
        let output = parse("SELECT Id, Name");
        assert_eq!(output.errors.len(), 1);
        assert!(output.errors[0].message.contains("FROM"));
        let list = output.root.child_by_field(field::SELECT_LIST).unwrap();
        assert_eq!(list.children_by_field(field::ITEM).count(), 2);
    }

    #[test]
    fn test_recovery_keeps_later_clauses() {
        let output = parse("SELECT Id FROM Account WHERE Name = AND Id = '1' LIMIT 5");
        assert!(!output.is_ok());
        assert!(output.root.child_by_field(field::LIMIT_CLAUSE).is_some());
        assert!(output.root.has_error());
    }

    #[test]
    fn test_empty_query() {
        let output = parse("   ");
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].message, "Empty query");
    }

    #[test]
    fn test_unbalanced_subquery_paren() {
        assert!(!parse("SELECT Id, (SELECT Id FROM Contacts FROM Account").is_ok());
        assert!(!parse("SELECT Id FROM Account)").is_ok());
    }

    #[test]
    fn test_nesting_limit() {
        let mut source = String::from("SELECT Id FROM Account WHERE ");
        for _ in 0..(MAX_NESTING_DEPTH + 1) {
            source.push('(');
        }
        source.push_str("Name = 'x'");
        for _ in 0..(MAX_NESTING_DEPTH + 1) {
            source.push(')');
        }
        let output = parse(&source);
        assert!(
            output
                .errors
                .iter()
                .any(|e| e.message.contains("nesting exceeds"))
        );
    }

    fn nested_subqueries(depth: usize) -> String {
        let mut source = String::from("SELECT Id FROM Account");
        for _ in 0..depth {
            source = format!("SELECT Id, ({source}) FROM Account");
        }
        source
    }

    #[test]
    fn test_subquery_depth_limit() {
        assert!(parse(&nested_subqueries(MAX_SUBQUERY_DEPTH)).is_ok());

        let output = parse(&nested_subqueries(MAX_SUBQUERY_DEPTH + 1));
        assert!(
            output
                .errors
                .iter()
                .any(|e| e.message.contains("Subquery nesting exceeds")),
            "{:?}",
            output.errors
        );
    }

    #[test]
    fn test_limit_takes_unsigned_integer() {
        assert!(parse("SELECT Id FROM Account LIMIT 5 OFFSET 10").is_ok());
        assert!(parse("SELECT Id FROM Account LIMIT 18446744073709551615").is_ok());
        assert!(!parse("SELECT Id FROM Account LIMIT -1").is_ok());
        assert!(!parse("SELECT Id FROM Account OFFSET -10").is_ok());
        assert!(!parse("SELECT Id FROM Account LIMIT 99999999999999999999999").is_ok());
    }

    #[test]
    fn test_date_n_variable_range() {
        assert!(parse("SELECT Id FROM Account WHERE CreatedDate = LAST_N_DAYS:2147483647").is_ok());
        let output = parse("SELECT Id FROM Account WHERE CreatedDate = LAST_N_DAYS:99999999999");
        assert!(
            output
                .errors
                .iter()
                .any(|e| e.message.contains("date literal variable")),
            "{:?}",
            output.errors
        );
    }

    #[test]
    fn test_group_and_order_objects() {
        for object in ["Order", "Group", "order"] {
            let source = format!("SELECT Id FROM {object}");
            let output = parse(&source);
            assert!(output.is_ok(), "{source}: {:?}", output.errors);
            let from = output.root.child_by_field(field::FROM_CLAUSE).unwrap();
            assert_eq!(from.child_by_field(field::OBJECT).unwrap().text(), object);
        }

        let output = parse("SELECT Id FROM Order o ORDER BY Name");
        assert!(output.is_ok(), "{:?}", output.errors);
        let from = output.root.child_by_field(field::FROM_CLAUSE).unwrap();
        assert_eq!(from.child_by_field(field::ALIAS).unwrap().text(), "o");
        assert!(output.root.child_by_field(field::ORDER_BY_CLAUSE).is_some());

        // `ORDER BY` right after FROM still needs an object
        assert!(!parse("SELECT Id FROM ORDER BY Name").is_ok());
    }

    #[test]
    fn test_is_currency_integer() {
        assert!(is_currency_integer("USD100"));
        assert!(!is_currency_integer("USD"));
        assert!(!is_currency_integer("Name1"));
        assert!(!is_currency_integer("US1D"));
    }
}
