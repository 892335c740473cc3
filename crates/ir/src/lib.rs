// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SOQL LSP - Abstract Syntax Tree
//!
//! This crate provides the typed AST for SOQL queries. The AST is designed to:
//! - Carry exact byte spans on every node, for cursor-based tooling
//! - Model each syntactic choice as an enum matched exhaustively
//! - Serialize to JSON with serde

pub mod condition;
pub mod field;
pub mod literal;
pub mod query;
pub mod span;

// Re-export commonly used types
pub use condition::{
    Condition, ConditionValue, DateLiteralVariable, FieldOrFunction, HavingClause, LiteralTypes,
    LogicalOperator, Operator, ParenBalanceError, TermPrefix, WhereClause, WhereTerm,
};
pub use field::{
    Field, FieldRelationship, FieldSubquery, FieldTypeof, FunctionExpression, FunctionParameter,
    SimpleField, TypeofCondition,
};
pub use literal::{DATE_LITERALS, DATE_N_LITERALS, Literal, LiteralType};
pub use query::{
    DataCategoryCondition, DataCategorySelector, ForClause, GroupByClause, NullsOrder,
    OrderByClause, Query, SortOrder, Subquery, SubqueryRef, UpdateClause, WithClause,
};
pub use span::{Span, Spanned};
