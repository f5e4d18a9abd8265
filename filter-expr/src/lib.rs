//! The filter expression language: tokens, operators, lexer and tree
//! builder.
//!
//! A filter string like `Category==(Food|Electronics),Price>=2.00` is
//! lexed into a [`Token`] stream and built into a [`FilterNode`] tree.
//! This crate knows nothing about record types; compiling a tree into a
//! predicate over a concrete type lives in `sift-core`.

mod errors;
mod lexer;
mod operators;
mod token;
mod tree;

pub use errors::ParseError;
pub use lexer::tokenize;
pub use operators::{FilterOperator, LogicalOperator};
pub use token::{Token, TokenKind};
pub use tree::{build_tree, FilterNode};

/// Tokenize and build in one step.
pub fn parse(filter: &str) -> Result<FilterNode, ParseError> {
    build_tree(&tokenize(filter))
}
