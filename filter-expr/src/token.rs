use serde::{Deserialize, Serialize};

/// Classification of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Property,
    Value,
    Operator,
    /// `,`
    LogicalAnd,
    /// `|`
    LogicalOr,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
}

/// A single token produced by [`tokenize`](crate::tokenize), carrying the
/// byte offset it started at in the filter string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: '{}' at {}", self.kind, self.text, self.position)
    }
}
