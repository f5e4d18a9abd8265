use crate::operators::FilterOperator;
use crate::token::{Token, TokenKind};

/// Split a filter string into tokens.
///
/// Empty or whitespace-only input yields no tokens, meaning "no filter".
/// The scan keeps two pieces of state: whether the last emitted token was
/// an operator (the following bare word or `(` is then value territory),
/// and the current value-group nesting depth. A `(` emitted right after an
/// operator opens a value group; everything inside it lexes as values.
///
/// Quoted values (`'...'` or `"..."`) are consumed verbatim, embedded
/// whitespace included, and keep their quote characters in the token text.
/// An unterminated quote consumes to the end of the input; that is defined
/// behavior, not an error.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut i = 0;
    let mut after_operator = false;
    let mut value_group_depth = 0usize;

    while let Some(c) = input[i..].chars().next() {
        if c.is_whitespace() {
            i += c.len_utf8();
            continue;
        }

        if c == '(' {
            // An operator immediately before means this paren opens a
            // value group, not a logical grouping.
            if last_kind(&tokens) == Some(TokenKind::Operator) {
                value_group_depth += 1;
            }
            tokens.push(Token::new(TokenKind::OpenParen, "(", i));
            i += 1;
            continue;
        }

        if c == ')' {
            tokens.push(Token::new(TokenKind::CloseParen, ")", i));
            value_group_depth = value_group_depth.saturating_sub(1);
            i += 1;
            continue;
        }

        if let Some((_, surface)) = FilterOperator::match_longest(&input[i..]) {
            tokens.push(Token::new(TokenKind::Operator, surface, i));
            after_operator = true;
            i += surface.len();
            continue;
        }

        if c == ',' {
            tokens.push(Token::new(TokenKind::LogicalAnd, ",", i));
            i += 1;
            continue;
        }

        if c == '|' {
            tokens.push(Token::new(TokenKind::LogicalOr, "|", i));
            i += 1;
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            while let Some(d) = input[i..].chars().next() {
                if d.is_ascii_digit() || d == '.' {
                    i += 1;
                } else {
                    break;
                }
            }
            tokens.push(Token::new(TokenKind::Value, &input[start..i], start));
            after_operator = false;
            continue;
        }

        if c == '\'' || c == '"' {
            let start = i;
            i = consume_quoted(input, start, c);
            tokens.push(Token::new(TokenKind::Value, &input[start..i], start));
            after_operator = false;
            continue;
        }

        // Bare word: maximal run up to whitespace, a structural character,
        // or the start of an operator.
        let start = i;
        while let Some(b) = input[i..].chars().next() {
            if b.is_whitespace()
                || b == '('
                || b == ')'
                || b == ','
                || b == '|'
                || FilterOperator::match_longest(&input[i..]).is_some()
            {
                break;
            }
            i += b.len_utf8();
        }
        if i > start {
            let text = &input[start..i];
            if after_operator || value_group_depth > 0 {
                tokens.push(Token::new(TokenKind::Value, text, start));
                after_operator = false;
            } else {
                tokens.push(Token::new(TokenKind::Property, text, start));
            }
        }
    }

    tokens
}

fn last_kind(tokens: &[Token]) -> Option<TokenKind> {
    tokens.last().map(|t| t.kind)
}

fn consume_quoted(input: &str, start: usize, quote: char) -> usize {
    let mut i = start + quote.len_utf8();
    while let Some(c) = input[i..].chars().next() {
        i += c.len_utf8();
        if c == quote {
            return i;
        }
    }
    i
}
