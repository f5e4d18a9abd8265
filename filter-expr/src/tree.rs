use serde::{Deserialize, Serialize};

use crate::errors::ParseError;
use crate::operators::{FilterOperator, LogicalOperator};
use crate::token::{Token, TokenKind};

/// A parsed filter expression.
///
/// `GroupComparison` always carries `In` or `NotIn` and at least one value.
/// A `Logical` node has two or more children combined by a single
/// connective; siblings combined by different connectives at the same
/// nesting level are rejected at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterNode {
    Comparison {
        property: String,
        operator: FilterOperator,
        value: String,
    },
    GroupComparison {
        property: String,
        operator: FilterOperator,
        values: Vec<String>,
    },
    Logical {
        operator: LogicalOperator,
        children: Vec<FilterNode>,
    },
}

impl FilterNode {
    /// Property names referenced anywhere in the tree, left to right,
    /// deduplicated case-insensitively.
    pub fn properties(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        self.collect_properties(&mut seen);
        seen
    }

    fn collect_properties<'a>(&'a self, seen: &mut Vec<&'a str>) {
        match self {
            FilterNode::Comparison { property, .. }
            | FilterNode::GroupComparison { property, .. } => {
                if !seen.iter().any(|p| p.eq_ignore_ascii_case(property)) {
                    seen.push(property);
                }
            }
            FilterNode::Logical { children, .. } => {
                for child in children {
                    child.collect_properties(seen);
                }
            }
        }
    }

    /// Render the tree back into filter-string syntax. Value groups use
    /// `|` as separator; the choice does not affect evaluation.
    pub fn to_filter_string(&self) -> String {
        match self {
            FilterNode::Comparison {
                property,
                operator,
                value,
            } => format!("{}{}{}", property, operator, value),
            FilterNode::GroupComparison {
                property,
                operator,
                values,
            } => format!("{}{}({})", property, operator, values.join("|")),
            FilterNode::Logical { operator, children } => {
                let sep = operator.to_string();
                children
                    .iter()
                    .map(|child| match child {
                        FilterNode::Logical { .. } => format!("({})", child.to_filter_string()),
                        _ => child.to_filter_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(&sep)
            }
        }
    }
}

/// Build a filter tree from a token stream.
pub fn build_tree(tokens: &[Token]) -> Result<FilterNode, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyExpression);
    }
    build_level(tokens)
}

fn build_level(tokens: &[Token]) -> Result<FilterNode, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyExpression);
    }

    let mut nodes: Vec<FilterNode> = Vec::new();
    let mut level_op: Option<LogicalOperator> = None;
    let mut i = 0;

    while i < tokens.len() {
        let node = if is_logical_open(tokens, i) {
            let close = find_matching_logical_paren(tokens, i)?;
            let inner = &tokens[i + 1..close];
            if inner.is_empty() {
                return Err(ParseError::EmptyExpression);
            }
            let node = build_level(inner)?;
            i = close + 1;
            node
        } else {
            parse_comparison(tokens, &mut i)?
        };
        nodes.push(node);

        if i < tokens.len() {
            let connective = match tokens[i].kind {
                TokenKind::LogicalAnd => LogicalOperator::And,
                TokenKind::LogicalOr => LogicalOperator::Or,
                TokenKind::CloseParen => {
                    return Err(ParseError::UnmatchedParen {
                        position: tokens[i].position,
                    })
                }
                _ => {
                    return Err(ParseError::ExpectedLogicalOperator {
                        position: tokens[i].position,
                    })
                }
            };
            match level_op {
                None => level_op = Some(connective),
                Some(existing) if existing != connective => {
                    return Err(ParseError::MixedLogicalOperators {
                        position: tokens[i].position,
                    })
                }
                Some(_) => {}
            }
            i += 1;
        }
    }

    if nodes.len() > 1 {
        if let Some(operator) = level_op {
            return Ok(FilterNode::Logical {
                operator,
                children: nodes,
            });
        }
    }
    nodes.pop().ok_or(ParseError::EmptyExpression)
}

/// An open paren starts a logical grouping unless the previous token is an
/// operator, in which case it opens a value group.
fn is_logical_open(tokens: &[Token], i: usize) -> bool {
    tokens[i].kind == TokenKind::OpenParen
        && (i == 0 || tokens[i - 1].kind != TokenKind::Operator)
}

/// Find the close paren matching the logical open at `open_idx`,
/// depth-counting while skipping over value groups entirely so they never
/// affect logical nesting depth.
fn find_matching_logical_paren(tokens: &[Token], open_idx: usize) -> Result<usize, ParseError> {
    let mut depth = 0usize;
    let mut i = open_idx;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::OpenParen => {
                if i > 0 && tokens[i - 1].kind == TokenKind::Operator {
                    i = find_value_group_close(tokens, i)?;
                } else {
                    depth += 1;
                }
            }
            TokenKind::CloseParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(ParseError::UnmatchedParen {
        position: tokens[open_idx].position,
    })
}

fn find_value_group_close(tokens: &[Token], open_idx: usize) -> Result<usize, ParseError> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open_idx) {
        match token.kind {
            TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(ParseError::UnmatchedParen {
        position: tokens[open_idx].position,
    })
}

fn parse_comparison(tokens: &[Token], i: &mut usize) -> Result<FilterNode, ParseError> {
    let property = match tokens.get(*i) {
        Some(token) if token.kind == TokenKind::Property => token.text.clone(),
        Some(token) if token.kind == TokenKind::CloseParen => {
            return Err(ParseError::UnmatchedParen {
                position: token.position,
            })
        }
        Some(token) => {
            return Err(ParseError::ExpectedProperty {
                position: token.position,
            })
        }
        None => return Err(ParseError::EmptyExpression),
    };

    let operator = match tokens.get(*i + 1) {
        Some(token) if token.kind == TokenKind::Operator => {
            FilterOperator::from_surface(&token.text).ok_or(ParseError::UnknownOperator {
                operator: token.text.clone(),
                position: token.position,
            })?
        }
        Some(token) => {
            return Err(ParseError::MissingOperator {
                position: token.position,
            })
        }
        None => {
            return Err(ParseError::MissingOperator {
                position: tokens[*i].position,
            })
        }
    };

    match tokens.get(*i + 2) {
        Some(token) if token.kind == TokenKind::OpenParen => {
            let open_idx = *i + 2;
            let close_idx = find_value_group_close(tokens, open_idx)?;
            let values = parse_value_group(&tokens[open_idx + 1..close_idx], tokens[open_idx].position)?;
            *i = close_idx + 1;
            group_node(property, operator, values, tokens[open_idx].position)
        }
        Some(token) if token.kind == TokenKind::Value => {
            let value = token.text.clone();
            *i += 3;
            if operator.is_membership() {
                Ok(FilterNode::GroupComparison {
                    property,
                    operator,
                    values: vec![value],
                })
            } else {
                Ok(FilterNode::Comparison {
                    property,
                    operator,
                    value,
                })
            }
        }
        Some(token) => Err(ParseError::MissingValue {
            position: token.position,
        }),
        None => Err(ParseError::MissingValue {
            position: tokens[*i + 1].position,
        }),
    }
}

/// Values between a value group's parens: `Value (sep Value)*` where `sep`
/// is uniformly `,` or uniformly `|`.
fn parse_value_group(inner: &[Token], group_position: usize) -> Result<Vec<String>, ParseError> {
    let mut values = Vec::new();
    let mut separator: Option<TokenKind> = None;
    let mut expect_value = true;

    for token in inner {
        match token.kind {
            TokenKind::Value if expect_value => {
                values.push(token.text.clone());
                expect_value = false;
            }
            TokenKind::LogicalAnd | TokenKind::LogicalOr if !expect_value => {
                match separator {
                    None => separator = Some(token.kind),
                    Some(kind) if kind != token.kind => {
                        return Err(ParseError::MixedValueGroupSeparators {
                            position: token.position,
                        })
                    }
                    Some(_) => {}
                }
                expect_value = true;
            }
            _ => {
                return Err(ParseError::MissingValue {
                    position: token.position,
                })
            }
        }
    }
    if expect_value && !values.is_empty() {
        // Trailing separator with no value after it.
        return Err(ParseError::EmptyValueGroup {
            position: group_position,
        });
    }
    Ok(values)
}

/// Dispatch a parsed value group. Membership operators take the group as
/// is; `==`/`!=` promote a multi-value group to membership (equals-any and
/// its complement); any other operator accepts exactly one value.
fn group_node(
    property: String,
    operator: FilterOperator,
    values: Vec<String>,
    position: usize,
) -> Result<FilterNode, ParseError> {
    if values.is_empty() {
        return Err(ParseError::EmptyValueGroup { position });
    }

    if operator.is_membership() {
        return Ok(FilterNode::GroupComparison {
            property,
            operator,
            values,
        });
    }

    if values.len() == 1 {
        let mut values = values;
        return Ok(FilterNode::Comparison {
            property,
            operator,
            value: values.remove(0),
        });
    }

    match operator {
        FilterOperator::Equals => Ok(FilterNode::GroupComparison {
            property,
            operator: FilterOperator::In,
            values,
        }),
        FilterOperator::NotEquals => Ok(FilterNode::GroupComparison {
            property,
            operator: FilterOperator::NotIn,
            values,
        }),
        _ => Err(ParseError::GroupedValuesNotSupported {
            operator: operator.surface().to_string(),
            position,
        }),
    }
}
