/// Structural grammar violations raised while building a filter tree.
///
/// Positions are byte offsets into the original filter string, taken from
/// the offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    EmptyExpression,
    UnmatchedParen { position: usize },
    ExpectedProperty { position: usize },
    MissingOperator { position: usize },
    UnknownOperator { operator: String, position: usize },
    MissingValue { position: usize },
    EmptyValueGroup { position: usize },
    MixedValueGroupSeparators { position: usize },
    GroupedValuesNotSupported { operator: String, position: usize },
    ExpectedLogicalOperator { position: usize },
    MixedLogicalOperators { position: usize },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyExpression => write!(f, "Empty filter expression"),
            ParseError::UnmatchedParen { position } => {
                write!(f, "Unmatched parenthesis at position {}", position)
            }
            ParseError::ExpectedProperty { position } => {
                write!(f, "Expected a property name at position {}", position)
            }
            ParseError::MissingOperator { position } => {
                write!(f, "Comparison is missing its operator at position {}", position)
            }
            ParseError::UnknownOperator { operator, position } => {
                write!(f, "Unknown operator '{}' at position {}", operator, position)
            }
            ParseError::MissingValue { position } => {
                write!(f, "Comparison is missing its value at position {}", position)
            }
            ParseError::EmptyValueGroup { position } => {
                write!(f, "Value group at position {} contains no values", position)
            }
            ParseError::MixedValueGroupSeparators { position } => {
                write!(
                    f,
                    "Value group separators must be all ',' or all '|' (position {})",
                    position
                )
            }
            ParseError::GroupedValuesNotSupported { operator, position } => {
                write!(
                    f,
                    "Operator '{}' does not support grouped values (position {}); use =| or !=|",
                    operator, position
                )
            }
            ParseError::ExpectedLogicalOperator { position } => {
                write!(f, "Expected ',' or '|' at position {}", position)
            }
            ParseError::MixedLogicalOperators { position } => {
                write!(
                    f,
                    "Mixed logical operators at position {}; use parentheses to group",
                    position
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}
