use serde::{Deserialize, Serialize};

/// Comparison operators of the filter language.
///
/// Each operator has exactly one surface string; lexing resolves surface
/// strings longest-match-first so that e.g. `!=|` wins over `!=` and `==*`
/// over `==`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Contains,
    DoesNotContain,
    StartsWith,
    EndsWith,
    DoesNotStartWith,
    DoesNotEndWith,
    CaseInsensitiveEquals,
    CaseInsensitiveNotEquals,
    CaseInsensitiveContains,
    CaseInsensitiveDoesNotContain,
    CaseInsensitiveStartsWith,
    CaseInsensitiveEndsWith,
    CaseInsensitiveDoesNotStartWith,
    CaseInsensitiveDoesNotEndWith,
    In,
    NotIn,
}

/// Logical connective between sibling expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
}

/// Operator surfaces ordered longest-first, so a linear scan implements
/// longest-match lexing.
pub(crate) const OPERATORS: &[(&str, FilterOperator)] = &[
    ("!_-=*", FilterOperator::CaseInsensitiveDoesNotEndWith),
    ("!@=*", FilterOperator::CaseInsensitiveDoesNotContain),
    ("!_=*", FilterOperator::CaseInsensitiveDoesNotStartWith),
    ("_-=*", FilterOperator::CaseInsensitiveEndsWith),
    ("!_-=", FilterOperator::DoesNotEndWith),
    ("==*", FilterOperator::CaseInsensitiveEquals),
    ("!=*", FilterOperator::CaseInsensitiveNotEquals),
    ("@=*", FilterOperator::CaseInsensitiveContains),
    ("_=*", FilterOperator::CaseInsensitiveStartsWith),
    ("!@=", FilterOperator::DoesNotContain),
    ("!_=", FilterOperator::DoesNotStartWith),
    ("_-=", FilterOperator::EndsWith),
    ("!=|", FilterOperator::NotIn),
    (">=", FilterOperator::GreaterThanOrEqual),
    ("<=", FilterOperator::LessThanOrEqual),
    ("==", FilterOperator::Equals),
    ("!=", FilterOperator::NotEquals),
    ("=|", FilterOperator::In),
    ("@=", FilterOperator::Contains),
    ("_=", FilterOperator::StartsWith),
    (">", FilterOperator::GreaterThan),
    ("<", FilterOperator::LessThan),
];

impl FilterOperator {
    /// Longest operator surface starting at the beginning of `input`.
    pub fn match_longest(input: &str) -> Option<(FilterOperator, &'static str)> {
        OPERATORS
            .iter()
            .find(|(surface, _)| input.starts_with(surface))
            .map(|&(surface, op)| (op, surface))
    }

    /// Resolve an exact surface string.
    pub fn from_surface(surface: &str) -> Option<FilterOperator> {
        OPERATORS
            .iter()
            .find(|(s, _)| *s == surface)
            .map(|&(_, op)| op)
    }

    /// The canonical surface string of this operator.
    pub fn surface(self) -> &'static str {
        OPERATORS
            .iter()
            .find(|(_, op)| *op == self)
            .map(|(s, _)| *s)
            .unwrap_or_default()
    }

    /// `In` / `NotIn`.
    pub fn is_membership(self) -> bool {
        matches!(self, FilterOperator::In | FilterOperator::NotIn)
    }

    /// Operators that only make sense on string fields: containment,
    /// prefix/suffix tests, and every case-insensitive variant.
    pub fn is_string_only(self) -> bool {
        use FilterOperator::*;
        matches!(
            self,
            Contains
                | DoesNotContain
                | StartsWith
                | EndsWith
                | DoesNotStartWith
                | DoesNotEndWith
                | CaseInsensitiveEquals
                | CaseInsensitiveNotEquals
                | CaseInsensitiveContains
                | CaseInsensitiveDoesNotContain
                | CaseInsensitiveStartsWith
                | CaseInsensitiveEndsWith
                | CaseInsensitiveDoesNotStartWith
                | CaseInsensitiveDoesNotEndWith
        )
    }

    /// Operators whose result is the negation of a positive test. A null
    /// field value satisfies exactly these.
    pub fn is_negated(self) -> bool {
        use FilterOperator::*;
        matches!(
            self,
            NotEquals
                | DoesNotContain
                | DoesNotStartWith
                | DoesNotEndWith
                | CaseInsensitiveNotEquals
                | CaseInsensitiveDoesNotContain
                | CaseInsensitiveDoesNotStartWith
                | CaseInsensitiveDoesNotEndWith
                | NotIn
        )
    }

    /// Ordering comparisons, valid on numeric, decimal and date fields.
    pub fn is_ordering(self) -> bool {
        use FilterOperator::*;
        matches!(
            self,
            GreaterThan | GreaterThanOrEqual | LessThan | LessThanOrEqual
        )
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.surface())
    }
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalOperator::And => write!(f, ","),
            LogicalOperator::Or => write!(f, "|"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_match_wins() {
        assert_eq!(
            FilterOperator::match_longest("!=|rest"),
            Some((FilterOperator::NotIn, "!=|"))
        );
        assert_eq!(
            FilterOperator::match_longest("!=rest"),
            Some((FilterOperator::NotEquals, "!="))
        );
        assert_eq!(
            FilterOperator::match_longest("==*food"),
            Some((FilterOperator::CaseInsensitiveEquals, "==*"))
        );
        assert_eq!(
            FilterOperator::match_longest(">=2"),
            Some((FilterOperator::GreaterThanOrEqual, ">="))
        );
        assert_eq!(
            FilterOperator::match_longest(">2"),
            Some((FilterOperator::GreaterThan, ">"))
        );
        assert_eq!(
            FilterOperator::match_longest("!_-=*x"),
            Some((FilterOperator::CaseInsensitiveDoesNotEndWith, "!_-=*"))
        );
    }

    #[test]
    fn no_surface_is_a_broken_prefix() {
        // Every surface must resolve to itself under longest-match.
        for &(surface, op) in OPERATORS {
            assert_eq!(FilterOperator::match_longest(surface), Some((op, surface)));
        }
    }

    #[test]
    fn surface_round_trip() {
        for &(surface, op) in OPERATORS {
            assert_eq!(op.surface(), surface);
            assert_eq!(FilterOperator::from_surface(surface), Some(op));
        }
    }

    #[test]
    fn non_operator_input() {
        assert_eq!(FilterOperator::match_longest("Name"), None);
        assert_eq!(FilterOperator::from_surface("="), None);
    }
}
