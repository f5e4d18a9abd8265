use crate::value::FieldKind;
use sift_filter_expr::ParseError;

/// Errors raised while building a field map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    DuplicateKey(String),
    /// A key with no backing field needs a custom handler for every
    /// operation it is enabled for; there is no default way to read a
    /// field that does not exist.
    SyntheticKeyWithoutHandler(String),
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingError::DuplicateKey(key) => {
                write!(f, "Field key '{}' is registered more than once", key)
            }
            MappingError::SyntheticKeyWithoutHandler(key) => {
                write!(
                    f,
                    "Synthetic key '{}' has no backing field and no custom handler for its enabled operations",
                    key
                )
            }
        }
    }
}

impl std::error::Error for MappingError {}

/// Errors raised while validating or compiling a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    Parse(ParseError),
    /// No field map was registered for the record type.
    UnmappedType(&'static str),
    /// Every referenced property that is unmapped or not filterable, in
    /// filter-string order.
    UnmappedProperties(Vec<String>),
    UnsupportedOperator {
        property: String,
        operator: String,
        kind: FieldKind,
    },
    ValueCoercion {
        property: String,
        value: String,
        target: FieldKind,
    },
    CustomFilterNotRegistered {
        property: String,
        handler: String,
    },
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::Parse(err) => write!(f, "Filter parse error: {}", err),
            FilterError::UnmappedType(type_name) => {
                write!(f, "Not allowed to filter on type {}", type_name)
            }
            FilterError::UnmappedProperties(properties) => {
                write!(
                    f,
                    "Not allowed to filter on these properties: {}",
                    properties.join(", ")
                )
            }
            FilterError::UnsupportedOperator {
                property,
                operator,
                kind,
            } => {
                write!(
                    f,
                    "Operator '{}' is not supported on {} field '{}'",
                    operator, kind, property
                )
            }
            FilterError::ValueCoercion {
                property,
                value,
                target,
            } => {
                write!(
                    f,
                    "Cannot convert '{}' to {} for field '{}'",
                    value, target, property
                )
            }
            FilterError::CustomFilterNotRegistered { property, handler } => {
                write!(
                    f,
                    "No custom filter '{}' registered for field '{}'",
                    handler, property
                )
            }
        }
    }
}

impl std::error::Error for FilterError {}

impl From<ParseError> for FilterError {
    fn from(err: ParseError) -> Self {
        FilterError::Parse(err)
    }
}

/// Errors raised while validating or applying a sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    UnmappedType(&'static str),
    UnmappedProperties(Vec<String>),
    CustomSortNotRegistered {
        property: String,
        handler: String,
    },
}

impl std::fmt::Display for SortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortError::UnmappedType(type_name) => {
                write!(f, "Not allowed to sort on type {}", type_name)
            }
            SortError::UnmappedProperties(properties) => {
                write!(
                    f,
                    "Not allowed to sort on these properties: {}",
                    properties.join(", ")
                )
            }
            SortError::CustomSortNotRegistered { property, handler } => {
                write!(
                    f,
                    "No custom sort '{}' registered for field '{}'",
                    handler, property
                )
            }
        }
    }
}

impl std::error::Error for SortError {}

/// Top-level error of the filter → sort → paginate pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum SiftError {
    Filter(FilterError),
    Sort(SortError),
}

impl std::fmt::Display for SiftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiftError::Filter(err) => write!(f, "{}", err),
            SiftError::Sort(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SiftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SiftError::Filter(err) => Some(err),
            SiftError::Sort(err) => Some(err),
        }
    }
}

impl From<FilterError> for SiftError {
    fn from(err: FilterError) -> Self {
        SiftError::Filter(err)
    }
}

impl From<SortError> for SiftError {
    fn from(err: SortError) -> Self {
        SiftError::Sort(err)
    }
}
