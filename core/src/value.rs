use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The closed set of scalar kinds a mapped field can have. Operator
/// legality and value coercion both dispatch on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Decimal,
    Bool,
    Enum,
    DateTime,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Decimal => "decimal",
            FieldKind::Bool => "bool",
            FieldKind::Enum => "enum",
            FieldKind::DateTime => "datetime",
        };
        write!(f, "{}", name)
    }
}

/// A field value read from a record, or a literal coerced from the filter
/// string. `Null` stands for an empty optional field.
///
/// Decimal values are parsed with locale-invariant `f64` parsing; the tag
/// stays distinct from `Float` so diagnostics name the declared kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Decimal(f64),
    Bool(bool),
    Enum(String),
    DateTime(NaiveDateTime),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) | FieldValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Equality between two values of the same kind. Strings compare
    /// exactly; enum names compare case-insensitively (coercion already
    /// canonicalizes, this also tolerates accessor casing).
    pub fn eq_value(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => true,
            (FieldValue::String(a), FieldValue::String(b)) => a == b,
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a == b,
            (FieldValue::Float(a), FieldValue::Float(b))
            | (FieldValue::Decimal(a), FieldValue::Decimal(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Enum(a), FieldValue::Enum(b)) => a.eq_ignore_ascii_case(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a == b,
            _ => false,
        }
    }

    /// Total order between two values of the same kind; `Null` sorts
    /// first, floats order by `total_cmp`. Values of different kinds never
    /// meet here (one accessor produces both sides) and compare equal.
    pub fn cmp_value(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Null, _) => Ordering::Less,
            (_, FieldValue::Null) => Ordering::Greater,
            (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b))
            | (FieldValue::Decimal(a), FieldValue::Decimal(b)) => a.total_cmp(b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Enum(a), FieldValue::Enum(b)) => {
                a.to_lowercase().cmp(&b.to_lowercase())
            }
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Strip one layer of matching surrounding quotes. The lexer keeps quote
/// characters in value tokens; they are removed here, just before
/// coercion, so the AST round-trips the original text.
pub(crate) fn unquote(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'\'' || first == b'"') && bytes[bytes.len() - 1] == first {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

/// Coerce an unquoted literal to `kind`. `variants` is consulted for
/// `Enum` only: the literal resolves case-insensitively to a registered
/// variant name. Returns `None` when the literal cannot be converted.
pub(crate) fn coerce(kind: FieldKind, literal: &str, variants: &[String]) -> Option<FieldValue> {
    match kind {
        FieldKind::String => Some(FieldValue::String(literal.to_string())),
        FieldKind::Integer => literal.parse::<i64>().ok().map(FieldValue::Integer),
        FieldKind::Float => literal.parse::<f64>().ok().map(FieldValue::Float),
        FieldKind::Decimal => literal.parse::<f64>().ok().map(FieldValue::Decimal),
        FieldKind::Bool => {
            if literal.eq_ignore_ascii_case("true") {
                Some(FieldValue::Bool(true))
            } else if literal.eq_ignore_ascii_case("false") {
                Some(FieldValue::Bool(false))
            } else {
                None
            }
        }
        FieldKind::Enum => variants
            .iter()
            .find(|variant| variant.eq_ignore_ascii_case(literal))
            .map(|variant| FieldValue::Enum(variant.clone())),
        FieldKind::DateTime => parse_date_time(literal).map(FieldValue::DateTime),
    }
}

fn parse_date_time(literal: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(literal) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(literal, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(literal, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
