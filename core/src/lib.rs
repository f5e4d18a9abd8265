//! Filter, sort and paginate typed in-memory record collections from a
//! compact textual query (e.g. `Category==(Food|Electronics),Price>=2.00`
//! with sorts like `-Price,Name`).
//!
//! The pieces: a per-type [`FieldMap`] declares which field keys may be
//! filtered or sorted and how to read them; [`compile_filter`] turns a
//! filter string into a reusable predicate; [`SiftProcessor`] sequences
//! filter → sort → paginate for a [`SiftQuery`]. Fields can opt out of the
//! built-in semantics entirely via [`CustomFilter`]/[`CustomSort`]
//! handlers registered in [`CustomHandlers`].

pub mod custom;
pub mod errors;
pub mod filtering;
pub mod mapping;
pub mod model;
pub mod pagination;
pub mod processor;
pub mod sorting;
pub mod value;

pub use custom::{CustomFilter, CustomHandlers, CustomSort, Predicate};
pub use errors::{FilterError, MappingError, SiftError, SortError};
pub use filtering::{compile, compile_filter};
pub use mapping::{FieldAccessor, FieldMap, FieldMapBuilder, Mapper, PropertyMapping};
pub use model::SiftQuery;
pub use pagination::paginate;
pub use processor::{SiftOptions, SiftProcessor};
pub use sorting::{apply_sort, build_comparator, parse_sorts, Comparator, SortTerm};
pub use value::{FieldKind, FieldValue};

// The expression language is re-exported so downstream callers need only
// one dependency.
pub use sift_filter_expr::{
    build_tree, parse, tokenize, FilterNode, FilterOperator, LogicalOperator, ParseError, Token,
    TokenKind,
};
