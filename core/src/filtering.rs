use log::debug;
use sift_filter_expr::{build_tree, tokenize, FilterNode, FilterOperator, LogicalOperator};

use crate::custom::{CustomHandlers, Predicate};
use crate::errors::FilterError;
use crate::mapping::{FieldAccessor, FieldMap, PropertyMapping};
use crate::value::{coerce, unquote, FieldKind, FieldValue};

/// Parse, authorize and compile a filter string against a field map.
///
/// Returns `Ok(None)` when the string is empty or whitespace-only (no
/// filter). Every referenced property must be mapped and filterable;
/// offenders are reported together before any compilation happens.
pub fn compile_filter<T: 'static>(
    filters: &str,
    map: &FieldMap<T>,
    handlers: &CustomHandlers<T>,
) -> Result<Option<Predicate<T>>, FilterError> {
    let tokens = tokenize(filters);
    if tokens.is_empty() {
        return Ok(None);
    }
    let node = build_tree(&tokens)?;
    map.authorize_filter(&node.properties())?;
    let predicate = compile(&node, map, handlers)?;
    debug!(
        "compiled filter '{}' over {} propert{}",
        filters,
        node.properties().len(),
        if node.properties().len() == 1 { "y" } else { "ies" }
    );
    Ok(Some(predicate))
}

/// Compile a filter tree into a reusable predicate. Pure function of the
/// tree and the (immutable) field map; the predicate owns clones of the
/// accessors it needs and can outlive both arguments.
pub fn compile<T: 'static>(
    node: &FilterNode,
    map: &FieldMap<T>,
    handlers: &CustomHandlers<T>,
) -> Result<Predicate<T>, FilterError> {
    match node {
        FilterNode::Comparison {
            property,
            operator,
            value,
        } => compile_comparison(property, *operator, value, map, handlers),
        FilterNode::GroupComparison {
            property,
            operator,
            values,
        } => compile_group(property, *operator, values, map, handlers),
        FilterNode::Logical { operator, children } => {
            let compiled = children
                .iter()
                .map(|child| compile(child, map, handlers))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(match operator {
                LogicalOperator::And => {
                    Box::new(move |record: &T| compiled.iter().all(|p| p(record)))
                }
                LogicalOperator::Or => {
                    Box::new(move |record: &T| compiled.iter().any(|p| p(record)))
                }
            })
        }
    }
}

fn compile_comparison<T: 'static>(
    property: &str,
    operator: FilterOperator,
    value: &str,
    map: &FieldMap<T>,
    handlers: &CustomHandlers<T>,
) -> Result<Predicate<T>, FilterError> {
    let mapping = lookup(map, property)?;

    if let Some(handler_id) = mapping.custom_filter() {
        let handler = handlers.filter(handler_id).ok_or_else(|| {
            FilterError::CustomFilterNotRegistered {
                property: property.to_string(),
                handler: handler_id.to_string(),
            }
        })?;
        return Ok(handler.build_predicate(operator.surface(), value));
    }

    let (accessor, kind) = field_access(mapping, property)?;
    check_operator(property, operator, kind)?;
    let literal = coerce_literal(property, value, kind, mapping.variants())?;
    Ok(Box::new(move |record: &T| {
        eval_comparison(operator, &accessor(record), &literal)
    }))
}

fn compile_group<T: 'static>(
    property: &str,
    operator: FilterOperator,
    values: &[String],
    map: &FieldMap<T>,
    handlers: &CustomHandlers<T>,
) -> Result<Predicate<T>, FilterError> {
    let mapping = lookup(map, property)?;

    if let Some(handler_id) = mapping.custom_filter() {
        let handler = handlers.filter(handler_id).ok_or_else(|| {
            FilterError::CustomFilterNotRegistered {
                property: property.to_string(),
                handler: handler_id.to_string(),
            }
        })?;
        // Delegate per value and fold: any-of for In, all-of for NotIn
        // (the handler builds the per-value complement for `!=|`).
        let compiled: Vec<Predicate<T>> = values
            .iter()
            .map(|value| handler.build_predicate(operator.surface(), value))
            .collect();
        return Ok(match operator {
            FilterOperator::NotIn => {
                Box::new(move |record: &T| compiled.iter().all(|p| p(record)))
            }
            _ => Box::new(move |record: &T| compiled.iter().any(|p| p(record))),
        });
    }

    let (accessor, kind) = field_access(mapping, property)?;
    let literals = values
        .iter()
        .map(|value| coerce_literal(property, value, kind, mapping.variants()))
        .collect::<Result<Vec<_>, _>>()?;
    let negate = operator == FilterOperator::NotIn;
    Ok(Box::new(move |record: &T| {
        let actual = accessor(record);
        if actual.is_null() {
            return negate;
        }
        let member = literals.iter().any(|literal| actual.eq_value(literal));
        member != negate
    }))
}

fn lookup<'a, T>(
    map: &'a FieldMap<T>,
    property: &str,
) -> Result<&'a PropertyMapping<T>, FilterError> {
    map.lookup(property)
        .ok_or_else(|| FilterError::UnmappedProperties(vec![property.to_string()]))
}

fn field_access<T>(
    mapping: &PropertyMapping<T>,
    property: &str,
) -> Result<(FieldAccessor<T>, FieldKind), FilterError> {
    match (mapping.accessor(), mapping.kind()) {
        (Some(accessor), Some(kind)) => Ok((accessor.clone(), kind)),
        // Synthetic keys always carry a handler (enforced at build time),
        // so a missing accessor here means the mapping cannot filter.
        _ => Err(FilterError::UnmappedProperties(vec![property.to_string()])),
    }
}

fn coerce_literal(
    property: &str,
    raw: &str,
    kind: FieldKind,
    variants: &[String],
) -> Result<FieldValue, FilterError> {
    let literal = unquote(raw);
    coerce(kind, literal, variants).ok_or_else(|| FilterError::ValueCoercion {
        property: property.to_string(),
        value: literal.to_string(),
        target: kind,
    })
}

/// Operator legality by field kind. String fields accept everything;
/// ordered kinds accept equality and ordering; bool and enum accept
/// equality only. Membership is handled by `compile_group` and is as legal
/// as equality on every kind.
fn check_operator(
    property: &str,
    operator: FilterOperator,
    kind: FieldKind,
) -> Result<(), FilterError> {
    let legal = match kind {
        FieldKind::String => true,
        FieldKind::Integer | FieldKind::Float | FieldKind::Decimal | FieldKind::DateTime => {
            matches!(
                operator,
                FilterOperator::Equals | FilterOperator::NotEquals
            ) || operator.is_ordering()
                || operator.is_membership()
        }
        FieldKind::Bool | FieldKind::Enum => {
            matches!(
                operator,
                FilterOperator::Equals | FilterOperator::NotEquals
            ) || operator.is_membership()
        }
    };
    if legal {
        Ok(())
    } else {
        Err(FilterError::UnsupportedOperator {
            property: property.to_string(),
            operator: operator.surface().to_string(),
            kind,
        })
    }
}

fn eval_comparison(operator: FilterOperator, actual: &FieldValue, literal: &FieldValue) -> bool {
    use std::cmp::Ordering;

    if actual.is_null() {
        return operator.is_negated();
    }

    match operator {
        FilterOperator::Equals => actual.eq_value(literal),
        FilterOperator::NotEquals => !actual.eq_value(literal),
        FilterOperator::GreaterThan => actual.cmp_value(literal) == Ordering::Greater,
        FilterOperator::GreaterThanOrEqual => actual.cmp_value(literal) != Ordering::Less,
        FilterOperator::LessThan => actual.cmp_value(literal) == Ordering::Less,
        FilterOperator::LessThanOrEqual => actual.cmp_value(literal) != Ordering::Greater,
        FilterOperator::Contains => string_test(actual, literal, |a, l| a.contains(l)),
        FilterOperator::DoesNotContain => !string_test(actual, literal, |a, l| a.contains(l)),
        FilterOperator::StartsWith => string_test(actual, literal, |a, l| a.starts_with(l)),
        FilterOperator::EndsWith => string_test(actual, literal, |a, l| a.ends_with(l)),
        FilterOperator::DoesNotStartWith => {
            !string_test(actual, literal, |a, l| a.starts_with(l))
        }
        FilterOperator::DoesNotEndWith => !string_test(actual, literal, |a, l| a.ends_with(l)),
        FilterOperator::CaseInsensitiveEquals => folded_test(actual, literal, |a, l| a == l),
        FilterOperator::CaseInsensitiveNotEquals => !folded_test(actual, literal, |a, l| a == l),
        FilterOperator::CaseInsensitiveContains => {
            folded_test(actual, literal, |a, l| a.contains(l))
        }
        FilterOperator::CaseInsensitiveDoesNotContain => {
            !folded_test(actual, literal, |a, l| a.contains(l))
        }
        FilterOperator::CaseInsensitiveStartsWith => {
            folded_test(actual, literal, |a, l| a.starts_with(l))
        }
        FilterOperator::CaseInsensitiveDoesNotStartWith => {
            !folded_test(actual, literal, |a, l| a.starts_with(l))
        }
        FilterOperator::CaseInsensitiveEndsWith => {
            folded_test(actual, literal, |a, l| a.ends_with(l))
        }
        FilterOperator::CaseInsensitiveDoesNotEndWith => {
            !folded_test(actual, literal, |a, l| a.ends_with(l))
        }
        // Degenerate single-value membership; compile_group handles the
        // general case.
        FilterOperator::In => actual.eq_value(literal),
        FilterOperator::NotIn => !actual.eq_value(literal),
    }
}

fn string_test(
    actual: &FieldValue,
    literal: &FieldValue,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    match (actual.as_str(), literal.as_str()) {
        (Some(a), Some(l)) => test(a, l),
        _ => false,
    }
}

fn folded_test(
    actual: &FieldValue,
    literal: &FieldValue,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    match (actual.as_str(), literal.as_str()) {
        (Some(a), Some(l)) => test(&a.to_lowercase(), &l.to_lowercase()),
        _ => false,
    }
}
