use std::cmp::Ordering;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::custom::CustomHandlers;
use crate::errors::SortError;
use crate::mapping::FieldMap;

/// One term of a sort expression: field key plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortTerm {
    pub name: String,
    pub descending: bool,
}

/// Parse a sort string: comma-separated field keys, a leading `-` marks
/// descending, whitespace is trimmed, empty segments are skipped.
pub fn parse_sorts(sorts: &str) -> Vec<SortTerm> {
    sorts
        .split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                return None;
            }
            let (name, descending) = match trimmed.strip_prefix('-') {
                Some(rest) => (rest.trim(), true),
                None => (trimmed, false),
            };
            if name.is_empty() {
                return None;
            }
            Some(SortTerm {
                name: name.to_string(),
                descending,
            })
        })
        .collect()
}

/// A chained comparator over all sort terms: the first term orders,
/// later terms break ties in list order.
pub type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Authorize the sort terms against the field map and build the chained
/// comparator. Custom-sort fields delegate ordering to their handler;
/// descending reversal and chaining stay with the engine either way.
pub fn build_comparator<T: 'static>(
    terms: &[SortTerm],
    map: &FieldMap<T>,
    handlers: &CustomHandlers<T>,
) -> Result<Comparator<T>, SortError> {
    let names: Vec<&str> = terms.iter().map(|term| term.name.as_str()).collect();
    map.authorize_sort(&names)?;

    let mut steps: Vec<(Comparator<T>, bool)> = Vec::with_capacity(terms.len());
    for term in terms {
        let mapping = map
            .lookup(&term.name)
            .ok_or_else(|| SortError::UnmappedProperties(vec![term.name.clone()]))?;
        let step: Comparator<T> = if let Some(handler_id) = mapping.custom_sort() {
            let handler =
                handlers
                    .sort(handler_id)
                    .ok_or_else(|| SortError::CustomSortNotRegistered {
                        property: term.name.clone(),
                        handler: handler_id.to_string(),
                    })?;
            Box::new(move |a: &T, b: &T| handler.compare(a, b))
        } else {
            let accessor = mapping
                .accessor()
                .cloned()
                .ok_or_else(|| SortError::UnmappedProperties(vec![term.name.clone()]))?;
            Box::new(move |a: &T, b: &T| accessor(a).cmp_value(&accessor(b)))
        };
        steps.push((step, term.descending));
    }

    Ok(Box::new(move |a: &T, b: &T| {
        for (compare, descending) in &steps {
            let ordering = compare(a, b);
            let ordering = if *descending {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }))
}

/// Sort `items` in place according to `terms`.
pub fn apply_sort<T: 'static>(
    items: &mut [T],
    terms: &[SortTerm],
    map: &FieldMap<T>,
    handlers: &CustomHandlers<T>,
) -> Result<(), SortError> {
    if terms.is_empty() {
        return Ok(());
    }
    let comparator = build_comparator(terms, map, handlers)?;
    items.sort_by(|a, b| comparator(a, b));
    debug!("sorted {} items by {} term(s)", items.len(), terms.len());
    Ok(())
}
