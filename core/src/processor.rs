use std::any::type_name;

use log::debug;

use crate::custom::CustomHandlers;
use crate::errors::{FilterError, SiftError, SortError};
use crate::filtering::compile_filter;
use crate::mapping::Mapper;
use crate::model::SiftQuery;
use crate::pagination::paginate;
use crate::sorting::{apply_sort, parse_sorts};

/// Processor-wide settings.
#[derive(Debug, Clone, Default)]
pub struct SiftOptions {
    /// Upper bound on the page size handed out, including "give me
    /// everything" requests. `None` means unbounded.
    pub max_page_size: Option<i64>,
}

/// Sequences filter → sort → paginate over an in-memory collection, using
/// the field maps registered in the [`Mapper`].
pub struct SiftProcessor {
    mapper: Mapper,
    options: SiftOptions,
}

impl SiftProcessor {
    pub fn new(mapper: Mapper) -> Self {
        Self {
            mapper,
            options: SiftOptions::default(),
        }
    }

    pub fn with_options(mapper: Mapper, options: SiftOptions) -> Self {
        Self { mapper, options }
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    /// Apply the query to `items`. Filtering and sorting require a field
    /// map registered for `T`; a blank query passes items through (paged
    /// by the defaults).
    pub fn process<T: 'static>(
        &self,
        query: &SiftQuery,
        mut items: Vec<T>,
        handlers: &CustomHandlers<T>,
    ) -> Result<Vec<T>, SiftError> {
        if let Some(filters) = query.filters.as_deref() {
            if !filters.trim().is_empty() {
                let map = self
                    .mapper
                    .get::<T>()
                    .ok_or(FilterError::UnmappedType(type_name::<T>()))?;
                if let Some(predicate) = compile_filter(filters, map, handlers)? {
                    let before = items.len();
                    items.retain(|item| predicate(item));
                    debug!("filter kept {} of {} items", items.len(), before);
                }
            }
        }

        if let Some(sorts) = query.sorts.as_deref() {
            let terms = parse_sorts(sorts);
            if !terms.is_empty() {
                let map = self
                    .mapper
                    .get::<T>()
                    .ok_or(SortError::UnmappedType(type_name::<T>()))?;
                apply_sort(&mut items, &terms, map, handlers)?;
            }
        }

        Ok(paginate(
            items,
            query.page,
            query.page_size,
            self.options.max_page_size,
        ))
    }
}
