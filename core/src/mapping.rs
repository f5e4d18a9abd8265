use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::errors::{FilterError, MappingError, SortError};
use crate::value::{FieldKind, FieldValue};

/// Reads one field off a record as a dynamic value. Built once at
/// registration time; queries never resolve fields by name at runtime.
pub type FieldAccessor<T> = Arc<dyn Fn(&T) -> FieldValue + Send + Sync>;

/// What a single mapped field key allows and how to read it.
///
/// A mapping without an accessor is a synthetic key: it names no real
/// field and is only usable through its custom handlers.
pub struct PropertyMapping<T> {
    name: String,
    kind: Option<FieldKind>,
    accessor: Option<FieldAccessor<T>>,
    variants: Vec<String>,
    can_filter: bool,
    can_sort: bool,
    custom_filter: Option<String>,
    custom_sort: Option<String>,
}

impl<T> Clone for PropertyMapping<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            accessor: self.accessor.clone(),
            variants: self.variants.clone(),
            can_filter: self.can_filter,
            can_sort: self.can_sort,
            custom_filter: self.custom_filter.clone(),
            custom_sort: self.custom_sort.clone(),
        }
    }
}

impl<T> PropertyMapping<T> {
    fn new(name: &str, kind: Option<FieldKind>, accessor: Option<FieldAccessor<T>>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            accessor,
            variants: Vec::new(),
            can_filter: false,
            can_sort: false,
            custom_filter: None,
            custom_sort: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Option<FieldKind> {
        self.kind
    }

    pub fn accessor(&self) -> Option<&FieldAccessor<T>> {
        self.accessor.as_ref()
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub fn can_filter(&self) -> bool {
        self.can_filter
    }

    pub fn can_sort(&self) -> bool {
        self.can_sort
    }

    pub fn custom_filter(&self) -> Option<&str> {
        self.custom_filter.as_deref()
    }

    pub fn custom_sort(&self) -> Option<&str> {
        self.custom_sort.as_deref()
    }

    pub fn is_synthetic(&self) -> bool {
        self.accessor.is_none()
    }
}

/// The per-record-type map of field keys to their mappings. Lookup is
/// case-insensitive. Built once via [`FieldMapBuilder`], read-only after.
pub struct FieldMap<T> {
    entries: IndexMap<String, PropertyMapping<T>>,
}

impl<T: 'static> FieldMap<T> {
    pub fn builder() -> FieldMapBuilder<T> {
        FieldMapBuilder::new()
    }
}

impl<T> FieldMap<T> {
    pub fn lookup(&self, key: &str) -> Option<&PropertyMapping<T>> {
        self.entries.get(&key.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyMapping<T>> {
        self.entries.values()
    }

    /// Check that every key is mapped and filterable; offenders are
    /// aggregated into one error, in the caller's order.
    pub fn authorize_filter<S: AsRef<str>>(&self, keys: &[S]) -> Result<(), FilterError> {
        let offending = self.offending(keys, |mapping| mapping.can_filter);
        if offending.is_empty() {
            Ok(())
        } else {
            Err(FilterError::UnmappedProperties(offending))
        }
    }

    /// Check that every key is mapped and sortable; offenders are
    /// aggregated into one error, in the caller's order.
    pub fn authorize_sort<S: AsRef<str>>(&self, keys: &[S]) -> Result<(), SortError> {
        let offending = self.offending(keys, |mapping| mapping.can_sort);
        if offending.is_empty() {
            Ok(())
        } else {
            Err(SortError::UnmappedProperties(offending))
        }
    }

    fn offending<S: AsRef<str>>(
        &self,
        keys: &[S],
        allowed: impl Fn(&PropertyMapping<T>) -> bool,
    ) -> Vec<String> {
        keys.iter()
            .filter(|key| !self.lookup(key.as_ref()).map(&allowed).unwrap_or(false))
            .map(|key| key.as_ref().to_string())
            .collect()
    }
}

/// Fluent builder for a [`FieldMap`]. Each typed starter opens a new field
/// entry; `filterable`/`sortable`/`custom_filter`/`custom_sort` apply to
/// the entry opened last.
///
/// ```
/// use sift_core::FieldMap;
///
/// struct Product {
///     name: String,
///     price: f64,
/// }
///
/// let map = FieldMap::<Product>::builder()
///     .text("Name", |p: &Product| p.name.clone())
///     .filterable()
///     .sortable()
///     .decimal("Price", |p: &Product| p.price)
///     .filterable()
///     .build()
///     .unwrap();
/// assert!(map.lookup("name").is_some());
/// ```
pub struct FieldMapBuilder<T> {
    entries: Vec<PropertyMapping<T>>,
}

impl<T: 'static> Default for FieldMapBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> FieldMapBuilder<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn text(self, key: &str, get: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.push(key, FieldKind::String, move |t| FieldValue::String(get(t)))
    }

    pub fn text_opt(
        self,
        key: &str,
        get: impl Fn(&T) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.push(key, FieldKind::String, move |t| {
            get(t).map_or(FieldValue::Null, FieldValue::String)
        })
    }

    pub fn integer(self, key: &str, get: impl Fn(&T) -> i64 + Send + Sync + 'static) -> Self {
        self.push(key, FieldKind::Integer, move |t| FieldValue::Integer(get(t)))
    }

    pub fn integer_opt(
        self,
        key: &str,
        get: impl Fn(&T) -> Option<i64> + Send + Sync + 'static,
    ) -> Self {
        self.push(key, FieldKind::Integer, move |t| {
            get(t).map_or(FieldValue::Null, FieldValue::Integer)
        })
    }

    pub fn float(self, key: &str, get: impl Fn(&T) -> f64 + Send + Sync + 'static) -> Self {
        self.push(key, FieldKind::Float, move |t| FieldValue::Float(get(t)))
    }

    pub fn float_opt(
        self,
        key: &str,
        get: impl Fn(&T) -> Option<f64> + Send + Sync + 'static,
    ) -> Self {
        self.push(key, FieldKind::Float, move |t| {
            get(t).map_or(FieldValue::Null, FieldValue::Float)
        })
    }

    pub fn decimal(self, key: &str, get: impl Fn(&T) -> f64 + Send + Sync + 'static) -> Self {
        self.push(key, FieldKind::Decimal, move |t| FieldValue::Decimal(get(t)))
    }

    pub fn decimal_opt(
        self,
        key: &str,
        get: impl Fn(&T) -> Option<f64> + Send + Sync + 'static,
    ) -> Self {
        self.push(key, FieldKind::Decimal, move |t| {
            get(t).map_or(FieldValue::Null, FieldValue::Decimal)
        })
    }

    pub fn boolean(self, key: &str, get: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.push(key, FieldKind::Bool, move |t| FieldValue::Bool(get(t)))
    }

    pub fn boolean_opt(
        self,
        key: &str,
        get: impl Fn(&T) -> Option<bool> + Send + Sync + 'static,
    ) -> Self {
        self.push(key, FieldKind::Bool, move |t| {
            get(t).map_or(FieldValue::Null, FieldValue::Bool)
        })
    }

    pub fn date_time(
        self,
        key: &str,
        get: impl Fn(&T) -> NaiveDateTime + Send + Sync + 'static,
    ) -> Self {
        self.push(key, FieldKind::DateTime, move |t| {
            FieldValue::DateTime(get(t))
        })
    }

    pub fn date_time_opt(
        self,
        key: &str,
        get: impl Fn(&T) -> Option<NaiveDateTime> + Send + Sync + 'static,
    ) -> Self {
        self.push(key, FieldKind::DateTime, move |t| {
            get(t).map_or(FieldValue::Null, FieldValue::DateTime)
        })
    }

    /// An enum-kinded field. `variants` lists the member names literals
    /// resolve against, case-insensitively; the accessor returns the
    /// record's current variant name.
    pub fn enumeration(
        mut self,
        key: &str,
        variants: &[&str],
        get: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        self = self.push(key, FieldKind::Enum, move |t| FieldValue::Enum(get(t)));
        if let Some(entry) = self.entries.last_mut() {
            entry.variants = variants.iter().map(|v| v.to_string()).collect();
        }
        self
    }

    /// A synthetic key: no backing field, must be given a custom filter
    /// and/or custom sort handler before `build`.
    pub fn key(mut self, key: &str) -> Self {
        self.entries.push(PropertyMapping::new(key, None, None));
        self
    }

    pub fn filterable(mut self) -> Self {
        if let Some(entry) = self.entries.last_mut() {
            entry.can_filter = true;
        }
        self
    }

    pub fn sortable(mut self) -> Self {
        if let Some(entry) = self.entries.last_mut() {
            entry.can_sort = true;
        }
        self
    }

    /// Route filtering on the current key through the handler registered
    /// under `handler`. Implies `filterable`.
    pub fn custom_filter(mut self, handler: &str) -> Self {
        if let Some(entry) = self.entries.last_mut() {
            entry.custom_filter = Some(handler.to_string());
            entry.can_filter = true;
        }
        self
    }

    /// Route sorting on the current key through the handler registered
    /// under `handler`. Implies `sortable`.
    pub fn custom_sort(mut self, handler: &str) -> Self {
        if let Some(entry) = self.entries.last_mut() {
            entry.custom_sort = Some(handler.to_string());
            entry.can_sort = true;
        }
        self
    }

    pub fn build(self) -> Result<FieldMap<T>, MappingError> {
        let mut entries: IndexMap<String, PropertyMapping<T>> = IndexMap::new();
        for entry in self.entries {
            if entry.is_synthetic() {
                let filter_covered = !entry.can_filter || entry.custom_filter.is_some();
                let sort_covered = !entry.can_sort || entry.custom_sort.is_some();
                let has_any_handler =
                    entry.custom_filter.is_some() || entry.custom_sort.is_some();
                if !filter_covered || !sort_covered || !has_any_handler {
                    return Err(MappingError::SyntheticKeyWithoutHandler(entry.name));
                }
            }
            let key = entry.name.to_lowercase();
            if entries.contains_key(&key) {
                return Err(MappingError::DuplicateKey(entry.name));
            }
            entries.insert(key, entry);
        }
        Ok(FieldMap { entries })
    }

    fn push(
        mut self,
        key: &str,
        kind: FieldKind,
        accessor: impl Fn(&T) -> FieldValue + Send + Sync + 'static,
    ) -> Self {
        self.entries
            .push(PropertyMapping::new(key, Some(kind), Some(Arc::new(accessor))));
        self
    }
}

/// Process-wide registry of field maps, one per record type. Built during
/// setup, immutable afterwards; concurrent readers need no locking.
#[derive(Default)]
pub struct Mapper {
    maps: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: 'static>(&mut self, map: FieldMap<T>) {
        self.maps.insert(TypeId::of::<T>(), Box::new(map));
    }

    pub fn get<T: 'static>(&self) -> Option<&FieldMap<T>> {
        self.maps
            .get(&TypeId::of::<T>())
            .and_then(|map| map.downcast_ref::<FieldMap<T>>())
    }
}
