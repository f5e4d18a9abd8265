use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// A compiled, reusable boolean test over a record.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Caller-supplied filtering for a mapped field. The engine does not
/// interpret the operator or value on this path; the handler receives the
/// operator's surface string (e.g. `==`, `@=*`) and the raw literal and
/// owns the predicate entirely.
pub trait CustomFilter<T>: Send + Sync {
    fn build_predicate(&self, operator: &str, value: &str) -> Predicate<T>;
}

/// Caller-supplied ordering for a mapped field. The engine applies
/// descending reversal and chains tie-breaks across sort terms.
pub trait CustomSort<T>: Send + Sync {
    fn compare(&self, left: &T, right: &T) -> Ordering;
}

/// Explicit registry of custom handlers, keyed by the handler id stored in
/// the property mapping. Registered once during setup; lookup is a pure
/// map read.
pub struct CustomHandlers<T> {
    filters: HashMap<String, Arc<dyn CustomFilter<T>>>,
    sorts: HashMap<String, Arc<dyn CustomSort<T>>>,
}

impl<T> Default for CustomHandlers<T> {
    fn default() -> Self {
        Self {
            filters: HashMap::new(),
            sorts: HashMap::new(),
        }
    }
}

impl<T> CustomHandlers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(
        mut self,
        handler_id: &str,
        handler: impl CustomFilter<T> + 'static,
    ) -> Self {
        self.filters.insert(handler_id.to_string(), Arc::new(handler));
        self
    }

    pub fn with_sort(mut self, handler_id: &str, handler: impl CustomSort<T> + 'static) -> Self {
        self.sorts.insert(handler_id.to_string(), Arc::new(handler));
        self
    }

    pub fn filter(&self, handler_id: &str) -> Option<Arc<dyn CustomFilter<T>>> {
        self.filters.get(handler_id).cloned()
    }

    pub fn sort(&self, handler_id: &str) -> Option<Arc<dyn CustomSort<T>>> {
        self.sorts.get(handler_id).cloned()
    }
}
