use serde::{Deserialize, Serialize};

/// The four query parameters of a filter/sort/paginate request.
///
/// `filters` is a filter-string (e.g. `Category==Food,Price>=2.00`),
/// `sorts` a comma-separated list of field keys with an optional leading
/// `-` for descending. Both absent means pass-through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftQuery {
    pub filters: Option<String>,
    pub sorts: Option<String>,
    pub page: i64,
    pub page_size: i64,
}

impl Default for SiftQuery {
    fn default() -> Self {
        Self {
            filters: None,
            sorts: None,
            page: 1,
            page_size: 10,
        }
    }
}

impl SiftQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filters(mut self, filters: &str) -> Self {
        self.filters = Some(filters.to_string());
        self
    }

    pub fn with_sorts(mut self, sorts: &str) -> Self {
        self.sorts = Some(sorts.to_string());
        self
    }

    pub fn with_page(mut self, page: i64, page_size: i64) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}
