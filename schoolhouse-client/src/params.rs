//! Screen-local parameter store (page, search, sort, filters).
//!
//! Mirrors the URL search-param model: a parameter either carries an explicit
//! value or falls back to its registered default. Removing a parameter
//! restores the default, and only explicit values are exported, so a link
//! rebuilt from the exported pairs reproduces the same state.

use schoolhouse_api::{ListParams, SortOrder};
use schoolhouse_core::EntityId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct ParamStore {
    defaults: BTreeMap<String, String>,
    values: BTreeMap<String, String>,
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the value `get_param` reports when no explicit value is set.
    pub fn register_default(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.defaults.insert(key.into(), value.into());
    }

    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Explicit value if set, registered default otherwise.
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .or_else(|| self.defaults.get(key))
            .map(String::as_str)
    }

    /// Drop the explicit value; `get_param` falls back to the default.
    pub fn remove_param(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Only explicit values, in key order. Feeding these back through
    /// `set_param` reproduces the same store state.
    pub fn export(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn import(&mut self, pairs: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in pairs {
            self.values.insert(key, value);
        }
    }
}

/// List-screen parameters backed by a `ParamStore`, rendered into the wire
/// query type on demand.
#[derive(Debug, Clone)]
pub struct ListParamState {
    store: ParamStore,
    default_limit: u32,
}

impl ListParamState {
    pub fn new(default_limit: u32) -> Self {
        let mut store = ParamStore::new();
        store.register_default("page", "1");
        store.register_default("limit", default_limit.to_string());
        Self {
            store,
            default_limit,
        }
    }

    pub fn page(&self) -> u32 {
        self.store
            .get_param("page")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1)
    }

    pub fn set_page(&mut self, page: u32) {
        if page <= 1 {
            self.store.remove_param("page");
        } else {
            self.store.set_param("page", page.to_string());
        }
    }

    pub fn limit(&self) -> u32 {
        self.store
            .get_param("limit")
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.default_limit)
    }

    /// Set the search term and reset to page 1; a filter change invalidates
    /// the old page position.
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term.trim().is_empty() {
            self.store.remove_param("search");
        } else {
            self.store.set_param("search", term);
        }
        self.store.remove_param("page");
    }

    pub fn set_sort(&mut self, by: impl Into<String>, order: SortOrder) {
        self.store.set_param("sort_by", by.into());
        let order = match order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        self.store.set_param("sort_order", order);
    }

    pub fn set_class_filter(&mut self, class_id: Option<EntityId>) {
        match class_id {
            Some(id) => self.store.set_param("class_id", id.to_string()),
            None => self.store.remove_param("class_id"),
        }
        self.store.remove_param("page");
    }

    pub fn set_section_filter(&mut self, section: Option<String>) {
        match section {
            Some(section) => self.store.set_param("section", section),
            None => self.store.remove_param("section"),
        }
        self.store.remove_param("page");
    }

    pub fn store(&self) -> &ParamStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParamStore {
        &mut self.store
    }

    /// Render the current state into the wire query type.
    pub fn to_list_params(&self) -> ListParams {
        ListParams {
            page: self.page(),
            limit: self.limit(),
            search: self.store.get_param("search").map(str::to_string),
            sort_by: self.store.get_param("sort_by").map(str::to_string),
            sort_order: match self.store.get_param("sort_order") {
                Some("asc") => Some(SortOrder::Asc),
                Some("desc") => Some(SortOrder::Desc),
                _ => None,
            },
            class_id: self
                .store
                .get_param("class_id")
                .and_then(|v| v.parse().ok()),
            section: self.store.get_param("section").map(str::to_string),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
