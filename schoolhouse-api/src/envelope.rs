//! Response envelopes and common list-query parameters.

use schoolhouse_core::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Envelope for successful reads: `{ "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiData<T> {
    pub data: T,
}

/// Envelope for mutations: `{ "message": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Pagination block returned alongside every list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Common query parameters for list endpoints.
///
/// Serialized as a query string; absent fields are omitted so the backend
/// applies its own defaults for anything the client does not pin down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    /// Free-text search over the entity's display fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    /// Restrict to one class (students, attendance).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<EntityId>,
    /// Restrict to one section within a class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl ListParams {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = Some(order);
        self
    }

    pub fn with_class(mut self, class_id: EntityId) -> Self {
        self.class_id = Some(class_id);
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
            search: None,
            sort_by: None,
            sort_order: None,
            class_id: None,
            section: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_use_page_one() {
        let params = ListParams::default();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert!(params.search.is_none());
    }

    #[test]
    fn test_absent_fields_are_omitted_from_query() {
        let params = ListParams::default();
        let value = serde_json::to_value(&params).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("page"));
        assert!(!object.contains_key("search"));
        assert!(!object.contains_key("class_id"));
    }

    #[test]
    fn test_data_envelope_round_trips() {
        let envelope: ApiData<MessageResponse> = serde_json::from_str(
            r#"{"data":{"message":"ok"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.data.message, "ok");
    }
}
