//! Feature modules, one per backend entity.
//!
//! Each module owns its cache-key layout and wraps the REST collaborator in
//! observers for reads and mutator runs for writes. Key layout is shared:
//! `[entity]` is the invalidation root, `[entity, "list", ...params]` one
//! page of a list, `[entity, "detail", id]` one record.

use crate::cache::QueryKey;
use schoolhouse_api::ListParams;

pub mod attendance;
pub mod auth;
pub mod classes;
pub mod parents;
pub mod settings;
pub mod students;
pub mod teachers;

/// List key under `entity`: every parameter that changes the response body
/// is a key part, so distinct pages and filters cache independently.
fn list_key(entity: &str, params: &ListParams) -> QueryKey {
    let mut key = QueryKey::root(entity)
        .push("list")
        .push(params.page)
        .push(params.limit);
    if let Some(search) = &params.search {
        key = key.push("search").push(search.clone());
    }
    if let Some(sort_by) = &params.sort_by {
        key = key.push("sort").push(sort_by.clone());
        if let Some(order) = params.sort_order {
            key = key.push(order.to_string());
        }
    }
    if let Some(class_id) = params.class_id {
        key = key.push("class").push(class_id);
    }
    if let Some(section) = &params.section {
        key = key.push("section").push(section.clone());
    }
    key
}
