//! Class records: list, detail, and CRUD mutations.

use crate::cache::QueryKey;
use crate::context::ClientContext;
use crate::error::ClientError;
use crate::mutation::MutationOptions;
use crate::observer::{QueryObserver, TypedSnapshot};
use crate::validate::{ValidateNonEmpty, ValidateRange};
use schoolhouse_api::types::{
    ClassListData, ClassResponse, CreateClassRequest, UpdateClassRequest,
};
use schoolhouse_api::{ListParams, MessageResponse};
use schoolhouse_core::EntityId;

const MAX_CAPACITY: u32 = 200;

pub fn root_key() -> QueryKey {
    QueryKey::root("classes")
}

pub fn list_key(params: &ListParams) -> QueryKey {
    super::list_key("classes", params)
}

pub fn detail_key(id: EntityId) -> QueryKey {
    root_key().push("detail").push(id)
}

pub fn observe_list(
    observer: &mut QueryObserver<ClassListData>,
    ctx: &ClientContext,
    params: &ListParams,
) -> TypedSnapshot<ClassListData> {
    let rest = ctx.rest.clone();
    let params_owned = params.clone();
    observer.observe(list_key(params), move || {
        let rest = rest.clone();
        let params = params_owned.clone();
        async move { rest.list_classes(&params).await }
    })
}

pub fn observe_detail(
    observer: &mut QueryObserver<ClassResponse>,
    ctx: &ClientContext,
    id: EntityId,
) -> TypedSnapshot<ClassResponse> {
    let rest = ctx.rest.clone();
    observer.observe(detail_key(id), move || {
        let rest = rest.clone();
        async move { rest.get_class(id).await }
    })
}

fn validate_capacity(capacity: Option<u32>) -> Result<(), ClientError> {
    if let Some(capacity) = capacity {
        capacity.validate_range("capacity", 1, MAX_CAPACITY)?;
    }
    Ok(())
}

pub async fn create_class(
    ctx: &ClientContext,
    request: CreateClassRequest,
) -> Result<MessageResponse, ClientError> {
    request.name.validate_non_empty("name")?;
    validate_capacity(request.capacity)?;
    ctx.mutator
        .run(
            ctx.rest.create_class(&request),
            MutationOptions::new()
                .invalidates([root_key()])
                .fallback_message("Class created"),
        )
        .await
}

pub async fn update_class(
    ctx: &ClientContext,
    id: EntityId,
    request: UpdateClassRequest,
) -> Result<MessageResponse, ClientError> {
    if let Some(name) = &request.name {
        name.validate_non_empty("name")?;
    }
    validate_capacity(request.capacity)?;
    ctx.mutator
        .run(
            ctx.rest.update_class(id, &request),
            MutationOptions::new()
                // Class metadata is denormalized onto student rows.
                .invalidates([root_key(), super::students::root_key()])
                .fallback_message("Class updated"),
        )
        .await
}

pub async fn delete_class(
    ctx: &ClientContext,
    id: EntityId,
) -> Result<MessageResponse, ClientError> {
    ctx.mutator
        .run(
            ctx.rest.delete_class(id),
            MutationOptions::new()
                .invalidates([root_key(), super::students::root_key()])
                .fallback_message("Class deleted"),
        )
        .await
}
