//! Teacher records: list, detail, and CRUD mutations.

use crate::cache::QueryKey;
use crate::context::ClientContext;
use crate::error::ClientError;
use crate::mutation::MutationOptions;
use crate::observer::{QueryObserver, TypedSnapshot};
use crate::validate::{validate_email, ValidateNonEmpty};
use schoolhouse_api::types::{
    CreateTeacherRequest, TeacherListData, TeacherResponse, UpdateTeacherRequest,
};
use schoolhouse_api::{ListParams, MessageResponse};
use schoolhouse_core::EntityId;

pub fn root_key() -> QueryKey {
    QueryKey::root("teachers")
}

pub fn list_key(params: &ListParams) -> QueryKey {
    super::list_key("teachers", params)
}

pub fn detail_key(id: EntityId) -> QueryKey {
    root_key().push("detail").push(id)
}

pub fn observe_list(
    observer: &mut QueryObserver<TeacherListData>,
    ctx: &ClientContext,
    params: &ListParams,
) -> TypedSnapshot<TeacherListData> {
    let rest = ctx.rest.clone();
    let params_owned = params.clone();
    observer.observe(list_key(params), move || {
        let rest = rest.clone();
        let params = params_owned.clone();
        async move { rest.list_teachers(&params).await }
    })
}

pub fn observe_detail(
    observer: &mut QueryObserver<TeacherResponse>,
    ctx: &ClientContext,
    id: EntityId,
) -> TypedSnapshot<TeacherResponse> {
    let rest = ctx.rest.clone();
    observer.observe(detail_key(id), move || {
        let rest = rest.clone();
        async move { rest.get_teacher(id).await }
    })
}

fn validate_create(request: &CreateTeacherRequest) -> Result<(), ClientError> {
    request.first_name.validate_non_empty("first_name")?;
    request.last_name.validate_non_empty("last_name")?;
    validate_email(&request.email, "email")?;
    Ok(())
}

pub async fn create_teacher(
    ctx: &ClientContext,
    request: CreateTeacherRequest,
) -> Result<MessageResponse, ClientError> {
    validate_create(&request)?;
    ctx.mutator
        .run(
            ctx.rest.create_teacher(&request),
            MutationOptions::new()
                .invalidates([root_key()])
                .fallback_message("Teacher created"),
        )
        .await
}

pub async fn update_teacher(
    ctx: &ClientContext,
    id: EntityId,
    request: UpdateTeacherRequest,
) -> Result<MessageResponse, ClientError> {
    if let Some(email) = &request.email {
        validate_email(email, "email")?;
    }
    ctx.mutator
        .run(
            ctx.rest.update_teacher(id, &request),
            MutationOptions::new()
                // Homeroom assignments surface on class records.
                .invalidates([root_key(), super::classes::root_key()])
                .fallback_message("Teacher updated"),
        )
        .await
}

pub async fn delete_teacher(
    ctx: &ClientContext,
    id: EntityId,
) -> Result<MessageResponse, ClientError> {
    ctx.mutator
        .run(
            ctx.rest.delete_teacher(id),
            MutationOptions::new()
                .invalidates([root_key(), super::classes::root_key()])
                .fallback_message("Teacher deleted"),
        )
        .await
}
