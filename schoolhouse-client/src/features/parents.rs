//! Parent/guardian records: list, detail, and CRUD mutations.

use crate::cache::QueryKey;
use crate::context::ClientContext;
use crate::error::ClientError;
use crate::mutation::MutationOptions;
use crate::observer::{QueryObserver, TypedSnapshot};
use crate::validate::{validate_email, ValidateNonEmpty};
use schoolhouse_api::types::{
    CreateParentRequest, ParentListData, ParentResponse, UpdateParentRequest,
};
use schoolhouse_api::{ListParams, MessageResponse};
use schoolhouse_core::EntityId;

pub fn root_key() -> QueryKey {
    QueryKey::root("parents")
}

pub fn list_key(params: &ListParams) -> QueryKey {
    super::list_key("parents", params)
}

pub fn detail_key(id: EntityId) -> QueryKey {
    root_key().push("detail").push(id)
}

pub fn observe_list(
    observer: &mut QueryObserver<ParentListData>,
    ctx: &ClientContext,
    params: &ListParams,
) -> TypedSnapshot<ParentListData> {
    let rest = ctx.rest.clone();
    let params_owned = params.clone();
    observer.observe(list_key(params), move || {
        let rest = rest.clone();
        let params = params_owned.clone();
        async move { rest.list_parents(&params).await }
    })
}

pub fn observe_detail(
    observer: &mut QueryObserver<ParentResponse>,
    ctx: &ClientContext,
    id: EntityId,
) -> TypedSnapshot<ParentResponse> {
    let rest = ctx.rest.clone();
    observer.observe(detail_key(id), move || {
        let rest = rest.clone();
        async move { rest.get_parent(id).await }
    })
}

fn validate_create(request: &CreateParentRequest) -> Result<(), ClientError> {
    request.first_name.validate_non_empty("first_name")?;
    request.last_name.validate_non_empty("last_name")?;
    request.phone.validate_non_empty("phone")?;
    validate_email(&request.email, "email")?;
    Ok(())
}

pub async fn create_parent(
    ctx: &ClientContext,
    request: CreateParentRequest,
) -> Result<MessageResponse, ClientError> {
    validate_create(&request)?;
    ctx.mutator
        .run(
            ctx.rest.create_parent(&request),
            MutationOptions::new()
                // Linking students rewrites their parent references too.
                .invalidates([root_key(), super::students::root_key()])
                .fallback_message("Parent created"),
        )
        .await
}

pub async fn update_parent(
    ctx: &ClientContext,
    id: EntityId,
    request: UpdateParentRequest,
) -> Result<MessageResponse, ClientError> {
    if let Some(email) = &request.email {
        validate_email(email, "email")?;
    }
    ctx.mutator
        .run(
            ctx.rest.update_parent(id, &request),
            MutationOptions::new()
                .invalidates([root_key(), super::students::root_key()])
                .fallback_message("Parent updated"),
        )
        .await
}

pub async fn delete_parent(
    ctx: &ClientContext,
    id: EntityId,
) -> Result<MessageResponse, ClientError> {
    ctx.mutator
        .run(
            ctx.rest.delete_parent(id),
            MutationOptions::new()
                .invalidates([root_key(), super::students::root_key()])
                .fallback_message("Parent deleted"),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_requires_phone() {
        let request = CreateParentRequest {
            first_name: "Rosa".to_string(),
            last_name: "Garcia".to_string(),
            email: "rosa@example.com".to_string(),
            phone: " ".to_string(),
            student_ids: vec![],
        };
        assert!(validate_create(&request).is_err());
    }

    #[test]
    fn test_parent_keys_do_not_collide_with_students() {
        assert!(!root_key().starts_with(&super::super::students::root_key()));
    }
}
