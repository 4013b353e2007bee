//! Student roster: list, detail, and CRUD mutations.

use crate::cache::QueryKey;
use crate::context::ClientContext;
use crate::error::ClientError;
use crate::mutation::MutationOptions;
use crate::observer::{QueryObserver, TypedSnapshot};
use crate::validate::{validate_email, ValidateNonEmpty};
use schoolhouse_api::types::{
    CreateStudentRequest, StudentListData, StudentResponse, UpdateStudentRequest,
};
use schoolhouse_api::{ListParams, MessageResponse};
use schoolhouse_core::EntityId;

pub fn root_key() -> QueryKey {
    QueryKey::root("students")
}

pub fn list_key(params: &ListParams) -> QueryKey {
    super::list_key("students", params)
}

pub fn detail_key(id: EntityId) -> QueryKey {
    root_key().push("detail").push(id)
}

pub fn observe_list(
    observer: &mut QueryObserver<StudentListData>,
    ctx: &ClientContext,
    params: &ListParams,
) -> TypedSnapshot<StudentListData> {
    let rest = ctx.rest.clone();
    let params_owned = params.clone();
    observer.observe(list_key(params), move || {
        let rest = rest.clone();
        let params = params_owned.clone();
        async move { rest.list_students(&params).await }
    })
}

pub fn observe_detail(
    observer: &mut QueryObserver<StudentResponse>,
    ctx: &ClientContext,
    id: EntityId,
) -> TypedSnapshot<StudentResponse> {
    let rest = ctx.rest.clone();
    observer.observe(detail_key(id), move || {
        let rest = rest.clone();
        async move { rest.get_student(id).await }
    })
}

fn validate_create(request: &CreateStudentRequest) -> Result<(), ClientError> {
    request.first_name.validate_non_empty("first_name")?;
    request.last_name.validate_non_empty("last_name")?;
    request.admission_no.validate_non_empty("admission_no")?;
    validate_email(&request.email, "email")?;
    Ok(())
}

pub async fn create_student(
    ctx: &ClientContext,
    request: CreateStudentRequest,
) -> Result<MessageResponse, ClientError> {
    validate_create(&request)?;
    ctx.mutator
        .run(
            ctx.rest.create_student(&request),
            MutationOptions::new()
                .invalidates([root_key()])
                .fallback_message("Student created"),
        )
        .await
}

pub async fn update_student(
    ctx: &ClientContext,
    id: EntityId,
    request: UpdateStudentRequest,
) -> Result<MessageResponse, ClientError> {
    if let Some(email) = &request.email {
        validate_email(email, "email")?;
    }
    if let Some(first_name) = &request.first_name {
        first_name.validate_non_empty("first_name")?;
    }
    if let Some(last_name) = &request.last_name {
        last_name.validate_non_empty("last_name")?;
    }
    ctx.mutator
        .run(
            ctx.rest.update_student(id, &request),
            MutationOptions::new()
                .invalidates([root_key()])
                .fallback_message("Student updated"),
        )
        .await
}

/// Deleting a student also invalidates parents: the deleted student's links
/// appear in parent records.
pub async fn delete_student(
    ctx: &ClientContext,
    id: EntityId,
) -> Result<MessageResponse, ClientError> {
    ctx.mutator
        .run(
            ctx.rest.delete_student(id),
            MutationOptions::new()
                .invalidates([root_key(), super::parents::root_key()])
                .fallback_message("Student deleted"),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateStudentRequest {
        CreateStudentRequest {
            first_name: "Maya".to_string(),
            last_name: "Garcia".to_string(),
            email: "maya@example.edu".to_string(),
            admission_no: "ADM-0042".to_string(),
            class_id: None,
            section: None,
            parent_id: None,
            phone: None,
        }
    }

    #[test]
    fn test_detail_key_is_under_entity_root() {
        let id = schoolhouse_core::new_entity_id();
        assert!(detail_key(id).starts_with(&root_key()));
    }

    #[test]
    fn test_create_validation_rejects_blank_name() {
        let request = CreateStudentRequest {
            first_name: "  ".to_string(),
            ..create_request()
        };
        assert!(validate_create(&request).is_err());
    }

    #[test]
    fn test_create_validation_rejects_bad_email() {
        let request = CreateStudentRequest {
            email: "not-an-email".to_string(),
            ..create_request()
        };
        assert!(validate_create(&request).is_err());
    }

    #[test]
    fn test_create_validation_accepts_complete_request() {
        assert!(validate_create(&create_request()).is_ok());
    }
}
