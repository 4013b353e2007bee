//! Attendance: daily class registers and corrections.

use crate::cache::QueryKey;
use crate::context::ClientContext;
use crate::error::ClientError;
use crate::mutation::MutationOptions;
use crate::observer::{QueryObserver, TypedSnapshot};
use schoolhouse_api::types::{
    AttendanceListData, RecordAttendanceRequest, UpdateAttendanceRequest,
};
use schoolhouse_api::{ListParams, MessageResponse};
use schoolhouse_core::{EntityId, ValidationError};

pub fn root_key() -> QueryKey {
    QueryKey::root("attendance")
}

pub fn list_key(params: &ListParams) -> QueryKey {
    super::list_key("attendance", params)
}

pub fn observe_list(
    observer: &mut QueryObserver<AttendanceListData>,
    ctx: &ClientContext,
    params: &ListParams,
) -> TypedSnapshot<AttendanceListData> {
    let rest = ctx.rest.clone();
    let params_owned = params.clone();
    observer.observe(list_key(params), move || {
        let rest = rest.clone();
        let params = params_owned.clone();
        async move { rest.list_attendance(&params).await }
    })
}

fn validate_record(request: &RecordAttendanceRequest) -> Result<(), ClientError> {
    if request.entries.is_empty() {
        return Err(ValidationError::missing_field("entries").into());
    }
    Ok(())
}

/// Submit a class register for one day.
pub async fn record_attendance(
    ctx: &ClientContext,
    request: RecordAttendanceRequest,
) -> Result<MessageResponse, ClientError> {
    validate_record(&request)?;
    ctx.mutator
        .run(
            ctx.rest.record_attendance(&request),
            MutationOptions::new()
                .invalidates([root_key()])
                .fallback_message("Attendance recorded"),
        )
        .await
}

pub async fn update_attendance(
    ctx: &ClientContext,
    id: EntityId,
    request: UpdateAttendanceRequest,
) -> Result<MessageResponse, ClientError> {
    if request.status.is_none() && request.remark.is_none() {
        return Err(ValidationError::invalid_value("request", "no fields to update").into());
    }
    ctx.mutator
        .run(
            ctx.rest.update_attendance(id, &request),
            MutationOptions::new()
                .invalidates([root_key()])
                .fallback_message("Attendance updated"),
        )
        .await
}
