//! School-wide settings: single record, read and patch.

use crate::cache::QueryKey;
use crate::context::ClientContext;
use crate::error::ClientError;
use crate::mutation::MutationOptions;
use crate::observer::{QueryObserver, TypedSnapshot};
use crate::validate::ValidateNonEmpty;
use schoolhouse_api::types::{SettingsResponse, UpdateSettingsRequest};
use schoolhouse_api::MessageResponse;

pub fn root_key() -> QueryKey {
    QueryKey::root("settings")
}

pub fn observe_settings(
    observer: &mut QueryObserver<SettingsResponse>,
    ctx: &ClientContext,
) -> TypedSnapshot<SettingsResponse> {
    let rest = ctx.rest.clone();
    observer.observe(root_key(), move || {
        let rest = rest.clone();
        async move { rest.get_settings().await }
    })
}

pub async fn update_settings(
    ctx: &ClientContext,
    request: UpdateSettingsRequest,
) -> Result<MessageResponse, ClientError> {
    if let Some(school_name) = &request.school_name {
        school_name.validate_non_empty("school_name")?;
    }
    if let Some(academic_year) = &request.academic_year {
        academic_year.validate_non_empty("academic_year")?;
    }
    ctx.mutator
        .run(
            ctx.rest.update_settings(&request),
            MutationOptions::new()
                .invalidates([root_key()])
                .fallback_message("Settings saved"),
        )
        .await
}
