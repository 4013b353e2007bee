//! Parent/guardian API types

use crate::envelope::Pagination;
use schoolhouse_core::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// Request to register a new parent/guardian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateParentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Students this guardian is responsible for.
    pub student_ids: Vec<EntityId>,
}

/// Request to update a parent. Only set fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateParentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub student_ids: Option<Vec<EntityId>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentResponse {
    pub parent_id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub student_ids: Vec<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentListData {
    pub parents: Vec<ParentResponse>,
    pub pagination: Pagination,
}
