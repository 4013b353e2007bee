//! Teacher API types

use crate::envelope::Pagination;
use schoolhouse_core::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// Request to register a new teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTeacherRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Primary subject taught.
    pub subject: Option<String>,
    pub phone: Option<String>,
}

/// Request to update a teacher. Only set fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTeacherRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherResponse {
    pub teacher_id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: Option<String>,
    pub phone: Option<String>,
    /// Classes currently assigned to this teacher.
    pub class_ids: Vec<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherListData {
    pub teachers: Vec<TeacherResponse>,
    pub pagination: Pagination,
}
