//! Class API types

use crate::envelope::Pagination;
use schoolhouse_core::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// Request to create a new class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateClassRequest {
    /// Display name, e.g. "Grade 7".
    pub name: String,
    pub section: Option<String>,
    /// Homeroom teacher.
    pub teacher_id: Option<EntityId>,
    pub capacity: Option<u32>,
}

/// Request to update a class. Only set fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub section: Option<String>,
    pub teacher_id: Option<EntityId>,
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassResponse {
    pub class_id: EntityId,
    pub name: String,
    pub section: Option<String>,
    pub teacher_id: Option<EntityId>,
    pub capacity: Option<u32>,
    /// Current enrollment count.
    pub student_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassListData {
    pub classes: Vec<ClassResponse>,
    pub pagination: Pagination,
}
