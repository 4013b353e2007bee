//! Student-related API types

use crate::envelope::Pagination;
use schoolhouse_core::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// Request to enroll a new student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Admission number assigned by the school office.
    pub admission_no: String,
    pub class_id: Option<EntityId>,
    pub section: Option<String>,
    /// Linked parent/guardian record, if already registered.
    pub parent_id: Option<EntityId>,
    pub phone: Option<String>,
}

/// Request to update a student. Only set fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub class_id: Option<EntityId>,
    pub section: Option<String>,
    pub parent_id: Option<EntityId>,
    pub phone: Option<String>,
}

/// Student record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub student_id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub admission_no: String,
    pub class_id: Option<EntityId>,
    pub section: Option<String>,
    pub parent_id: Option<EntityId>,
    pub phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Payload of `GET /students`: `{ "data": { "students": [...], "pagination": {...} } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentListData {
    pub students: Vec<StudentResponse>,
    pub pagination: Pagination,
}
