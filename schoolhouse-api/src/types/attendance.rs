//! Attendance API types

use crate::envelope::Pagination;
use chrono::NaiveDate;
use schoolhouse_core::{AttendanceStatus, EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// One student's outcome within a bulk attendance submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub student_id: EntityId,
    pub status: AttendanceStatus,
    pub remark: Option<String>,
}

/// Request to record attendance for a class on a given day.
///
/// One entry per student; the backend upserts, so re-submitting the same
/// day replaces earlier marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordAttendanceRequest {
    pub class_id: EntityId,
    pub date: NaiveDate,
    pub entries: Vec<AttendanceEntry>,
}

/// Request to correct a single attendance record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAttendanceRequest {
    pub status: Option<AttendanceStatus>,
    pub remark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub attendance_id: EntityId,
    pub student_id: EntityId,
    pub class_id: EntityId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub remark: Option<String>,
    pub recorded_by: Option<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceListData {
    pub records: Vec<AttendanceResponse>,
    pub pagination: Pagination,
}
