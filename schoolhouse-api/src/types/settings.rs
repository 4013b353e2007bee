//! School settings API types

use schoolhouse_core::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// School-wide settings. Structured fields the UI depends on, plus a
/// free-form parameter map for everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub school_name: String,
    /// Academic year label, e.g. "2026/2027".
    pub academic_year: String,
    pub timezone: String,
    /// Days after which attendance records are locked for editing.
    pub attendance_edit_window_days: u32,
    #[serde(default)]
    pub params: HashMap<String, String>,
    pub updated_at: Timestamp,
}

/// Request to update settings. Only set fields are changed; `params`
/// entries are merged key-by-key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    pub school_name: Option<String>,
    pub academic_year: Option<String>,
    pub timezone: Option<String>,
    pub attendance_edit_window_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, String>>,
}
