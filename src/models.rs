use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reminder::Permission;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateEntry {
    /// `YYYY-MM-DD`, the stable key used by completions and notes.
    pub id: String,
    pub date: NaiveDate,
    pub display_text: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub percentage: f64,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub id: String,
    pub checked: bool,
    pub completed_ids: Vec<String>,
    pub stats: ProgressStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NoteRequest {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NoteResponse {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryView {
    pub id: String,
    pub display_text: String,
    pub label: String,
    pub weekday: String,
    pub checked: bool,
    pub is_today: bool,
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JourneyResponse {
    pub today: String,
    pub range: String,
    pub entries: Vec<EntryView>,
    pub stats: ProgressStats,
    pub complete: bool,
    pub permission: Permission,
}

#[derive(Debug, Deserialize)]
pub struct PermissionRequest {
    pub result: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PermissionResponse {
    pub permission: Permission,
}
