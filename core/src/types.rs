use serde::{Deserialize, Serialize};

// ========== STUDENT ==========
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Active,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Active => "active",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Student {
    /// Canonical S-Number: lowercase `s` followed by six digits.
    pub id: String,
    pub name: String,
    /// Cumulative approved hours. Null in the store reads as zero.
    pub total_hours: Option<f64>,
    pub account_status: AccountStatus,
    pub last_hour_update: Option<String>,
    pub last_login: Option<String>,
    pub created_at: String,
}

/// Partial update for a student row. Only the fields the workflows are
/// allowed to touch; unset fields are left out of the patch body.
#[derive(Debug, Default, Clone, Serialize)]
pub struct StudentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_hour_update: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_status: Option<AccountStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

// ========== HOUR REQUEST ==========
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HourRequest {
    pub id: String,
    pub student_id: String,
    pub event_name: String,
    pub event_date: String,
    pub hours_requested: f64,
    pub description: String,
    pub image_ref: Option<String>,
    pub status: RequestStatus,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<String>,
    pub submitted_at: String,
}

#[derive(Debug, Deserialize)]
pub struct HourSubmission {
    pub student_id: String,
    pub event_name: String,
    pub event_date: String,
    pub hours_requested: f64,
    pub description: String,
    #[serde(default)]
    pub image_ref: Option<String>,
}

/// Review patch written by `hours::decide`. All four fields are written on
/// every decision; `admin_notes` may be written as null.
#[derive(Debug, Clone, Serialize)]
pub struct HourRequestPatch {
    pub status: RequestStatus,
    pub reviewed_at: String,
    pub reviewed_by: String,
    pub admin_notes: Option<String>,
}

// ========== MEETING ==========
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    Morning,
    Afternoon,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Morning => "morning",
            MeetingType::Afternoon => "afternoon",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Meeting {
    pub id: String,
    pub date: String,
    pub meeting_type: MeetingType,
    /// Six characters from `[A-Z0-9]`, compared case-sensitively.
    pub code: String,
    pub is_open: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingPatch {
    pub is_open: bool,
}

// ========== ATTENDANCE ==========
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AttendanceRecord {
    pub id: String,
    pub meeting_id: String,
    pub student_id: String,
    pub code_entered: String,
    pub session_type: MeetingType,
    pub submitted_at: String,
}

// ========== AUTH USER ==========
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthUser {
    pub student_id: String,
    /// `"<hex sha256>:<salt>"`, see `password`.
    pub password_hash: String,
    pub created_at: String,
}

// ========== EVENT ==========
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub date: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub date: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EventAttendee {
    pub id: String,
    pub event_id: String,
    pub student_id: String,
    pub joined_at: String,
}

// ========== ANNOUNCEMENT ==========
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub body: String,
    pub posted_by: String,
    pub posted_at: String,
}

// ========== SUPPORT QUESTION ==========
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SupportQuestion {
    pub id: String,
    pub student_id: Option<String>,
    pub subject: String,
    pub body: String,
    pub submitted_at: String,
}
