pub mod memory;
pub mod rest;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Announcement, AttendanceRecord, AuthUser, Event, EventAttendee, HourRequest, HourRequestPatch,
    Meeting, MeetingPatch, Student, StudentPatch, SupportQuestion,
};

/// Storage seam the workflows talk to: one method per table operation.
/// Inserts return the stored row, updates return the row as written.
/// `get_*` and `find_*` return `Ok(None)` when nothing matches; errors are
/// reserved for transport and decode failures. The hosted-backend client
/// lives in [`rest`], the test double in [`memory`].
#[async_trait]
pub trait DataGateway: Send + Sync {
    // ========== STUDENTS ==========
    async fn get_student(&self, id: &str) -> Result<Option<Student>>;
    async fn list_students(&self) -> Result<Vec<Student>>;
    async fn insert_student(&self, student: &Student) -> Result<Student>;
    async fn update_student(&self, id: &str, patch: &StudentPatch) -> Result<Student>;

    // ========== HOUR REQUESTS ==========
    async fn get_hour_request(&self, id: &str) -> Result<Option<HourRequest>>;
    /// All requests, or one student's, newest first.
    async fn list_hour_requests(&self, student_id: Option<&str>) -> Result<Vec<HourRequest>>;
    async fn insert_hour_request(&self, request: &HourRequest) -> Result<HourRequest>;
    async fn update_hour_request(&self, id: &str, patch: &HourRequestPatch)
        -> Result<HourRequest>;

    // ========== MEETINGS ==========
    async fn get_meeting(&self, id: &str) -> Result<Option<Meeting>>;
    async fn list_meetings(&self) -> Result<Vec<Meeting>>;
    async fn insert_meeting(&self, meeting: &Meeting) -> Result<Meeting>;
    async fn update_meeting(&self, id: &str, patch: &MeetingPatch) -> Result<Meeting>;

    // ========== ATTENDANCE ==========
    /// Record for one student at one meeting, if any.
    async fn find_attendance(&self, meeting_id: &str, student_id: &str)
        -> Result<Option<AttendanceRecord>>;
    async fn list_attendance_for_meeting(&self, meeting_id: &str)
        -> Result<Vec<AttendanceRecord>>;
    async fn insert_attendance(&self, record: &AttendanceRecord) -> Result<AttendanceRecord>;

    // ========== AUTH USERS ==========
    async fn get_auth_user(&self, student_id: &str) -> Result<Option<AuthUser>>;
    async fn insert_auth_user(&self, user: &AuthUser) -> Result<AuthUser>;
    async fn update_password(&self, student_id: &str, password_hash: &str) -> Result<AuthUser>;

    // ========== EVENTS ==========
    async fn get_event(&self, id: &str) -> Result<Option<Event>>;
    async fn list_events(&self) -> Result<Vec<Event>>;
    async fn insert_event(&self, event: &Event) -> Result<Event>;
    async fn find_event_attendee(&self, event_id: &str, student_id: &str)
        -> Result<Option<EventAttendee>>;
    async fn list_event_attendees(&self, event_id: &str) -> Result<Vec<EventAttendee>>;
    async fn insert_event_attendee(&self, attendee: &EventAttendee) -> Result<EventAttendee>;
    async fn delete_event_attendee(&self, event_id: &str, student_id: &str) -> Result<()>;

    // ========== ANNOUNCEMENTS ==========
    async fn list_announcements(&self) -> Result<Vec<Announcement>>;
    async fn insert_announcement(&self, announcement: &Announcement) -> Result<Announcement>;

    // ========== SUPPORT QUESTIONS ==========
    async fn list_support_questions(&self) -> Result<Vec<SupportQuestion>>;
    async fn insert_support_question(&self, question: &SupportQuestion)
        -> Result<SupportQuestion>;
}
