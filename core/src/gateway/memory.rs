use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::gateway::DataGateway;
use crate::types::{
    Announcement, AttendanceRecord, AuthUser, Event, EventAttendee, HourRequest, HourRequestPatch,
    Meeting, MeetingPatch, Student, StudentPatch, SupportQuestion,
};

#[derive(Default)]
struct Tables {
    students: HashMap<String, Student>,
    hour_requests: HashMap<String, HourRequest>,
    meetings: HashMap<String, Meeting>,
    attendance: Vec<AttendanceRecord>,
    auth_users: HashMap<String, AuthUser>,
    events: HashMap<String, Event>,
    event_attendees: Vec<EventAttendee>,
    announcements: Vec<Announcement>,
    support_questions: Vec<SupportQuestion>,
}

/// In-memory [`DataGateway`] for tests and local development. List ordering
/// matches the hosted implementation, and the store is just as permissive:
/// duplicate (meeting, student) and (event, student) rows are accepted here
/// too, so the workflows' own existence checks carry the dedup.
#[derive(Default)]
pub struct InMemoryGateway {
    tables: RwLock<Tables>,
    fail_student_updates: AtomicBool,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `update_student` fail with a gateway error,
    /// standing in for a backend outage mid-workflow.
    pub fn set_fail_student_updates(&self, fail: bool) {
        self.fail_student_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DataGateway for InMemoryGateway {
    // ========== STUDENTS ==========
    async fn get_student(&self, id: &str) -> Result<Option<Student>> {
        let guard = self.tables.read().await;
        Ok(guard.students.get(id).cloned())
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let guard = self.tables.read().await;
        let mut out: Vec<Student> = guard.students.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn insert_student(&self, student: &Student) -> Result<Student> {
        let mut guard = self.tables.write().await;
        if guard.students.contains_key(&student.id) {
            return Err(Error::DuplicateId(student.id.clone()));
        }
        guard
            .students
            .insert(student.id.clone(), student.clone());
        Ok(student.clone())
    }

    async fn update_student(&self, id: &str, patch: &StudentPatch) -> Result<Student> {
        if self.fail_student_updates.load(Ordering::SeqCst) {
            return Err(Error::Gateway {
                status: 503,
                body: "injected student update failure".to_string(),
            });
        }
        let mut guard = self.tables.write().await;
        let student = guard
            .students
            .get_mut(id)
            .ok_or(Error::NotFound("student"))?;
        if let Some(name) = &patch.name {
            student.name = name.clone();
        }
        if let Some(total_hours) = patch.total_hours {
            student.total_hours = Some(total_hours);
        }
        if let Some(last_hour_update) = &patch.last_hour_update {
            student.last_hour_update = Some(last_hour_update.clone());
        }
        if let Some(account_status) = patch.account_status {
            student.account_status = account_status;
        }
        if let Some(last_login) = &patch.last_login {
            student.last_login = Some(last_login.clone());
        }
        Ok(student.clone())
    }

    // ========== HOUR REQUESTS ==========
    async fn get_hour_request(&self, id: &str) -> Result<Option<HourRequest>> {
        let guard = self.tables.read().await;
        Ok(guard.hour_requests.get(id).cloned())
    }

    async fn list_hour_requests(&self, student_id: Option<&str>) -> Result<Vec<HourRequest>> {
        let guard = self.tables.read().await;
        let mut out: Vec<HourRequest> = guard
            .hour_requests
            .values()
            .filter(|r| student_id.is_none_or(|id| r.student_id == id))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(out)
    }

    async fn insert_hour_request(&self, request: &HourRequest) -> Result<HourRequest> {
        let mut guard = self.tables.write().await;
        if guard.hour_requests.contains_key(&request.id) {
            return Err(Error::DuplicateId(request.id.clone()));
        }
        guard
            .hour_requests
            .insert(request.id.clone(), request.clone());
        Ok(request.clone())
    }

    async fn update_hour_request(
        &self,
        id: &str,
        patch: &HourRequestPatch,
    ) -> Result<HourRequest> {
        let mut guard = self.tables.write().await;
        let request = guard
            .hour_requests
            .get_mut(id)
            .ok_or(Error::NotFound("hour request"))?;
        request.status = patch.status;
        request.reviewed_at = Some(patch.reviewed_at.clone());
        request.reviewed_by = Some(patch.reviewed_by.clone());
        request.admin_notes = patch.admin_notes.clone();
        Ok(request.clone())
    }

    // ========== MEETINGS ==========
    async fn get_meeting(&self, id: &str) -> Result<Option<Meeting>> {
        let guard = self.tables.read().await;
        Ok(guard.meetings.get(id).cloned())
    }

    async fn list_meetings(&self) -> Result<Vec<Meeting>> {
        let guard = self.tables.read().await;
        let mut out: Vec<Meeting> = guard.meetings.values().cloned().collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(out)
    }

    async fn insert_meeting(&self, meeting: &Meeting) -> Result<Meeting> {
        let mut guard = self.tables.write().await;
        if guard.meetings.contains_key(&meeting.id) {
            return Err(Error::DuplicateId(meeting.id.clone()));
        }
        guard
            .meetings
            .insert(meeting.id.clone(), meeting.clone());
        Ok(meeting.clone())
    }

    async fn update_meeting(&self, id: &str, patch: &MeetingPatch) -> Result<Meeting> {
        let mut guard = self.tables.write().await;
        let meeting = guard
            .meetings
            .get_mut(id)
            .ok_or(Error::NotFound("meeting"))?;
        meeting.is_open = patch.is_open;
        Ok(meeting.clone())
    }

    // ========== ATTENDANCE ==========
    async fn find_attendance(
        &self,
        meeting_id: &str,
        student_id: &str,
    ) -> Result<Option<AttendanceRecord>> {
        let guard = self.tables.read().await;
        Ok(guard
            .attendance
            .iter()
            .find(|r| r.meeting_id == meeting_id && r.student_id == student_id)
            .cloned())
    }

    async fn list_attendance_for_meeting(
        &self,
        meeting_id: &str,
    ) -> Result<Vec<AttendanceRecord>> {
        let guard = self.tables.read().await;
        let mut out: Vec<AttendanceRecord> = guard
            .attendance
            .iter()
            .filter(|r| r.meeting_id == meeting_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(out)
    }

    async fn insert_attendance(&self, record: &AttendanceRecord) -> Result<AttendanceRecord> {
        let mut guard = self.tables.write().await;
        guard.attendance.push(record.clone());
        Ok(record.clone())
    }

    // ========== AUTH USERS ==========
    async fn get_auth_user(&self, student_id: &str) -> Result<Option<AuthUser>> {
        let guard = self.tables.read().await;
        Ok(guard.auth_users.get(student_id).cloned())
    }

    async fn insert_auth_user(&self, user: &AuthUser) -> Result<AuthUser> {
        let mut guard = self.tables.write().await;
        if guard.auth_users.contains_key(&user.student_id) {
            return Err(Error::DuplicateId(user.student_id.clone()));
        }
        guard
            .auth_users
            .insert(user.student_id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn update_password(&self, student_id: &str, password_hash: &str) -> Result<AuthUser> {
        let mut guard = self.tables.write().await;
        let user = guard
            .auth_users
            .get_mut(student_id)
            .ok_or(Error::NotFound("auth user"))?;
        user.password_hash = password_hash.to_string();
        Ok(user.clone())
    }

    // ========== EVENTS ==========
    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let guard = self.tables.read().await;
        Ok(guard.events.get(id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let guard = self.tables.read().await;
        let mut out: Vec<Event> = guard.events.values().cloned().collect();
        out.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(out)
    }

    async fn insert_event(&self, event: &Event) -> Result<Event> {
        let mut guard = self.tables.write().await;
        if guard.events.contains_key(&event.id) {
            return Err(Error::DuplicateId(event.id.clone()));
        }
        guard.events.insert(event.id.clone(), event.clone());
        Ok(event.clone())
    }

    async fn find_event_attendee(
        &self,
        event_id: &str,
        student_id: &str,
    ) -> Result<Option<EventAttendee>> {
        let guard = self.tables.read().await;
        Ok(guard
            .event_attendees
            .iter()
            .find(|a| a.event_id == event_id && a.student_id == student_id)
            .cloned())
    }

    async fn list_event_attendees(&self, event_id: &str) -> Result<Vec<EventAttendee>> {
        let guard = self.tables.read().await;
        let mut out: Vec<EventAttendee> = guard
            .event_attendees
            .iter()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));
        Ok(out)
    }

    async fn insert_event_attendee(&self, attendee: &EventAttendee) -> Result<EventAttendee> {
        let mut guard = self.tables.write().await;
        guard.event_attendees.push(attendee.clone());
        Ok(attendee.clone())
    }

    async fn delete_event_attendee(&self, event_id: &str, student_id: &str) -> Result<()> {
        let mut guard = self.tables.write().await;
        guard
            .event_attendees
            .retain(|a| !(a.event_id == event_id && a.student_id == student_id));
        Ok(())
    }

    // ========== ANNOUNCEMENTS ==========
    async fn list_announcements(&self) -> Result<Vec<Announcement>> {
        let guard = self.tables.read().await;
        let mut out = guard.announcements.clone();
        out.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        Ok(out)
    }

    async fn insert_announcement(&self, announcement: &Announcement) -> Result<Announcement> {
        let mut guard = self.tables.write().await;
        guard.announcements.push(announcement.clone());
        Ok(announcement.clone())
    }

    // ========== SUPPORT QUESTIONS ==========
    async fn list_support_questions(&self) -> Result<Vec<SupportQuestion>> {
        let guard = self.tables.read().await;
        let mut out = guard.support_questions.clone();
        out.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(out)
    }

    async fn insert_support_question(&self, question: &SupportQuestion) -> Result<SupportQuestion> {
        let mut guard = self.tables.write().await;
        guard.support_questions.push(question.clone());
        Ok(question.clone())
    }
}
