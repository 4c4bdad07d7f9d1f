use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway::DataGateway;
use crate::types::{
    Announcement, AttendanceRecord, AuthUser, Event, EventAttendee, HourRequest, HourRequestPatch,
    Meeting, MeetingPatch, Student, StudentPatch, SupportQuestion,
};

const ERROR_BODY_LIMIT: usize = 200;

/// Hosted backend client. Speaks the PostgREST dialect: each table is a
/// resource under `/rest/v1/`, filters are query parameters such as
/// `id=eq.s123456`, and writes ask for the stored row back with
/// `Prefer: return=representation`. Row endpoints always answer with a
/// JSON array, even for single-row reads.
pub struct RestGateway {
    http: Client,
    base_url: String,
    anon_key: String,
    bearer_key: String,
}

impl RestGateway {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            bearer_key: config.bearer_key().to_string(),
        }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.bearer_key)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = self
            .request(Method::GET, table)
            .query(filters)
            .send()
            .await?;
        rows(response).await
    }

    async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Option<T>> {
        let mut found: Vec<T> = self.select(table, filters).await?;
        if found.is_empty() {
            Ok(None)
        } else {
            Ok(Some(found.remove(0)))
        }
    }

    async fn insert<T, B>(&self, table: &str, label: &'static str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        first(label, rows(response).await?)
    }

    async fn patch<T, B>(
        &self,
        table: &str,
        label: &'static str,
        filters: &[(&str, String)],
        body: &B,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .request(Method::PATCH, table)
            .query(filters)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        first(label, rows(response).await?)
    }

    async fn delete(&self, table: &str, filters: &[(&str, String)]) -> Result<()> {
        let response = self
            .request(Method::DELETE, table)
            .query(filters)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(Error::Gateway {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct PasswordPatch<'a> {
    password_hash: &'a str,
}

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

fn order(clause: &str) -> (&'static str, String) {
    ("order", clause.to_string())
}

async fn rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(Error::Gateway {
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }
    Ok(serde_json::from_str(&body)?)
}

fn first<T>(label: &'static str, found: Vec<T>) -> Result<T> {
    found.into_iter().next().ok_or(Error::NotFound(label))
}

/// Error bodies can be multi-kilobyte HTML pages.
fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= ERROR_BODY_LIMIT {
        return trimmed.to_string();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}

#[async_trait]
impl DataGateway for RestGateway {
    // ========== STUDENTS ==========
    async fn get_student(&self, id: &str) -> Result<Option<Student>> {
        self.select_one("students", &[("id", eq(id))]).await
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        self.select("students", &[order("name.asc")]).await
    }

    async fn insert_student(&self, student: &Student) -> Result<Student> {
        self.insert("students", "student", student).await
    }

    async fn update_student(&self, id: &str, patch: &StudentPatch) -> Result<Student> {
        self.patch("students", "student", &[("id", eq(id))], patch)
            .await
    }

    // ========== HOUR REQUESTS ==========
    async fn get_hour_request(&self, id: &str) -> Result<Option<HourRequest>> {
        self.select_one("hour_requests", &[("id", eq(id))]).await
    }

    async fn list_hour_requests(&self, student_id: Option<&str>) -> Result<Vec<HourRequest>> {
        let mut filters = Vec::new();
        if let Some(student_id) = student_id {
            filters.push(("student_id", eq(student_id)));
        }
        filters.push(order("submitted_at.desc"));
        self.select("hour_requests", &filters).await
    }

    async fn insert_hour_request(&self, request: &HourRequest) -> Result<HourRequest> {
        self.insert("hour_requests", "hour request", request).await
    }

    async fn update_hour_request(
        &self,
        id: &str,
        patch: &HourRequestPatch,
    ) -> Result<HourRequest> {
        self.patch("hour_requests", "hour request", &[("id", eq(id))], patch)
            .await
    }

    // ========== MEETINGS ==========
    async fn get_meeting(&self, id: &str) -> Result<Option<Meeting>> {
        self.select_one("meetings", &[("id", eq(id))]).await
    }

    async fn list_meetings(&self) -> Result<Vec<Meeting>> {
        self.select("meetings", &[order("date.desc")]).await
    }

    async fn insert_meeting(&self, meeting: &Meeting) -> Result<Meeting> {
        self.insert("meetings", "meeting", meeting).await
    }

    async fn update_meeting(&self, id: &str, patch: &MeetingPatch) -> Result<Meeting> {
        self.patch("meetings", "meeting", &[("id", eq(id))], patch)
            .await
    }

    // ========== ATTENDANCE ==========
    async fn find_attendance(
        &self,
        meeting_id: &str,
        student_id: &str,
    ) -> Result<Option<AttendanceRecord>> {
        self.select_one(
            "meeting_attendance",
            &[("meeting_id", eq(meeting_id)), ("student_id", eq(student_id))],
        )
        .await
    }

    async fn list_attendance_for_meeting(
        &self,
        meeting_id: &str,
    ) -> Result<Vec<AttendanceRecord>> {
        self.select(
            "meeting_attendance",
            &[("meeting_id", eq(meeting_id)), order("submitted_at.asc")],
        )
        .await
    }

    async fn insert_attendance(&self, record: &AttendanceRecord) -> Result<AttendanceRecord> {
        self.insert("meeting_attendance", "attendance record", record)
            .await
    }

    // ========== AUTH USERS ==========
    async fn get_auth_user(&self, student_id: &str) -> Result<Option<AuthUser>> {
        self.select_one("auth_users", &[("student_id", eq(student_id))])
            .await
    }

    async fn insert_auth_user(&self, user: &AuthUser) -> Result<AuthUser> {
        self.insert("auth_users", "auth user", user).await
    }

    async fn update_password(&self, student_id: &str, password_hash: &str) -> Result<AuthUser> {
        self.patch(
            "auth_users",
            "auth user",
            &[("student_id", eq(student_id))],
            &PasswordPatch { password_hash },
        )
        .await
    }

    // ========== EVENTS ==========
    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        self.select_one("events", &[("id", eq(id))]).await
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        self.select("events", &[order("date.asc")]).await
    }

    async fn insert_event(&self, event: &Event) -> Result<Event> {
        self.insert("events", "event", event).await
    }

    async fn find_event_attendee(
        &self,
        event_id: &str,
        student_id: &str,
    ) -> Result<Option<EventAttendee>> {
        self.select_one(
            "event_attendees",
            &[("event_id", eq(event_id)), ("student_id", eq(student_id))],
        )
        .await
    }

    async fn list_event_attendees(&self, event_id: &str) -> Result<Vec<EventAttendee>> {
        self.select(
            "event_attendees",
            &[("event_id", eq(event_id)), order("joined_at.asc")],
        )
        .await
    }

    async fn insert_event_attendee(&self, attendee: &EventAttendee) -> Result<EventAttendee> {
        self.insert("event_attendees", "event attendee", attendee)
            .await
    }

    async fn delete_event_attendee(&self, event_id: &str, student_id: &str) -> Result<()> {
        self.delete(
            "event_attendees",
            &[("event_id", eq(event_id)), ("student_id", eq(student_id))],
        )
        .await
    }

    // ========== ANNOUNCEMENTS ==========
    async fn list_announcements(&self) -> Result<Vec<Announcement>> {
        self.select("announcements", &[order("posted_at.desc")]).await
    }

    async fn insert_announcement(&self, announcement: &Announcement) -> Result<Announcement> {
        self.insert("announcements", "announcement", announcement)
            .await
    }

    // ========== SUPPORT QUESTIONS ==========
    async fn list_support_questions(&self) -> Result<Vec<SupportQuestion>> {
        self.select("support_questions", &[order("submitted_at.desc")])
            .await
    }

    async fn insert_support_question(&self, question: &SupportQuestion) -> Result<SupportQuestion> {
        self.insert("support_questions", "support question", question)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_filter_format() {
        assert_eq!(eq("s123456"), "eq.s123456");
    }

    #[test]
    fn short_error_bodies_pass_through() {
        assert_eq!(truncate_body("  row not found \n"), "row not found");
    }

    #[test]
    fn long_error_bodies_are_cut() {
        let body = "x".repeat(500);
        let cut = truncate_body(&body);
        assert_eq!(cut.len(), ERROR_BODY_LIMIT + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = "é".repeat(300);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= ERROR_BODY_LIMIT + 3);
    }

    #[test]
    fn password_patch_body() {
        let body = serde_json::to_value(PasswordPatch {
            password_hash: "abc:def",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "password_hash": "abc:def" }));
    }
}
