use uuid::Uuid;

use crate::codes;
use crate::error::{Error, Result};
use crate::gateway::DataGateway;
use crate::students::canonical_s_number;
use crate::types::{AttendanceRecord, Meeting, MeetingPatch, MeetingType};

/// Creates a meeting with a fresh code, open for submissions.
pub async fn open_meeting(
    gateway: &dyn DataGateway,
    date: &str,
    meeting_type: MeetingType,
) -> Result<Meeting> {
    let meeting = Meeting {
        id: Uuid::new_v4().to_string(),
        date: date.to_string(),
        meeting_type,
        code: codes::meeting_code(),
        is_open: true,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    let stored = gateway.insert_meeting(&meeting).await?;
    tracing::info!(
        "Meeting {} opened for {} ({})",
        stored.id,
        stored.date,
        stored.meeting_type.as_str()
    );
    Ok(stored)
}

/// Stops further submissions. The code stays on the row for the roster view.
pub async fn close_meeting(gateway: &dyn DataGateway, meeting_id: &str) -> Result<Meeting> {
    let meeting = gateway
        .update_meeting(meeting_id, &MeetingPatch { is_open: false })
        .await?;
    tracing::info!("Meeting {} closed", meeting_id);
    Ok(meeting)
}

pub async fn list_meetings(gateway: &dyn DataGateway) -> Result<Vec<Meeting>> {
    gateway.list_meetings().await
}

/// Who has checked in so far, earliest first.
pub async fn meeting_roster(
    gateway: &dyn DataGateway,
    meeting_id: &str,
) -> Result<Vec<AttendanceRecord>> {
    if gateway.get_meeting(meeting_id).await?.is_none() {
        return Err(Error::NotFound("meeting"));
    }
    gateway.list_attendance_for_meeting(meeting_id).await
}

/// Marks a student present, checking in a fixed order: meeting exists, is
/// open, code matches, not already submitted. The code comparison is exact
/// and case-sensitive; whatever the student typed is what gets compared and
/// stored.
///
/// The existence check and the insert are two separate calls, and the store
/// has no unique constraint on the pair, so two simultaneous submissions
/// can still both land. Sequential duplicates always fail.
pub async fn submit_attendance(
    gateway: &dyn DataGateway,
    meeting_id: &str,
    s_number: &str,
    supplied_code: &str,
    session_type: MeetingType,
) -> Result<AttendanceRecord> {
    let student_id = canonical_s_number(s_number);

    let meeting = gateway
        .get_meeting(meeting_id)
        .await?
        .ok_or(Error::NotFound("meeting"))?;
    if !meeting.is_open {
        return Err(Error::MeetingClosed);
    }
    if supplied_code != meeting.code {
        return Err(Error::InvalidCode);
    }
    if gateway
        .find_attendance(&meeting.id, &student_id)
        .await?
        .is_some()
    {
        return Err(Error::AlreadySubmitted);
    }

    let record = AttendanceRecord {
        id: Uuid::new_v4().to_string(),
        meeting_id: meeting.id.clone(),
        student_id,
        code_entered: supplied_code.to_string(),
        session_type,
        submitted_at: chrono::Utc::now().to_rfc3339(),
    };
    let stored = gateway.insert_attendance(&record).await?;
    tracing::info!(
        "Attendance recorded for {} at meeting {}",
        stored.student_id,
        stored.meeting_id
    );
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::InMemoryGateway;

    async fn open_test_meeting(store: &InMemoryGateway) -> Meeting {
        open_meeting(store, "2026-02-02", MeetingType::Morning)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn opened_meetings_carry_a_code() {
        let store = InMemoryGateway::new();
        let meeting = open_test_meeting(&store).await;

        assert!(meeting.is_open);
        assert_eq!(meeting.code.len(), codes::MEETING_CODE_LEN);
        assert_eq!(meeting.meeting_type, MeetingType::Morning);
    }

    #[tokio::test]
    async fn check_order_missing_closed_code_duplicate() {
        let store = InMemoryGateway::new();
        let meeting = open_test_meeting(&store).await;

        // Unknown meeting comes first, even with a nonsense code.
        let err = submit_attendance(&store, "nope", "s123456", "??????", MeetingType::Morning)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound("meeting")));

        // Wrong code on an open meeting.
        let err = submit_attendance(&store, &meeting.id, "s123456", "WRONG1", MeetingType::Morning)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCode));

        // Correct submission.
        let record = submit_attendance(
            &store,
            &meeting.id,
            "s123456",
            &meeting.code,
            MeetingType::Morning,
        )
        .await
        .unwrap();
        assert_eq!(record.code_entered, meeting.code);

        // Second attempt, even spelled differently, is a duplicate.
        let err = submit_attendance(
            &store,
            &meeting.id,
            " S123456",
            &meeting.code,
            MeetingType::Morning,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::AlreadySubmitted));

        // Closed meeting rejects even the correct code, before any code check.
        close_meeting(&store, &meeting.id).await.unwrap();
        let err = submit_attendance(
            &store,
            &meeting.id,
            "s654321",
            &meeting.code,
            MeetingType::Morning,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::MeetingClosed));
    }

    #[tokio::test]
    async fn code_match_is_case_sensitive() {
        let store = InMemoryGateway::new();
        let meeting = Meeting {
            id: "m1".to_string(),
            date: "2026-02-02".to_string(),
            meeting_type: MeetingType::Morning,
            code: "AB12CD".to_string(),
            is_open: true,
            created_at: "2026-02-02T07:00:00Z".to_string(),
        };
        store.insert_meeting(&meeting).await.unwrap();

        let err = submit_attendance(&store, "m1", "s123456", "ab12cd", MeetingType::Morning)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCode));

        // No trimming on the supplied code either.
        let err = submit_attendance(&store, "m1", "s123456", "AB12CD ", MeetingType::Morning)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCode));

        submit_attendance(&store, "m1", "s123456", "AB12CD", MeetingType::Morning)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn roster_lists_submissions_for_one_meeting() {
        let store = InMemoryGateway::new();
        let morning = open_test_meeting(&store).await;
        let afternoon = open_meeting(&store, "2026-02-02", MeetingType::Afternoon)
            .await
            .unwrap();

        submit_attendance(&store, &morning.id, "s111111", &morning.code, MeetingType::Morning)
            .await
            .unwrap();
        submit_attendance(&store, &morning.id, "s222222", &morning.code, MeetingType::Morning)
            .await
            .unwrap();
        submit_attendance(
            &store,
            &afternoon.id,
            "s111111",
            &afternoon.code,
            MeetingType::Afternoon,
        )
        .await
        .unwrap();

        let roster = meeting_roster(&store, &morning.id).await.unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster.iter().all(|r| r.meeting_id == morning.id));

        assert!(matches!(
            meeting_roster(&store, "nope").await,
            Err(Error::NotFound("meeting"))
        ));
    }
}
