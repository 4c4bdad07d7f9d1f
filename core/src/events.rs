use uuid::Uuid;

use crate::error::{Error, Result};
use crate::gateway::DataGateway;
use crate::students::canonical_s_number;
use crate::types::{CreateEventRequest, Event, EventAttendee};

/// Events dated today or later, soonest first.
pub async fn upcoming_events(gateway: &dyn DataGateway) -> Result<Vec<Event>> {
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let mut events = gateway.list_events().await?;
    events.retain(|e| e.date >= today);
    Ok(events)
}

/// Admin: put a new event on the calendar.
pub async fn create_event(gateway: &dyn DataGateway, req: &CreateEventRequest) -> Result<Event> {
    if req.name.trim().is_empty() {
        return Err(Error::InvalidRequest("event name is required".to_string()));
    }
    if req.date.trim().is_empty() {
        return Err(Error::InvalidRequest("event date is required".to_string()));
    }

    let event = Event {
        id: Uuid::new_v4().to_string(),
        name: req.name.clone(),
        date: req.date.clone(),
        location: req.location.clone(),
        description: req.description.clone(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    let stored = gateway.insert_event(&event).await?;
    tracing::info!("Event {} created for {}", stored.id, stored.date);
    Ok(stored)
}

/// Signs a student up for an event. Same check-then-act dedup as meeting
/// attendance, with the same concurrent-duplicate caveat.
pub async fn rsvp(
    gateway: &dyn DataGateway,
    event_id: &str,
    s_number: &str,
) -> Result<EventAttendee> {
    let student_id = canonical_s_number(s_number);
    if gateway.get_event(event_id).await?.is_none() {
        return Err(Error::NotFound("event"));
    }
    if gateway
        .find_event_attendee(event_id, &student_id)
        .await?
        .is_some()
    {
        return Err(Error::AlreadySubmitted);
    }

    let attendee = EventAttendee {
        id: Uuid::new_v4().to_string(),
        event_id: event_id.to_string(),
        student_id,
        joined_at: chrono::Utc::now().to_rfc3339(),
    };
    let stored = gateway.insert_event_attendee(&attendee).await?;
    tracing::info!(
        "RSVP recorded for {} at event {}",
        stored.student_id,
        stored.event_id
    );
    Ok(stored)
}

/// Removing a signup that does not exist is a no-op.
pub async fn cancel_rsvp(gateway: &dyn DataGateway, event_id: &str, s_number: &str) -> Result<()> {
    let student_id = canonical_s_number(s_number);
    gateway.delete_event_attendee(event_id, &student_id).await
}

pub async fn event_roster(
    gateway: &dyn DataGateway,
    event_id: &str,
) -> Result<Vec<EventAttendee>> {
    if gateway.get_event(event_id).await?.is_none() {
        return Err(Error::NotFound("event"));
    }
    gateway.list_event_attendees(event_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::InMemoryGateway;

    fn request(name: &str, date: &str) -> CreateEventRequest {
        CreateEventRequest {
            name: name.to_string(),
            date: date.to_string(),
            location: Some("Gym".to_string()),
            description: None,
        }
    }

    #[tokio::test]
    async fn upcoming_hides_past_events() {
        let store = InMemoryGateway::new();
        create_event(&store, &request("Past bake sale", "2000-01-01"))
            .await
            .unwrap();
        create_event(&store, &request("Future gala", "2999-01-01"))
            .await
            .unwrap();

        let upcoming = upcoming_events(&store).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].name, "Future gala");
    }

    #[tokio::test]
    async fn create_event_requires_name_and_date() {
        let store = InMemoryGateway::new();
        assert!(matches!(
            create_event(&store, &request(" ", "2999-01-01")).await,
            Err(Error::InvalidRequest(_))
        ));
        assert!(matches!(
            create_event(&store, &request("Gala", "")).await,
            Err(Error::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn rsvp_cancel_rsvp_again() {
        let store = InMemoryGateway::new();
        let event = create_event(&store, &request("Gala", "2999-01-01"))
            .await
            .unwrap();

        assert!(matches!(
            rsvp(&store, "nope", "s123456").await,
            Err(Error::NotFound("event"))
        ));

        rsvp(&store, &event.id, "S123456").await.unwrap();
        let err = rsvp(&store, &event.id, "s123456").await.unwrap_err();
        assert!(matches!(err, Error::AlreadySubmitted));

        cancel_rsvp(&store, &event.id, "s123456").await.unwrap();
        assert!(event_roster(&store, &event.id).await.unwrap().is_empty());

        // Free to sign up again after cancelling.
        rsvp(&store, &event.id, "s123456").await.unwrap();
        let roster = event_roster(&store, &event.id).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].student_id, "s123456");
    }
}
