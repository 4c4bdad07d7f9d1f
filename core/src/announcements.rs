use uuid::Uuid;

use crate::error::{Error, Result};
use crate::gateway::DataGateway;
use crate::types::Announcement;

/// Newest first, at most `limit`.
pub async fn latest_announcements(
    gateway: &dyn DataGateway,
    limit: usize,
) -> Result<Vec<Announcement>> {
    let mut announcements = gateway.list_announcements().await?;
    announcements.truncate(limit);
    Ok(announcements)
}

pub async fn post_announcement(
    gateway: &dyn DataGateway,
    title: &str,
    body: &str,
    posted_by: &str,
) -> Result<Announcement> {
    if title.trim().is_empty() {
        return Err(Error::InvalidRequest("title is required".to_string()));
    }
    if body.trim().is_empty() {
        return Err(Error::InvalidRequest("body is required".to_string()));
    }

    let announcement = Announcement {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        body: body.to_string(),
        posted_by: posted_by.to_string(),
        posted_at: chrono::Utc::now().to_rfc3339(),
    };
    let stored = gateway.insert_announcement(&announcement).await?;
    tracing::info!("Announcement {} posted by {}", stored.id, posted_by);
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::InMemoryGateway;

    #[tokio::test]
    async fn latest_cuts_at_the_limit() {
        let store = InMemoryGateway::new();
        for i in 0..5 {
            post_announcement(&store, &format!("Title {}", i), "Body", "admin-1")
                .await
                .unwrap();
        }

        let latest = latest_announcements(&store, 3).await.unwrap();
        assert_eq!(latest.len(), 3);

        let all = latest_announcements(&store, 100).await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn empty_title_or_body_is_rejected() {
        let store = InMemoryGateway::new();
        assert!(matches!(
            post_announcement(&store, "", "Body", "admin-1").await,
            Err(Error::InvalidRequest(_))
        ));
        assert!(matches!(
            post_announcement(&store, "Title", "  ", "admin-1").await,
            Err(Error::InvalidRequest(_))
        ));
    }
}
