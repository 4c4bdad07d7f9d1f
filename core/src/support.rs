use uuid::Uuid;

use crate::error::{Error, Result};
use crate::gateway::DataGateway;
use crate::students::canonical_s_number;
use crate::types::SupportQuestion;

/// Files a question. Anonymous submissions pass no student id.
pub async fn submit_question(
    gateway: &dyn DataGateway,
    s_number: Option<&str>,
    subject: &str,
    body: &str,
) -> Result<SupportQuestion> {
    if subject.trim().is_empty() {
        return Err(Error::InvalidRequest("subject is required".to_string()));
    }
    if body.trim().is_empty() {
        return Err(Error::InvalidRequest("body is required".to_string()));
    }

    let question = SupportQuestion {
        id: Uuid::new_v4().to_string(),
        student_id: s_number.map(canonical_s_number),
        subject: subject.to_string(),
        body: body.to_string(),
        submitted_at: chrono::Utc::now().to_rfc3339(),
    };
    let stored = gateway.insert_support_question(&question).await?;
    tracing::info!("Support question {} filed", stored.id);
    Ok(stored)
}

/// Admin inbox, newest first.
pub async fn list_questions(gateway: &dyn DataGateway) -> Result<Vec<SupportQuestion>> {
    gateway.list_support_questions().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::InMemoryGateway;

    #[tokio::test]
    async fn files_named_and_anonymous_questions() {
        let store = InMemoryGateway::new();
        let named = submit_question(&store, Some(" S123456"), "Login", "Cannot sign in")
            .await
            .unwrap();
        assert_eq!(named.student_id.as_deref(), Some("s123456"));

        let anonymous = submit_question(&store, None, "Hours", "Missing my hours")
            .await
            .unwrap();
        assert!(anonymous.student_id.is_none());

        assert_eq!(list_questions(&store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn rejects_empty_subject_or_body() {
        let store = InMemoryGateway::new();
        assert!(matches!(
            submit_question(&store, None, " ", "Body").await,
            Err(Error::InvalidRequest(_))
        ));
        assert!(matches!(
            submit_question(&store, None, "Subject", "").await,
            Err(Error::InvalidRequest(_))
        ));
    }
}
