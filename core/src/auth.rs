use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::gateway::DataGateway;
use crate::password;
use crate::students::{canonical_s_number, is_valid_s_number};
use crate::types::{AccountStatus, AuthUser, Student, StudentPatch};

/// A signed-in student. Handed to the UI after [`login`]; the workflows
/// never read it back, they take ids explicitly.
#[derive(Debug, Clone)]
pub struct Session {
    pub student: Student,
    pub started_at: String,
}

/// Creates the credential row and, when the student is not already on the
/// roster, a directory row awaiting admin approval.
pub async fn register(
    gateway: &dyn DataGateway,
    s_number: &str,
    name: &str,
    password_plain: &str,
) -> Result<Student> {
    let id = canonical_s_number(s_number);
    if !is_valid_s_number(&id) {
        return Err(Error::InvalidRequest(format!(
            "not an S-Number: {:?}",
            s_number
        )));
    }
    if name.trim().is_empty() {
        return Err(Error::InvalidRequest("name is required".to_string()));
    }
    if password_plain.is_empty() {
        return Err(Error::InvalidRequest("password is required".to_string()));
    }
    if gateway.get_auth_user(&id).await?.is_some() {
        return Err(Error::DuplicateId(id));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let student = match gateway.get_student(&id).await? {
        // Pre-seeded roster rows keep their existing data.
        Some(existing) => existing,
        None => {
            gateway
                .insert_student(&Student {
                    id: id.clone(),
                    name: name.trim().to_string(),
                    total_hours: Some(0.0),
                    account_status: AccountStatus::Pending,
                    last_hour_update: None,
                    last_login: None,
                    created_at: now.clone(),
                })
                .await?
        }
    };

    gateway
        .insert_auth_user(&AuthUser {
            student_id: id.clone(),
            password_hash: password::hash_password(password_plain),
            created_at: now,
        })
        .await?;

    tracing::info!("Registered student {}", id);
    Ok(student)
}

/// Verifies the credential and stamps `last_login`. A missing account and a
/// wrong password answer identically.
pub async fn login(
    gateway: &dyn DataGateway,
    s_number: &str,
    password_plain: &str,
) -> Result<Session> {
    let id = canonical_s_number(s_number);
    let auth_user = gateway
        .get_auth_user(&id)
        .await?
        .ok_or(Error::InvalidCredentials)?;
    if !password::verify_password(password_plain, &auth_user.password_hash) {
        tracing::warn!("Failed login attempt for {}", id);
        return Err(Error::InvalidCredentials);
    }

    let student = gateway
        .get_student(&id)
        .await?
        .ok_or(Error::NotFound("student"))?;

    // The login stamp is best effort and never blocks the login itself.
    let now = chrono::Utc::now().to_rfc3339();
    let patch = StudentPatch {
        last_login: Some(now.clone()),
        ..StudentPatch::default()
    };
    let student = match gateway.update_student(&id, &patch).await {
        Ok(updated) => updated,
        Err(e) => {
            tracing::warn!("Failed to stamp last_login for {}: {}", id, e);
            student
        }
    };

    tracing::info!("Login successful for {}", id);
    Ok(Session {
        student,
        started_at: now,
    })
}

/// Re-verifies the current password, then stores a fresh hash.
pub async fn change_password(
    gateway: &dyn DataGateway,
    s_number: &str,
    current: &str,
    new_password: &str,
) -> Result<()> {
    let id = canonical_s_number(s_number);
    if new_password.is_empty() {
        return Err(Error::InvalidRequest("password is required".to_string()));
    }
    let auth_user = gateway
        .get_auth_user(&id)
        .await?
        .ok_or(Error::InvalidCredentials)?;
    if !password::verify_password(current, &auth_user.password_hash) {
        return Err(Error::InvalidCredentials);
    }
    gateway
        .update_password(&id, &password::hash_password(new_password))
        .await?;
    tracing::info!("Password changed for {}", id);
    Ok(())
}

/// Single-slot holder for the signed-in session. The UI owns when to set
/// and clear it; nothing in this crate reads it implicitly.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_session(&self, session: Session) {
        if let Ok(mut current) = self.current.write() {
            *current = Some(session);
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut current) = self.current.write() {
            *current = None;
        }
    }
}
