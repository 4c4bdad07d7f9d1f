use crate::error::{Error, Result};
use crate::gateway::DataGateway;
use crate::types::{AccountStatus, Student, StudentPatch};

/// Lowercases and trims a raw S-Number so every lookup and write uses one
/// spelling. `"S123456 "` and `"s123456"` name the same student.
pub fn canonical_s_number(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Canonical form check: `s` followed by exactly six digits.
pub fn is_valid_s_number(id: &str) -> bool {
    match id.strip_prefix('s') {
        Some(digits) => digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

pub async fn get_student(gateway: &dyn DataGateway, s_number: &str) -> Result<Student> {
    let id = canonical_s_number(s_number);
    gateway
        .get_student(&id)
        .await?
        .ok_or(Error::NotFound("student"))
}

/// Directory listing, sorted by name.
pub async fn list_students(gateway: &dyn DataGateway) -> Result<Vec<Student>> {
    gateway.list_students().await
}

/// Admin approval of a pending account.
pub async fn activate_account(gateway: &dyn DataGateway, s_number: &str) -> Result<Student> {
    let id = canonical_s_number(s_number);
    let patch = StudentPatch {
        account_status: Some(AccountStatus::Active),
        ..StudentPatch::default()
    };
    let student = gateway.update_student(&id, &patch).await?;
    tracing::info!("Account activated: {}", id);
    Ok(student)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::InMemoryGateway;

    fn pending_student(id: &str) -> Student {
        Student {
            id: id.to_string(),
            name: "Ada".to_string(),
            total_hours: None,
            account_status: AccountStatus::Pending,
            last_hour_update: None,
            last_login: None,
            created_at: "2026-01-05T08:00:00Z".to_string(),
        }
    }

    #[test]
    fn canonical_form() {
        assert_eq!(canonical_s_number(" S123456 "), "s123456");
        assert_eq!(canonical_s_number("s123456"), "s123456");
        assert_eq!(canonical_s_number("S123456\n"), "s123456");
    }

    #[test]
    fn s_number_validity() {
        assert!(is_valid_s_number("s123456"));
        assert!(!is_valid_s_number("S123456")); // not canonical
        assert!(!is_valid_s_number("s12345"));
        assert!(!is_valid_s_number("s1234567"));
        assert!(!is_valid_s_number("s12345a"));
        assert!(!is_valid_s_number("x123456"));
        assert!(!is_valid_s_number(""));
    }

    #[tokio::test]
    async fn lookup_accepts_any_spelling() {
        let store = InMemoryGateway::new();
        store
            .insert_student(&pending_student("s123456"))
            .await
            .unwrap();

        let found = get_student(&store, " S123456 ").await.unwrap();
        assert_eq!(found.id, "s123456");

        let err = get_student(&store, "s999999").await.unwrap_err();
        assert!(matches!(err, Error::NotFound("student")));
    }

    #[tokio::test]
    async fn activation_flips_pending_to_active() {
        let store = InMemoryGateway::new();
        store
            .insert_student(&pending_student("s123456"))
            .await
            .unwrap();

        let student = activate_account(&store, "S123456").await.unwrap();
        assert_eq!(student.account_status, AccountStatus::Active);
    }
}
