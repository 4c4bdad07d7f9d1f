pub mod types;
pub mod error;
pub mod config;
pub mod gateway;
pub mod students;
pub mod auth;
pub mod hours;
pub mod attendance;
pub mod events;
pub mod announcements;
pub mod support;
pub mod password;
pub mod codes;

use std::sync::Arc;

use crate::auth::SessionStore;
use crate::config::Config;
use crate::error::Result;
use crate::gateway::rest::RestGateway;
use crate::gateway::DataGateway;

/// Shared application state
pub struct AppState {
    pub gateway: Arc<dyn DataGateway>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            sessions: SessionStore::new(),
        })
    }

    /// Connects to the hosted backend configured in the environment.
    pub fn from_env() -> Result<Arc<Self>> {
        let config = Config::from_env()?;
        Ok(Self::new(Arc::new(RestGateway::new(&config))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::InMemoryGateway;

    #[tokio::test]
    async fn workflows_run_through_shared_state() {
        let state = AppState::new(Arc::new(InMemoryGateway::new()));

        let student = auth::register(state.gateway.as_ref(), "s123456", "Ada", "pw")
            .await
            .unwrap();
        assert_eq!(student.id, "s123456");

        let session = auth::login(state.gateway.as_ref(), "s123456", "pw")
            .await
            .unwrap();
        state.sessions.set_session(session);
        assert!(state.sessions.current().is_some());
    }
}
