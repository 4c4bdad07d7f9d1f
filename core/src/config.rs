use crate::error::{Error, Result};

const BACKEND_URL: &str = "SUPABASE_URL";
const BACKEND_ANON_KEY: &str = "SUPABASE_ANON_KEY";
const BACKEND_SERVICE_KEY: &str = "SUPABASE_SERVICE_KEY";

/// Connection settings for the hosted backend, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub anon_key: String,
    /// Privileged key, if deployed with one. Falls back to the anon key.
    pub service_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BACKEND_URL)
            .map_err(|_| Error::Config(format!("{} not set", BACKEND_URL)))?;
        let anon_key = std::env::var(BACKEND_ANON_KEY)
            .map_err(|_| Error::Config(format!("{} not set", BACKEND_ANON_KEY)))?;
        let service_key = std::env::var(BACKEND_SERVICE_KEY).ok();

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            service_key,
        })
    }

    /// Key sent as the bearer token: the service key when present.
    pub fn bearer_key(&self) -> &str {
        self.service_key.as_deref().unwrap_or(&self.anon_key)
    }
}
