use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything the workflows can fail with. Callers that drive a UI match on
/// the variant; the `Display` text is suitable for showing to an admin.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("meeting is not open for attendance")]
    MeetingClosed,

    #[error("incorrect attendance code")]
    InvalidCode,

    #[error("attendance already submitted for this meeting")]
    AlreadySubmitted,

    #[error("invalid hour amount: {0}")]
    InvalidAmount(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("backend returned {status}: {body}")]
    Gateway { status: u16, body: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
