use std::str::FromStr;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::gateway::DataGateway;
use crate::students::canonical_s_number;
use crate::types::{HourRequest, HourRequestPatch, HourSubmission, RequestStatus, StudentPatch};

/// Cap on a single submission.
pub const MAX_HOURS_PER_REQUEST: f64 = 24.0;

/// Admin verdict on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn status(self) -> RequestStatus {
        match self {
            Decision::Approve => RequestStatus::Approved,
            Decision::Reject => RequestStatus::Rejected,
        }
    }
}

impl FromStr for Decision {
    type Err = Error;

    /// Accepts the two status words, ignoring case and surrounding
    /// whitespace: `" APPROVED "` parses, `"maybe"` does not.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("approved") {
            Ok(Decision::Approve)
        } else if trimmed.eq_ignore_ascii_case("rejected") {
            Ok(Decision::Reject)
        } else {
            Err(Error::InvalidRequest(format!("unknown decision: {:?}", s)))
        }
    }
}

/// Listing scope: the whole queue (admin view) or one student's history.
#[derive(Debug, Clone)]
pub enum Scope {
    All,
    Student(String),
}

/// What a decision actually did. `balance_updated` is false for rejections
/// and for approvals whose credit step failed; the request row is decided
/// either way.
#[derive(Debug)]
pub struct DecisionOutcome {
    pub request: HourRequest,
    pub balance_updated: bool,
}

pub async fn submit(
    gateway: &dyn DataGateway,
    submission: &HourSubmission,
) -> Result<HourRequest> {
    let student_id = canonical_s_number(&submission.student_id);
    if submission.event_name.trim().is_empty() {
        return Err(Error::InvalidRequest("event name is required".to_string()));
    }
    if submission.description.trim().is_empty() {
        return Err(Error::InvalidRequest("description is required".to_string()));
    }
    if !submission.hours_requested.is_finite() || submission.hours_requested <= 0.0 {
        return Err(Error::InvalidAmount(format!(
            "hours must be a positive number, got {}",
            submission.hours_requested
        )));
    }
    if submission.hours_requested > MAX_HOURS_PER_REQUEST {
        return Err(Error::InvalidAmount(format!(
            "at most {} hours per request, got {}",
            MAX_HOURS_PER_REQUEST, submission.hours_requested
        )));
    }
    if gateway.get_student(&student_id).await?.is_none() {
        return Err(Error::NotFound("student"));
    }

    let request = HourRequest {
        id: Uuid::new_v4().to_string(),
        student_id,
        event_name: submission.event_name.clone(),
        event_date: submission.event_date.clone(),
        hours_requested: submission.hours_requested,
        description: submission.description.clone(),
        image_ref: submission.image_ref.clone(),
        status: RequestStatus::Pending,
        admin_notes: None,
        reviewed_by: None,
        reviewed_at: None,
        submitted_at: chrono::Utc::now().to_rfc3339(),
    };
    let stored = gateway.insert_hour_request(&request).await?;
    tracing::info!(
        "Hour request {} submitted by {} for {} hours",
        stored.id,
        stored.student_id,
        stored.hours_requested
    );
    Ok(stored)
}

pub async fn list(gateway: &dyn DataGateway, scope: Scope) -> Result<Vec<HourRequest>> {
    match scope {
        Scope::All => gateway.list_hour_requests(None).await,
        Scope::Student(s_number) => {
            let id = canonical_s_number(&s_number);
            gateway.list_hour_requests(Some(&id)).await
        }
    }
}

/// Applies an admin decision to a request.
///
/// Step 1 always writes the review fields, with no guard on the prior
/// status; deciding an already-decided request runs the whole flow again,
/// including the credit on a second approval. Step 2 runs only for
/// approvals and its failures are logged and absorbed: the two writes are
/// independent calls with no transaction around them, so a credit failure
/// leaves an approved request and an unchanged balance.
pub async fn decide(
    gateway: &dyn DataGateway,
    request_id: &str,
    decision: Decision,
    admin_notes: Option<String>,
    reviewer: &str,
    override_hours: Option<f64>,
) -> Result<DecisionOutcome> {
    let request = gateway
        .get_hour_request(request_id)
        .await?
        .ok_or(Error::NotFound("hour request"))?;

    let patch = HourRequestPatch {
        status: decision.status(),
        reviewed_at: chrono::Utc::now().to_rfc3339(),
        reviewed_by: reviewer.to_string(),
        admin_notes,
    };
    let updated = gateway.update_hour_request(&request.id, &patch).await?;
    tracing::info!(
        "Hour request {} marked {} by {}",
        updated.id,
        updated.status.as_str(),
        reviewer
    );

    if decision == Decision::Reject {
        return Ok(DecisionOutcome {
            request: updated,
            balance_updated: false,
        });
    }

    let balance_updated = match credit_student(gateway, &updated, override_hours).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(
                "Failed to credit hours for request {} (student {}): {}",
                updated.id,
                updated.student_id,
                e
            );
            false
        }
    };

    Ok(DecisionOutcome {
        request: updated,
        balance_updated,
    })
}

/// A usable override wins; anything else falls back to the hours on the
/// request itself.
fn effective_hours(request: &HourRequest, override_hours: Option<f64>) -> f64 {
    match override_hours {
        Some(hours) if hours.is_finite() && hours > 0.0 => hours,
        Some(hours) => {
            tracing::warn!(
                "Ignoring unusable override of {} hours for request {}",
                hours,
                request.id
            );
            request.hours_requested
        }
        None => request.hours_requested,
    }
}

async fn credit_student(
    gateway: &dyn DataGateway,
    request: &HourRequest,
    override_hours: Option<f64>,
) -> Result<()> {
    let hours = effective_hours(request, override_hours);
    if !hours.is_finite() || hours <= 0.0 {
        return Err(Error::InvalidAmount(format!(
            "effective hours {} not creditable",
            hours
        )));
    }

    let student = gateway
        .get_student(&request.student_id)
        .await?
        .ok_or(Error::NotFound("student"))?;
    let total = student.total_hours.unwrap_or(0.0) + hours;
    let patch = StudentPatch {
        total_hours: Some(total),
        last_hour_update: Some(chrono::Utc::now().to_rfc3339()),
        ..StudentPatch::default()
    };
    gateway.update_student(&request.student_id, &patch).await?;
    tracing::info!(
        "Credited {} hours to {} (new total {})",
        hours,
        request.student_id,
        total
    );
    Ok(())
}
