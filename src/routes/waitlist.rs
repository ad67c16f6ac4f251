use crate::domain::WaitlistEntry;
use crate::submission::{SubmissionError, WaitlistService};
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, post, web};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmissionResponse {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

impl ResponseError for SubmissionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::DuplicateEmail => StatusCode::CONFLICT,
            SubmissionError::PersistenceError(_) => StatusCode::BAD_REQUEST,
            SubmissionError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(SubmissionResponse::failure(self.to_string()))
    }
}

/// Accepts bodies regardless of their content type and turns unreadable ones
/// into a server error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .content_type(|_| true)
        .error_handler(reject_malformed_payload)
}

fn reject_malformed_payload(
    error: JsonPayloadError,
    _request: &HttpRequest,
) -> actix_web::Error {
    let error = SubmissionError::UnexpectedError(anyhow::anyhow!(
        "Failed to deserialize the waitlist form: {}",
        error
    ));
    tracing::warn!(error.cause_chain = ?error, "Rejected a malformed waitlist payload");
    error.into()
}

#[tracing::instrument(name = "Join the waitlist", skip(entry, service))]
#[post("/waitlist")]
pub async fn join_waitlist(
    entry: web::Json<WaitlistEntry>,
    service: web::Data<WaitlistService>,
) -> Result<HttpResponse, SubmissionError> {
    let notification = service.submit(&entry).await?;
    // The confirmation email keeps going without us.
    drop(notification);
    Ok(HttpResponse::Ok().json(SubmissionResponse::success()))
}
