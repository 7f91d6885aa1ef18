//! Error types for the Filings Lens server

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use filings_core::{FilingsError, IntakeError, PageRedirect};
use serde::Serialize;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Missing x-session-id header")]
    MissingSession,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("{0}")]
    UnsupportedFileType(String),

    #[error("{0}")]
    FileTooLarge(String),

    #[error("{0}")]
    Validation(String),

    #[error("{}", .0.notice)]
    Redirect(PageRedirect),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'static str>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code) = match &self {
            ServerError::MissingSession => (StatusCode::BAD_REQUEST, "MISSING_SESSION"),
            ServerError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            ServerError::PageNotFound(_) => (StatusCode::NOT_FOUND, "PAGE_NOT_FOUND"),
            ServerError::UnsupportedFileType(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FILE_TYPE")
            }
            ServerError::FileTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
            ServerError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED"),
            ServerError::Redirect(_) => (StatusCode::SEE_OTHER, "REDIRECT"),
            ServerError::AnalysisFailed(_) => (StatusCode::BAD_GATEWAY, "ANALYSIS_FAILED"),
        };

        let redirect = match &self {
            ServerError::Redirect(redirect) => Some(redirect.to.path()),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
            redirect,
        };

        match redirect {
            Some(location) => (status, [(header::LOCATION, location)], Json(body)).into_response(),
            None => (status, Json(body)).into_response(),
        }
    }
}

impl From<FilingsError> for ServerError {
    fn from(err: FilingsError) -> Self {
        match err {
            FilingsError::Intake(IntakeError::UnsupportedType(_)) => {
                ServerError::UnsupportedFileType(err.to_string())
            }
            FilingsError::Intake(IntakeError::TooLarge { .. }) => {
                ServerError::FileTooLarge(err.to_string())
            }
            FilingsError::Intake(IntakeError::NoFile) | FilingsError::Validation(_) => {
                ServerError::Validation(err.to_string())
            }
            FilingsError::Analysis(inner) => ServerError::AnalysisFailed(inner.to_string()),
            FilingsError::Redirect(redirect) => ServerError::Redirect(redirect),
        }
    }
}

impl From<PageRedirect> for ServerError {
    fn from(redirect: PageRedirect) -> Self {
        ServerError::Redirect(redirect)
    }
}
