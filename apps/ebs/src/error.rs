use actix_web::error::ResponseError;
use actix_web::http::header::{self, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::errors::ErrorCode;
use crate::trace_ctx;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {detail}")]
    Unauthorized { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Payload too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    /// Error code carried by this variant
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Unauthorized { code, .. } => *code,
            AppError::BadRequest { code, .. } => *code,
            AppError::PayloadTooLarge { .. } => ErrorCode::PayloadTooLarge,
            AppError::Internal { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Client-visible reason, written as the plain-text response body
    pub fn detail(&self) -> String {
        match self {
            AppError::Unauthorized { detail, .. } => detail.clone(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::PayloadTooLarge { limit } => {
                format!("Request body exceeds the {limit} byte limit")
            }
            AppError::Internal { detail, .. } => detail.clone(),
            // Startup-only; never leak configuration detail to a client.
            AppError::Config { .. } => canonical_reason(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 401 with the standard status text as the body
    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            code: ErrorCode::Unauthorized,
            detail: canonical_reason(StatusCode::UNAUTHORIZED),
        }
    }

    pub fn multiple_auth_headers() -> Self {
        Self::Unauthorized {
            code: ErrorCode::MultipleAuthHeaders,
            detail: "Multiple authorization headers found; only one header should be sent"
                .to_string(),
        }
    }

    pub fn malformed_auth_header() -> Self {
        Self::Unauthorized {
            code: ErrorCode::MalformedAuthHeader,
            detail: "Malformed authorization header".to_string(),
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn payload_too_large(limit: usize) -> Self {
        Self::PayloadTooLarge { limit }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::Internal,
            detail: detail.into(),
        }
    }

    pub fn verifier_failure(detail: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::VerifierFailure,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

fn canonical_reason(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let trace_id = trace_ctx::trace_id();
        let trace_header = HeaderValue::from_str(&trace_id)
            .unwrap_or_else(|_| HeaderValue::from_static("unknown"));

        HttpResponse::build(self.status())
            .content_type("text/plain; charset=utf-8")
            .insert_header((header::HeaderName::from_static("x-trace-id"), trace_header))
            .body(self.detail())
    }
}
