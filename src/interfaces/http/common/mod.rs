//! Shared HTTP response types

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Uniform API response envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP status for each domain error class.
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::CapacityExceeded { .. } | DomainError::InvalidState { .. } => {
            StatusCode::CONFLICT
        }
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a domain error into the handler rejection shape used across the
/// REST modules.
pub fn reject<T>(error: DomainError) -> (StatusCode, axum::Json<ApiResponse<T>>) {
    let message = match &error {
        DomainError::Payment(kind) if kind.is_retryable() => {
            format!("{}; restart the payment with a fresh order", error)
        }
        _ => error.to_string(),
    };
    (status_for(&error), axum::Json(ApiResponse::error(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaymentError;

    #[test]
    fn error_status_mapping() {
        assert_eq!(
            status_for(&DomainError::Validation("x".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&DomainError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DomainError::CapacityExceeded {
                date: "2024-05-01".into(),
                time: "18:00".into(),
                requested: 3,
                remaining: 1
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&DomainError::Payment(PaymentError::Declined)),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            status_for(&DomainError::Storage("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn envelope_serialization() {
        let ok = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], 5);
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(err["success"], false);
        assert_eq!(err["error"], "nope");
    }
}
