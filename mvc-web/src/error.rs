use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use mvc_database::{LedgerError, RecordError};

/// Error answered as `{"error": message}` with a matching status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Log `source` and answer with a generic 500.
    fn internal(source: &dyn std::error::Error) -> Self {
        error!(%source, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<RecordError> for ApiError {
    fn from(source: RecordError) -> Self {
        match source {
            RecordError::UnknownColumn(_) | RecordError::NoFields => {
                Self::bad_request(source.to_string())
            }
            RecordError::Database(sqlx::Error::Database(ref db_error))
                if db_error.is_unique_violation() =>
            {
                Self::new(StatusCode::CONFLICT, "record already exists")
            }
            RecordError::Database(ref db_error) => Self::internal(db_error),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(source: LedgerError) -> Self {
        match source {
            LedgerError::InvalidAmount(_) | LedgerError::SelfTransfer | LedgerError::Overflow => {
                Self::bad_request(source.to_string())
            }
            LedgerError::InsufficientFunds { .. } => {
                Self::new(StatusCode::CONFLICT, source.to_string())
            }
            LedgerError::UnknownUser(_) => Self::not_found(source.to_string()),
            LedgerError::Database(ref db_error) => Self::internal(db_error),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_errors_map_to_client_statuses() {
        let cases = [
            (LedgerError::InvalidAmount(0), StatusCode::BAD_REQUEST),
            (LedgerError::SelfTransfer, StatusCode::BAD_REQUEST),
            (LedgerError::Overflow, StatusCode::BAD_REQUEST),
            (
                LedgerError::InsufficientFunds {
                    available: 5,
                    requested: 10,
                },
                StatusCode::CONFLICT,
            ),
            (LedgerError::UnknownUser(3), StatusCode::NOT_FOUND),
        ];

        for (source, status) in cases {
            assert_eq!(ApiError::from(source).status(), status);
        }
    }

    #[test]
    fn database_failures_are_not_leaked() {
        let error = ApiError::from(RecordError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message(), "internal server error");
    }

    #[test]
    fn record_validation_is_a_bad_request() {
        let error = ApiError::from(RecordError::UnknownColumn("nope".to_owned()));
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), "unknown column `nope`");
    }
}
